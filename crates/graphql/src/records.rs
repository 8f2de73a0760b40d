//! Conversion between GraphQL JSON and [`EntityRecord`] / [`EntityInput`].

use andon_core::entity::{EntityInput, EntityKind, EntityRecord};
use serde_json::{Map, Value};

use crate::error::ApiError;

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Decode one record of `kind` from a GraphQL object.
pub fn decode_record(kind: EntityKind, value: &Value) -> Result<EntityRecord, ApiError> {
    let object = value
        .as_object()
        .ok_or_else(|| ApiError::Decode(format!("{} record is not an object", kind.label())))?;

    let id = string_field(object, "id").unwrap_or_default();
    let name = string_field(object, "name")
        .ok_or_else(|| ApiError::Decode(format!("{} record {id} has no name", kind.label())))?;

    let mut record = EntityRecord::new(id, name);
    record.description = string_field(object, "description").unwrap_or_default();
    record.parent_id = kind
        .parent_field()
        .and_then(|field| string_field(object, field));

    for rule in kind.attribute_fields() {
        if let Some(value) = string_field(object, rule.key) {
            record.attributes.insert(rule.key.to_string(), value);
        }
    }
    Ok(record)
}

/// Decode a list result, accepting either `{ items: [...] }` or a bare array.
///
/// Rows that cannot be shown (not an object, no name, or no id) are
/// dropped with a warning so one bad row does not empty the list.
pub fn decode_items(kind: EntityKind, value: &Value) -> Result<Vec<EntityRecord>, ApiError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(object) => match object.get("items") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => return Ok(Vec::new()),
            Some(_) => {
                return Err(ApiError::Decode(format!(
                    "{} items is not an array",
                    kind.list_operation()
                )))
            }
        },
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(ApiError::Decode(format!(
                "{} returned an unexpected shape",
                kind.list_operation()
            )))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match decode_record(kind, item) {
            Ok(record) if record.id.is_empty() => {
                tracing::warn!(kind = %kind, name = %record.name, "Dropping record without id");
            }
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Dropping malformed record");
            }
        }
    }
    Ok(records)
}

/// Encode a mutation input for `kind`. Updates pass the record `id`.
pub fn encode_input(kind: EntityKind, input: &EntityInput, id: Option<&str>) -> Value {
    let mut object = Map::new();
    if let Some(id) = id {
        object.insert("id".into(), Value::String(id.to_string()));
    }
    object.insert("name".into(), Value::String(input.name.clone()));
    object.insert("description".into(), Value::String(input.description.clone()));

    if let (Some(field), Some(parent_id)) = (kind.parent_field(), input.parent_id.as_ref()) {
        object.insert(field.into(), Value::String(parent_id.clone()));
    }
    for rule in kind.attribute_fields() {
        if let Some(value) = input.attributes.get(rule.key) {
            object.insert(rule.key.into(), Value::String(value.clone()));
        }
    }
    Value::Object(object)
}
