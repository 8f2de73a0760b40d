//! GraphQL documents for the entity operations.
//!
//! Every kind shares one document shape per operation; only the operation
//! name, the input type and the selection set vary, and those come from
//! [`EntityKind`].

use andon_core::entity::EntityKind;

/// Fields requested for every record of `kind`.
pub fn selection_set(kind: EntityKind) -> String {
    let mut fields = vec!["id", "name", "description"];
    if let Some(parent) = kind.parent_field() {
        fields.push(parent);
    }
    fields.extend(kind.attribute_fields().map(|rule| rule.key));
    fields.join(" ")
}

/// Query listing every record of `kind`, optionally filtered by parent.
pub fn list_document(kind: EntityKind) -> String {
    let operation = kind.list_operation();
    let selection = selection_set(kind);
    match kind.parent_argument() {
        Some(arg) => format!(
            "query List{plural}(${arg}: ID) {{ {operation}({arg}: ${arg}) {{ items {{ {selection} }} nextToken }} }}",
            plural = kind.plural(),
        ),
        None => format!(
            "query List{plural} {{ {operation} {{ items {{ {selection} }} nextToken }} }}",
            plural = kind.plural(),
        ),
    }
}

/// Mutation creating one record of `kind` from `$input`.
pub fn create_document(kind: EntityKind) -> String {
    format!(
        "mutation Create{label}($input: Create{label}Input!) {{ {operation}(input: $input) {{ {selection} }} }}",
        label = kind.label(),
        operation = kind.create_operation(),
        selection = selection_set(kind),
    )
}

/// Mutation updating one record of `kind` from `$input` (which carries `id`).
pub fn update_document(kind: EntityKind) -> String {
    format!(
        "mutation Update{label}($input: Update{label}Input!) {{ {operation}(input: $input) {{ {selection} }} }}",
        label = kind.label(),
        operation = kind.update_operation(),
        selection = selection_set(kind),
    )
}

/// Mutation deleting one record of `kind` by `$id`.
pub fn delete_document(kind: EntityKind) -> String {
    format!(
        "mutation Delete{label}($id: ID!) {{ {operation}(id: $id) {{ id }} }}",
        label = kind.label(),
        operation = kind.delete_operation(),
    )
}
