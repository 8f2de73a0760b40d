//! Entity kinds managed by the console and their shared record shape.
//!
//! Every screen of the console (sites, areas, processes, stations, devices,
//! events, users, permissions) manages records of the same shape: an opaque
//! id, a name, a description, an optional parent reference and a handful of
//! kind-specific string attributes. [`EntityKind`] carries everything that
//! differs between screens: labels, GraphQL operation names, the parent
//! relation, and the field rules.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::EntityId;
use crate::validation::{
    validate_fields, FieldRule, DESCRIPTION_RULE, EVENT_EMAIL_RULE, EVENT_SMS_RULE, NAME_RULE,
    USER_EMAIL_RULE,
};

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The kinds of records managed through the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Site,
    Area,
    Process,
    Station,
    Device,
    Event,
    User,
    Permission,
}

const GENERAL_FIELDS: &[FieldRule] = &[NAME_RULE, DESCRIPTION_RULE];
const EVENT_FIELDS: &[FieldRule] = &[NAME_RULE, DESCRIPTION_RULE, EVENT_SMS_RULE, EVENT_EMAIL_RULE];
const USER_FIELDS: &[FieldRule] = &[NAME_RULE, DESCRIPTION_RULE, USER_EMAIL_RULE];

impl EntityKind {
    /// Every kind, in hierarchy order.
    pub const ALL: [EntityKind; 8] = [
        Self::Site,
        Self::Area,
        Self::Process,
        Self::Station,
        Self::Device,
        Self::Event,
        Self::User,
        Self::Permission,
    ];

    /// Lowercase identifier, also used as the usage-metric key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Area => "area",
            Self::Process => "process",
            Self::Station => "station",
            Self::Device => "device",
            Self::Event => "event",
            Self::User => "user",
            Self::Permission => "permission",
        }
    }

    /// Singular display label, e.g. `"Site"`. Also the GraphQL type name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::Area => "Area",
            Self::Process => "Process",
            Self::Station => "Station",
            Self::Device => "Device",
            Self::Event => "Event",
            Self::User => "User",
            Self::Permission => "Permission",
        }
    }

    /// Plural display label, e.g. `"Processes"`.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Site => "Sites",
            Self::Area => "Areas",
            Self::Process => "Processes",
            Self::Station => "Stations",
            Self::Device => "Devices",
            Self::Event => "Events",
            Self::User => "Users",
            Self::Permission => "Permissions",
        }
    }

    /// GraphQL query field listing this kind, e.g. `"listSites"`.
    pub fn list_operation(self) -> String {
        format!("list{}", self.plural())
    }

    /// GraphQL mutation creating this kind, e.g. `"createSite"`.
    pub fn create_operation(self) -> String {
        format!("create{}", self.label())
    }

    /// GraphQL mutation updating this kind, e.g. `"updateSite"`.
    pub fn update_operation(self) -> String {
        format!("update{}", self.label())
    }

    /// GraphQL mutation deleting this kind, e.g. `"deleteSite"`.
    pub fn delete_operation(self) -> String {
        format!("delete{}", self.label())
    }

    /// The kind this kind belongs to in the site hierarchy.
    pub fn parent(self) -> Option<EntityKind> {
        match self {
            Self::Area => Some(Self::Site),
            Self::Process | Self::Station => Some(Self::Area),
            Self::Device => Some(Self::Station),
            Self::Event => Some(Self::Process),
            Self::Site | Self::User | Self::Permission => None,
        }
    }

    /// Record and mutation-input field holding the parent id.
    pub fn parent_field(self) -> Option<&'static str> {
        match self {
            Self::Area => Some("areaSiteId"),
            Self::Process => Some("processAreaId"),
            Self::Station => Some("stationAreaId"),
            Self::Device => Some("deviceStationId"),
            Self::Event => Some("eventProcessId"),
            Self::Site | Self::User | Self::Permission => None,
        }
    }

    /// List-query argument filtering by parent id, e.g. `"siteId"`.
    pub fn parent_argument(self) -> Option<&'static str> {
        self.parent().map(|parent| match parent {
            Self::Site => "siteId",
            Self::Area => "areaId",
            Self::Process => "processId",
            Self::Station => "stationId",
            Self::Device => "deviceId",
            Self::Event => "eventId",
            Self::User => "userId",
            Self::Permission => "permissionId",
        })
    }

    /// Whether deleting a record also deletes its descendants server-side.
    pub fn cascades_on_delete(self) -> bool {
        matches!(
            self,
            Self::Site | Self::Area | Self::Process | Self::Station
        )
    }

    /// Editable form fields and their validation rules.
    pub fn fields(self) -> &'static [FieldRule] {
        match self {
            Self::Event => EVENT_FIELDS,
            Self::User => USER_FIELDS,
            _ => GENERAL_FIELDS,
        }
    }

    /// Fields beyond name and description, stored as record attributes.
    pub fn attribute_fields(self) -> impl Iterator<Item = &'static FieldRule> {
        self.fields()
            .iter()
            .filter(|rule| rule.key != NAME_RULE.key && rule.key != DESCRIPTION_RULE.key)
    }

    /// Parse a kind from its lowercase identifier or label.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str() == lowered || kind.plural().to_ascii_lowercase() == lowered
            })
            .ok_or_else(|| CoreError::Unsupported {
                what: "entity kind",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// EntityRecord
// ---------------------------------------------------------------------------

/// One record as held in a list view.
///
/// `visible` is client-only search state and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    /// Kind-specific string fields (e.g. `email`, `sms` on events).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip)]
    pub visible: bool,
}

impl EntityRecord {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            parent_id: None,
            attributes: BTreeMap::new(),
            visible: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<EntityId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up a form field value by key.
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            other => self.attributes.get(other).map(String::as_str),
        }
    }
}

// ---------------------------------------------------------------------------
// EntityInput
// ---------------------------------------------------------------------------

/// Payload for create and update mutations.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct EntityInput {
    #[validate(custom(function = "crate::validation::general_input"))]
    pub name: String,
    #[validate(custom(function = "crate::validation::general_input"))]
    pub description: String,
    pub parent_id: Option<EntityId>,
    pub attributes: BTreeMap<String, String>,
}

impl EntityInput {
    /// Build an input from submitted form values.
    pub fn from_form(values: &BTreeMap<String, String>, parent_id: Option<EntityId>) -> Self {
        let name = values.get("name").cloned().unwrap_or_default();
        let description = values.get("description").cloned().unwrap_or_default();
        let attributes = values
            .iter()
            .filter(|(key, _)| key.as_str() != "name" && key.as_str() != "description")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            name,
            description,
            parent_id,
            attributes,
        }
    }

    /// Validate against the derived rules and every field rule of `kind`.
    ///
    /// Child kinds must carry a parent id.
    pub fn validate_for(&self, kind: EntityKind) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let mut values = self.attributes.clone();
        values.insert("name".to_string(), self.name.clone());
        values.insert("description".to_string(), self.description.clone());
        validate_fields(kind.fields(), &values)?;

        if kind.parent().is_some() && self.parent_id.as_deref().map_or(true, str::is_empty) {
            return Err(CoreError::Validation(format!(
                "{} requires a parent {}",
                kind.label(),
                kind.parent().map(EntityKind::as_str).unwrap_or_default()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
