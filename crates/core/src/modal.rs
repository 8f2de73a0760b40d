//! Modal dialog state for the entity list views.
//!
//! A view has at most one modal open. [`Modal`] carries the data of the
//! open dialog inside its variant: the add and edit forms hold their field
//! values and validity, the delete confirmation holds the target id and
//! name.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::EntityRecord;
use crate::error::CoreError;
use crate::types::EntityId;
use crate::validation::{input_validation_class, FieldRule};

// ---------------------------------------------------------------------------
// Modal kind
// ---------------------------------------------------------------------------

/// Which dialog to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalKind {
    Add,
    Edit,
    Delete,
}

impl ModalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModalKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            _ => Err(CoreError::Unsupported {
                what: "modal type",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Values and per-field validity of an add or edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    rules: &'static [FieldRule],
    values: BTreeMap<String, String>,
    validity: BTreeMap<String, bool>,
}

impl FormState {
    /// An empty form. Required fields start invalid.
    pub fn new(rules: &'static [FieldRule]) -> Self {
        let values = rules
            .iter()
            .map(|rule| (rule.key.to_string(), String::new()))
            .collect();
        let validity = rules
            .iter()
            .map(|rule| (rule.key.to_string(), rule.check("")))
            .collect();
        Self {
            rules,
            values,
            validity,
        }
    }

    /// A form pre-filled from an existing record.
    pub fn from_record(rules: &'static [FieldRule], record: &EntityRecord) -> Self {
        let mut form = Self::new(rules);
        for rule in rules {
            let value = record.field(rule.key).unwrap_or_default();
            form.values.insert(rule.key.to_string(), value.to_string());
            form.validity.insert(rule.key.to_string(), rule.check(value));
        }
        form
    }

    /// Set a field value and recompute its validity.
    ///
    /// Returns the new validity, or [`CoreError::UnknownField`].
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<bool, CoreError> {
        let rule = self
            .rules
            .iter()
            .find(|rule| rule.key == key)
            .ok_or_else(|| CoreError::UnknownField(key.to_string()))?;

        let value = value.into();
        let valid = rule.check(&value);
        self.values.insert(rule.key.to_string(), value);
        self.validity.insert(rule.key.to_string(), valid);
        Ok(valid)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.validity.get(key).copied().unwrap_or(false)
    }

    /// Whether every field is valid, which enables the submit button.
    pub fn is_submittable(&self) -> bool {
        self.validity.values().all(|valid| *valid)
    }

    /// Keys of the fields currently failing validation.
    pub fn invalid_fields(&self) -> Vec<&str> {
        self.validity
            .iter()
            .filter(|(_, valid)| !**valid)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// CSS class for a field's input element.
    pub fn input_class(&self, key: &str) -> &'static str {
        input_validation_class(self.value(key).unwrap_or_default(), self.is_valid(key))
    }
}

// ---------------------------------------------------------------------------
// Modal
// ---------------------------------------------------------------------------

/// The dialog currently shown by a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    None,
    Add {
        form: FormState,
    },
    Edit {
        id: EntityId,
        form: FormState,
    },
    Delete {
        id: EntityId,
        name: String,
    },
}

impl Modal {
    pub fn kind(&self) -> Option<ModalKind> {
        match self {
            Self::None => None,
            Self::Add { .. } => Some(ModalKind::Add),
            Self::Edit { .. } => Some(ModalKind::Edit),
            Self::Delete { .. } => Some(ModalKind::Delete),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// The form of an open add or edit dialog.
    pub fn form(&self) -> Option<&FormState> {
        match self {
            Self::Add { form } | Self::Edit { form, .. } => Some(form),
            Self::None | Self::Delete { .. } => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        match self {
            Self::Add { form } | Self::Edit { form, .. } => Some(form),
            Self::None | Self::Delete { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
