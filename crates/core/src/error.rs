//! Errors raised by domain logic before anything reaches the backend.

use crate::entity::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A value outside a fixed vocabulary: entity kind, sort order, dialog type.
    #[error("Unsupported {what}: {value}")]
    Unsupported { what: &'static str, value: String },

    /// No loaded record has this id.
    #[error("{} {id} was not found.", .kind.label())]
    NotFound { kind: EntityKind, id: String },

    #[error("Unknown form field '{0}'")]
    UnknownField(String),

    #[error("No form is open")]
    NoForm,

    /// Field values or relations the backend would reject.
    #[error("Validation failed: {0}")]
    Validation(String),
}
