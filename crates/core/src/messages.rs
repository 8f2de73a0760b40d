//! User-facing message text for the entity views.
//!
//! Messages are built from the entity kind so every screen reports the
//! same outcomes with the same wording.

use crate::classify::ErrorClass;
use crate::entity::EntityKind;
use crate::modal::ModalKind;

/// Shown for any mutation rejected with `Unauthorized`.
pub const NOT_AUTHORIZED: &str = "You are not authorized to perform this action.";

/// Inline banner prefix for load failures.
pub const ERROR_PREFIX: &str = "Error";

pub fn load_failed(kind: EntityKind) -> String {
    format!("Failed to get {}.", kind.plural().to_lowercase())
}

pub fn added(kind: EntityKind) -> String {
    format!("{} has been added.", kind.label())
}

pub fn updated(kind: EntityKind) -> String {
    format!("{} has been updated.", kind.label())
}

pub fn deleted(kind: EntityKind) -> String {
    format!("{} has been deleted.", kind.label())
}

pub fn duplicate_name(kind: EntityKind) -> String {
    format!("The {} name already exists.", kind.as_str())
}

pub fn modal_already_open() -> String {
    "Another dialog is already open.".to_string()
}

/// Message for a failed mutation of the given dialog kind.
pub fn mutation_failed(kind: EntityKind, modal: ModalKind, class: ErrorClass) -> String {
    match class {
        ErrorClass::Unauthorized => NOT_AUTHORIZED.to_string(),
        ErrorClass::Duplicate => duplicate_name(kind),
        ErrorClass::Generic => {
            let verb = match modal {
                ModalKind::Add => "create",
                ModalKind::Edit => "update",
                ModalKind::Delete => "delete",
            };
            format!("Failed to {verb} {}.", kind.as_str())
        }
    }
}

/// Dialog title for the given dialog kind.
pub fn modal_title(kind: EntityKind, modal: ModalKind) -> String {
    match modal {
        ModalKind::Add => format!("{} Registration", kind.label()),
        ModalKind::Edit => format!("Edit {}", kind.label()),
        ModalKind::Delete => format!("Delete {}", kind.label()),
    }
}

/// Cascade warning shown in the delete confirmation, if deleting `kind`
/// removes descendants.
pub fn delete_warning(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::Site => Some(
            "Deleting the site deletes every area, process, station, event, and device that belongs to the site.",
        ),
        EntityKind::Area => Some(
            "Deleting the area deletes every process, station, event, and device that belongs to the area.",
        ),
        EntityKind::Process => {
            Some("Deleting the process deletes every event that belongs to the process.")
        }
        EntityKind::Station => {
            Some("Deleting the station deletes every device that belongs to the station.")
        }
        _ => None,
    }
}
