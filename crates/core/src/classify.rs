//! Classification of backend error tags into user-facing categories.

use serde::Serialize;

/// `errorType` reported when the caller lacks permission.
pub const ERROR_TYPE_UNAUTHORIZED: &str = "Unauthorized";

/// `errorType` reported when a name is already taken.
pub const ERROR_TYPE_DUPLICATED: &str = "DataDuplicatedError";

/// What the user is told about a failed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Unauthorized,
    Duplicate,
    Generic,
}

impl ErrorClass {
    /// Classify the `errorType` tag of the first backend error.
    ///
    /// Duplicates are only meaningful for mutations that write a name, so
    /// callers outside create/update should use [`Self::for_delete`].
    pub fn from_error_type(error_type: Option<&str>) -> Self {
        match error_type {
            Some(ERROR_TYPE_UNAUTHORIZED) => Self::Unauthorized,
            Some(ERROR_TYPE_DUPLICATED) => Self::Duplicate,
            _ => Self::Generic,
        }
    }

    /// Classification for delete failures: only authorization is special.
    pub fn for_delete(error_type: Option<&str>) -> Self {
        match Self::from_error_type(error_type) {
            Self::Duplicate => Self::Generic,
            other => other,
        }
    }
}
