//! Notification payloads shown in the shell's toast area.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// How long a toast stays on screen unless the caller says otherwise.
pub const DEFAULT_DURATION_SECS: u32 = 5;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message for the shell to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub duration_secs: u32,
    pub timestamp: Timestamp,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity, duration_secs: u32) -> Self {
        Self {
            message: message.into(),
            severity,
            duration_secs,
            timestamp: chrono::Utc::now(),
        }
    }
}
