//! Client-side list helpers: keyword visibility and name ordering.
//!
//! Search never reorders a list and sorting never touches visibility, so
//! the two can be applied in any order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::EntityRecord;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

/// Display order of a list, by record name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "a-z" => Ok(Self::Asc),
            "desc" | "z-a" => Ok(Self::Desc),
            _ => Err(CoreError::Unsupported {
                what: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Compare two records by name, case-insensitively.
///
/// Ties fall back to the raw name and then the id so the order is total.
pub fn compare_by_name(a: &EntityRecord, b: &EntityRecord) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort records in place by name in the given order.
pub fn sort_by_name(records: &mut [EntityRecord], order: SortOrder) {
    match order {
        SortOrder::Asc => records.sort_by(compare_by_name),
        SortOrder::Desc => records.sort_by(|a, b| compare_by_name(b, a)),
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Case-insensitive substring match. The empty keyword matches everything.
pub fn matches_keyword(name: &str, keyword: &str) -> bool {
    keyword.is_empty() || name.to_lowercase().contains(&keyword.to_lowercase())
}

/// Recompute `visible` on every record from `keyword`.
pub fn make_visible_by_keyword(records: &mut [EntityRecord], keyword: &str) {
    for record in records {
        record.visible = matches_keyword(&record.name, keyword);
    }
}

/// List title with the record count, e.g. `"Sites (2)"`.
pub fn count_title(plural: &str, count: usize) -> String {
    format!("{plural} ({count})")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
