//! Form input validation shared by every entity form.
//!
//! [`validate_general_input`] is the single rule behind every text field:
//! a length window plus a character whitelist. ASCII letters and digits are
//! always permitted; anything else must appear in the per-field `allowed`
//! set. [`FieldRule`] binds that rule to a named form field.

use std::collections::BTreeMap;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum length of names and descriptions.
pub const GENERAL_INPUT_MIN: usize = 1;

/// Maximum length of names and descriptions.
pub const GENERAL_INPUT_MAX: usize = 40;

/// Punctuation permitted in names and descriptions.
pub const GENERAL_INPUT_ALLOWED: &str = "- _/#";

/// Punctuation permitted in e-mail address lists.
pub const EMAIL_ALLOWED: &str = "@._-+,";

/// Punctuation permitted in phone number lists.
pub const PHONE_ALLOWED: &str = "+ ,";

/// CSS class applied to an input whose value passes validation.
pub const CLASS_VALID: &str = "is-valid";

/// CSS class applied to an input whose value fails validation.
pub const CLASS_INVALID: &str = "is-invalid";

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Check a value against a length window and a character whitelist.
///
/// Length is counted in characters, not bytes. Returns `true` iff
/// `min <= len <= max` and every character is an ASCII letter, an ASCII
/// digit, or contained in `allowed`.
///
/// # Examples
///
/// ```
/// use andon_core::validation::validate_general_input;
/// assert!(validate_general_input("Line 1/A", 1, 40, "- _/#"));
/// assert!(!validate_general_input("Line 1!", 1, 40, "- _/#"));
/// assert!(!validate_general_input("", 1, 40, "- _/#"));
/// ```
pub fn validate_general_input(value: &str, min: usize, max: usize, allowed: &str) -> bool {
    let len = value.chars().count();
    if len < min || len > max {
        return false;
    }

    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || allowed.contains(c))
}

/// Pick the CSS class for an input given its current value and validity.
///
/// Untouched (empty) inputs get no class so the form does not open in an
/// error state.
pub fn input_validation_class(value: &str, is_valid: bool) -> &'static str {
    if value.is_empty() {
        ""
    } else if is_valid {
        CLASS_VALID
    } else {
        CLASS_INVALID
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Validation rule for one named form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Form and GraphQL field name, e.g. `"name"`.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub min: usize,
    pub max: usize,
    /// Permitted punctuation in addition to ASCII alphanumerics.
    pub allowed: &'static str,
    /// Optional fields accept the empty string.
    pub required: bool,
}

impl FieldRule {
    /// Whether `value` satisfies this rule.
    pub fn check(&self, value: &str) -> bool {
        if value.is_empty() && !self.required {
            return true;
        }
        validate_general_input(value, self.min, self.max, self.allowed)
    }
}

/// Entity name rule.
pub const NAME_RULE: FieldRule = FieldRule {
    key: "name",
    label: "Name",
    min: GENERAL_INPUT_MIN,
    max: GENERAL_INPUT_MAX,
    allowed: GENERAL_INPUT_ALLOWED,
    required: true,
};

/// Entity description rule.
pub const DESCRIPTION_RULE: FieldRule = FieldRule {
    key: "description",
    label: "Description",
    min: GENERAL_INPUT_MIN,
    max: GENERAL_INPUT_MAX,
    allowed: GENERAL_INPUT_ALLOWED,
    required: true,
};

/// Optional comma-separated e-mail list on events.
pub const EVENT_EMAIL_RULE: FieldRule = FieldRule {
    key: "email",
    label: "E-mail",
    min: 0,
    max: 255,
    allowed: EMAIL_ALLOWED,
    required: false,
};

/// Optional comma-separated phone list on events.
pub const EVENT_SMS_RULE: FieldRule = FieldRule {
    key: "sms",
    label: "SMS",
    min: 0,
    max: 255,
    allowed: PHONE_ALLOWED,
    required: false,
};

/// Required e-mail address on users.
pub const USER_EMAIL_RULE: FieldRule = FieldRule {
    key: "email",
    label: "E-mail",
    min: 3,
    max: 255,
    allowed: EMAIL_ALLOWED,
    required: true,
};

/// Validate a complete set of form values against `rules`.
///
/// Missing values are treated as empty. Returns a `CoreError::Validation`
/// naming every failing field.
pub fn validate_fields(
    rules: &[FieldRule],
    values: &BTreeMap<String, String>,
) -> Result<(), CoreError> {
    let failing: Vec<&str> = rules
        .iter()
        .filter(|rule| {
            let value = values.get(rule.key).map(String::as_str).unwrap_or("");
            !rule.check(value)
        })
        .map(|rule| rule.key)
        .collect();

    if failing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid value for: {}",
            failing.join(", ")
        )))
    }
}

/// Adapter for `validator` custom rules on general text inputs.
pub fn general_input(value: &str) -> Result<(), validator::ValidationError> {
    if validate_general_input(value, GENERAL_INPUT_MIN, GENERAL_INPUT_MAX, GENERAL_INPUT_ALLOWED) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("general_input"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
