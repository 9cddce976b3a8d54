//! Text normalization helpers shared by the domain rules.

use crate::error::{CoreError, CoreResult};

/// Trim a required text field, rejecting blank input with `Validation`.
pub fn require_non_blank(value: &str, field: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!(
            "{field} must not be blank"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a required text field and enforce a maximum length.
pub fn require_non_blank_max(value: &str, field: &str, max: usize) -> CoreResult<String> {
    let trimmed = require_non_blank(value, field)?;
    if trimmed.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed)
}

/// Trim an optional free-text field, mapping a blank result to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
