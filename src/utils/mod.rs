//! Utility functions shared across the application.
//!
//! This module contains small helpers used by the request conversion code.

/// Normalizes a base path so it starts with `/` and never ends with `/`.
///
/// Returns an empty string when the input is blank, meaning "no stripping".
///
/// # Examples
///
/// `"foo"` → `"/foo"`, `"/foo/"` → `"/foo"`, `"  "` → `""`
#[must_use]
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut base_path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };

    if base_path.ends_with('/') {
        base_path.pop();
    }

    base_path
}
