//! Input validation for checkout forms.
//!
//! Collects every problem in one pass so the caller can show them all at
//! once instead of fixing fields one request at a time.

use std::fmt;

/// Validation error for a single form field.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The form field that failed validation
    pub field: String,
    pub message: String,
    /// Hint on how to fix the value
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must not be empty", label))
            .with_suggestion(format!("Please provide a {}", label.to_lowercase()))
    }

    pub fn invalid_protection_level(field: &str, value: &str) -> Self {
        Self::new(field, format!("Protection level '{}' is not valid", value))
            .with_suggestion("Use 1 (basic), 2 (standard) or 3 (maximum)")
    }

    pub fn invalid_flag(field: &str, value: &str) -> Self {
        Self::new(field, format!("'{}' is not a yes/no value", value))
            .with_suggestion("Use true or false")
    }

    pub fn invalid_host_url(field: &str, value: &str) -> Self {
        Self::new(field, format!("'{}' is not an absolute http(s) URL", value))
            .with_suggestion("Send the page origin, e.g. https://example.com/")
    }

    pub fn invalid_session_id(field: &str, value: &str) -> Self {
        Self::new(field, format!("'{}' is not a checkout session id", value))
            .with_suggestion("Use the session id from the payment return URL")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }

    /// Single message listing every error, suitable for an API response.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let details: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        format!(
            "Validation failed with {} error(s): {}",
            self.errors.len(),
            details.join("; ")
        )
    }
}

/// Validate that a string is not empty after trimming.
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Validate that the redirect base is an absolute http(s) URL.
pub fn validate_host_url(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, "Host URL"));
        return;
    }

    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => {}
        _ => errors.add(ValidationError::invalid_host_url(field, trimmed)),
    }
}

/// Session ids are opaque provider tokens made of ASCII letters, digits
/// and underscores.
pub fn validate_session_id(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.is_empty() {
        errors.add(ValidationError::empty_field(field, "Session id"));
        return;
    }

    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        errors.add(ValidationError::invalid_session_id(field, value));
    }
}

/// Parse a checkbox-style value. Browsers send "on", JS `FormData` sends
/// "true"/"false"; a missing field means unchecked.
pub fn parse_flag(value: Option<&str>, field: &str, errors: &mut ValidationErrors) -> bool {
    let Some(raw) = value else {
        return false;
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "off" | "0" | "no" => false,
        "true" | "on" | "1" | "yes" => true,
        _ => {
            errors.add(ValidationError::invalid_flag(field, raw));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field() {
        let mut errors = ValidationErrors::new();
        validate_required("  ", "business_name", "Business name", &mut errors);
        validate_required("Acme", "business_type", "Business type", &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["business_name"]);
        assert!(errors.to_message().contains("Business name must not be empty"));
    }

    #[test]
    fn test_host_url() {
        let mut errors = ValidationErrors::new();
        validate_host_url("https://instantlegal.ai/", "hostUrl", &mut errors);
        validate_host_url("http://localhost:3000/", "hostUrl", &mut errors);
        assert!(errors.is_empty());

        validate_host_url("ftp://example.com", "hostUrl", &mut errors);
        validate_host_url("https:///path", "hostUrl", &mut errors);
        validate_host_url("", "hostUrl", &mut errors);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_session_id() {
        let mut errors = ValidationErrors::new();
        validate_session_id("cs_test_a1B2c3", "session_id", &mut errors);
        assert!(errors.is_empty());

        validate_session_id("", "session_id", &mut errors);
        validate_session_id("cs_x/../../account", "session_id", &mut errors);
        validate_session_id("cs_1?expand=x", "session_id", &mut errors);
        validate_session_id("..", "session_id", &mut errors);
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_parse_flag_values() {
        let mut errors = ValidationErrors::new();
        assert!(parse_flag(Some("on"), "clause_ip", &mut errors));
        assert!(parse_flag(Some("TRUE"), "clause_ip", &mut errors));
        assert!(!parse_flag(Some("false"), "clause_ip", &mut errors));
        assert!(!parse_flag(None, "clause_ip", &mut errors));
        assert!(errors.is_empty());

        assert!(!parse_flag(Some("maybe"), "clause_ip", &mut errors));
        assert_eq!(errors.len(), 1);
    }
}
