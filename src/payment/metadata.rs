//! Encoding of the form submission into checkout session metadata.
//!
//! The whole [`FormSubmission`] travels as one metadata value under
//! [`FORM_METADATA_KEY`]. The value is compact JSON with the form's field
//! names (`document_type`, `business_name`, `business_type`, `state`,
//! `industry`, `protection_level`, the four `clause_*` booleans and
//! `additional_instructions`).

use thiserror::Error;

use crate::checkout::models::FormSubmission;

pub const FORM_METADATA_KEY: &str = "form_data";

/// Stripe rejects metadata values longer than this many characters.
pub const MAX_METADATA_VALUE_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("form metadata is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoded form is {len} characters, the payment provider accepts at most {max}")]
    TooLong { len: usize, max: usize },
}

pub fn encode_form(form: &FormSubmission) -> Result<String, MetadataError> {
    let encoded = serde_json::to_string(form)?;
    let len = encoded.chars().count();
    if len > MAX_METADATA_VALUE_CHARS {
        return Err(MetadataError::TooLong {
            len,
            max: MAX_METADATA_VALUE_CHARS,
        });
    }
    Ok(encoded)
}

pub fn decode_form(value: &str) -> Result<FormSubmission, MetadataError> {
    Ok(serde_json::from_str(value)?)
}
