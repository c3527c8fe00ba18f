use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use utoipa::{IntoParams, ToSchema};

use super::validation::{
    parse_flag, validate_host_url, validate_required, ValidationError, ValidationErrors,
};

/// Requested strength of the protective language, 1 (basic) to 3 (maximum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u8", into = "u8")]
pub struct ProtectionLevel(u8);

impl ProtectionLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for ProtectionLevel {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for ProtectionLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("protection level {} is outside 1..=3", value))
    }
}

impl From<ProtectionLevel> for u8 {
    fn from(level: ProtectionLevel) -> Self {
        level.0
    }
}

impl fmt::Display for ProtectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated document order. This is what travels inside the payment
/// session metadata and what the prompt is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormSubmission {
    #[schema(example = "nda")]
    pub document_type: String,
    #[schema(example = "Acme Robotics LLC")]
    pub business_name: String,
    #[schema(example = "Limited Liability Company")]
    pub business_type: String,
    /// Governing jurisdiction.
    #[serde(rename = "state")]
    #[schema(example = "California")]
    pub jurisdiction: String,
    #[schema(example = "Technology/Software")]
    pub industry: String,
    #[serde(default)]
    pub protection_level: ProtectionLevel,
    #[serde(default)]
    pub clause_confidentiality: bool,
    #[serde(default)]
    pub clause_arbitration: bool,
    #[serde(default)]
    pub clause_termination: bool,
    #[serde(default)]
    pub clause_ip: bool,
    #[serde(default)]
    pub additional_instructions: String,
}

impl FormSubmission {
    /// Human-readable names of the optional clauses that were ticked, in
    /// form order.
    pub fn selected_clauses(&self) -> Vec<&'static str> {
        [
            (self.clause_confidentiality, "Enhanced Confidentiality"),
            (self.clause_arbitration, "Arbitration Provision"),
            (self.clause_termination, "Advanced Termination Options"),
            (self.clause_ip, "Intellectual Property Protection"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect()
    }
}

/// Raw checkout form as posted by the browser.
///
/// Every field is optional text here; [`CheckoutRequest::validate`] turns
/// it into a typed [`FormSubmission`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CheckoutRequest {
    #[schema(example = "nda")]
    pub document_type: Option<String>,
    #[schema(example = "Acme Robotics LLC")]
    pub business_name: Option<String>,
    #[schema(example = "Limited Liability Company")]
    pub business_type: Option<String>,
    #[schema(example = "California")]
    pub state: Option<String>,
    #[schema(example = "Technology/Software")]
    pub industry: Option<String>,
    #[schema(example = "2")]
    pub protection_level: Option<String>,
    #[schema(example = "true")]
    pub clause_confidentiality: Option<String>,
    pub clause_arbitration: Option<String>,
    pub clause_termination: Option<String>,
    pub clause_ip: Option<String>,
    pub additional_instructions: Option<String>,
    /// Origin the browser wants to be redirected back to.
    #[serde(rename = "hostUrl")]
    #[schema(example = "https://instantlegal.ai/")]
    pub host_url: Option<String>,
}

/// Checkout input after boundary validation.
#[derive(Debug, Clone)]
pub struct ValidatedCheckout {
    pub form: FormSubmission,
    pub host_url: String,
}

impl CheckoutRequest {
    /// Build a request from loose text fields (multipart bodies).
    pub fn from_fields(mut fields: HashMap<String, String>) -> Self {
        Self {
            document_type: fields.remove("document_type"),
            business_name: fields.remove("business_name"),
            business_type: fields.remove("business_type"),
            state: fields.remove("state"),
            industry: fields.remove("industry"),
            protection_level: fields.remove("protection_level"),
            clause_confidentiality: fields.remove("clause_confidentiality"),
            clause_arbitration: fields.remove("clause_arbitration"),
            clause_termination: fields.remove("clause_termination"),
            clause_ip: fields.remove("clause_ip"),
            additional_instructions: fields.remove("additional_instructions"),
            host_url: fields.remove("hostUrl"),
        }
    }

    pub fn validate(self) -> Result<ValidatedCheckout, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let text = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();

        let document_type = text(self.document_type);
        let business_name = text(self.business_name);
        let business_type = text(self.business_type);
        let jurisdiction = text(self.state);
        let industry = text(self.industry);
        let host_url = text(self.host_url);

        validate_required(&document_type, "document_type", "Document type", &mut errors);
        validate_required(&business_name, "business_name", "Business name", &mut errors);
        validate_required(&business_type, "business_type", "Business type", &mut errors);
        validate_required(&jurisdiction, "state", "State", &mut errors);
        validate_required(&industry, "industry", "Industry", &mut errors);
        validate_host_url(&host_url, "hostUrl", &mut errors);

        let protection_level = match self.protection_level.as_deref().map(str::trim) {
            None | Some("") => ProtectionLevel::default(),
            Some(raw) => match raw.parse::<u8>().ok().and_then(ProtectionLevel::new) {
                Some(level) => level,
                None => {
                    errors.add(ValidationError::invalid_protection_level(
                        "protection_level",
                        raw,
                    ));
                    ProtectionLevel::default()
                }
            },
        };

        let clause_confidentiality = parse_flag(
            self.clause_confidentiality.as_deref(),
            "clause_confidentiality",
            &mut errors,
        );
        let clause_arbitration = parse_flag(
            self.clause_arbitration.as_deref(),
            "clause_arbitration",
            &mut errors,
        );
        let clause_termination = parse_flag(
            self.clause_termination.as_deref(),
            "clause_termination",
            &mut errors,
        );
        let clause_ip = parse_flag(self.clause_ip.as_deref(), "clause_ip", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidatedCheckout {
            form: FormSubmission {
                document_type,
                business_name,
                business_type,
                jurisdiction,
                industry,
                protection_level,
                clause_confidentiality,
                clause_arbitration,
                clause_termination,
                clause_ip,
                additional_instructions: text(self.additional_instructions),
            },
            host_url,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutSessionResponse {
    #[serde(rename = "sessionId")]
    #[schema(example = "cs_test_a1b2c3")]
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentSuccessResponse {
    pub success: bool,
    #[schema(example = "/download/nda_1a2b3c4d.pdf")]
    pub download_url: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentSuccessQuery {
    /// Checkout session identifier returned by the payment provider.
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: String,
}

/// RFC 7807 body used when the health check fails.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}
