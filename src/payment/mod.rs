//! Payment module - checkout sessions on the hosted payment provider.
//!
//! - `gateway` - builds sessions for an order and recovers the order later
//! - `metadata` - the form-in-metadata encoding
//! - `stripe` - the Stripe Checkout client

pub mod gateway;
pub mod metadata;
pub mod stripe;

pub use gateway::{FetchedSession, SessionGateway};
pub use metadata::{MetadataError, FORM_METADATA_KEY};
pub use stripe::StripeClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// Rejection reported by the provider, carrying its message.
    #[error("{0}")]
    Provider(String),
    #[error("payment provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("checkout session {0} carries no form data")]
    MissingMetadata(String),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("payment provider endpoint is invalid: {0}")]
    InvalidEndpoint(String),
}

/// Lifecycle state of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    Complete,
    Expired,
    #[serde(other)]
    Unknown,
}

/// Whether the money has actually moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// True when the order may be fulfilled.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Paid | Self::NoPaymentRequired)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::NoPaymentRequired => "no_payment_required",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    /// Price in the currency's minor unit (cents).
    pub unit_amount: i64,
    pub currency: String,
    pub quantity: u32,
}

/// Everything needed to open a hosted checkout page.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub line_item: LineItem,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub status: Option<SessionStatus>,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Hosted checkout provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_session(&self, request: &SessionRequest) -> Result<CheckoutSession, PaymentError>;

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError>;

    /// Cheap authenticated call proving the provider is reachable.
    async fn ping(&self) -> Result<(), PaymentError>;
}
