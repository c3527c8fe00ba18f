use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::metadata::{decode_form, encode_form, FORM_METADATA_KEY};
use super::{LineItem, PaymentError, PaymentProvider, PaymentStatus, SessionRequest, SessionStatus};
use crate::checkout::models::FormSubmission;
use crate::config::{DocumentCatalog, StripeConfig};

const PRODUCT_DESCRIPTION: &str = "AI-generated legal document tailored to your business needs";
const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Price of one generated document.
#[derive(Debug, Clone)]
pub struct Pricing {
    pub unit_amount: i64,
    pub currency: String,
}

impl From<&StripeConfig> for Pricing {
    fn from(config: &StripeConfig) -> Self {
        Self {
            unit_amount: config.unit_amount,
            currency: config.currency.clone(),
        }
    }
}

/// A session read back from the provider together with the order it
/// carries.
#[derive(Debug, Clone)]
pub struct FetchedSession {
    pub session_id: String,
    pub status: Option<SessionStatus>,
    pub payment_status: PaymentStatus,
    pub form: FormSubmission,
}

/// Opens checkout sessions for document orders and recovers the order
/// once the customer comes back.
#[derive(Clone)]
pub struct SessionGateway {
    provider: Arc<dyn PaymentProvider>,
    catalog: DocumentCatalog,
    pricing: Pricing,
}

impl SessionGateway {
    pub fn new(provider: Arc<dyn PaymentProvider>, catalog: DocumentCatalog, pricing: Pricing) -> Self {
        Self {
            provider,
            catalog,
            pricing,
        }
    }

    /// Build the session request for `form`. Split out so the exact
    /// provider payload can be inspected without a provider.
    pub fn session_request(
        &self,
        form: &FormSubmission,
        host_url: &str,
    ) -> Result<SessionRequest, PaymentError> {
        let label = self.catalog.label_or_custom(&form.document_type);

        let mut metadata = BTreeMap::new();
        metadata.insert(FORM_METADATA_KEY.to_string(), encode_form(form)?);

        Ok(SessionRequest {
            line_item: LineItem {
                name: format!("Legal Document: {}", label),
                description: PRODUCT_DESCRIPTION.to_string(),
                unit_amount: self.pricing.unit_amount,
                currency: self.pricing.currency.clone(),
                quantity: 1,
            },
            success_url: success_url(host_url),
            cancel_url: host_url.to_string(),
            metadata,
        })
    }

    /// Create a checkout session and return its identifier.
    pub async fn create_session(
        &self,
        form: &FormSubmission,
        host_url: &str,
    ) -> Result<String, PaymentError> {
        let request = self.session_request(form, host_url)?;
        let session = self.provider.create_session(&request).await?;
        debug!(
            "Created checkout session {} for document type '{}'",
            session.id, form.document_type
        );
        Ok(session.id)
    }

    /// Retrieve a session and decode the order stored in its metadata.
    pub async fn fetch_session(&self, session_id: &str) -> Result<FetchedSession, PaymentError> {
        let session = self.provider.retrieve_session(session_id).await?;
        debug!(
            "Fetched checkout session {} (payment status: {})",
            session.id, session.payment_status
        );

        let encoded = session
            .metadata
            .get(FORM_METADATA_KEY)
            .ok_or_else(|| PaymentError::MissingMetadata(session.id.clone()))?;
        let form = decode_form(encoded)?;

        Ok(FetchedSession {
            session_id: session.id,
            status: session.status,
            payment_status: session.payment_status,
            form,
        })
    }

    pub async fn health(&self) -> Result<(), PaymentError> {
        self.provider.ping().await
    }
}

/// Return URL for a paid session; the provider substitutes the session id.
fn success_url(host_url: &str) -> String {
    format!(
        "{}/payment-return?session_id={}",
        host_url.trim_end_matches('/'),
        SESSION_ID_PLACEHOLDER
    )
}
