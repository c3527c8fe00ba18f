//! Stripe Checkout client.
//!
//! Talks to the REST API directly with `reqwest`: sessions are created with
//! a form-encoded POST and read back with a GET. Bracketed keys
//! (`line_items[0][quantity]`) are how Stripe expects nested parameters.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{CheckoutSession, PaymentError, PaymentProvider, SessionRequest};
use crate::config::StripeConfig;

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub struct StripeClient {
    http: Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(config: &StripeConfig, http: Client) -> Self {
        Self {
            http,
            secret_key: config.secret_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path)
    }

    /// `/v1/checkout/sessions/{id}` with the id percent-encoded as a single
    /// path segment.
    fn session_url(&self, session_id: &str) -> Result<Url, PaymentError> {
        let mut url = Url::parse(&self.url("checkout/sessions"))
            .map_err(|e| PaymentError::InvalidEndpoint(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::InvalidEndpoint(self.api_base.clone()))?
            .push(session_id);
        Ok(url)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, PaymentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<StripeErrorBody>(&body) {
            Ok(parsed) => {
                error!(
                    "Stripe rejected request ({}): {}",
                    status,
                    parsed.error.kind.as_deref().unwrap_or("unknown_error")
                );
                parsed
                    .error
                    .message
                    .unwrap_or_else(|| format!("Stripe returned status {}", status))
            }
            Err(_) => format!("Stripe returned status {}", status),
        };
        Err(PaymentError::Provider(message))
    }
}

/// Flatten a session request into Stripe's bracketed form parameters.
pub fn session_form_params(request: &SessionRequest) -> Vec<(String, String)> {
    let item = &request.line_item;
    let mut params = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        (
            "line_items[0][price_data][currency]".to_string(),
            item.currency.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            item.unit_amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            item.name.clone(),
        ),
        (
            "line_items[0][price_data][product_data][description]".to_string(),
            item.description.clone(),
        ),
        ("line_items[0][quantity]".to_string(), item.quantity.to_string()),
    ];

    for (key, value) in &request.metadata {
        params.push((format!("metadata[{}]", key), value.clone()));
    }

    params
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_session(&self, request: &SessionRequest) -> Result<CheckoutSession, PaymentError> {
        debug!("Creating Stripe checkout session: {}", request.line_item.name);
        let response = self
            .http
            .post(self.url("checkout/sessions"))
            .bearer_auth(&self.secret_key)
            .form(&session_form_params(request))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        debug!("Retrieving Stripe checkout session {}", session_id);
        let response = self
            .http
            .get(self.session_url(session_id)?)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn ping(&self) -> Result<(), PaymentError> {
        let response = self
            .http
            .get(self.url("account"))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::parse::<serde_json::Value>(response).await.map(|_| ())
    }
}
