//! Checkout module - the HTTP surface tying payment, generation and
//! rendering together.
//!
//! - `models` - form, request and response types
//! - `validation` - boundary validation of the posted form
//! - `multipart_parser` - `multipart/form-data` bodies
//! - `handlers` - endpoint handlers and route configuration

pub mod handlers;
pub mod models;
pub mod multipart_parser;
pub mod validation;

use actix_web::HttpResponse;
use log::error;
use thiserror::Error;

use crate::formatter::RenderError;
use crate::generation::GenerationError;
use crate::payment::{PaymentError, PaymentStatus};
use crate::storage::StorageError;
use crate::ErrorResponse;

/// Everything that can go wrong between a posted form and a download link.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("payment for session {session_id} has not been completed (payment status: {status})")]
    PaymentIncomplete {
        session_id: String,
        status: PaymentStatus,
    },
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to render document: {0}")]
    Render(#[from] RenderError),
    #[error("failed to store document: {0}")]
    Storage(#[from] StorageError),
}

impl CheckoutError {
    /// Stable tag reported to API clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Payment(_) => "PaymentProviderError",
            Self::PaymentIncomplete { .. } => "PaymentIncomplete",
            Self::Generation(_) => "GenerationFailure",
            Self::Render(_) => "RenderFailure",
            Self::Storage(_) => "StorageFailure",
        }
    }
}

impl From<CheckoutError> for HttpResponse {
    fn from(error: CheckoutError) -> Self {
        error!("{}: {}", error.kind(), error);
        let body = ErrorResponse::new(error.kind(), &error.to_string());
        match error {
            CheckoutError::Validation(_)
            | CheckoutError::Payment(_)
            | CheckoutError::PaymentIncomplete { .. } => HttpResponse::BadRequest().json(body),
            CheckoutError::Generation(_) => HttpResponse::BadGateway().json(body),
            CheckoutError::Render(_) | CheckoutError::Storage(_) => {
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}
