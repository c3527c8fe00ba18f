use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::StreamExt;
use log::error;
use std::collections::HashMap;

use super::models::CheckoutRequest;
use crate::ErrorResponse;

/// Text fields larger than this are rejected.
const MAX_FIELD_BYTES: usize = 16 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid UTF-8 data: {0}")]
    Utf8Error(String),
    #[error("Field '{0}' exceeds the maximum size")]
    FieldTooLarge(String),
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        error!("Failed to parse checkout form: {}", error);
        match error {
            MultipartParseError::IoError(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
            _ => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string())),
        }
    }
}

pub struct MultipartParser;

impl MultipartParser {
    /// Collect every text field of a `multipart/form-data` checkout body.
    /// File parts are read and dropped.
    pub async fn parse_checkout_multipart(
        mut multipart: Multipart,
    ) -> Result<CheckoutRequest, MultipartParseError> {
        let mut fields: HashMap<String, String> = HashMap::new();

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;
            let content_disposition = field.content_disposition().ok_or_else(|| {
                MultipartParseError::FieldError("Content disposition not found".to_string())
            })?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?
                .to_string();
            let is_file = content_disposition.get_filename().is_some();

            let mut buffer = Vec::new();
            while let Some(chunk) = field.next().await {
                let data_chunk = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
                if is_file {
                    continue;
                }
                if buffer.len() + data_chunk.len() > MAX_FIELD_BYTES {
                    return Err(MultipartParseError::FieldTooLarge(name));
                }
                buffer.extend_from_slice(&data_chunk);
            }

            if is_file {
                continue;
            }

            let value =
                String::from_utf8(buffer).map_err(|e| MultipartParseError::Utf8Error(e.to_string()))?;
            fields.insert(name, value);
        }

        Ok(CheckoutRequest::from_fields(fields))
    }
}
