use log::{error, info};
use std::sync::Arc;

use super::prompt::{build_prompt, SYSTEM_INSTRUCTION};
use super::{CompletionProvider, CompletionRequest, GenerationError};
use crate::checkout::models::FormSubmission;
use crate::config::DocumentCatalog;

/// Drafts document text for an order. One provider call, no retry.
#[derive(Clone)]
pub struct DocumentAssembler {
    provider: Arc<dyn CompletionProvider>,
    catalog: DocumentCatalog,
    max_tokens: u32,
}

impl DocumentAssembler {
    pub fn new(provider: Arc<dyn CompletionProvider>, catalog: DocumentCatalog, max_tokens: u32) -> Self {
        Self {
            provider,
            catalog,
            max_tokens,
        }
    }

    pub fn completion_request(&self, form: &FormSubmission) -> CompletionRequest {
        CompletionRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: build_prompt(form, &self.catalog),
            max_tokens: self.max_tokens,
        }
    }

    pub async fn generate(&self, form: &FormSubmission) -> Result<String, GenerationError> {
        let request = self.completion_request(form);
        match self.provider.complete(&request).await {
            Ok(text) => {
                info!(
                    "Generated {} characters for '{}' ({})",
                    text.len(),
                    form.business_name,
                    self.catalog.label_or_custom(&form.document_type)
                );
                Ok(text)
            }
            Err(e) => {
                error!("Document generation failed for '{}': {}", form.business_name, e);
                Err(e)
            }
        }
    }
}
