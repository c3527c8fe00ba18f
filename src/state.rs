//! Shared application state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, DocumentCatalog};
use crate::formatter::{DocumentRenderer, TypstRenderEngine};
use crate::generation::{DocumentAssembler, OpenAiClient};
use crate::payment::gateway::Pricing;
use crate::payment::{SessionGateway, StripeClient};
use crate::storage::{DocumentStore, LocalDocumentStore};

#[derive(Clone)]
pub struct AppState {
    pub gateway: SessionGateway,
    pub assembler: DocumentAssembler,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub store: Arc<dyn DocumentStore>,
    pub catalog: DocumentCatalog,
}

impl AppState {
    pub fn new(
        gateway: SessionGateway,
        assembler: DocumentAssembler,
        renderer: Arc<dyn DocumentRenderer>,
        store: Arc<dyn DocumentStore>,
        catalog: DocumentCatalog,
    ) -> Self {
        Self {
            gateway,
            assembler,
            renderer,
            store,
            catalog,
        }
    }

    /// Wire the production collaborators from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let gateway = SessionGateway::new(
            Arc::new(StripeClient::new(&config.stripe, http_client.clone())),
            config.catalog,
            Pricing::from(&config.stripe),
        );

        let assembler = DocumentAssembler::new(
            Arc::new(OpenAiClient::new(&config.openai, http_client)),
            config.catalog,
            config.openai.max_tokens,
        );

        let store = LocalDocumentStore::new(config.documents_dir.clone())?;
        log::info!("Documents directory: {}", store.root().display());
        log::info!(
            "Document types: {}",
            config.catalog.keys().collect::<Vec<_>>().join(", ")
        );

        Ok(Self::new(
            gateway,
            assembler,
            Arc::new(TypstRenderEngine::new(config.typst_bin.clone())),
            Arc::new(store),
            config.catalog,
        ))
    }
}
