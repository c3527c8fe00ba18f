#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use instant_legal_server::config::DocumentCatalog;
use instant_legal_server::formatter::typst::to_typst;
use instant_legal_server::formatter::{DocumentRenderer, FormattedDocument, RenderError};
use instant_legal_server::generation::{
    CompletionProvider, CompletionRequest, DocumentAssembler, GenerationError,
};
use instant_legal_server::payment::gateway::Pricing;
use instant_legal_server::payment::{
    CheckoutSession, PaymentError, PaymentProvider, PaymentStatus, SessionGateway, SessionRequest,
    SessionStatus,
};
use instant_legal_server::storage::{DocumentStore, StorageError};
use instant_legal_server::AppState;

pub const GENERATED_TEXT: &str = "NON-DISCLOSURE AGREEMENT\n\
\n\
This Agreement is entered into by the parties below.\n\
\n\
## 1. Definitions\n\
- Confidential Information means any non-public data.\n\
* Recipient means the receiving party.\n\
\n\
Signature: ____________________\n\
Date: ____________________\n";

/// In-memory stand-in for the hosted checkout provider.
pub struct FakePaymentProvider {
    sessions: Mutex<HashMap<String, CheckoutSession>>,
    requests: Mutex<Vec<SessionRequest>>,
    create_error: Mutex<Option<String>>,
    reachable: Mutex<bool>,
}

impl FakePaymentProvider {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            create_error: Mutex::new(None),
            reachable: Mutex::new(true),
        }
    }

    /// Make every following `create_session` fail with `message`.
    pub async fn reject_sessions(&self, message: &str) {
        *self.create_error.lock().await = Some(message.to_string());
    }

    pub async fn set_reachable(&self, reachable: bool) {
        *self.reachable.lock().await = reachable;
    }

    pub async fn set_payment_status(&self, session_id: &str, status: PaymentStatus) {
        if let Some(session) = self.sessions.lock().await.get_mut(session_id) {
            session.payment_status = status;
            if status.is_settled() {
                session.status = Some(SessionStatus::Complete);
            }
        }
    }

    /// Register a session directly, bypassing `create_session`.
    pub async fn insert_session(
        &self,
        session_id: &str,
        payment_status: PaymentStatus,
        metadata: BTreeMap<String, String>,
    ) {
        self.sessions.lock().await.insert(
            session_id.to_string(),
            CheckoutSession {
                id: session_id.to_string(),
                status: Some(SessionStatus::Open),
                payment_status,
                metadata,
            },
        );
    }

    pub async fn requests(&self) -> Vec<SessionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PaymentProvider for FakePaymentProvider {
    async fn create_session(&self, request: &SessionRequest) -> Result<CheckoutSession, PaymentError> {
        if let Some(message) = self.create_error.lock().await.clone() {
            return Err(PaymentError::Provider(message));
        }

        let mut requests = self.requests.lock().await;
        requests.push(request.clone());

        let session = CheckoutSession {
            id: format!("cs_test_{}", requests.len()),
            status: Some(SessionStatus::Open),
            payment_status: PaymentStatus::Unpaid,
            metadata: request.metadata.clone(),
        };
        self.sessions
            .lock()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| {
                PaymentError::Provider(format!("No such checkout.session: '{}'", session_id))
            })
    }

    async fn ping(&self) -> Result<(), PaymentError> {
        if *self.reachable.lock().await {
            Ok(())
        } else {
            Err(PaymentError::Provider("Invalid API Key provided".to_string()))
        }
    }
}

/// Language model that answers every request with the same text.
pub struct FakeCompletionProvider {
    response: Result<String, String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletionProvider {
    pub fn answering(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        self.requests.lock().await.push(request.clone());
        self.response.clone().map_err(GenerationError::Provider)
    }
}

/// In-memory document store. Like the real store it never overwrites.
pub struct MemoryDocumentStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.lock().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn save(&self, filename: &str, data: &[u8]) -> Result<(), StorageError> {
        let mut files = self.files.lock().await;
        if files.contains_key(filename) {
            return Err(StorageError::AlreadyExists(filename.to_string()));
        }
        files.insert(filename.to_string(), data.to_vec());
        Ok(())
    }

    async fn load(&self, filename: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.files.lock().await.get(filename).cloned())
    }
}

/// Renders a document as its Typst source so tests can inspect the bytes.
pub struct MarkupRenderer;

impl DocumentRenderer for MarkupRenderer {
    fn render(&self, document: &FormattedDocument) -> Result<Vec<u8>, RenderError> {
        Ok(to_typst(document).into_bytes())
    }
}

pub fn test_pricing() -> Pricing {
    Pricing {
        unit_amount: 1999,
        currency: "usd".to_string(),
    }
}

pub struct TestHarness {
    pub payments: Arc<FakePaymentProvider>,
    pub completions: Arc<FakeCompletionProvider>,
    pub store: Arc<MemoryDocumentStore>,
    pub state: AppState,
}

pub fn harness_with(completions: FakeCompletionProvider) -> TestHarness {
    let payments = Arc::new(FakePaymentProvider::new());
    let completions = Arc::new(completions);
    let store = Arc::new(MemoryDocumentStore::new());
    let catalog = DocumentCatalog::default();

    let state = AppState::new(
        SessionGateway::new(payments.clone(), catalog, test_pricing()),
        DocumentAssembler::new(completions.clone(), catalog, 4000),
        Arc::new(MarkupRenderer),
        store.clone(),
        catalog,
    );

    TestHarness {
        payments,
        completions,
        store,
        state,
    }
}

pub fn harness() -> TestHarness {
    harness_with(FakeCompletionProvider::answering(GENERATED_TEXT))
}

/// A complete, valid checkout form as the browser posts it.
pub fn checkout_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("document_type", "nda"),
        ("business_name", "Acme Robotics LLC"),
        ("business_type", "Limited Liability Company"),
        ("state", "California"),
        ("industry", "Technology/Software"),
        ("protection_level", "3"),
        ("clause_confidentiality", "true"),
        ("clause_ip", "on"),
        ("additional_instructions", "Mutual obligations"),
        ("hostUrl", "https://instantlegal.ai/"),
    ]
}
