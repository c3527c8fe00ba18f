mod common;

#[cfg(test)]
mod document_assembly_tests {
    use std::sync::Arc;

    use instant_legal_server::checkout::models::{FormSubmission, ProtectionLevel};
    use instant_legal_server::config::{DocumentCatalog, CUSTOM_DOCUMENT_LABEL};
    use instant_legal_server::generation::prompt::SYSTEM_INSTRUCTION;
    use instant_legal_server::generation::{DocumentAssembler, GenerationError};
    use instant_legal_server::payment::{PaymentError, PaymentStatus, SessionGateway};

    use crate::common::{test_pricing, FakeCompletionProvider, FakePaymentProvider};

    fn form(document_type: &str) -> FormSubmission {
        FormSubmission {
            document_type: document_type.to_string(),
            business_name: "Acme Robotics LLC".to_string(),
            business_type: "Limited Liability Company".to_string(),
            jurisdiction: "Texas".to_string(),
            industry: "Manufacturing".to_string(),
            protection_level: ProtectionLevel::new(1).unwrap(),
            clause_confidentiality: false,
            clause_arbitration: true,
            clause_termination: true,
            clause_ip: false,
            additional_instructions: "Include a non-solicitation clause.".to_string(),
        }
    }

    fn assembler(provider: Arc<FakeCompletionProvider>) -> DocumentAssembler {
        DocumentAssembler::new(provider, DocumentCatalog::default(), 4000)
    }

    #[test]
    fn test_every_catalog_label_reaches_the_prompt() {
        let catalog = DocumentCatalog::default();
        let assembler = assembler(Arc::new(FakeCompletionProvider::answering("")));

        for key in catalog.keys() {
            let request = assembler.completion_request(&form(key));
            let label = catalog.label(key).unwrap();
            assert!(request.user.contains(label), "missing label for {}", key);
            assert!(!request.user.contains(CUSTOM_DOCUMENT_LABEL));
        }
    }

    #[test]
    fn test_unknown_document_type_becomes_custom_document() {
        let assembler = assembler(Arc::new(FakeCompletionProvider::answering("")));
        let request = assembler.completion_request(&form("lease"));

        assert!(request.user.contains("Custom Document"));
        assert_eq!(request.system, SYSTEM_INSTRUCTION);
        assert_eq!(request.max_tokens, 4000);
    }

    #[test]
    fn test_prompt_carries_order_details() {
        let assembler = assembler(Arc::new(FakeCompletionProvider::answering("")));
        let prompt = assembler.completion_request(&form("employee")).user;

        assert!(prompt.contains("Acme Robotics LLC"));
        assert!(prompt.contains("Limited Liability Company"));
        assert!(prompt.contains("Manufacturing"));
        assert!(prompt.contains("Texas"));
        assert!(prompt.contains("Protection Level: 1 out of 3"));
        assert!(prompt.contains("Arbitration Provision, Advanced Termination Options"));
        assert!(prompt.contains("Include a non-solicitation clause."));
        assert!(prompt.contains("Signature:"));
    }

    #[tokio::test]
    async fn test_generate_returns_raw_text() {
        let provider = Arc::new(FakeCompletionProvider::answering("TERMS\nBody."));
        let text = assembler(provider.clone())
            .generate(&form("terms"))
            .await
            .unwrap();

        assert_eq!(text, "TERMS\nBody.");
        assert_eq!(provider.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_does_not_retry_failures() {
        let provider = Arc::new(FakeCompletionProvider::failing("rate limited"));
        let result = assembler(provider.clone()).generate(&form("nda")).await;

        assert!(matches!(result, Err(GenerationError::Provider(ref m)) if m == "rate limited"));
        assert_eq!(provider.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_gateway_round_trips_form_through_metadata() {
        let provider = Arc::new(FakePaymentProvider::new());
        let gateway = SessionGateway::new(provider.clone(), DocumentCatalog::default(), test_pricing());
        let original = form("partnership");

        let session_id = gateway
            .create_session(&original, "http://localhost:3000")
            .await
            .unwrap();
        provider
            .set_payment_status(&session_id, PaymentStatus::Paid)
            .await;

        let fetched = gateway.fetch_session(&session_id).await.unwrap();
        assert_eq!(fetched.session_id, session_id);
        assert_eq!(fetched.payment_status, PaymentStatus::Paid);
        assert_eq!(fetched.form, original);

        let request = &provider.requests().await[0];
        assert_eq!(request.line_item.name, "Legal Document: Partnership Agreement");
        assert_eq!(request.cancel_url, "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_gateway_reports_unknown_sessions() {
        let provider = Arc::new(FakePaymentProvider::new());
        let gateway = SessionGateway::new(provider, DocumentCatalog::default(), test_pricing());

        let result = gateway.fetch_session("cs_nope").await;
        assert!(matches!(result, Err(PaymentError::Provider(_))));
    }
}
