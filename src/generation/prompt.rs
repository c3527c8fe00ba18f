//! Prompt construction for document drafting.

use crate::checkout::models::FormSubmission;
use crate::config::DocumentCatalog;

pub const SYSTEM_INSTRUCTION: &str = "You are a legal document generator that creates professional, \
legally-sound documents tailored to specific business needs and jurisdictions.";

const FORMATTING_GUIDELINES: &str = "**Formatting Guidelines:**
- Use clear section headings in bold and all caps (e.g., **TERMS AND CONDITIONS**).
- Use proper indentation and line spacing for readability.
- Ensure signature fields are properly spaced and formatted as follows:

  **Signature:** ______________________  **Date:** _______________

- Use bullet points for lists where appropriate.
- Avoid overly dense paragraphs; break them up into short, digestible sections.
- Use legal language but ensure clarity for business professionals.";

/// Build the user instruction for `form`.
pub fn build_prompt(form: &FormSubmission, catalog: &DocumentCatalog) -> String {
    let label = catalog.label_or_custom(&form.document_type);
    let clauses = form.selected_clauses();
    let clauses = if clauses.is_empty() {
        "None".to_string()
    } else {
        clauses.join(", ")
    };

    format!(
        "Generate a professional {label} for {name}, a {business_type} in the {industry} industry, operating in {jurisdiction}.

Protection Level: {level} out of 3

Special Clauses to Include: {clauses}

Additional Instructions: {additional}

{guidelines}

Format the document professionally with appropriate sections, headings, and legal language. \
Include all necessary legal provisions for this type of document in {jurisdiction}.",
        label = label,
        name = form.business_name,
        business_type = form.business_type,
        industry = form.industry,
        jurisdiction = form.jurisdiction,
        level = form.protection_level,
        clauses = clauses,
        additional = form.additional_instructions,
        guidelines = FORMATTING_GUIDELINES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::models::ProtectionLevel;

    fn form(document_type: &str) -> FormSubmission {
        FormSubmission {
            document_type: document_type.to_string(),
            business_name: "Northwind Traders".to_string(),
            business_type: "Corporation".to_string(),
            jurisdiction: "New York".to_string(),
            industry: "E-commerce/Retail".to_string(),
            protection_level: ProtectionLevel::default(),
            clause_confidentiality: false,
            clause_arbitration: false,
            clause_termination: false,
            clause_ip: false,
            additional_instructions: String::new(),
        }
    }

    #[test]
    fn test_prompt_names_every_order_detail() {
        let mut order = form("employee");
        order.clause_termination = true;
        order.additional_instructions = "Remote-first team.".to_string();

        let prompt = build_prompt(&order, &DocumentCatalog::default());

        assert!(prompt.starts_with(
            "Generate a professional Employment Agreement for Northwind Traders, a Corporation in the E-commerce/Retail industry, operating in New York."
        ));
        assert!(prompt.contains("Protection Level: 2 out of 3"));
        assert!(prompt.contains("Special Clauses to Include: Advanced Termination Options"));
        assert!(prompt.contains("Additional Instructions: Remote-first team."));
        assert!(prompt.contains("**Signature:** ______________________  **Date:** _______________"));
        assert!(prompt.ends_with("this type of document in New York."));
    }

    #[test]
    fn test_prompt_without_clauses_says_none() {
        let prompt = build_prompt(&form("nda"), &DocumentCatalog::default());
        assert!(prompt.contains("Special Clauses to Include: None"));
    }
}
