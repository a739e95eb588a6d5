//! Fixed instructions sent with every document

/// Instruction for providers that read the PDF natively
///
/// Asks for the critical clause categories and the categories not found.
/// This path does not request definitions.
pub const DOCUMENT_INSTRUCTIONS: &str = r#"Analyze this contract PDF and extract the following critical clauses:

1. Indemnification clauses
2. Termination clauses
3. Liability clauses

For each clause found, provide the information in this exact JSON format:

{
  "clauses": [
    {
      "type": "<clause type>",
      "summary": "<2-3 sentence summary>",
      "text": "<exact quote from document>",
      "citation": "<page number and location>"
    }
  ],
  "missing_types": ["<list of clause types not found>"]
}

Rules:
- Include page numbers and locations for every clause
- Quote the exact text from the document
- Use consistent clause type names
- If a clause type is not found, include it in missing_types
- Ensure valid JSON format"#;

/// System instruction for providers that receive pre-extracted text
pub const TEXT_INSTRUCTIONS: &str = r#"You are a contract analysis expert specialized in extracting and structuring legal clauses.
Extract clauses and definitions precisely following the provided JSON schema.

Analyze this contract in two steps:

1. First, extract all defined terms:
   - Look for a dedicated "Definitions" or "Terms" section
   - Find any inline definitions throughout the document
   - For each definition, capture the exact term, the complete definition text,
     and the precise location (page/section)

2. Then scan for ALL significant legal clauses, including but not limited to:
   - Representations & Warranties
   - Payment Terms
   - Confidentiality
   - Intellectual Property
   - Termination
   - Indemnification
   - Liability
   - Force Majeure
   - Governing Law
   - Dispute Resolution
   - Assignment
   - Severability
   - Amendment
   - Entire Agreement
   - Any other important clauses you identify

Respond ONLY with JSON in this exact format:

{
  "clauses": [
    {
      "type": "Payment Terms",
      "summary": "Client must pay within 30 days of invoice receipt.",
      "text": "Payment shall be made within thirty (30) days of receipt of invoice...",
      "citation": "Page 3, Section 4.1, Paragraph 2"
    }
  ],
  "definitions": [
    {
      "term": "Confidential Information",
      "definition": "Any non-public information relating to the business of either party...",
      "citation": "Page 2, Section 1.3"
    }
  ]
}"#;

/// Name under which the response schema is declared
pub const SCHEMA_NAME: &str = "contract_analysis";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_instructions_shape() {
        assert!(DOCUMENT_INSTRUCTIONS.contains("\"clauses\""));
        assert!(DOCUMENT_INSTRUCTIONS.contains("missing_types"));
        assert!(DOCUMENT_INSTRUCTIONS.contains("\"citation\""));
    }

    #[test]
    fn test_text_instructions_request_definitions() {
        assert!(TEXT_INSTRUCTIONS.contains("\"definitions\""));
        assert!(TEXT_INSTRUCTIONS.contains("Force Majeure"));
        assert!(TEXT_INSTRUCTIONS.contains("Respond ONLY with JSON"));
    }
}
