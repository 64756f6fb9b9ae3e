//! The red-flag review prompt.

/// Red flags the model is asked to look for, in prompt order.
pub const RED_FLAGS: [&str; 5] = [
    "Invalid or missing clauses",
    "Incorrect jurisdiction (e.g., referencing UAE Federal Courts instead of ADGM)",
    "Ambiguous or non-binding language",
    "Missing signatory sections or improper formatting",
    "Non-compliance with ADGM-specific templates",
];

const EXAMPLE_OUTPUT: &str = r#"[
    {
        "issue": "Jurisdiction clause does not specify ADGM",
        "section": "Clause 3.1",
        "relevant_text": "This agreement is governed by the laws of the UAE Federal Courts.",
        "severity": "High",
        "suggestion": "Update jurisdiction to ADGM Courts."
    }
]"#;

/// Render the review prompt for one document.
pub fn review_prompt(document_content: &str, adgm_context: &str) -> String {
    let red_flags: String = RED_FLAGS.iter().map(|f| format!("- {f}\n")).collect();
    format!(
        "You are an ADGM-compliant corporate legal assistant. Your task is to review the following document content based on ADGM laws and regulations.\n\
Use the provided ADGM context to identify any legal inconsistencies or red flags from the following list:\n\
{red_flags}\n\
Document Content:\n\
\"{document_content}\"\n\
\n\
ADGM Context:\n\
\"{adgm_context}\"\n\
\n\
Instructions:\n\
- For each issue found, provide a clear description, its severity (High/Medium/Low), and a suggestion for correction.\n\
- Also, find the exact line or text snippet from the \"Document Content\" that has the issue.\n\
- If no issues are found, return an empty list.\n\
- Output the result as a structured JSON object, following this exact schema:\n\
\n\
Example Output:\n\
{EXAMPLE_OUTPUT}\n\
\n\
JSON Output:\n"
    )
}
