//! # Red-Flag Annotation
//!
//! Marks each compliance issue in the reviewed copy of a document.
//!
//! For every issue with a non-blank `relevant_text`, the first body paragraph
//! containing that text (case-insensitive, literal) gets a bold red run
//! ` [🚩 ATTENTION: {suggestion}]` appended. When no body paragraph matches,
//! the first matching top-level table cell gets a new paragraph carrying the
//! same run. Matching always runs against the original text, so an earlier
//! annotation never causes a later match.

use adgm_core::ComplianceIssue;
use quick_xml::escape::escape;
use regex::RegexBuilder;

use crate::error::DocxError;
use crate::package::DocxPackage;

/// Font colour of annotation runs (pure red).
pub const ATTENTION_COLOR: &str = "FF0000";

/// Visible text of an annotation.
pub fn attention_text(suggestion: &str) -> String {
    format!(" [🚩 ATTENTION: {suggestion}]")
}

fn attention_run(suggestion: &str) -> String {
    format!(
        r#"<w:r><w:rPr><w:b/><w:color w:val="{ATTENTION_COLOR}"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
        escape(attention_text(suggestion).as_str())
    )
}

/// Result of annotating a package.
#[derive(Debug, Clone)]
pub struct Annotated {
    /// The complete reviewed `.docx`.
    pub bytes: Vec<u8>,
    /// Number of issues that were placed in the document.
    pub placed: usize,
    /// Anchors of issues whose text could not be found.
    pub unplaced: Vec<String>,
}

/// Annotate `package` with `issues` and serialize the reviewed copy.
pub fn annotate(package: &DocxPackage, issues: &[ComplianceIssue]) -> Result<Annotated, DocxError> {
    let xml = package.document_xml();
    let body = package.body()?;

    let mut inserts: Vec<(usize, String)> = Vec::new();
    let mut unplaced = Vec::new();

    for issue in issues {
        let Some(anchor) = issue.anchor_text() else {
            continue;
        };
        let matcher = RegexBuilder::new(&regex::escape(anchor))
            .case_insensitive(true)
            .build()?;

        let in_paragraph = body
            .paragraphs
            .iter()
            .find(|p| p.insert_at.is_some() && matcher.is_match(&p.text))
            .and_then(|p| p.insert_at);

        if let Some(offset) = in_paragraph {
            inserts.push((offset, attention_run(&issue.suggestion)));
            continue;
        }

        let in_cell = body
            .cells
            .iter()
            .find(|c| c.insert_at.is_some() && matcher.is_match(&c.text))
            .and_then(|c| c.insert_at);

        match in_cell {
            Some(offset) => inserts.push((
                offset,
                format!("<w:p>{}</w:p>", attention_run(&issue.suggestion)),
            )),
            None => {
                tracing::debug!(anchor, "annotation anchor not found in document");
                unplaced.push(anchor.to_string());
            }
        }
    }

    let placed = inserts.len();
    // Stable sort keeps issue order for annotations sharing an anchor.
    inserts.sort_by_key(|(offset, _)| *offset);

    let mut document = Vec::with_capacity(xml.len() + inserts.iter().map(|(_, f)| f.len()).sum::<usize>());
    let mut cursor = 0;
    for (offset, fragment) in &inserts {
        document.extend_from_slice(&xml[cursor..*offset]);
        document.extend_from_slice(fragment.as_bytes());
        cursor = *offset;
    }
    document.extend_from_slice(&xml[cursor..]);

    Ok(Annotated {
        bytes: package.to_bytes_with_document(&document)?,
        placed,
        unplaced,
    })
}
