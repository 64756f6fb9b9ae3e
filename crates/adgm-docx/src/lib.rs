//! # adgm-docx: .docx Package I/O
//!
//! A `.docx` file is a zip package of XML parts. The document text lives in
//! `word/document.xml`; everything else (styles, numbering, media, rels) is
//! carried through untouched.
//!
//! ## Contents
//!
//! - [`package`]: read every zip entry into memory and write the package
//!   back with a replaced `word/document.xml`.
//! - [`body`]: streaming walk over `word/document.xml` that records the
//!   text of top-level body paragraphs and top-level table cells, plus the
//!   byte offsets where new content can be spliced in.
//! - [`annotate`]: place a bold red `[🚩 ATTENTION: ...]` comment next to
//!   the text each compliance issue refers to.
//!
//! Annotation splices new runs into the original XML; every other byte of
//! the package is identical to the upload.

pub mod annotate;
pub mod body;
pub mod error;
#[cfg(feature = "fixtures")]
pub mod fixtures;
pub mod package;

pub use annotate::{annotate, attention_text, Annotated};
pub use body::{DocumentBody, Paragraph, TableCell};
pub use error::DocxError;
pub use package::{DocxPackage, DOCUMENT_PART};

/// MIME type used when serving `.docx` downloads.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Name given to the annotated copy of an uploaded document.
pub fn reviewed_file_name(original: &str) -> String {
    format!("reviewed_{original}")
}

/// True when `name` has a `.docx` extension (case-insensitive).
pub fn is_docx_name(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"))
}
