//! # Source Loading
//!
//! Reads reference material from a data directory into [`SourceDocument`]s.
//! Only the top level of the directory is scanned. Files are visited in name
//! order so builds are reproducible.
//!
//! | Extension      | Extraction |
//! |----------------|------------|
//! | `.pdf`         | `pdf-extract` text layer |
//! | `.docx`        | body paragraph text via `adgm-docx` |
//! | `.txt`, `.md`  | verbatim (UTF-8) |
//!
//! Anything else is skipped. A file that fails to extract is logged and
//! skipped so one corrupt upload does not sink an index build.

use std::path::{Path, PathBuf};

use adgm_docx::DocxPackage;
use serde::{Deserialize, Serialize};

use crate::error::RagError;

/// One unit of reference text, before splitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// File path or URL the text came from.
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Pdf,
    Docx,
    PlainText,
}

impl SourceKind {
    fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Load every supported file directly inside `dir`.
///
/// A missing directory yields no documents; the caller decides whether an
/// empty corpus is an error.
pub fn load_directory(dir: &Path) -> Result<Vec<SourceDocument>, RagError> {
    if !dir.exists() {
        tracing::warn!(dir = %dir.display(), "data directory does not exist; no local sources");
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| RagError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let Some(kind) = SourceKind::of(&path) else {
            tracing::debug!(path = %path.display(), "skipping unsupported file");
            continue;
        };
        match load_file(&path, kind) {
            Ok(text) if text.trim().is_empty() => {
                tracing::warn!(path = %path.display(), "source file has no text");
            }
            Ok(text) => documents.push(SourceDocument {
                source: path.display().to_string(),
                text,
            }),
            Err(e) => tracing::warn!(error = %e, "skipping unreadable source file"),
        }
    }

    tracing::info!(dir = %dir.display(), count = documents.len(), "loaded local sources");
    Ok(documents)
}

/// Extract the text of a single file, choosing the extractor by extension.
pub fn load_path(path: &Path) -> Result<SourceDocument, RagError> {
    let kind = SourceKind::of(path).ok_or_else(|| RagError::Extract {
        path: path.to_path_buf(),
        message: "unsupported file type".into(),
    })?;
    Ok(SourceDocument {
        source: path.display().to_string(),
        text: load_file(path, kind)?,
    })
}

fn load_file(path: &Path, kind: SourceKind) -> Result<String, RagError> {
    match kind {
        SourceKind::Pdf => {
            let bytes = std::fs::read(path).map_err(|e| RagError::io(path, e))?;
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| RagError::Extract {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        SourceKind::Docx => DocxPackage::from_path(path)
            .and_then(|p| p.body_text())
            .map_err(|e| RagError::Extract {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        SourceKind::PlainText => std::fs::read_to_string(path).map_err(|e| RagError::io(path, e)),
    }
}
