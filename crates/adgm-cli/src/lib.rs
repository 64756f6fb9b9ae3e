//! # adgm-cli: Command-Line Interface for the ADGM Corporate Agent
//!
//! ## Subcommands
//!
//! - `adgm index build`: build the knowledge-base index from local files
//!   and ADGM web pages.
//! - `adgm index query`: print the chunks retrieved for a query.
//! - `adgm checklist`: check a set of file names against the Company
//!   Incorporation checklist.
//! - `adgm review`: review `.docx` files and write the report plus
//!   annotated copies.
//!
//! ```bash
//! adgm index build --no-web
//! adgm checklist "Articles of Association.docx" "UBO Declaration Form.docx"
//! adgm review *.docx --proceed --out-dir reviewed/
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0    | success |
//! | 1    | error |
//! | 2    | required documents missing (checklist, or review without `--proceed`) |

pub mod checklist;
pub mod index;
pub mod review;

use std::path::Path;

use adgm_agent::AgentConfig;
use anyhow::{Context, Result};

/// Successful run.
pub const EXIT_OK: u8 = 0;
/// The submission is missing required documents.
pub const EXIT_INCOMPLETE: u8 = 2;

/// Load the agent configuration from `path` (if given) plus the environment.
pub fn load_config(path: Option<&Path>) -> Result<AgentConfig> {
    AgentConfig::load(path).with_context(|| match path {
        Some(path) => format!("loading configuration from {}", path.display()),
        None => "loading configuration from the environment".to_string(),
    })
}

/// The file name component of `path`, as uploaded documents are named.
pub fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("{} has no usable file name", path.display()))
}
