//! Error types for `.docx` handling.

use thiserror::Error;

/// Errors from reading, parsing, or writing a `.docx` package.
#[derive(Error, Debug)]
pub enum DocxError {
    /// The bytes are not a readable zip archive, or writing one failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Reading a file or a zip entry failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A required part is absent from the package.
    #[error("package has no {0} part; not a WordprocessingML document")]
    MissingPart(String),

    /// `word/document.xml` is not well-formed.
    #[error("malformed document XML at byte {position}: {message}")]
    Xml {
        /// Byte offset into the part where parsing stopped.
        position: u64,
        message: String,
    },

    /// An annotation anchor could not be compiled into a matcher.
    #[error("invalid anchor pattern: {0}")]
    Pattern(#[from] regex::Error),
}
