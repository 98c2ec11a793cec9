//! Error types and result type for the lexicon crate.
//!
//! This module defines all error variants that can occur while building or
//! loading a lexicon. It uses the `snafu` library for ergonomic error handling
//! with automatic backtrace capture.
//!
//! Only a few of these are fatal to a build. `SourceNotFound` and
//! `MalformedRecord` are produced by the low-level readers and recovered by the
//! pipeline (logged and counted), while `DuplicateIdentifier` aborts the build
//! before any snapshot is written.
//!
//! # Examples
//!
//! ```
//! use lexicon::{Result, LexiconError};
//!
//! fn load_source() -> Result<String> {
//!     Err(LexiconError::invalid_parameter("Dictionary path cannot be empty"))
//! }
//!
//! match load_source() {
//!     Ok(data) => println!("Loaded: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! # Error Variants
//!
//! - [`LexiconError::Io`]: I/O errors from file operations
//! - [`LexiconError::ParserError`]: XML/JSON parsing errors
//! - [`LexiconError::InvalidDataFormat`]: Source or snapshot data doesn't match the expected format
//! - [`LexiconError::SourceNotFound`]: A dictionary or corpus path is missing
//! - [`LexiconError::MalformedRecord`]: A single article or corpus line is unusable
//! - [`LexiconError::DuplicateIdentifier`]: Two entries share an identifier

use std::io;
use snafu::{Snafu, Backtrace};

// Re-export snafu for context providers
pub use snafu;

/// Main error type for the lexicon crate.
///
/// All errors include automatic backtrace capture for debugging purposes.
/// Use the helper methods on `LexiconError` for convenient error construction.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LexiconError {
    /// I/O error occurred during file operations.
    #[snafu(display("IO error: {source}"))]
    Io {
        source: io::Error,
        backtrace: Backtrace,
    },

    /// Error parsing XML, JSON, or other structured data formats.
    #[snafu(display("Parser error: {source}"))]
    ParserError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        backtrace: Backtrace,
    },

    /// Source or snapshot data is malformed or doesn't match expected format.
    #[snafu(display("Invalid data format: {message}"))]
    InvalidDataFormat {
        message: String,
        backtrace: Backtrace,
    },

    /// Function was called with invalid parameters.
    #[snafu(display("Invalid parameter: {message}"))]
    InvalidParameter {
        message: String,
        backtrace: Backtrace,
    },

    /// A dictionary or corpus source path does not exist.
    #[snafu(display("Source not found: {path}"))]
    SourceNotFound {
        path: String,
        backtrace: Backtrace,
    },

    /// A single dictionary article or corpus line could not be used.
    #[snafu(display("Malformed record: {message}"))]
    MalformedRecord {
        message: String,
        backtrace: Backtrace,
    },

    /// Two entries carry the same identifier.
    #[snafu(display("Duplicate identifier: {id}"))]
    DuplicateIdentifier {
        id: String,
        backtrace: Backtrace,
    },

    /// Operation was interrupted by user.
    #[snafu(display("User interrupted"))]
    UserInterrupted {
        backtrace: Backtrace,
    },
}

// For automatic conversions from standard error types
impl From<io::Error> for LexiconError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, backtrace: Backtrace::capture() }
    }
}

impl From<quick_xml::Error> for LexiconError {
    fn from(source: quick_xml::Error) -> Self {
        Self::ParserError { source: Box::new(source), backtrace: Backtrace::capture() }
    }
}

impl From<serde_json::Error> for LexiconError {
    fn from(source: serde_json::Error) -> Self {
        Self::ParserError { source: Box::new(source), backtrace: Backtrace::capture() }
    }
}

impl From<regex::Error> for LexiconError {
    fn from(source: regex::Error) -> Self {
        Self::InvalidParameter { message: format!("Invalid file pattern: {}", source), backtrace: Backtrace::capture() }
    }
}

impl From<walkdir::Error> for LexiconError {
    fn from(source: walkdir::Error) -> Self {
        Self::InvalidDataFormat { message: format!("Walk directory error: {}", source), backtrace: Backtrace::capture() }
    }
}

impl From<std::str::Utf8Error> for LexiconError {
    fn from(source: std::str::Utf8Error) -> Self {
        Self::InvalidDataFormat { message: format!("Invalid UTF-8 (&str): {}", source), backtrace: Backtrace::capture() }
    }
}

/// Helper methods for creating errors without context providers.
impl LexiconError {
    /// Creates an `InvalidParameter` error with the given message.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexicon::LexiconError;
    ///
    /// let error = LexiconError::invalid_parameter("Path cannot be empty");
    /// ```
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `InvalidDataFormat` error with the given message.
    pub fn invalid_data_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidDataFormat {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `SourceNotFound` error for the given path.
    pub fn source_not_found<S: Into<String>>(path: S) -> Self {
        Self::SourceNotFound {
            path: path.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `MalformedRecord` error with the given message.
    pub fn malformed_record<S: Into<String>>(message: S) -> Self {
        Self::MalformedRecord {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `DuplicateIdentifier` error for the given id.
    pub fn duplicate_identifier<S: Into<String>>(id: S) -> Self {
        Self::DuplicateIdentifier {
            id: id.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `UserInterrupted` error.
    pub fn user_interrupted() -> Self {
        Self::UserInterrupted {
            backtrace: Backtrace::capture(),
        }
    }

    /// Checks if this error is a `SourceNotFound` variant.
    pub fn is_source_not_found(&self) -> bool {
        matches!(self, LexiconError::SourceNotFound { .. })
    }

    /// Checks if this error is a `MalformedRecord` variant.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, LexiconError::MalformedRecord { .. })
    }

    /// Checks if this error is a `DuplicateIdentifier` variant.
    pub fn is_duplicate_identifier(&self) -> bool {
        matches!(self, LexiconError::DuplicateIdentifier { .. })
    }
}

/// A specialized `Result` type for lexicon operations.
///
/// This is a convenience type alias that uses [`LexiconError`] as the error type.
pub type Result<T> = std::result::Result<T, LexiconError>;
