//! Error handling for document assembly
//!
//! This module provides a unified error type and result type for all
//! document operations, plus the non-fatal warning type collected while
//! a document is torn down.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Document error type
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A preamble-only operation was called after body content was written
    #[error("{operation} must be called before any body content")]
    BodyStarted { operation: &'static str },

    /// Format spec entry count differs from the table's column count
    #[error("format spec has {found} entries but the table has {expected} columns")]
    FormatSpecMismatch { expected: usize, found: usize },

    /// A format directive could not be parsed or applied to a value
    #[error("invalid format directive '{directive}': {message}")]
    InvalidFormat { directive: String, message: String },

    /// A figure grid was requested with no images
    #[error("a figure grid needs at least one image")]
    EmptyFigureGrid,

    /// The output directory is missing and could not be created
    #[error("could not create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Options or table data could not be loaded
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The compiler did not produce a PDF (only raised on request)
    #[error("compilation failed: {message}")]
    CompileFailed { message: String },

    /// IO error while writing the document buffer
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

// Convenience constructors for errors
impl DocumentError {
    pub fn body_started(operation: &'static str) -> Self {
        DocumentError::BodyStarted { operation }
    }

    pub fn invalid_format(directive: impl Into<String>, message: impl Into<String>) -> Self {
        DocumentError::InvalidFormat {
            directive: directive.into(),
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        DocumentError::InvalidInput {
            message: message.into(),
        }
    }

    /// True for errors caused by calling the builder incorrectly
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            DocumentError::BodyStarted { .. }
                | DocumentError::FormatSpecMismatch { .. }
                | DocumentError::InvalidFormat { .. }
                | DocumentError::EmptyFigureGrid
        )
    }
}

/// Teardown stage a warning was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStage {
    Finalize,
    Compile,
    KeepSource,
    CopyArtifact,
    Cleanup,
}

impl fmt::Display for TeardownStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TeardownStage::Finalize => "finalize",
            TeardownStage::Compile => "compile",
            TeardownStage::KeepSource => "keep-source",
            TeardownStage::CopyArtifact => "copy-artifact",
            TeardownStage::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Non-fatal issue recorded while closing a document
#[derive(Debug, Clone)]
pub struct BuildWarning {
    pub stage: TeardownStage,
    pub message: String,
}

impl BuildWarning {
    pub fn new(stage: TeardownStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Warning during {}: {}", self.stage, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_started_display() {
        let err = DocumentError::body_started("set_title");
        assert!(err.to_string().contains("set_title"));
        assert!(err.to_string().contains("before any body content"));
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_format_mismatch_display() {
        let err = DocumentError::FormatSpecMismatch {
            expected: 3,
            found: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("2 entries"));
        assert!(msg.contains("3 columns"));
    }

    #[test]
    fn test_output_directory_is_not_usage_error() {
        let err = DocumentError::OutputDirectory {
            path: PathBuf::from("/nope/out"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_usage_error());
        assert!(err.to_string().contains("/nope/out"));
    }

    #[test]
    fn test_build_warning_display() {
        let warning = BuildWarning::new(TeardownStage::Cleanup, "could not remove x.aux");
        assert_eq!(
            warning.to_string(),
            "Warning during cleanup: could not remove x.aux"
        );
    }
}
