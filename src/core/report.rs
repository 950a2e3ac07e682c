//! Result of closing a document
//!
//! Closing never fails. What happened is recorded here instead, and
//! callers that want compile failures to be errors use
//! [`BuildReport::into_result`].

use std::path::{Path, PathBuf};

use crate::utils::error::{BuildWarning, DocumentError, DocumentResult};

/// What the compile step produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileStatus {
    /// Compilation was disabled; only the source was written
    Skipped,
    /// The PDF was produced and copied to its final path
    Succeeded { pdf: PathBuf },
    /// No PDF reached its final path
    Failed {
        exit_code: Option<i32>,
        reason: String,
    },
}

/// Summary of a document's teardown
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Kept copy of the generated source, if any
    pub source: Option<PathBuf>,
    pub status: CompileStatus,
    /// Byproduct files removed after compilation
    pub removed: Vec<PathBuf>,
    /// Non-fatal problems met while closing
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    pub(crate) fn new() -> Self {
        Self {
            source: None,
            status: CompileStatus::Skipped,
            removed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Final PDF path when compilation succeeded
    pub fn pdf(&self) -> Option<&Path> {
        match self.status {
            CompileStatus::Succeeded { ref pdf } => Some(pdf),
            _ => None,
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self.status, CompileStatus::Succeeded { .. })
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Strict mode: turn a failed compile into an error.
    pub fn into_result(self) -> DocumentResult<BuildReport> {
        match self.status {
            CompileStatus::Failed {
                exit_code,
                ref reason,
            } => Err(DocumentError::CompileFailed {
                message: match exit_code {
                    Some(code) => format!("{} (exit code {})", reason, code),
                    None => reason.clone(),
                },
            }),
            _ => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_is_ok_in_strict_mode() {
        let report = BuildReport::new();
        assert!(!report.is_compiled());
        assert!(report.pdf().is_none());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_failed_is_error_in_strict_mode() {
        let mut report = BuildReport::new();
        report.status = CompileStatus::Failed {
            exit_code: Some(1),
            reason: "no PDF produced".to_string(),
        };
        let err = report.into_result().unwrap_err();
        assert!(err.to_string().contains("no PDF produced (exit code 1)"));
    }

    #[test]
    fn test_succeeded_exposes_pdf() {
        let mut report = BuildReport::new();
        report.status = CompileStatus::Succeeded {
            pdf: PathBuf::from("out/report.pdf"),
        };
        assert!(report.is_compiled());
        assert_eq!(report.pdf(), Some(Path::new("out/report.pdf")));
    }
}
