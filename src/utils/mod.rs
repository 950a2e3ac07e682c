//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - LaTeX text escaping
//! - Filesystem plumbing for output and byproduct files

pub mod error;
pub mod escape;
pub mod files;

// Re-export commonly used items
pub use error::{BuildWarning, DocumentError, DocumentResult, TeardownStage};
pub use escape::escape_latex;
pub use files::{absolutize, ensure_output_dir, remove_byproducts, ArtifactPaths};
