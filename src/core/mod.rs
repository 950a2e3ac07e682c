//! Core document modules
//!
//! This module contains the document lifecycle:
//! - `document`: the two-phase builder writing into a temporary buffer
//! - `compiler`: invocation of the external LaTeX compiler
//! - `report`: what closing a document produced

pub mod compiler;
pub mod document;
pub mod report;

// Re-export main types
pub use compiler::{CompileRun, CompilerConfig, COMPILER_ENV};
pub use document::{Document, DocumentOptions, Phase};
pub use report::{BuildReport, CompileStatus};
