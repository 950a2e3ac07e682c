//! # texbuilder
//!
//! Programmatic assembly of LaTeX reports, compiled to PDF.
//!
//! ## Features
//!
//! - **Two-phase builder**: title and header injection, then body content
//! - **Tables**: captioned, striped tables with per-column format directives
//! - **Figures**: single figures and square-ish grids of panels
//! - **Guaranteed teardown**: the buffer is closed, compiled, and cleaned up
//!   even when document construction fails part-way
//! - **Data loading**: CSV and JSON record input (feature `data-loading`)
//!
//! ## Usage Examples
//!
//! ### Inspecting the generated source
//!
//! ```rust
//! use texbuilder::{Document, DocumentOptions};
//!
//! let dir = tempfile::tempdir()?;
//! let mut doc = Document::open(dir.path().join("notes.pdf"), DocumentOptions::inspect())?;
//! doc.set_title("Notes", "Draft")?;
//! doc.new_section("Introduction")?;
//! doc.inject_raw("Hello, world!\n")?;
//!
//! let source = doc.contents()?;
//! assert!(source.contains("\\begin{document}"));
//!
//! let report = doc.close();
//! assert!(report.source.is_some());
//! # Ok::<(), texbuilder::DocumentError>(())
//! ```
//!
//! ### Rendering a table on its own
//!
//! ```rust
//! use texbuilder::{render_table, DataTable, TableOptions};
//!
//! let table = DataTable::from_rows(
//!     ["name", "score"],
//!     vec![vec!["a".into(), 0.5.into()], vec!["b".into(), 0.25.into()]],
//! )?;
//! let latex = render_table(&table, "Scores", &TableOptions::formatted("s,.1%"))?;
//! assert!(latex.contains("a & 50.0% \\\\"));
//! # Ok::<(), texbuilder::DocumentError>(())
//! ```

/// Core document modules
pub mod core;

/// Data layer - fixed fragments and tabular input
pub mod data;

/// Feature modules - table, figure, and format rendering
pub mod features;

/// Utility modules
pub mod utils;

// Re-export the builder
pub use core::{
    BuildReport, CompileRun, CompileStatus, CompilerConfig, Document, DocumentOptions, Phase,
    COMPILER_ENV,
};

// Re-export data modules
pub use data::constants;
pub use data::{CellValue, DataTable, DateDirective, TabularData, PREAMBLE};

// Re-export feature modules
pub use features::figures;
pub use features::format;
pub use features::tables;
pub use features::figures::{grid_rank, GridLayout};
pub use features::format::FormatSpec;
pub use features::tables::{render_table, TableOptions};

// Re-export utilities
pub use utils::error::{BuildWarning, DocumentError, DocumentResult, TeardownStage};
pub use utils::escape::escape_latex;
pub use utils::files;

/// Build a document in one call and fail if it did not compile.
///
/// Equivalent to [`Document::scoped`] followed by
/// [`BuildReport::into_result`].
pub fn build_strict<F>(
    output_path: impl AsRef<std::path::Path>,
    options: DocumentOptions,
    body: F,
) -> DocumentResult<BuildReport>
where
    F: FnOnce(&mut Document) -> DocumentResult<()>,
{
    Document::scoped(output_path, options, body)?.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_strict_accepts_skipped_compile() {
        let dir = tempfile::tempdir().unwrap();
        let report = build_strict(dir.path().join("a.pdf"), DocumentOptions::inspect(), |doc| {
            doc.new_section("Only")
        })
        .unwrap();
        assert_eq!(report.status, CompileStatus::Skipped);
    }

    #[test]
    fn test_build_strict_rejects_missing_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let options = DocumentOptions {
            compiler: CompilerConfig::with_program("texbuilder-no-such-compiler"),
            ..DocumentOptions::default()
        };
        let err = build_strict(dir.path().join("a.pdf"), options, |doc| doc.page_break())
            .unwrap_err();
        assert!(matches!(err, DocumentError::CompileFailed { .. }));
    }

    #[test]
    fn test_escape_is_reexported() {
        assert_eq!(escape_latex("50%"), "50\\%");
    }
}
