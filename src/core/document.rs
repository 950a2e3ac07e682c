//! The document builder
//!
//! A [`Document`] owns one temporary `.tex` buffer. Opening it writes the
//! bundled preamble; content calls append fragments in call order; closing
//! it writes `\end{document}`, runs the compiler, and copies or cleans up
//! the artifacts.
//!
//! The document is in one of two phases. Title and header injection are
//! only accepted in [`Phase::Preamble`]; the first body-content call writes
//! `\begin{document}` and `\maketitle` and moves it to [`Phase::Body`] for
//! good.
//!
//! ## Example
//!
//! ```rust,no_run
//! use texbuilder::{DataTable, Document, DocumentOptions, TableOptions};
//!
//! let table = DataTable::from_rows(
//!     ["run", "energy"],
//!     vec![vec![1.into(), 2.5.into()], vec![2.into(), 3.75.into()]],
//! )?;
//!
//! let report = Document::scoped("out/report.pdf", DocumentOptions::default(), |doc| {
//!     doc.set_title("Detector runs", "Week 12")?;
//!     doc.new_section("Energies")?;
//!     doc.add_table(&table, "Energy per run", &TableOptions::formatted("03d,.2f"))?;
//!     doc.add_figure_grid("Panels", &["a.png", "b.png", "c.png"])
//! })?;
//!
//! if let Some(pdf) = report.pdf() {
//!     println!("wrote {}", pdf.display());
//! }
//! # Ok::<(), texbuilder::DocumentError>(())
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use super::compiler::CompilerConfig;
use super::report::{BuildReport, CompileStatus};
use crate::data::constants::{
    section_directive, title_directive, DateDirective, BEGIN_DOCUMENT, END_DOCUMENT, MAKE_TITLE,
    PAGE_BREAK, PREAMBLE,
};
use crate::data::table::TabularData;
use crate::features::figures::{figure_block, figure_grid_block, GridLayout};
use crate::features::tables::{render_table, TableOptions};
use crate::utils::error::{BuildWarning, DocumentError, DocumentResult, TeardownStage};
use crate::utils::files::{absolutize, ensure_output_dir, remove_byproducts, ArtifactPaths};

/// Lifecycle options for a document
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "data-loading",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct DocumentOptions {
    /// Copy the generated source next to the PDF
    pub keep_source: bool,
    /// Leave compiler byproducts (`.aux`, `.log`, ...) in place
    pub suppress_cleanup: bool,
    /// Write the source only; implies `keep_source`
    pub skip_compilation: bool,
    /// Compiler invocation (default honors `TEXBUILDER_COMPILER`)
    pub compiler: CompilerConfig,
    /// Date line under the title
    pub date: DateDirective,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            keep_source: false,
            suppress_cleanup: false,
            skip_compilation: false,
            compiler: CompilerConfig::from_env(),
            date: DateDirective::default(),
        }
    }
}

impl DocumentOptions {
    /// Write and keep the source without compiling (useful for inspection)
    pub fn inspect() -> Self {
        Self {
            skip_compilation: true,
            keep_source: true,
            ..Self::default()
        }
    }

    /// Compile, and keep both the source and the byproducts
    pub fn keep_all() -> Self {
        Self {
            keep_source: true,
            suppress_cleanup: true,
            ..Self::default()
        }
    }

    /// Parse options from TOML, e.g. `keep_source = true`
    #[cfg(feature = "data-loading")]
    pub fn from_toml_str(input: &str) -> DocumentResult<Self> {
        toml::from_str(input).map_err(|e| DocumentError::invalid(format!("options: {}", e)))
    }

    fn keeps_source(&self) -> bool {
        self.keep_source || self.skip_compilation
    }
}

/// Write phase of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Title and header injection allowed
    Preamble,
    /// Body content written; the preamble is closed
    Body,
}

/// A LaTeX document being assembled into a temporary buffer
pub struct Document {
    output_path: PathBuf,
    artifacts: ArtifactPaths,
    options: DocumentOptions,
    phase: Phase,
    buffer: Option<BufWriter<File>>,
    buffer_path: Option<TempPath>,
}

impl Document {
    /// Create the buffer and write the preamble.
    ///
    /// The output directory is created (one level) when missing.
    pub fn open(output_path: impl AsRef<Path>, options: DocumentOptions) -> DocumentResult<Self> {
        let output_path = output_path.as_ref().to_path_buf();
        let artifacts = ArtifactPaths::for_output(&output_path);
        ensure_output_dir(&artifacts.output_dir)?;

        let (file, buffer_path) = tempfile::Builder::new()
            .prefix("texbuilder-")
            .suffix(".tex")
            .tempfile()?
            .into_parts();

        let mut buffer = BufWriter::new(file);
        buffer.write_all(PREAMBLE.as_bytes())?;
        if !PREAMBLE.ends_with('\n') {
            buffer.write_all(b"\n")?;
        }

        log::debug!(
            "Opened document {} (buffer {})",
            output_path.display(),
            buffer_path.display()
        );

        Ok(Self {
            output_path,
            artifacts,
            options,
            phase: Phase::Preamble,
            buffer: Some(buffer),
            buffer_path: Some(buffer_path),
        })
    }

    /// Open a document, run `body` on it, and close it on every exit path.
    ///
    /// An error from `body` is returned after the document has been closed.
    pub fn scoped<F>(
        output_path: impl AsRef<Path>,
        options: DocumentOptions,
        body: F,
    ) -> DocumentResult<BuildReport>
    where
        F: FnOnce(&mut Document) -> DocumentResult<()>,
    {
        let mut document = Document::open(output_path, options)?;
        let outcome = body(&mut document);
        let report = document.close();
        outcome.map(|()| report)
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once body content has been written
    pub fn is_started(&self) -> bool {
        self.phase == Phase::Body
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Path of the temporary source buffer
    pub fn buffer_path(&self) -> Option<&Path> {
        self.buffer_path.as_deref()
    }

    /// Source written so far (flushes the buffer)
    pub fn contents(&mut self) -> DocumentResult<String> {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.flush()?;
        }
        let mut text = String::new();
        if let Some(path) = self.buffer_path.as_deref() {
            File::open(path)?.read_to_string(&mut text)?;
        }
        Ok(text)
    }

    // ------------------------------------------------------------------
    // Preamble calls
    // ------------------------------------------------------------------

    /// Set the title and subtitle, with the configured date line.
    pub fn set_title(&mut self, title: &str, subtitle: &str) -> DocumentResult<()> {
        self.require_preamble("set_title")?;
        let directive = format!(
            "{}\n{}\n",
            title_directive(title, subtitle),
            self.options.date.to_latex()
        );
        self.write(&directive)
    }

    /// Append raw LaTeX to the preamble, followed by a newline.
    pub fn inject_header(&mut self, text: &str) -> DocumentResult<()> {
        self.require_preamble("inject_header")?;
        self.write(text)?;
        self.write("\n")
    }

    // ------------------------------------------------------------------
    // Body calls
    // ------------------------------------------------------------------

    /// Append raw LaTeX to the body verbatim; no newline is added.
    pub fn inject_raw(&mut self, text: &str) -> DocumentResult<()> {
        self.begin_body()?;
        self.write(text)
    }

    pub fn page_break(&mut self) -> DocumentResult<()> {
        self.begin_body()?;
        self.write(PAGE_BREAK)?;
        self.write("\n")
    }

    /// Start a new `\section`; the title is not escaped.
    pub fn new_section(&mut self, title: &str) -> DocumentResult<()> {
        self.begin_body()?;
        let directive = section_directive(title);
        self.write(&directive)?;
        self.write("\n")
    }

    /// Emit a captioned table.
    ///
    /// The body is started even when the table is rejected; the table block
    /// itself is only written once it rendered completely.
    pub fn add_table<T: TabularData + ?Sized>(
        &mut self,
        table: &T,
        caption: &str,
        options: &TableOptions,
    ) -> DocumentResult<()> {
        self.begin_body()?;
        let block = render_table(table, caption, options)?;
        self.write(&block)
    }

    /// Emit a single figure.
    ///
    /// A missing image is logged and skipped; the body is still started.
    pub fn add_figure(&mut self, caption: &str, path: impl AsRef<Path>) -> DocumentResult<()> {
        self.begin_body()?;
        let path = absolutize(path.as_ref())?;
        if !path.exists() {
            log::warn!("Could not find figure {}, skipping it", path.display());
            return Ok(());
        }
        self.write(&figure_block(caption, &path))
    }

    /// Emit images as a grid of panels sharing one caption.
    ///
    /// One image falls back to [`Document::add_figure`]. Two images sit side
    /// by side; more are packed into `ceil(sqrt(n))` columns.
    pub fn add_figure_grid<P: AsRef<Path>>(
        &mut self,
        caption: &str,
        paths: &[P],
    ) -> DocumentResult<()> {
        self.begin_body()?;
        let layout = match paths.len() {
            0 => return Err(DocumentError::EmptyFigureGrid),
            1 => return self.add_figure(caption, &paths[0]),
            n => GridLayout::for_count(n).ok_or(DocumentError::EmptyFigureGrid)?,
        };
        log::debug!(
            "Packing {} images into {} row(s) of {}",
            paths.len(),
            layout.rows,
            layout.rank
        );

        let mut resolved = Vec::with_capacity(paths.len());
        for path in paths {
            let path = absolutize(path.as_ref())?;
            if !path.exists() {
                log::warn!("Could not find figure {}, keeping its grid slot", path.display());
            }
            resolved.push(path);
        }

        let block = figure_grid_block(caption, &resolved, &layout);
        self.write(&block)
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Finish the document: close it, compile it, and handle artifacts.
    ///
    /// Never fails; see [`BuildReport`].
    pub fn close(mut self) -> BuildReport {
        self.finish()
    }

    fn finish(&mut self) -> BuildReport {
        let mut report = BuildReport::new();
        let (buffer, buffer_path) = match (self.buffer.take(), self.buffer_path.take()) {
            (Some(buffer), Some(path)) => (buffer, path),
            _ => return report,
        };

        if self.phase == Phase::Preamble {
            log::warn!(
                "Closing {} without any body content",
                self.output_path.display()
            );
        }

        // Closing marker, then release the file handle
        let finalized = write_closing(buffer);
        if let Err(e) = finalized {
            warn(&mut report, TeardownStage::Finalize, e.to_string());
        }

        let stem = buffer_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let compile_dir = match absolutize(&self.artifacts.output_dir) {
            Ok(dir) => dir,
            Err(e) => {
                warn(&mut report, TeardownStage::Compile, e.to_string());
                self.artifacts.output_dir.clone()
            }
        };

        let run = if self.options.skip_compilation {
            log::info!("Skipping compilation of {}", self.output_path.display());
            None
        } else {
            match self.options.compiler.run(&buffer_path, &compile_dir) {
                Ok(run) => Some(run),
                Err(e) => {
                    let message = format!("could not start {}: {}", self.options.compiler.program, e);
                    warn(&mut report, TeardownStage::Compile, message);
                    None
                }
            }
        };

        if self.options.keeps_source() {
            match fs::copy(&buffer_path, &self.artifacts.source) {
                Ok(_) => report.source = Some(self.artifacts.source.clone()),
                Err(e) => warn(
                    &mut report,
                    TeardownStage::KeepSource,
                    format!("{}: {}", self.artifacts.source.display(), e),
                ),
            }
        }

        if !self.options.skip_compilation {
            let exit_code = run.and_then(|r| r.exit_code);
            let produced = compile_dir.join(format!("{}.pdf", stem));
            report.status = if !produced.is_file() {
                CompileStatus::Failed {
                    exit_code,
                    reason: "compiler produced no PDF".to_string(),
                }
            } else {
                match fs::copy(&produced, &self.artifacts.pdf) {
                    Ok(_) => {
                        if run.map(|r| !r.success).unwrap_or(false) {
                            warn(
                                &mut report,
                                TeardownStage::Compile,
                                format!("compiler exited with {:?} but produced a PDF", exit_code),
                            );
                        }
                        log::info!("Wrote {}", self.artifacts.pdf.display());
                        CompileStatus::Succeeded {
                            pdf: self.artifacts.pdf.clone(),
                        }
                    }
                    Err(e) => {
                        let reason = format!("could not copy PDF: {}", e);
                        warn(&mut report, TeardownStage::CopyArtifact, reason.clone());
                        CompileStatus::Failed { exit_code, reason }
                    }
                }
            };
        }

        if !self.options.suppress_cleanup && !stem.is_empty() {
            let (removed, failed) = remove_byproducts(&compile_dir, &stem);
            for (path, e) in failed {
                warn(
                    &mut report,
                    TeardownStage::Cleanup,
                    format!("{}: {}", path.display(), e),
                );
            }
            report.removed = removed;
        }

        if let Err(e) = buffer_path.close() {
            warn(&mut report, TeardownStage::Cleanup, e.to_string());
        }

        report
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn require_preamble(&self, operation: &'static str) -> DocumentResult<()> {
        match self.phase {
            Phase::Preamble => Ok(()),
            Phase::Body => Err(DocumentError::body_started(operation)),
        }
    }

    /// One-time transition into the body
    fn begin_body(&mut self) -> DocumentResult<()> {
        if self.phase == Phase::Body {
            return Ok(());
        }
        self.write(BEGIN_DOCUMENT)?;
        self.write("\n")?;
        self.write(MAKE_TITLE)?;
        self.write("\n")?;
        self.phase = Phase::Body;
        Ok(())
    }

    fn write(&mut self, text: &str) -> DocumentResult<()> {
        match self.buffer.as_mut() {
            Some(buffer) => Ok(buffer.write_all(text.as_bytes())?),
            None => Err(DocumentError::invalid("document is already closed")),
        }
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        if self.buffer.is_some() {
            let report = self.finish();
            log::debug!(
                "Closed {} on drop ({:?})",
                self.output_path.display(),
                report.status
            );
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("output_path", &self.output_path)
            .field("phase", &self.phase)
            .field("options", &self.options)
            .field("open", &self.buffer.is_some())
            .finish()
    }
}

fn write_closing(mut buffer: BufWriter<File>) -> std::io::Result<()> {
    buffer.write_all(END_DOCUMENT.as_bytes())?;
    buffer.write_all(b"\n")?;
    let file = buffer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

fn warn(report: &mut BuildReport, stage: TeardownStage, message: impl Into<String>) {
    let warning = BuildWarning::new(stage, message);
    log::warn!("{}", warning);
    report.warnings.push(warning);
}
