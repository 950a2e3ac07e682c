//! External compiler invocation
//!
//! The compiler is an opaque process: `<program> <batch-flag> <source>
//! <output-dir-flag> <dir>`. Its output is only logged, and its exit status
//! is reported back without being treated as an error.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Environment variable overriding the compiler program
pub const COMPILER_ENV: &str = "TEXBUILDER_COMPILER";

/// How to invoke the external compiler
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "data-loading",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct CompilerConfig {
    /// Program name or path (default: `pdflatex`)
    pub program: String,
    /// Flag keeping the compiler from stopping for input
    pub batch_flag: String,
    /// Flag preceding the output directory argument
    pub output_dir_flag: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "pdflatex".to_string(),
            batch_flag: "-interaction=nonstopmode".to_string(),
            output_dir_flag: "-output-directory".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Default config, with the program taken from `TEXBUILDER_COMPILER`
    /// when it is set and non-empty.
    pub fn from_env() -> Self {
        match std::env::var(COMPILER_ENV) {
            Ok(program) if !program.trim().is_empty() => Self::with_program(program.trim()),
            _ => Self::default(),
        }
    }

    /// Default flags with a different program
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Build the command line without running it.
    pub fn command(&self, source: &Path, output_dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(&self.batch_flag)
            .arg(source)
            .arg(&self.output_dir_flag)
            .arg(output_dir)
            .current_dir(output_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    /// Run the compiler to completion.
    ///
    /// `Err` only when the process could not be started; a non-zero exit is
    /// reported through [`CompileRun::success`].
    pub fn run(&self, source: &Path, output_dir: &Path) -> io::Result<CompileRun> {
        let started_at = Instant::now();
        log::info!(
            "Running {} on {} (output directory {})",
            self.program,
            source.display(),
            output_dir.display()
        );

        let output = self.command(source, output_dir).output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            log::debug!("{} stdout:\n{}", self.program, stdout);
        }
        if !stderr.trim().is_empty() {
            log::debug!("{} stderr:\n{}", self.program, stderr);
        }

        let run = CompileRun {
            success: output.status.success(),
            exit_code: output.status.code(),
            elapsed_ms: started_at.elapsed().as_millis() as u64,
        };
        log::info!(
            "{} finished in {} ms (exit {:?})",
            self.program,
            run.elapsed_ms,
            run.exit_code
        );
        Ok(run)
    }
}

/// Outcome of one compiler process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileRun {
    pub success: bool,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub elapsed_ms: u64,
}
