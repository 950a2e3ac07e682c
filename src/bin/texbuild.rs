//! texbuild CLI - Assemble a LaTeX report from data files and compile it

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use texbuilder::{
    BuildReport, CompileStatus, DataTable, DateDirective, Document, DocumentOptions,
    DocumentResult, TableOptions,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "texbuild")]
#[command(version)]
#[command(about = "texbuilder - Assemble LaTeX reports from tables and figures", long_about = None)]
struct Cli {
    /// Final PDF path; the kept source lands next to it
    output: PathBuf,

    /// Document title
    #[arg(short, long)]
    title: Option<String>,

    /// Subtitle shown under the title
    #[arg(long, default_value = "")]
    subtitle: String,

    /// Section heading (repeatable, emitted in order)
    #[arg(short, long = "section")]
    sections: Vec<String>,

    /// CSV file rendered as a table
    #[arg(long)]
    table: Option<PathBuf>,

    /// Caption for the table
    #[arg(long, default_value = "")]
    table_caption: String,

    /// Per-column format directives, comma separated (e.g. "s,.2f,03d")
    #[arg(long)]
    format: Option<String>,

    /// Escape LaTeX special characters in table text
    #[arg(long)]
    escape: bool,

    /// Images laid out as a figure grid
    #[arg(long, num_args = 1..)]
    figures: Vec<PathBuf>,

    /// Caption for the figure grid
    #[arg(long, default_value = "")]
    figure_caption: String,

    /// Fixed date (YYYY-MM-DD) instead of \today
    #[arg(long, conflicts_with = "no_date")]
    date: Option<chrono::NaiveDate>,

    /// Leave the date line empty
    #[arg(long)]
    no_date: bool,

    /// Keep the generated .tex next to the PDF
    #[arg(long)]
    keep_tex: bool,

    /// Write the .tex only; implies --keep-tex
    #[arg(long)]
    no_compile: bool,

    /// Leave compiler byproducts in place
    #[arg(long)]
    no_clean: bool,

    /// TOML file with document options; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exit with an error if no PDF was produced
    #[arg(long)]
    strict: bool,
}

#[cfg(feature = "cli")]
impl Cli {
    fn document_options(&self) -> DocumentResult<DocumentOptions> {
        let mut options = match self.config {
            Some(ref path) => DocumentOptions::from_toml_str(&fs::read_to_string(path)?)?,
            None => DocumentOptions::default(),
        };
        options.keep_source |= self.keep_tex;
        options.skip_compilation |= self.no_compile;
        options.suppress_cleanup |= self.no_clean;
        if let Some(date) = self.date {
            options.date = DateDirective::Fixed(date);
        } else if self.no_date {
            options.date = DateDirective::Omit;
        }
        Ok(options)
    }

    fn table_options(&self) -> TableOptions {
        TableOptions {
            format_spec: self.format.clone(),
            escape_special: self.escape,
            ..TableOptions::default()
        }
    }
}

#[cfg(feature = "cli")]
fn build(cli: &Cli) -> DocumentResult<BuildReport> {
    let options = cli.document_options()?;

    // Load inputs before opening so bad data leaves no partial document
    let table = match cli.table {
        Some(ref path) => Some(DataTable::from_csv_path(path)?),
        None => None,
    };
    let table_options = cli.table_options();

    Document::scoped(&cli.output, options, |doc| {
        if let Some(ref title) = cli.title {
            doc.set_title(title, &cli.subtitle)?;
        }
        for section in &cli.sections {
            doc.new_section(section)?;
        }
        if let Some(ref table) = table {
            doc.add_table(table, &cli.table_caption, &table_options)?;
        }
        if !cli.figures.is_empty() {
            doc.add_figure_grid(&cli.figure_caption, &cli.figures)?;
        }
        Ok(())
    })
}

#[cfg(feature = "cli")]
fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let report = match build(&cli) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(if e.is_usage_error() { 2 } else { 1 });
        }
    };

    if report.has_warnings() {
        eprintln!(
            "{} warning(s) while closing {}:",
            report.warnings.len(),
            cli.output.display()
        );
        for warning in &report.warnings {
            eprintln!("  {}", warning);
        }
    }
    if let Some(ref source) = report.source {
        eprintln!("✓ Source written to: {}", source.display());
    }
    match report.status {
        CompileStatus::Succeeded { ref pdf } => {
            eprintln!("✓ PDF written to: {}", pdf.display());
        }
        CompileStatus::Skipped => {}
        CompileStatus::Failed { .. } => {
            if cli.strict {
                if let Err(e) = report.into_result() {
                    eprintln!("Error: {}", e);
                }
                std::process::exit(1);
            }
            eprintln!("✗ No PDF produced (use --no-clean to inspect the compiler log)");
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texbuilder --features cli");
    eprintln!("  texbuild [OPTIONS] <OUTPUT>");
}
