//! Fixed LaTeX fragments written by the document builder
//!
//! The preamble is bundled from `templates/preamble.tex`; the remaining
//! constants are the directives the builder emits around user content.

use chrono::NaiveDate;

/// Document class and packages, copied verbatim when a document opens
pub const PREAMBLE: &str = include_str!("../../templates/preamble.tex");

// ============================================================================
// Document structure
// ============================================================================

pub const BEGIN_DOCUMENT: &str = "\\begin{document}";
pub const MAKE_TITLE: &str = "\\maketitle";
pub const END_DOCUMENT: &str = "\\end{document}";
pub const PAGE_BREAK: &str = "\\pagebreak";

// ============================================================================
// Tables
// ============================================================================

/// Alternating body row colors, starting from the second row
pub const ROW_COLORS: &str = "\\rowcolors{2}{gray!25}{white}";
/// Highlight for the header row
pub const HEADER_ROW_COLOR: &str = "\\rowcolor{gray!50}";
/// Token rendered for null or missing cells
pub const NULL_CELL: &str = "null";

// ============================================================================
// Figures
// ============================================================================

/// Width of a standalone figure
pub const FIGURE_WIDTH: &str = "0.8\\linewidth";
/// Width of a grid row container
pub const GRID_ROW_WIDTH: &str = "0.98\\linewidth";
/// Width of an image inside its grid cell
pub const GRID_IMAGE_WIDTH: &str = "0.9\\linewidth";
/// Cell width for two-image grids
pub const GRID_PAIR_WIDTH: &str = "0.48\\linewidth";
/// Fraction of the line width shared by the cells of one grid row
pub const GRID_TOTAL_FRACTION: f64 = 0.96;

/// How the `\date` directive under the title is filled
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "data-loading",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum DateDirective {
    /// `\date{\today}`, resolved by the compiler
    #[default]
    Today,
    /// A fixed calendar date, e.g. `\date{March 4, 2025}`
    Fixed(NaiveDate),
    /// `\date{}`, no date line
    Omit,
}

impl DateDirective {
    pub fn to_latex(&self) -> String {
        match self {
            DateDirective::Today => "\\date{\\today}".to_string(),
            DateDirective::Fixed(date) => format!("\\date{{{}}}", date.format("%B %-d, %Y")),
            DateDirective::Omit => "\\date{}".to_string(),
        }
    }
}

/// `\title` directive with a large title and a smaller subtitle line
pub fn title_directive(title: &str, subtitle: &str) -> String {
    format!(
        "\\title{{{{\\Huge {} }} \\\\[10pt] {{\\large {} }}}}",
        title, subtitle
    )
}

/// `\section` directive; the title is not escaped
pub fn section_directive(title: &str) -> String {
    format!("\\section{{{}}}", title)
}
