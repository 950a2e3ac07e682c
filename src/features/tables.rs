//! Table emission
//!
//! Turns any [`TabularData`] source into a captioned floating `table`
//! wrapping a `tabular` environment. Headers come from the column names,
//! cell text is produced by the per-column [`FormatSpec`] directives, and
//! cells containing the line-break delimiter become nested single-column
//! tabulars so they can span several lines.

use crate::data::constants::{HEADER_ROW_COLOR, NULL_CELL, ROW_COLORS};
use crate::data::table::{CellValue, TabularData};
use crate::features::format::{parse_column_formats, FormatSpec};
use crate::utils::error::{DocumentError, DocumentResult};
use crate::utils::escape::escape_latex;

/// Rendering options for `Document::add_table`
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    /// Comma-separated directives, one entry per column (empty = default)
    pub format_spec: Option<String>,
    /// Put a vertical rule after the first column
    pub separate_first_column: bool,
    /// Alternate body row colors and highlight the header row
    pub alternate_row_colors: bool,
    /// Explicit column spec such as `"r|c|c"`, used verbatim
    pub header_justification: Option<String>,
    /// Occurrences of this string inside a cell become forced line breaks
    pub line_break_delimiter: String,
    /// Escape LaTeX special characters in headers and cells
    pub escape_special: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            format_spec: None,
            separate_first_column: true,
            alternate_row_colors: true,
            header_justification: None,
            line_break_delimiter: "\n".to_string(),
            escape_special: false,
        }
    }
}

impl TableOptions {
    /// Default options with a format spec
    pub fn formatted(format_spec: impl Into<String>) -> Self {
        Self {
            format_spec: Some(format_spec.into()),
            ..Self::default()
        }
    }

    /// No rules and no coloring
    pub fn plain() -> Self {
        Self {
            separate_first_column: false,
            alternate_row_colors: false,
            ..Self::default()
        }
    }
}

/// Column spec for the `tabular` environment
pub fn column_justification(columns: usize, options: &TableOptions) -> String {
    if let Some(ref explicit) = options.header_justification {
        if !explicit.is_empty() {
            return explicit.clone();
        }
    }
    if options.separate_first_column && columns > 0 {
        format!("l|{}", "l".repeat(columns - 1))
    } else {
        "l".repeat(columns)
    }
}

/// Wrap multi-line cell text in a nested single-column tabular.
///
/// Text without the delimiter (or an empty delimiter) is returned as is.
pub fn tabular_wrap(text: &str, delimiter: &str) -> String {
    if delimiter.is_empty() || !text.contains(delimiter) {
        return text.to_string();
    }
    format!(
        "\\begin{{tabular}}{{c}}{}\\end{{tabular}}",
        text.replace(delimiter, "\\\\")
    )
}

fn cell_text(text: &str, options: &TableOptions) -> String {
    if !options.escape_special {
        return tabular_wrap(text, &options.line_break_delimiter);
    }
    let delimiter = options.line_break_delimiter.as_str();
    if delimiter.is_empty() || !text.contains(delimiter) {
        return escape_latex(text);
    }
    let lines: Vec<String> = text.split(delimiter).map(escape_latex).collect();
    format!("\\begin{{tabular}}{{c}}{}\\end{{tabular}}", lines.join("\\\\"))
}

fn render_value(value: Option<&CellValue>, format: Option<&FormatSpec>) -> DocumentResult<String> {
    match (value, format) {
        (None, _) | (Some(CellValue::Null), _) => Ok(NULL_CELL.to_string()),
        (Some(v), Some(spec)) => spec.apply(v),
        (Some(v), None) => Ok(v.to_string()),
    }
}

/// Render the table block. Nothing is written; errors leave no trace.
pub fn render_table<T: TabularData + ?Sized>(
    table: &T,
    caption: &str,
    options: &TableOptions,
) -> DocumentResult<String> {
    let headers = table.column_names();
    if headers.is_empty() {
        return Err(DocumentError::invalid("table has no columns"));
    }

    let formats = match options.format_spec.as_deref() {
        Some(spec) if !spec.is_empty() => parse_column_formats(spec, headers.len())?,
        _ => vec![None; headers.len()],
    };

    let mut output = String::new();
    output.push_str("\\begin{center}\n");
    output.push_str("\\begin{table}[h]\n");
    output.push_str("\\centering\n");
    if options.alternate_row_colors {
        output.push_str(ROW_COLORS);
        output.push('\n');
    }
    output.push_str(&format!("\\caption{{{}}}\n", caption));
    output.push_str(&format!(
        "\\begin{{tabular}}{{{}}}\\hline\n",
        column_justification(headers.len(), options)
    ));

    // Header row
    if options.alternate_row_colors {
        output.push_str(HEADER_ROW_COLOR);
        output.push('\n');
    }
    let header_cells: Vec<String> = headers
        .iter()
        .map(|h| {
            if options.escape_special {
                escape_latex(h)
            } else {
                h.to_string()
            }
        })
        .collect();
    output.push_str(&header_cells.join("&"));
    output.push_str("\\\\\\hline\n");

    // Body rows
    for row in 0..table.row_count() {
        let mut cells = Vec::with_capacity(headers.len());
        for (col, format) in formats.iter().enumerate() {
            let value = table.cell(row, col);
            let text = render_value(value, format.as_ref())?;
            let is_null = value.map(CellValue::is_null).unwrap_or(true);
            cells.push(if is_null { text } else { cell_text(&text, options) });
        }
        output.push_str(&format!("{} \\\\\n", cells.join(" & ")));
    }

    output.push_str("\\end{tabular}\n");
    output.push_str("\\end{table}\n");
    output.push_str("\\end{center}\n");

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::DataTable;
    use pretty_assertions::assert_eq;

    fn sample() -> DataTable {
        DataTable::from_rows(
            ["run", "energy", "note"],
            vec![
                vec![1.into(), 2.5.into(), "ok".into()],
                vec![2.into(), CellValue::Null, "line one\nline two".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_justification_separates_first_column() {
        let opts = TableOptions::default();
        assert_eq!(column_justification(1, &opts), "l|");
        assert_eq!(column_justification(4, &opts), "l|lll");
    }

    #[test]
    fn test_justification_plain_and_explicit() {
        assert_eq!(column_justification(3, &TableOptions::plain()), "lll");
        let opts = TableOptions {
            header_justification: Some("r|c|c".to_string()),
            ..Default::default()
        };
        assert_eq!(column_justification(3, &opts), "r|c|c");
    }

    #[test]
    fn test_tabular_wrap() {
        assert_eq!(tabular_wrap("single", "\n"), "single");
        assert_eq!(
            tabular_wrap("a\nb", "\n"),
            "\\begin{tabular}{c}a\\\\b\\end{tabular}"
        );
        assert_eq!(tabular_wrap("a_b", ""), "a_b");
    }

    #[test]
    fn test_render_full_table() {
        let latex = render_table(&sample(), "Runs", &TableOptions::default()).unwrap();
        let expected = "\\begin{center}\n\
\\begin{table}[h]\n\
\\centering\n\
\\rowcolors{2}{gray!25}{white}\n\
\\caption{Runs}\n\
\\begin{tabular}{l|ll}\\hline\n\
\\rowcolor{gray!50}\n\
run&energy&note\\\\\\hline\n\
1 & 2.5 & ok \\\\\n\
2 & null & \\begin{tabular}{c}line one\\\\line two\\end{tabular} \\\\\n\
\\end{tabular}\n\
\\end{table}\n\
\\end{center}\n";
        assert_eq!(latex, expected);
    }

    #[test]
    fn test_plain_table_has_no_color_directives() {
        let latex = render_table(&sample(), "Runs", &TableOptions::plain()).unwrap();
        assert!(!latex.contains("rowcolors"));
        assert!(!latex.contains("rowcolor{"));
        assert!(latex.contains("\\begin{tabular}{lll}"));
    }

    #[test]
    fn test_format_spec_applies_per_column() {
        let opts = TableOptions::formatted("03d,.3f,");
        let latex = render_table(&sample(), "Runs", &opts).unwrap();
        assert!(latex.contains("001 & 2.500 & ok \\\\"));
        // Null stays null even with a directive on its column
        assert!(latex.contains("002 & null & "));
    }

    #[test]
    fn test_format_spec_length_mismatch() {
        let opts = TableOptions::formatted("03d,.3f");
        let err = render_table(&sample(), "Runs", &opts).unwrap_err();
        assert!(matches!(err, DocumentError::FormatSpecMismatch { .. }));
    }

    #[test]
    fn test_escape_special_keeps_line_breaks() {
        let table = DataTable::from_rows(
            ["cost_%"],
            vec![vec!["a&b\nc_d".into()]],
        )
        .unwrap();
        let opts = TableOptions {
            escape_special: true,
            ..TableOptions::plain()
        };
        let latex = render_table(&table, "Costs", &opts).unwrap();
        assert!(latex.contains("cost\\_\\%\\\\\\hline"));
        assert!(latex.contains("\\begin{tabular}{c}a\\&b\\\\c\\_d\\end{tabular}"));
    }

    #[test]
    fn test_custom_delimiter() {
        let table = DataTable::from_rows(["label"], vec![vec!["top|bottom".into()]]).unwrap();
        let opts = TableOptions {
            line_break_delimiter: "|".to_string(),
            ..TableOptions::plain()
        };
        let latex = render_table(&table, "Labels", &opts).unwrap();
        assert!(latex.contains("\\begin{tabular}{c}top\\\\bottom\\end{tabular} \\\\"));
    }

    #[test]
    fn test_empty_table_rejected() {
        let table = DataTable::new();
        assert!(render_table(&table, "Nothing", &TableOptions::default()).is_err());
    }
}
