//! LaTeX text escaping
//!
//! Builder calls interpolate text verbatim. Tables can opt into escaping
//! through `TableOptions::escape_special`, which routes header and cell
//! text through [`escape_latex`].

/// Escape LaTeX special characters in plain text.
///
/// ```rust
/// use texbuilder::utils::escape_latex;
///
/// assert_eq!(escape_latex("50% of $x"), r"50\% of \$x");
/// ```
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_specials() {
        assert_eq!(escape_latex("a_b & c"), r"a\_b \& c");
        assert_eq!(escape_latex("{x}"), r"\{x\}");
        assert_eq!(escape_latex("#1"), r"\#1");
    }

    #[test]
    fn test_escape_backslash_and_accents() {
        assert_eq!(escape_latex(r"a\b"), r"a\textbackslash{}b");
        assert_eq!(escape_latex("~^"), r"\textasciitilde{}\textasciicircum{}");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_latex("Revenue 2024"), "Revenue 2024");
    }
}
