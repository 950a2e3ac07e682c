//! Figure and figure-grid emission
//!
//! This module provides support for:
//! - single captioned figures sized to 80% of the line width
//! - grids of panels packed row-major into nested `minipage` blocks
//!
//! The grid is square-ish: its rank (column count) is the ceiling of the
//! square root of the image count, with two images always side by side.

use std::path::Path;

use crate::data::constants::{
    FIGURE_WIDTH, GRID_IMAGE_WIDTH, GRID_PAIR_WIDTH, GRID_ROW_WIDTH, GRID_TOTAL_FRACTION,
};

/// Smallest `r` with `r * r >= n`
pub fn ceil_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    // Float rounding can land one off in either direction
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    if root * root == n {
        root
    } else {
        root + 1
    }
}

/// Column count for a grid of `n` images; `None` when no grid is drawn.
pub fn grid_rank(n: usize) -> Option<usize> {
    match n {
        0 | 1 => None,
        2 => Some(2),
        _ => Some(ceil_sqrt(n)),
    }
}

/// Shape of a figure grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Images per row
    pub rank: usize,
    /// Number of rows; the last one may be short
    pub rows: usize,
    /// Width of each cell, e.g. `0.32\linewidth`
    pub cell_width: String,
}

impl GridLayout {
    /// Layout for `n` images, `None` below two images.
    pub fn for_count(n: usize) -> Option<GridLayout> {
        let rank = grid_rank(n)?;
        let cell_width = if n == 2 {
            GRID_PAIR_WIDTH.to_string()
        } else {
            format!("{:.2}\\linewidth", GRID_TOTAL_FRACTION / rank as f64)
        };
        Some(GridLayout {
            rank,
            rows: n.div_ceil(rank),
            cell_width,
        })
    }
}

/// Path as passed to `\includegraphics`, with the stem grouped.
///
/// Grouping keeps dots and other delimiters inside the stem from being
/// read as the extension: `/data/run.1/plot.v2.png` becomes
/// `{/data/run.1/plot.v2}.png`.
pub fn graphics_path(path: &Path) -> String {
    let full = path.to_string_lossy();
    let has_extension = path.extension().is_some();
    match full.rfind('.') {
        Some(dot) if has_extension => format!("{{{}}}{}", &full[..dot], &full[dot..]),
        _ => format!("{{{}}}", full),
    }
}

/// Single-image figure block
pub fn figure_block(caption: &str, path: &Path) -> String {
    format!(
        "\\begin{{figure}}[H]\n\
         \\centering\n\
         \\includegraphics[width={}]{{{}}}\n\
         \\caption{{{}}}\n\
         \\end{{figure}}\n",
        FIGURE_WIDTH,
        graphics_path(path),
        caption
    )
}

/// Grid block for two or more images laid out by `layout`
pub fn figure_grid_block<P: AsRef<Path>>(caption: &str, paths: &[P], layout: &GridLayout) -> String {
    let mut output = String::new();
    output.push_str("\\begin{center}\n");
    output.push_str("\\begin{figure}\n");

    let last = paths.len().saturating_sub(1);
    for (index, path) in paths.iter().enumerate() {
        let column = index % layout.rank;
        if column == 0 {
            output.push_str(&format!("\\begin{{minipage}}{{{}}}\n", GRID_ROW_WIDTH));
        }
        output.push_str(&format!(
            "    \\begin{{minipage}}{{{}}}\n        \\includegraphics[width={}]{{{}}}\n    \\end{{minipage}}%\n",
            layout.cell_width,
            GRID_IMAGE_WIDTH,
            graphics_path(path.as_ref())
        ));
        if column == layout.rank - 1 || index == last {
            output.push_str("\\end{minipage}\\\\\n");
        }
    }

    output.push_str(&format!("\\caption{{{}}}\n", caption));
    output.push_str("\\end{figure}\n");
    output.push_str("\\end{center}\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_grid_rank_table() {
        let expected = [
            (1, None),
            (2, Some(2)),
            (3, Some(2)),
            (4, Some(2)),
            (5, Some(3)),
            (9, Some(3)),
            (10, Some(4)),
            (16, Some(4)),
            (17, Some(5)),
        ];
        for (n, rank) in expected {
            assert_eq!(grid_rank(n), rank, "rank for {} images", n);
        }
    }

    #[test]
    fn test_ceil_sqrt_large_squares() {
        assert_eq!(ceil_sqrt(10_000), 100);
        assert_eq!(ceil_sqrt(10_001), 101);
        assert_eq!(ceil_sqrt(0), 0);
    }

    #[test]
    fn test_layout_widths() {
        assert_eq!(GridLayout::for_count(2).unwrap().cell_width, "0.48\\linewidth");
        assert_eq!(GridLayout::for_count(3).unwrap().cell_width, "0.48\\linewidth");
        assert_eq!(GridLayout::for_count(5).unwrap().cell_width, "0.32\\linewidth");
        assert_eq!(GridLayout::for_count(10).unwrap().cell_width, "0.24\\linewidth");
        assert_eq!(GridLayout::for_count(17).unwrap().cell_width, "0.19\\linewidth");
        assert_eq!(GridLayout::for_count(7).unwrap().rows, 3);
        assert!(GridLayout::for_count(1).is_none());
    }

    #[test]
    fn test_graphics_path_groups_stem() {
        assert_eq!(
            graphics_path(Path::new("/data/run.1/plot.v2.png")),
            "{/data/run.1/plot.v2}.png"
        );
        assert_eq!(graphics_path(Path::new("/data/plot")), "{/data/plot}");
    }

    #[test]
    fn test_figure_block() {
        let block = figure_block("Energy", Path::new("/tmp/energy.pdf"));
        assert_eq!(
            block,
            "\\begin{figure}[H]\n\\centering\n\\includegraphics[width=0.8\\linewidth]{{/tmp/energy}.pdf}\n\\caption{Energy}\n\\end{figure}\n"
        );
    }

    #[test]
    fn test_grid_rows_close_on_rank_and_last_image() {
        let paths: Vec<PathBuf> = (0..5).map(|i| PathBuf::from(format!("/p/{}.png", i))).collect();
        let layout = GridLayout::for_count(paths.len()).unwrap();
        let block = figure_grid_block("Panels", &paths, &layout);

        assert_eq!(block.matches("\\begin{minipage}{0.98\\linewidth}").count(), 2);
        assert_eq!(block.matches("\\end{minipage}\\\\").count(), 2);
        assert_eq!(block.matches("\\includegraphics").count(), 5);
        assert!(block.starts_with("\\begin{center}\n\\begin{figure}\n"));
        assert!(block.ends_with("\\caption{Panels}\n\\end{figure}\n\\end{center}\n"));

        // Images 0..2 share the first row, 3..4 the second
        let second_row = block.find("\\begin{minipage}{0.98\\linewidth}").map(|first| {
            block[first + 1..].find("\\begin{minipage}{0.98\\linewidth}").unwrap() + first + 1
        });
        let img3 = block.find("{/p/3}.png").unwrap();
        let img2 = block.find("{/p/2}.png").unwrap();
        assert!(img2 < second_row.unwrap());
        assert!(img3 > second_row.unwrap());
    }
}
