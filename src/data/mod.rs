//! Data layer - Fixed fragments and tabular input
//!
//! This module contains the static data and input types used by the builder:
//! - The bundled preamble and fixed LaTeX directives
//! - Cell values and the tabular data abstraction
//! - CSV / JSON loaders (feature `data-loading`)

pub mod constants;
#[cfg(feature = "data-loading")]
pub mod loading;
pub mod table;

// Re-export commonly used items
pub use constants::{DateDirective, PREAMBLE};
pub use table::{CellValue, DataTable, TabularData};
