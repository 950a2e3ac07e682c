//! Feature modules - Content emitted into the document body
//!
//! This module contains the renderers behind the builder's content calls:
//! - Tables with per-column format directives
//! - Single figures and figure grids
//! - The format directive mini-language

pub mod figures;
pub mod format;
pub mod tables;

// Re-export commonly used types
pub use figures::{grid_rank, GridLayout};
pub use format::FormatSpec;
pub use tables::TableOptions;
