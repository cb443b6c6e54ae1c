//! Flat tabular export of a review tree, meant to be opened in spreadsheet
//! tools.

mod csv;

pub use csv::{ExportError, render_csv, write_csv};
