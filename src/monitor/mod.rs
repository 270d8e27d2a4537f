//! Text output for benchmark reports

pub mod table;

pub use table::{render_summary, render_table};
