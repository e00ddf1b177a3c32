//! Report synthesizers for analysis output.
//!
//! This module renders the analysis document into:
//! - A sectioned, human-readable text report
//! - A Verilog initialization snippet for hardware models

pub mod text;
pub mod verilog;

// Re-export main functions
pub use text::render_report;
pub use verilog::render_verilog_seed;
