//! Regtrace
//!
//! Register access trace analysis for device reverse engineering.
//!
//! Regtrace consumes traces of MMIO or configuration-space register
//! accesses and derives behavioral facts about each register: how its
//! value evolves, whether it is read before any write establishes a
//! baseline, and whether the device mutates it autonomously. The
//! results seed register models for re-implementation work.
//!
//! This crate provides the core implementation for the `regtrace`
//! CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install regtrace
//! regtrace --help
//! ```

pub mod analyzer;
pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;
