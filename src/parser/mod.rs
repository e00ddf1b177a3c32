//! Trace normalization and raw capture conversion.
//!
//! This module handles:
//! - Parsing canonical four-column trace text into access events
//! - Converting raw vfio logs into the canonical format
//! - Defining the event types the analyzer consumes

pub mod capture;
pub mod event;
pub mod trace_log;

// Re-export main types
pub use capture::{convert_log, CaptureFormat, CapturedAccess, ConvertedTrace};
pub use event::{parse_hex, parse_line, AccessEvent, Operation};
pub use trace_log::parse_trace;
