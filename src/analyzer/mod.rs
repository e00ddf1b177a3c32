//! Trace analysis: state tracking, classification and aggregation.
//!
//! This module transforms a normalized event sequence into:
//! - A full value-change timeline per offset
//! - Index/data register pairing
//! - Read-before-write classification (registers needing seeded values)
//! - Device-controlled-change classification

pub mod engine;
pub mod schema;
pub mod summary;
pub mod tracker;

// Re-export main types and functions
pub use engine::{analyze_trace, AnalyzerConfig, ChangeRecord, PairRecord, TimelineEntry, TraceAnalysis};
pub use schema::{to_analysis, Analysis, FinalValue, OffsetChanges, SchemeRecords, SchemeSummaries};
pub use summary::{group_pairs, summarize_device_controlled, unique_values, DeviceControlledSummary, PairGroup};
pub use tracker::{DeviceControlledRecord, ReadBeforeWriteRecord, RegisterTracker, WriteOutcome};
