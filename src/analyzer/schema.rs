//! Output JSON schema definitions for analysis data.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use super::engine::{AnalyzerConfig, ChangeRecord, PairRecord, TimelineEntry, TraceAnalysis};
use super::summary::{group_pairs, summarize_device_controlled, unique_values, DeviceControlledSummary, PairGroup};
use super::tracker::ReadBeforeWriteRecord;
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level analysis document written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace file the analysis was produced from
    pub source: String,

    /// Addressing offsets the analysis ran with
    pub index_offset: u64,
    pub data_offset: u64,

    /// Number of normalized events
    pub total_events: usize,

    /// Every offset seen at least once, sorted
    pub observed_offsets: Vec<u64>,

    /// Data-offset writes seen before any index write
    pub unpaired_data_writes: usize,

    /// One entry per event, in trace order
    pub timeline: Vec<TimelineEntry>,

    /// Change sequences per offset, sorted by offset
    pub changes: Vec<OffsetChanges>,

    /// Last written value per offset, sorted by offset
    pub final_values: Vec<FinalValue>,

    /// Index/data pair records, in trace order
    pub pairs: Vec<PairRecord>,

    /// Distinct data values per register select
    pub pair_groups: Vec<PairGroup>,

    /// Registers read before any write, per addressing scheme
    pub read_before_write: SchemeRecords,

    /// Registers the device mutates on its own, per addressing scheme
    pub device_controlled: SchemeSummaries,

    /// Timestamp when the analysis was generated
    pub generated_at: String,
}

/// Change history for one offset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetChanges {
    pub offset: u64,
    pub changes: Vec<ChangeRecord>,
    /// Distinct written values, in first-seen order
    pub unique_values: Vec<u64>,
}

/// Last known value for an offset at end of trace
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FinalValue {
    pub offset: u64,
    pub value: u64,
}

/// Read-before-write records split by addressing scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeRecords {
    pub indexed: Vec<ReadBeforeWriteRecord>,
    pub direct: Vec<ReadBeforeWriteRecord>,
}

/// Device-controlled summaries split by addressing scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeSummaries {
    pub indexed: Vec<DeviceControlledSummary>,
    pub direct: Vec<DeviceControlledSummary>,
}

/// Convert pass output to the serialized document format
///
/// **Public** - used by commands to create final output
pub fn to_analysis(source: &str, analysis: &TraceAnalysis, config: &AnalyzerConfig) -> Analysis {
    use chrono::Utc;

    let changes: Vec<OffsetChanges> = analysis
        .changes
        .iter()
        .map(|(&offset, records)| OffsetChanges {
            offset,
            changes: records.clone(),
            unique_values: unique_values(records),
        })
        .collect();

    let final_values: Vec<FinalValue> = analysis
        .final_values()
        .map(|(offset, value)| FinalValue { offset, value })
        .collect();

    Analysis {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        index_offset: config.index_offset,
        data_offset: config.data_offset,
        total_events: analysis.total_events,
        observed_offsets: analysis.observed.keys().copied().collect(),
        unpaired_data_writes: analysis.unpaired_data_writes,
        timeline: analysis.timeline.clone(),
        changes,
        final_values,
        pairs: analysis.pairs.clone(),
        pair_groups: group_pairs(&analysis.pairs),
        read_before_write: SchemeRecords {
            indexed: analysis.read_before_write_indexed.clone(),
            direct: analysis.read_before_write_direct.clone(),
        },
        device_controlled: SchemeSummaries {
            indexed: summarize_device_controlled(&analysis.device_controlled_indexed),
            direct: summarize_device_controlled(&analysis.device_controlled_direct),
        },
        generated_at: Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_trace;
    use crate::parser::parse_trace;

    #[test]
    fn test_to_analysis_carries_counts_and_config() {
        let events = parse_trace("Write 0x0 0x5 0x4\nWrite 0x4 0xa 0x4\nRead 0x8 0x1 0x4\n");
        let config = AnalyzerConfig::default();
        let analysis = to_analysis("trace.txt", &analyze_trace(&events, &config), &config);

        assert_eq!(analysis.version, SCHEMA_VERSION);
        assert_eq!(analysis.source, "trace.txt");
        assert_eq!(analysis.total_events, 3);
        assert_eq!(analysis.observed_offsets, vec![0x0, 0x4, 0x8]);
        assert_eq!(analysis.pairs.len(), 1);
        assert_eq!(analysis.read_before_write.direct.len(), 1);
        assert!(analysis.read_before_write.indexed.is_empty());
    }

    #[test]
    fn test_to_analysis_empty_trace() {
        let config = AnalyzerConfig::default();
        let analysis = to_analysis("empty.txt", &analyze_trace(&[], &config), &config);

        assert_eq!(analysis.total_events, 0);
        assert!(analysis.timeline.is_empty());
        assert!(analysis.changes.is_empty());
        assert!(analysis.pair_groups.is_empty());
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let events = parse_trace("Write 0x8 0x1 0x4\nRead 0x8 0x1 0x4\nRead 0x8 0x2 0x4\n");
        let config = AnalyzerConfig::default();
        let analysis = to_analysis("t.txt", &analyze_trace(&events, &config), &config);

        let json = serde_json::to_string(&analysis).unwrap();
        let loaded: Analysis = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.total_events, 3);
        assert_eq!(loaded.device_controlled.direct.len(), 1);
        assert_eq!(loaded.device_controlled.direct[0].change_count, 1);
    }
}
