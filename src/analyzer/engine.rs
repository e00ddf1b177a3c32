//! The trace analyzer: one forward pass over the normalized event
//! sequence.
//!
//! The pass maintains three state domains:
//! - an offset-domain value view (timeline, current values, change
//!   records) covering every offset, the addressing pair included;
//! - a direct classification tracker for offsets outside the addressing
//!   pair;
//! - an indexed classification tracker keyed by register select.
//!
//! Events are visited exactly once, in ascending sequence order, with no
//! lookahead. Aggregation over the recorded data happens afterwards in
//! [`summary`](super::summary).

use super::tracker::{DeviceControlledRecord, ReadBeforeWriteRecord, RegisterTracker};
use crate::parser::{AccessEvent, Operation};
use crate::utils::config::{DEFAULT_DATA_OFFSET, DEFAULT_INDEX_OFFSET};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Addressing configuration for the indexed register scheme.
///
/// The two offsets are deliberately not hard-coded anywhere in the
/// analyzer; devices put their index/data window at different addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Offset whose writes select a logical register
    pub index_offset: u64,
    /// Offset through which the selected register is accessed
    pub data_offset: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            index_offset: DEFAULT_INDEX_OFFSET,
            data_offset: DEFAULT_DATA_OFFSET,
        }
    }
}

/// One row of the full analysis timeline, keyed by raw offset.
///
/// `changed` is only ever true for a Write; Reads observe state, they do
/// not transition it in this view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub sequence_index: usize,
    pub operation: Operation,
    pub offset: u64,
    pub value: u64,
    /// Pre-update current value for this offset, absent on first sight
    pub previous: Option<u64>,
    pub changed: bool,
}

/// A Write that changed the current value at its offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub sequence_index: usize,
    pub old_value: Option<u64>,
    pub new_value: u64,
}

/// One data-offset Write observed while an index value was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecord {
    pub sequence_index: usize,
    /// The register selected by the last index write
    pub reg_select: u64,
    pub data_value: u64,
    /// True when the value differs from the current value at this
    /// register select
    pub data_changed: bool,
}

/// Everything the pass recorded, ready for aggregation and reporting
#[derive(Debug, Clone, Default)]
pub struct TraceAnalysis {
    pub total_events: usize,
    pub timeline: Vec<TimelineEntry>,
    /// Change sequences per offset, in trace order
    pub changes: BTreeMap<u64, Vec<ChangeRecord>>,
    /// Every offset seen at least once, with the last written value if any
    pub observed: BTreeMap<u64, Option<u64>>,
    pub pairs: Vec<PairRecord>,
    /// Data-offset writes seen before any index write established a key
    pub unpaired_data_writes: usize,
    pub read_before_write_indexed: Vec<ReadBeforeWriteRecord>,
    pub read_before_write_direct: Vec<ReadBeforeWriteRecord>,
    pub device_controlled_indexed: Vec<DeviceControlledRecord>,
    pub device_controlled_direct: Vec<DeviceControlledRecord>,
}

impl TraceAnalysis {
    /// Offsets that ended the trace with a known written value
    pub fn final_values(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.observed
            .iter()
            .filter_map(|(&offset, &value)| value.map(|v| (offset, v)))
    }
}

/// Analyze a normalized event sequence
///
/// **Public** - main entry point for analysis
///
/// Total over well-formed input: zero events and zero findings are valid
/// outcomes, not errors.
pub fn analyze_trace(events: &[AccessEvent], config: &AnalyzerConfig) -> TraceAnalysis {
    debug!(
        "Analyzing {} events (index offset {:#x}, data offset {:#x})",
        events.len(),
        config.index_offset,
        config.data_offset
    );

    let mut analyzer = Analyzer::new(*config);
    for event in events {
        analyzer.process(event);
    }

    analyzer.finish()
}

/// Working state for one analysis pass
struct Analyzer {
    config: AnalyzerConfig,
    observed: BTreeMap<u64, Option<u64>>,
    timeline: Vec<TimelineEntry>,
    changes: BTreeMap<u64, Vec<ChangeRecord>>,
    pending_index: Option<u64>,
    pairs: Vec<PairRecord>,
    unpaired_data_writes: usize,
    direct: RegisterTracker,
    indexed: RegisterTracker,
}

impl Analyzer {
    fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            observed: BTreeMap::new(),
            timeline: Vec::new(),
            changes: BTreeMap::new(),
            pending_index: None,
            pairs: Vec::new(),
            unpaired_data_writes: 0,
            direct: RegisterTracker::new(),
            indexed: RegisterTracker::new(),
        }
    }

    fn process(&mut self, event: &AccessEvent) {
        self.record_timeline(event);
        self.classify(event);
    }

    /// Timeline entry, current-value update and change recording for the
    /// offset-domain view
    fn record_timeline(&mut self, event: &AccessEvent) {
        let slot = self.observed.entry(event.offset).or_insert(None);
        let previous = *slot;
        let changed = event.operation == Operation::Write && previous != Some(event.value);

        self.timeline.push(TimelineEntry {
            sequence_index: event.sequence_index,
            operation: event.operation,
            offset: event.offset,
            value: event.value,
            previous,
            changed,
        });

        if event.operation == Operation::Write {
            *slot = Some(event.value);
            if changed {
                self.changes
                    .entry(event.offset)
                    .or_default()
                    .push(ChangeRecord {
                        sequence_index: event.sequence_index,
                        old_value: previous,
                        new_value: event.value,
                    });
            }
        }
    }

    /// Pairing and read-before-write / device-controlled classification,
    /// routed by addressing scheme
    fn classify(&mut self, event: &AccessEvent) {
        if event.offset == self.config.index_offset {
            // Index writes select a register; index reads select nothing
            // and belong to neither classification table.
            if event.operation == Operation::Write {
                self.pending_index = Some(event.value);
            }
        } else if event.offset == self.config.data_offset {
            self.classify_data_access(event);
        } else {
            match event.operation {
                Operation::Read => {
                    self.direct
                        .record_read(event.offset, event.value, event.sequence_index)
                }
                Operation::Write => {
                    self.direct
                        .record_write(event.offset, event.value);
                }
            }
        }
    }

    fn classify_data_access(&mut self, event: &AccessEvent) {
        let Some(reg_select) = self.pending_index else {
            // No register selected yet. Reads are excluded from indexed
            // analysis; writes are counted so they are not lost silently.
            if event.operation == Operation::Write {
                self.unpaired_data_writes += 1;
            }
            return;
        };

        match event.operation {
            Operation::Write => {
                let outcome = self
                    .indexed
                    .record_write(reg_select, event.value);
                self.pairs.push(PairRecord {
                    sequence_index: event.sequence_index,
                    reg_select,
                    data_value: event.value,
                    data_changed: outcome.changed,
                });
            }
            Operation::Read => {
                self.indexed
                    .record_read(reg_select, event.value, event.sequence_index);
            }
        }
    }

    fn finish(self) -> TraceAnalysis {
        let direct = self.direct.finish();
        let indexed = self.indexed.finish();

        debug!(
            "Analysis complete: {} timeline entries, {} pairs, {} read-before-write, {} device-controlled",
            self.timeline.len(),
            self.pairs.len(),
            direct.read_before_write.len() + indexed.read_before_write.len(),
            direct.device_controlled.len() + indexed.device_controlled.len(),
        );

        TraceAnalysis {
            total_events: self.timeline.len(),
            timeline: self.timeline,
            changes: self.changes,
            observed: self.observed,
            pairs: self.pairs,
            unpaired_data_writes: self.unpaired_data_writes,
            read_before_write_indexed: indexed.read_before_write,
            read_before_write_direct: direct.read_before_write,
            device_controlled_indexed: indexed.device_controlled,
            device_controlled_direct: direct.device_controlled,
        }
    }
}
