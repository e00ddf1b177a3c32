//! Post-pass aggregation over the recorded analysis data.
//!
//! Everything here is a pure function over records the pass already
//! collected; no new state is derived from the event sequence itself.

use super::engine::{ChangeRecord, PairRecord};
use super::tracker::DeviceControlledRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distinct values written through the data offset for one register select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairGroup {
    pub reg_select: u64,
    /// Distinct data values, in first-seen order
    pub data_values: Vec<u64>,
}

/// Per-register summary of device-controlled changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceControlledSummary {
    pub key: u64,
    pub change_count: usize,
    /// Every value seen on either side of a change, sorted
    pub observed_values: Vec<u64>,
    /// The underlying changes, in trace order
    pub changes: Vec<DeviceControlledRecord>,
}

/// Distinct new values from a change sequence, preserving first-seen order
pub fn unique_values(changes: &[ChangeRecord]) -> Vec<u64> {
    let mut seen = Vec::new();
    for change in changes {
        if !seen.contains(&change.new_value) {
            seen.push(change.new_value);
        }
    }
    seen
}

/// Group pair records by register select, sorted by key
pub fn group_pairs(pairs: &[PairRecord]) -> Vec<PairGroup> {
    let mut groups: BTreeMap<u64, Vec<u64>> = BTreeMap::new();

    for pair in pairs {
        let values = groups.entry(pair.reg_select).or_default();
        if !values.contains(&pair.data_value) {
            values.push(pair.data_value);
        }
    }

    groups
        .into_iter()
        .map(|(reg_select, data_values)| PairGroup {
            reg_select,
            data_values,
        })
        .collect()
}

/// Summarize device-controlled changes per register, sorted by key
pub fn summarize_device_controlled(records: &[DeviceControlledRecord]) -> Vec<DeviceControlledSummary> {
    let mut grouped: BTreeMap<u64, Vec<DeviceControlledRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.key).or_default().push(*record);
    }

    grouped
        .into_iter()
        .map(|(key, changes)| {
            let mut observed_values: Vec<u64> = changes
                .iter()
                .flat_map(|c| [c.old_value, c.new_value])
                .collect();
            observed_values.sort_unstable();
            observed_values.dedup();

            DeviceControlledSummary {
                key,
                change_count: changes.len(),
                observed_values,
                changes,
            }
        })
        .collect()
}
