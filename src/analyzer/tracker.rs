//! The keyed register state machine shared by both addressing schemes.
//!
//! Direct registers (keyed by raw offset) and indexed registers (keyed by
//! the last value written to the index offset) follow identical rules;
//! only the key derivation differs. The analyzer therefore runs two
//! independent instances of this tracker, one per scheme.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A register observed via Read before any Write established its value.
///
/// Such registers carry an unknown hardware-default initial value; the
/// first observed value is the best available seed for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadBeforeWriteRecord {
    pub key: u64,
    pub value: u64,
    pub sequence_index: usize,
}

/// A register whose value changed between two Reads with no intervening
/// host Write, implying the device mutates it autonomously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceControlledRecord {
    pub key: u64,
    pub old_value: u64,
    pub new_value: u64,
    pub sequence_index: usize,
}

/// Outcome of recording a Write, consumed by the pairing logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Current value for the key before this write, absent on first sight
    pub previous: Option<u64>,
    /// True when the written value differs from `previous`
    pub changed: bool,
}

/// Per-key tracking state.
///
/// `write_since_read` and `ever_written` only advance inside a
/// since-read window; a Read is the only thing that clears the window.
#[derive(Debug, Clone, Copy, Default)]
struct KeyState {
    current: Option<u64>,
    last_read: Option<u64>,
    write_since_read: bool,
    ever_written: bool,
}

/// Classification records collected by one tracker instance
#[derive(Debug, Clone, Default)]
pub struct TrackerRecords {
    /// Read-before-write registers, sorted by key
    pub read_before_write: Vec<ReadBeforeWriteRecord>,
    /// Device-controlled changes, in trace order
    pub device_controlled: Vec<DeviceControlledRecord>,
}

/// State tables and classification records for one addressing scheme
#[derive(Debug, Default)]
pub struct RegisterTracker {
    states: BTreeMap<u64, KeyState>,
    reported_unwritten: BTreeSet<u64>,
    read_before_write: Vec<ReadBeforeWriteRecord>,
    device_controlled: Vec<DeviceControlledRecord>,
}

impl RegisterTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a Write to `key`
    ///
    /// Updates the current value and the write bookkeeping, and reports
    /// whether the value changed. Callers that do not care about change
    /// detection (the direct scheme) simply drop the outcome.
    pub fn record_write(&mut self, key: u64, value: u64) -> WriteOutcome {
        let state = self.states.entry(key).or_default();

        let previous = state.current;
        let changed = previous != Some(value);

        state.current = Some(value);
        state.ever_written = true;
        state.write_since_read = true;

        WriteOutcome { previous, changed }
    }

    /// Record a Read of `key` observing `value`
    ///
    /// Emits at most one read-before-write record per key over the whole
    /// pass, and a device-controlled record whenever the value drifted
    /// from the previous Read with no Write in between.
    pub fn record_read(&mut self, key: u64, value: u64, sequence_index: usize) {
        let state = self.states.entry(key).or_default();

        if !state.ever_written && self.reported_unwritten.insert(key) {
            self.read_before_write.push(ReadBeforeWriteRecord {
                key,
                value,
                sequence_index,
            });
        }

        if let Some(last) = state.last_read {
            if !state.write_since_read && last != value {
                self.device_controlled.push(DeviceControlledRecord {
                    key,
                    old_value: last,
                    new_value: value,
                    sequence_index,
                });
            }
        }

        state.last_read = Some(value);
        state.write_since_read = false;
    }

    /// Consume the tracker, yielding its classification records
    pub fn finish(self) -> TrackerRecords {
        let mut read_before_write = self.read_before_write;
        read_before_write.sort_by_key(|r| r.key);

        TrackerRecords {
            read_before_write,
            device_controlled: self.device_controlled,
        }
    }
}
