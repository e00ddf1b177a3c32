//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Default addressing offsets for the indexed register scheme.
// The device selects a logical register by writing its number to the
// index offset, then accesses its value through the data offset.
pub const DEFAULT_INDEX_OFFSET: u64 = 0x0;
pub const DEFAULT_DATA_OFFSET: u64 = 0x4;

// Report layout limits
pub const CHANGE_SEQUENCE_ROW: usize = 5; // values per row in change sequences
pub const UNIQUE_VALUE_LIMIT: usize = 10; // unique values shown before eliding
pub const PAIR_VALUE_LIMIT: usize = 8; // data values per register select before eliding
pub const DEVICE_CHANGE_EXCERPT: usize = 20; // device-controlled changes shown per register

/// Width of the `====` section rules in the text report
pub const REPORT_RULE_WIDTH: usize = 80;
