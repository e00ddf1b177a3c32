//! Access event types and single-line parsing.
//!
//! A canonical trace line has four whitespace-separated fields:
//! operation keyword, offset, value, length. Offsets and values are
//! hexadecimal; length may be hexadecimal or decimal.

use crate::utils::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Write,
}

impl FromStr for Operation {
    type Err = ParseError;

    // Case-sensitive on purpose: the capture format emits exactly
    // "Read" and "Write", and anything else is a foreign line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Read" => Ok(Self::Read),
            "Write" => Ok(Self::Write),
            other => Err(ParseError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "Read"),
            Self::Write => write!(f, "Write"),
        }
    }
}

/// One observed bus transaction.
///
/// Created during normalization and immutable afterwards. `length` is
/// carried for display only; no classification rule consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    /// Position in the normalized event sequence
    pub sequence_index: usize,

    /// Read or Write
    pub operation: Operation,

    /// Register address
    pub offset: u64,

    /// Value returned (Read) or written (Write)
    pub value: u64,

    /// Access width in bytes
    pub length: u64,
}

/// Parse a hexadecimal field, with or without a `0x` prefix
///
/// **Public** - also used by the raw capture converter
pub fn parse_hex(field: &'static str, text: &str) -> Result<u64, ParseError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    u64::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidNumber {
        field,
        text: text.to_string(),
    })
}

/// Parse one canonical trace line into an event
///
/// **Public** - used by the normalizer; callers decide whether a failure
/// is fatal (it never is during normalization).
///
/// # Arguments
/// * `line` - one line of canonical trace text
/// * `sequence_index` - position this event will take in the normalized sequence
pub fn parse_line(line: &str, sequence_index: usize) -> Result<AccessEvent, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() < 4 {
        return Err(ParseError::TooFewFields(fields.len()));
    }

    let operation = fields[0].parse::<Operation>()?;
    let offset = parse_hex("offset", fields[1])?;
    let value = parse_hex("value", fields[2])?;
    let length = parse_hex("length", fields[3])?;

    Ok(AccessEvent {
        sequence_index,
        operation,
        offset,
        value,
        length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_read() {
        let event = parse_line("Read     0x2004     0x12345678 0x4", 0).unwrap();
        assert_eq!(event.operation, Operation::Read);
        assert_eq!(event.offset, 0x2004);
        assert_eq!(event.value, 0x12345678);
        assert_eq!(event.length, 4);
        assert_eq!(event.sequence_index, 0);
    }

    #[test]
    fn test_parse_line_write_without_prefix() {
        let event = parse_line("Write 8 1 4", 3).unwrap();
        assert_eq!(event.operation, Operation::Write);
        assert_eq!(event.offset, 0x8);
        assert_eq!(event.sequence_index, 3);
    }

    #[test]
    fn test_operation_is_case_sensitive() {
        assert!(parse_line("read 0x0 0x1 0x4", 0).is_err());
        assert!(parse_line("WRITE 0x0 0x1 0x4", 0).is_err());
    }

    #[test]
    fn test_too_few_fields() {
        assert!(matches!(
            parse_line("Read 0x0 0x1", 0),
            Err(ParseError::TooFewFields(3))
        ));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        // Some capture dialects append annotations after the length column
        let event = parse_line("Read 0x8 0x1 0x4 region0", 0).unwrap();
        assert_eq!(event.offset, 0x8);
    }

    #[test]
    fn test_bad_hex_field() {
        assert!(parse_line("Read 0xZZ 0x1 0x4", 0).is_err());
        assert!(parse_line("Read 0x8 junk 0x4", 0).is_err());
    }

    #[test]
    fn test_parse_hex_prefixes() {
        assert_eq!(parse_hex("value", "0x1f").unwrap(), 0x1f);
        assert_eq!(parse_hex("value", "1f").unwrap(), 0x1f);
        assert_eq!(parse_hex("value", "0XFF").unwrap(), 0xff);
        assert!(parse_hex("value", "").is_err());
    }
}
