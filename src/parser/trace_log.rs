//! The event normalizer: canonical trace text to an ordered event sequence.
//!
//! Normalization is best-effort by design. Header decoration, dashed
//! rules, blank lines and lines that fail to parse are skipped without
//! error; the normalized sequence is simply shorter. Empty input yields
//! an empty sequence, which the analyzer treats as a valid outcome.

use super::event::{parse_line, AccessEvent};
use log::debug;

/// Normalize canonical trace text into an ordered event sequence
///
/// **Public** - main entry point for normalization
///
/// Sequence indices are assigned here, in order of acceptance, and are
/// stable for the rest of the run.
pub fn parse_trace(text: &str) -> Vec<AccessEvent> {
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for line in text.lines() {
        if is_decoration(line) {
            continue;
        }

        match parse_line(line, events.len()) {
            Ok(event) => events.push(event),
            Err(e) => {
                debug!("Skipping malformed trace line '{}': {}", line.trim(), e);
                skipped += 1;
            }
        }
    }

    debug!(
        "Normalized {} events ({} malformed lines skipped)",
        events.len(),
        skipped
    );

    events
}

/// Header, separator and blank lines are decoration, not data
fn is_decoration(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with("Operation") || trimmed.starts_with("----")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::event::Operation;

    const SAMPLE: &str = "\
Operation Offset     Value      Length
------------------------------------
Write    0x0        0x5        0x4
Write    0x4        0xa        0x4
Read     0x8        0x1        0x4
";

    #[test]
    fn test_parse_trace_skips_decoration() {
        let events = parse_trace(SAMPLE);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].operation, Operation::Write);
        assert_eq!(events[2].offset, 0x8);
    }

    #[test]
    fn test_sequence_indices_follow_accepted_order() {
        let text = "Write 0x0 0x5 0x4\nnot a trace line\nRead 0x8 0x1 0x4\n";
        let events = parse_trace(text);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sequence_index, 0);
        assert_eq!(events[1].sequence_index, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_trace("").is_empty());
        assert!(parse_trace("\n\n").is_empty());
    }

    #[test]
    fn test_malformed_lines_are_not_fatal() {
        let text = "Write 0x0 0x5 0x4\nRead 0xQQ 0x1 0x4\nRead bad\n";
        let events = parse_trace(text);
        assert_eq!(events.len(), 1);
    }
}
