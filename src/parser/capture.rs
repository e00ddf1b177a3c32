//! Raw capture conversion.
//!
//! Converts heterogeneous vfio trace logs into the canonical four-column
//! trace format the normalizer consumes. Two dialects are supported:
//! - `mmio`: `vfio_region_read` / `vfio_region_write` lines (BAR accesses)
//! - `config`: `vfio_pci_read_config` / `vfio_pci_write_config` lines
//!
//! Lines that match neither shape are skipped; conversion is best-effort,
//! like normalization.

use super::event::Operation;
use crate::utils::error::ParseError;
use log::debug;
use std::fmt::Write as _;
use std::str::FromStr;

/// Which raw log dialect to convert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    /// BAR accesses (`vfio_region_*` trace points)
    Mmio,
    /// Configuration space accesses (`vfio_pci_*_config` trace points)
    Config,
}

impl FromStr for CaptureFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mmio" => Ok(Self::Mmio),
            "config" => Ok(Self::Config),
            other => Err(ParseError::UnknownOperation(other.to_string())),
        }
    }
}

/// One access recovered from a raw log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedAccess {
    pub operation: Operation,
    pub offset: u64,
    pub value: u64,
    pub length: u64,
}

/// Result of a conversion run
#[derive(Debug, Clone)]
pub struct ConvertedTrace {
    /// Canonical trace text, ready for [`parse_trace`](super::parse_trace)
    pub text: String,
    /// Number of accesses recovered
    pub converted: usize,
    /// Number of input lines that matched no known shape
    pub skipped: usize,
}

/// Convert a raw vfio log into canonical trace text
///
/// **Public** - main entry point for the `convert` command
pub fn convert_log(raw: &str, format: CaptureFormat) -> ConvertedTrace {
    let mut accesses = Vec::new();
    let mut skipped = 0usize;

    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let access = match format {
            CaptureFormat::Mmio => parse_region_line(line),
            CaptureFormat::Config => parse_config_line(line),
        };

        match access {
            Some(access) => accesses.push(access),
            None => {
                skipped += 1;
                debug!("No access recovered from line '{}'", line.trim());
            }
        }
    }

    ConvertedTrace {
        text: render_trace(&accesses),
        converted: accesses.len(),
        skipped,
    }
}

/// Render accesses as canonical four-column trace text
///
/// The header and dashed rule match what the normalizer recognizes as
/// decoration, so converted output round-trips cleanly.
pub fn render_trace(accesses: &[CapturedAccess]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<8} {:<10} {:<10} {:<8}",
        "Operation", "Offset", "Value", "Length"
    );
    let _ = writeln!(out, "{}", "-".repeat(36));

    for access in accesses {
        let _ = writeln!(
            out,
            "{:<8} {:<10} {:<10} {:<8}",
            access.operation,
            format!("{:#x}", access.offset),
            format!("{:#x}", access.value),
            format!("{:#x}", access.length),
        );
    }

    out
}

/// Parse a `vfio_region_read` / `vfio_region_write` line
///
/// Shapes:
/// `vfio_region_read (0000:03:00.0:region0+0x2004, 4) = 0x12345678`
/// `vfio_region_write (0000:03:00.0:region0+0x2004, 0x12345678, 4)`
fn parse_region_line(line: &str) -> Option<CapturedAccess> {
    if line.contains("vfio_region_read") {
        let rest = after(line, "region0+")?;
        let (offset, rest) = hex_token(rest)?;
        let length = after(rest, ", ")
            .and_then(dec_token)
            .map(|(n, _)| n)
            .unwrap_or(4);
        let (value, _) = hex_token(after(rest, ") = ")?)?;

        Some(CapturedAccess {
            operation: Operation::Read,
            offset,
            value,
            length,
        })
    } else if line.contains("vfio_region_write") {
        let rest = after(line, "region0+")?;
        let (offset, rest) = hex_token(rest)?;
        let rest = rest.strip_prefix(", ")?;
        let (value, rest) = hex_token(rest)?;
        let (length, _) = dec_token(rest.strip_prefix(", ")?)?;

        Some(CapturedAccess {
            operation: Operation::Write,
            offset,
            value,
            length,
        })
    } else {
        None
    }
}

/// Parse a `vfio_pci_read_config` / `vfio_pci_write_config` line
///
/// Shapes:
/// `vfio_pci_read_config (0000:03:00.0, @0x4, len=0x2) 0x100007`
/// `vfio_pci_write_config (0000:03:00.0, @0x4, 0x100007, len=0x2)`
fn parse_config_line(line: &str) -> Option<CapturedAccess> {
    if line.contains("vfio_pci_read_config") {
        let rest = after(line, "@")?;
        let (offset, rest) = hex_token(rest)?;
        let (length, rest) = hex_token(after(rest, "len=")?)?;
        let (value, _) = hex_token(after(rest, ") ")?)?;

        Some(CapturedAccess {
            operation: Operation::Read,
            offset,
            value,
            length,
        })
    } else if line.contains("vfio_pci_write_config") {
        let rest = after(line, "@")?;
        let (offset, rest) = hex_token(rest)?;
        let rest = rest.strip_prefix(", ")?;
        let (value, rest) = hex_token(rest)?;
        let (length, _) = hex_token(after(rest, "len=")?)?;

        Some(CapturedAccess {
            operation: Operation::Write,
            offset,
            value,
            length,
        })
    } else {
        None
    }
}

/// Slice following the first occurrence of `marker`
fn after<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.find(marker).map(|pos| &text[pos + marker.len()..])
}

/// Parse a leading `0x`-prefixed hex number, returning it and the tail
fn hex_token(text: &str) -> Option<(u64, &str)> {
    let digits = text.strip_prefix("0x")?;
    let end = digits
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(digits.len());
    let value = u64::from_str_radix(&digits[..end], 16).ok()?;
    Some((value, &digits[end..]))
}

/// Parse a leading decimal number, returning it and the tail
fn dec_token(text: &str) -> Option<(u64, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let value = text[..end].parse::<u64>().ok()?;
    Some((value, &text[end..]))
}
