//! Convert command implementation.
//!
//! Converts raw vfio capture logs into the canonical four-column trace
//! format the analyze command consumes.

use crate::output::write_text;
use crate::parser::{convert_log, CaptureFormat};
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the raw capture log
    pub input: PathBuf,

    /// Output path for canonical trace text; stdout when absent
    pub output: Option<PathBuf>,

    /// Raw log dialect
    pub format: CaptureFormat,
}

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Raw log missing or unreadable
/// * Output file write errors
pub fn execute_convert(args: ConvertArgs) -> Result<()> {
    info!("Converting raw capture: {}", args.input.display());

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read capture log {}", args.input.display()))?;

    let converted = convert_log(&raw, args.format);

    if converted.converted == 0 {
        warn!("No accesses recovered from {}", args.input.display());
    }
    info!(
        "Recovered {} accesses ({} lines skipped)",
        converted.converted, converted.skipped
    );

    match &args.output {
        Some(path) => {
            write_text(&converted.text, path).context("Failed to write converted trace")?;
            info!("Converted trace written to: {}", path.display());
        }
        None => print!("{}", converted.text),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_convert_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.log");
        std::fs::write(
            &input,
            "vfio_region_write (0000:03:00.0:region0+0x0, 0x5, 4)\nnoise line\n",
        )
        .unwrap();

        let output = dir.path().join("trace.txt");
        let args = ConvertArgs {
            input,
            output: Some(output.clone()),
            format: CaptureFormat::Mmio,
        };

        execute_convert(args).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("Operation"));
        assert!(text.contains("Write"));
    }

    #[test]
    fn test_execute_convert_missing_input() {
        let args = ConvertArgs {
            input: PathBuf::from("/no/such/raw.log"),
            output: None,
            format: CaptureFormat::Config,
        };
        assert!(execute_convert(args).is_err());
    }
}
