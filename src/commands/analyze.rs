//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads the trace file
//! 2. Normalizes it into access events
//! 3. Runs the analysis pass
//! 4. Writes the report, JSON document and Verilog seed outputs

use crate::analyzer::{analyze_trace, to_analysis, Analysis, AnalyzerConfig};
use crate::output::{write_analysis, write_text};
use crate::parser::parse_trace;
use crate::report::{render_report, render_verilog_seed};
use crate::utils::config::{DEFAULT_DATA_OFFSET, DEFAULT_INDEX_OFFSET};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the canonical trace file
    pub input: PathBuf,

    /// Output path for the text report
    pub report: PathBuf,

    /// Output path for the JSON analysis document (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for the Verilog seed snippet (optional)
    pub verilog: Option<PathBuf>,

    /// Print a summary to stdout
    pub print_summary: bool,

    /// Offset of the index register
    pub index_offset: u64,

    /// Offset of the data register
    pub data_offset: u64,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trace.txt"),
            report: PathBuf::from("register_report.txt"),
            output_json: None,
            verilog: None,
            print_summary: false,
            index_offset: DEFAULT_INDEX_OFFSET,
            data_offset: DEFAULT_DATA_OFFSET,
        }
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.index_offset == args.data_offset {
        anyhow::bail!(
            "Index and data offsets must differ (both are {:#x})",
            args.index_offset
        );
    }

    Ok(())
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace file missing or unreadable (fatal; no partial analysis)
/// * Output file write errors
///
/// A trace with zero valid entries is not an error: the report simply
/// states that no entries were found.
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input.display());

    // Step 1: Read the trace
    info!("Step 1/4: Reading trace file...");
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read trace file {}", args.input.display()))?;

    // Step 2: Normalize
    info!("Step 2/4: Normalizing trace lines...");
    let events = parse_trace(&text);

    if events.is_empty() {
        warn!("No valid entries found in {}", args.input.display());
    } else {
        debug!("Normalized {} events", events.len());
    }

    // Step 3: Analyze
    info!("Step 3/4: Analyzing {} events...", events.len());
    let config = AnalyzerConfig {
        index_offset: args.index_offset,
        data_offset: args.data_offset,
    };
    let source = args.input.display().to_string();
    let analysis = to_analysis(&source, &analyze_trace(&events, &config), &config);

    // Step 4: Write outputs
    info!("Step 4/4: Writing output files...");

    write_text(&render_report(&analysis), &args.report).context("Failed to write report")?;
    info!("Report written to: {}", args.report.display());

    if let Some(json_path) = &args.output_json {
        write_analysis(&analysis, json_path).context("Failed to write analysis JSON")?;
        info!("Analysis written to: {}", json_path.display());
    }

    if let Some(verilog_path) = &args.verilog {
        write_text(&render_verilog_seed(&analysis), verilog_path)
            .context("Failed to write Verilog seed")?;
        info!("Verilog seed written to: {}", verilog_path.display());
    }

    if args.print_summary {
        print_summary(&analysis);
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Print a console summary of the analysis
///
/// **Private** - internal helper for execute_analyze
fn print_summary(analysis: &Analysis) {
    println!("\n{}", "=".repeat(60));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(60));
    println!("Total operations parsed: {}", analysis.total_events);
    println!("Unique offsets accessed: {}", analysis.observed_offsets.len());
    println!("Index/data pairs found:  {}", analysis.pairs.len());
    println!("Unpaired data writes:    {}", analysis.unpaired_data_writes);
    println!(
        "Read before write:       {} indexed, {} direct",
        analysis.read_before_write.indexed.len(),
        analysis.read_before_write.direct.len()
    );
    println!(
        "Device-controlled:       {} indexed, {} direct",
        analysis.device_controlled.indexed.len(),
        analysis.device_controlled.direct.len()
    );

    let changed: Vec<_> = analysis.changes.iter().filter(|c| !c.changes.is_empty()).collect();
    if !changed.is_empty() {
        println!("\nChanges per offset:");
        for entry in changed {
            println!("  {:#X}: {} changes", entry.offset, entry.changes.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_valid() {
        let args = AnalyzeArgs::default();
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = AnalyzeArgs {
            input: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_colliding_offsets() {
        let args = AnalyzeArgs {
            index_offset: 0x10,
            data_offset: 0x10,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_execute_analyze_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let args = AnalyzeArgs {
            input: dir.path().join("does_not_exist.txt"),
            report: dir.path().join("report.txt"),
            ..Default::default()
        };
        assert!(execute_analyze(args).is_err());
    }

    #[test]
    fn test_execute_analyze_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("trace.txt");
        std::fs::write(&input, "Write 0x0 0x5 0x4\nWrite 0x4 0xa 0x4\nRead 0x8 0x1 0x4\n").unwrap();

        let report = dir.path().join("report.txt");
        let json = dir.path().join("analysis.json");
        let args = AnalyzeArgs {
            input,
            report: report.clone(),
            output_json: Some(json.clone()),
            ..Default::default()
        };

        execute_analyze(args).unwrap();

        let rendered = std::fs::read_to_string(&report).unwrap();
        assert!(rendered.contains("REGISTER TRACE ANALYSIS"));
        assert!(json.exists());
    }

    #[test]
    fn test_execute_analyze_empty_trace_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        std::fs::write(&input, "").unwrap();

        let report = dir.path().join("report.txt");
        let args = AnalyzeArgs {
            input,
            report: report.clone(),
            ..Default::default()
        };

        execute_analyze(args).unwrap();

        let rendered = std::fs::read_to_string(&report).unwrap();
        assert!(rendered.contains("No entries found."));
    }
}
