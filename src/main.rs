//! Regtrace CLI
//!
//! Analyzes register access traces captured from real hardware and
//! produces reports for reverse engineering and model seeding.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use regtrace::commands::{
    execute_analyze, execute_convert, validate_args, AnalyzeArgs, ConvertArgs,
};
use regtrace::output::read_analysis;
use regtrace::parser::{parse_hex, CaptureFormat};
use regtrace::utils::config::SCHEMA_VERSION;

/// Regtrace - Register access trace analysis
#[derive(Parser, Debug)]
#[command(name = "regtrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a canonical register access trace
    Analyze {
        /// Path to the trace file (Operation Offset Value Length columns)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the text report
        #[arg(short, long, default_value = "register_report.txt")]
        report: PathBuf,

        /// Output path for the JSON analysis document (optional)
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Output path for a Verilog initialization snippet (optional)
        #[arg(long)]
        verilog: Option<PathBuf>,

        /// Print a summary to stdout
        #[arg(long)]
        summary: bool,

        /// Offset of the index register of the index/data window
        #[arg(
            long,
            default_value = "0x0",
            env = "REGTRACE_INDEX_OFFSET",
            value_parser = parse_offset
        )]
        index_offset: u64,

        /// Offset of the data register of the index/data window
        #[arg(
            long,
            default_value = "0x4",
            env = "REGTRACE_DATA_OFFSET",
            value_parser = parse_offset
        )]
        data_offset: u64,
    },

    /// Convert a raw vfio capture log into the canonical trace format
    Convert {
        /// Path to the raw capture log
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the canonical trace; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Raw log dialect: mmio or config
        #[arg(short, long, value_parser = parse_format)]
        format: CaptureFormat,
    },

    /// Validate an analysis JSON file
    Validate {
        /// Path to analysis JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            report,
            json,
            verilog,
            summary,
            index_offset,
            data_offset,
        } => {
            let args = AnalyzeArgs {
                input,
                report,
                output_json: json,
                verilog,
                print_summary: summary,
                index_offset,
                data_offset,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Convert {
            input,
            output,
            format,
        } => {
            execute_convert(ConvertArgs {
                input,
                output,
                format,
            })?;
        }

        Commands::Validate { file } => {
            validate_analysis_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Parse a register offset flag such as `0x2004`
///
/// **Private** - clap value parser
fn parse_offset(text: &str) -> Result<u64, String> {
    parse_hex("offset", text).map_err(|e| e.to_string())
}

/// Parse the capture format flag
///
/// **Private** - clap value parser
fn parse_format(text: &str) -> Result<CaptureFormat, String> {
    text.parse()
        .map_err(|_| format!("unknown format '{text}' (expected 'mmio' or 'config')"))
}

/// Validate an analysis JSON file
///
/// **Private** - internal command implementation
fn validate_analysis_file(file_path: PathBuf) -> Result<()> {
    println!("Validating analysis: {}", file_path.display());

    let analysis = read_analysis(&file_path)?;

    println!("✓ Valid analysis JSON");
    println!("  Version: {}", analysis.version);
    println!("  Source: {}", analysis.source);
    println!("  Total Events: {}", analysis.total_events);
    println!("  Unique Offsets: {}", analysis.observed_offsets.len());
    println!("  Index/Data Pairs: {}", analysis.pairs.len());
    println!(
        "  Read Before Write: {} indexed, {} direct",
        analysis.read_before_write.indexed.len(),
        analysis.read_before_write.direct.len()
    );

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Regtrace Analysis Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  source: string             - Trace file analyzed");
        println!("  index_offset: number       - Index register offset");
        println!("  data_offset: number        - Data register offset");
        println!("  total_events: number       - Normalized access events");
        println!("  observed_offsets: array    - Every offset seen, sorted");
        println!("  unpaired_data_writes: number - Data writes before any index write");
        println!("  timeline: array            - One entry per event");
        println!("  changes: array             - Change sequences per offset");
        println!("  final_values: array        - Last written value per offset");
        println!("  pairs: array               - Index/data pair records");
        println!("  pair_groups: array         - Distinct data values per register select");
        println!("  read_before_write: object  - Registers needing initial values");
        println!("  device_controlled: object  - Registers the device mutates");
        println!("  generated_at: string       - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Regtrace v{}", env!("CARGO_PKG_VERSION"));
    println!("Analysis Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Register access trace analysis for device reverse engineering.");
}
