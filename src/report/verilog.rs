//! Verilog initialization snippet generation.
//!
//! Read-before-write registers carry hardware-default values a model has
//! to seed; this renders them as non-blocking assignments ready to paste
//! into a reset block. Device-controlled registers cannot be seeded with
//! a single value, so they are emitted as comments flagging the observed
//! value set.

use crate::analyzer::{Analysis, DeviceControlledSummary};
use std::fmt::Write as _;

/// Render the Verilog seed snippet
///
/// **Public** - used by the analyze command when `--verilog` is given
pub fn render_verilog_seed(analysis: &Analysis) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "// {}", "=".repeat(40));
    let _ = writeln!(out, "// Initial values for registers read before write");
    let _ = writeln!(out, "// {}", "=".repeat(40));
    let _ = writeln!(out);

    let _ = writeln!(out, "// Indexed registers (selected via index/data window)");
    for record in &analysis.read_before_write.indexed {
        let name = format!("data_reg_{:X}", record.key);
        let _ = writeln!(out, "{:<28} <= 32'h{:08X};", name, record.value);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "// Direct registers");
    for record in &analysis.read_before_write.direct {
        let name = format!("reg_{:X}", record.key);
        let _ = writeln!(out, "{:<28} <= 32'h{:08X};", name, record.value);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "// {}", "=".repeat(40));
    let _ = writeln!(out, "// Device-controlled registers - need special handling!");
    let _ = writeln!(out, "// These registers change value without host writes.");
    let _ = writeln!(out, "// {}", "=".repeat(40));
    let _ = writeln!(out);

    let _ = writeln!(out, "// Indexed device-controlled registers:");
    render_device_comments(&mut out, &analysis.device_controlled.indexed, "Register");

    let _ = writeln!(out);
    let _ = writeln!(out, "// Direct device-controlled registers:");
    render_device_comments(&mut out, &analysis.device_controlled.direct, "Offset");

    out
}

fn render_device_comments(out: &mut String, summaries: &[DeviceControlledSummary], label: &str) {
    for summary in summaries {
        let values: Vec<String> = summary
            .observed_values
            .iter()
            .map(|&v| format!("{v:#X}"))
            .collect();
        let _ = writeln!(
            out,
            "// {} {:#X}: toggles between {}",
            label,
            summary.key,
            values.join(", ")
        );
    }
}
