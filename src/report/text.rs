//! Text report synthesizer.
//!
//! Renders the analysis document into the sectioned report reverse
//! engineers actually read: pair tables, per-offset change histories,
//! the full timeline, and the two classification sections. Layout
//! limits (row widths, elision thresholds) live in `utils::config`.

use crate::analyzer::{Analysis, DeviceControlledSummary};
use crate::utils::config::{
    CHANGE_SEQUENCE_ROW, DEVICE_CHANGE_EXCERPT, PAIR_VALUE_LIMIT, REPORT_RULE_WIDTH,
    UNIQUE_VALUE_LIMIT,
};
use std::fmt::Write as _;

/// Render the full text report
///
/// **Public** - main entry point for report generation
///
/// An empty analysis renders a short report stating that no entries were
/// found; emptiness is an outcome, not an error.
pub fn render_report(analysis: &Analysis) -> String {
    let mut out = String::new();

    render_header(&mut out, analysis);

    if analysis.total_events == 0 {
        let _ = writeln!(out, "No entries found.");
        let _ = writeln!(out);
        render_footer(&mut out);
        return out;
    }

    render_pairs(&mut out, analysis);
    render_pair_groups(&mut out, analysis);
    render_changes(&mut out, analysis);
    render_timeline(&mut out, analysis);
    render_changes_only(&mut out, analysis);
    render_final_state(&mut out, analysis);
    render_read_before_write(&mut out, analysis);
    render_device_controlled(&mut out, analysis);
    render_footer(&mut out);

    out
}

fn hex(value: u64) -> String {
    format!("{value:#X}")
}

fn rule(out: &mut String, ch: char) {
    let _ = writeln!(out, "{}", ch.to_string().repeat(REPORT_RULE_WIDTH));
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    rule(out, '=');
    let _ = writeln!(out, "{title}");
    rule(out, '=');
}

fn render_header(out: &mut String, analysis: &Analysis) {
    rule(out, '=');
    let _ = writeln!(out, "REGISTER TRACE ANALYSIS");
    rule(out, '=');
    let _ = writeln!(out);
    let _ = writeln!(out, "Source: {}", analysis.source);
    let _ = writeln!(out, "Total operations in trace: {}", analysis.total_events);
    let _ = writeln!(out, "Unique offsets accessed: {}", analysis.observed_offsets.len());
    let _ = writeln!(
        out,
        "Index offset: {}  Data offset: {}",
        hex(analysis.index_offset),
        hex(analysis.data_offset)
    );
    let _ = writeln!(out, "Total index/data pairs: {}", analysis.pairs.len());
    let _ = writeln!(out, "Unpaired data writes: {}", analysis.unpaired_data_writes);
    let _ = writeln!(out);

    if !analysis.observed_offsets.is_empty() {
        let offsets: Vec<String> = analysis.observed_offsets.iter().map(|&o| hex(o)).collect();
        let _ = writeln!(out, "Offsets found: {}", offsets.join(", "));
        let _ = writeln!(out);
    }
}

fn render_pairs(out: &mut String, analysis: &Analysis) {
    section(out, "SECTION 1: REGISTER SELECT AND DATA PAIRS");
    let _ = writeln!(out, "Every data write observed under an established register select.");
    let _ = writeln!(out, "'*' marks writes that changed the value of the selected register.");
    let _ = writeln!(out);

    let _ = writeln!(out, "{:<6} {:<16} {:<16} {:<10}", "#", "Register", "Data", "Changed");
    let _ = writeln!(out, "{}", "-".repeat(50));

    for (idx, pair) in analysis.pairs.iter().enumerate() {
        let marker = if pair.data_changed { "*" } else { "" };
        let _ = writeln!(
            out,
            "{:<6} {:<16} {:<16} {}",
            idx + 1,
            hex(pair.reg_select),
            hex(pair.data_value),
            marker
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total pairs: {}", analysis.pairs.len());
}

fn render_pair_groups(out: &mut String, analysis: &Analysis) {
    section(out, "SECTION 2: UNIQUE REGISTER/DATA COMBINATIONS");
    let _ = writeln!(out, "Groups all data values written for each register select value.");

    for group in &analysis.pair_groups {
        let _ = writeln!(out);
        let _ = writeln!(out, "Register {}:", hex(group.reg_select));
        let _ = write!(
            out,
            "  Data values written ({} unique): ",
            group.data_values.len()
        );
        let _ = writeln!(out, "{}", elided_values(&group.data_values, PAIR_VALUE_LIMIT));
    }

    if analysis.pair_groups.is_empty() {
        let _ = writeln!(out, "  (None found)");
    }
}

fn render_changes(out: &mut String, analysis: &Analysis) {
    section(out, "SECTION 3: VALUE CHANGES FOR EACH OFFSET");
    let _ = writeln!(out, "Shows the sequence of value changes for each offset.");

    let mut any = false;
    for entry in &analysis.changes {
        if entry.changes.is_empty() {
            continue;
        }
        any = true;

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "-".repeat(60));
        let _ = writeln!(
            out,
            "OFFSET {} - {} value changes",
            hex(entry.offset),
            entry.changes.len()
        );
        let _ = writeln!(out, "{}", "-".repeat(60));

        let _ = writeln!(out, "Value sequence (in order of change):");
        let values: Vec<u64> = entry.changes.iter().map(|c| c.new_value).collect();
        for row in values.chunks(CHANGE_SEQUENCE_ROW) {
            let joined: Vec<String> = row.iter().map(|&v| hex(v)).collect();
            let _ = writeln!(out, "  {}", joined.join(" -> "));
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Unique values ({}): {}",
            entry.unique_values.len(),
            elided_values(&entry.unique_values, UNIQUE_VALUE_LIMIT)
        );
    }

    if !any {
        let _ = writeln!(out);
        let _ = writeln!(out, "  (None found)");
    }
}

fn render_timeline(out: &mut String, analysis: &Analysis) {
    section(out, "SECTION 4: FULL TIMELINE");
    let _ = writeln!(out, "Complete trace with '>>>' marking value changes.");
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "    {:<7} {:<6} {:<10} {:<14} {:<30}",
        "#", "Op", "Offset", "Value", "Change"
    );
    let _ = writeln!(out, "{}", "-".repeat(70));

    for entry in &analysis.timeline {
        let marker = if entry.changed { ">>>" } else { "   " };
        let change_str = if entry.changed {
            match entry.previous {
                Some(old) => format!("{} -> {}", hex(old), hex(entry.value)),
                None => format!("(new) -> {}", hex(entry.value)),
            }
        } else {
            String::new()
        };

        let _ = writeln!(
            out,
            "{} {:<7} {:<6} {:<10} {:<14} {}",
            marker,
            entry.sequence_index,
            entry.operation.to_string(),
            hex(entry.offset),
            hex(entry.value),
            change_str
        );
    }
}

fn render_changes_only(out: &mut String, analysis: &Analysis) {
    section(out, "SECTION 5: CHANGES ONLY (COMPACT VIEW)");
    let _ = writeln!(out, "Only shows events where a value actually changed.");
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<7} {:<10} {:<14} {:<14}",
        "#", "Offset", "Old Value", "New Value"
    );
    let _ = writeln!(out, "{}", "-".repeat(50));

    for entry in analysis.timeline.iter().filter(|e| e.changed) {
        let old_str = entry.previous.map(hex).unwrap_or_else(|| "(none)".to_string());
        let _ = writeln!(
            out,
            "{:<7} {:<10} {:<14} {:<14}",
            entry.sequence_index,
            hex(entry.offset),
            old_str,
            hex(entry.value)
        );
    }
}

fn render_final_state(out: &mut String, analysis: &Analysis) {
    section(out, "SECTION 6: FINAL STATE OF ALL OFFSETS");
    let _ = writeln!(out, "The last known value for each offset at end of trace.");
    let _ = writeln!(out);

    let _ = writeln!(out, "{:<12} {:<16}", "Offset", "Final Value");
    let _ = writeln!(out, "{}", "-".repeat(30));

    for fv in &analysis.final_values {
        let _ = writeln!(out, "{:<12} {:<16}", hex(fv.offset), hex(fv.value));
    }
}

fn render_read_before_write(out: &mut String, analysis: &Analysis) {
    section(out, "SECTION 7: REGISTERS READ BEFORE WRITE (NEED INITIAL VALUES)");

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "-".repeat(REPORT_RULE_WIDTH));
    let _ = writeln!(
        out,
        "INDEXED REGISTERS (selected via {}, accessed via {})",
        hex(analysis.index_offset),
        hex(analysis.data_offset)
    );
    let _ = writeln!(out, "{}", "-".repeat(REPORT_RULE_WIDTH));
    let _ = writeln!(out, "{:<18} {:<22} {:<10}", "Register", "Initial Value", "Seq");
    let _ = writeln!(out, "{}", "-".repeat(55));

    for record in &analysis.read_before_write.indexed {
        let _ = writeln!(
            out,
            "{:<18} {:<22} {}",
            hex(record.key),
            hex(record.value),
            record.sequence_index
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total: {} indexed registers",
        analysis.read_before_write.indexed.len()
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "-".repeat(REPORT_RULE_WIDTH));
    let _ = writeln!(out, "DIRECT REGISTERS");
    let _ = writeln!(out, "{}", "-".repeat(REPORT_RULE_WIDTH));
    let _ = writeln!(out, "{:<18} {:<22} {:<10}", "Offset", "Initial Value", "Seq");
    let _ = writeln!(out, "{}", "-".repeat(55));

    for record in &analysis.read_before_write.direct {
        let _ = writeln!(
            out,
            "{:<18} {:<22} {}",
            hex(record.key),
            hex(record.value),
            record.sequence_index
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total: {} direct registers",
        analysis.read_before_write.direct.len()
    );
}

fn render_device_controlled(out: &mut String, analysis: &Analysis) {
    section(out, "SECTION 8: DEVICE-CONTROLLED REGISTERS");
    let _ = writeln!(out, "These registers change value between reads without any write");
    let _ = writeln!(out, "in between; the device itself is changing the value.");

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "-".repeat(REPORT_RULE_WIDTH));
    let _ = writeln!(out, "INDEXED REGISTERS");
    let _ = writeln!(out, "{}", "-".repeat(REPORT_RULE_WIDTH));
    render_device_summaries(out, &analysis.device_controlled.indexed, "Register");

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "-".repeat(REPORT_RULE_WIDTH));
    let _ = writeln!(out, "DIRECT REGISTERS");
    let _ = writeln!(out, "{}", "-".repeat(REPORT_RULE_WIDTH));
    render_device_summaries(out, &analysis.device_controlled.direct, "Offset");
}

fn render_device_summaries(out: &mut String, summaries: &[DeviceControlledSummary], label: &str) {
    if summaries.is_empty() {
        let _ = writeln!(out, "  (None found)");
        return;
    }

    for summary in summaries {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} {}:", label, hex(summary.key));
        let _ = writeln!(out, "  Total changes: {}", summary.change_count);

        let values: Vec<String> = summary.observed_values.iter().map(|&v| hex(v)).collect();
        let _ = writeln!(out, "  Values observed: {}", values.join(", "));

        let _ = writeln!(out, "  Change sequence:");
        for change in summary.changes.iter().take(DEVICE_CHANGE_EXCERPT) {
            let _ = writeln!(
                out,
                "    Seq {:>5}: {} -> {}",
                change.sequence_index,
                hex(change.old_value),
                hex(change.new_value)
            );
        }
        if summary.changes.len() > DEVICE_CHANGE_EXCERPT {
            let _ = writeln!(
                out,
                "    ... and {} more changes",
                summary.changes.len() - DEVICE_CHANGE_EXCERPT
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total: {} registers with device-controlled changes",
        summaries.len()
    );
}

fn render_footer(out: &mut String) {
    let _ = writeln!(out);
    rule(out, '=');
    let _ = writeln!(out, "END OF REPORT");
    rule(out, '=');
}

/// Format a value list with overflow elision
fn elided_values(values: &[u64], limit: usize) -> String {
    let shown: Vec<String> = values.iter().take(limit).map(|&v| hex(v)).collect();
    if values.len() > limit {
        format!("{} ... and {} more", shown.join(", "), values.len() - limit)
    } else {
        shown.join(", ")
    }
}
