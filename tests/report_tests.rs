use regtrace::analyzer::{analyze_trace, to_analysis, Analysis, AnalyzerConfig};
use regtrace::parser::parse_trace;
use regtrace::report::{render_report, render_verilog_seed};

fn analyze(text: &str) -> Analysis {
    let config = AnalyzerConfig::default();
    to_analysis(
        "trace.txt",
        &analyze_trace(&parse_trace(text), &config),
        &config,
    )
}

const MIXED_TRACE: &str = "\
Write 0x0 0x5 0x4
Write 0x4 0xa 0x4
Write 0x4 0x14 0x4
Write 0x8 0x1 0x4
Read 0x8 0x1 0x4
Read 0x8 0x2 0x4
Read 0x14 0xdead 0x4
";

#[test]
fn report_summarizes_the_trace() {
    let report = render_report(&analyze(MIXED_TRACE));

    assert!(report.contains("Total operations in trace: 7"));
    assert!(report.contains("Unique offsets accessed: 4"));
    assert!(report.contains("Total index/data pairs: 2"));
    assert!(report.contains("Offsets found: 0x0, 0x4, 0x8, 0x14"));
}

#[test]
fn report_pair_section_groups_by_register_select() {
    let report = render_report(&analyze(MIXED_TRACE));

    assert!(report.contains("Register 0x5:"));
    assert!(report.contains("Data values written (2 unique): 0xA, 0x14"));
}

#[test]
fn report_classification_sections_split_by_scheme() {
    let report = render_report(&analyze(MIXED_TRACE));

    // Direct offset 0x14 was read before any write
    assert!(report.contains("Total: 1 direct registers"));
    // Direct offset 0x8 drifted between reads
    assert!(report.contains("Offset 0x8:"));
    assert!(report.contains("Total changes: 1"));
}

#[test]
fn report_timeline_highlights_changes_only_for_writes() {
    let report = render_report(&analyze(MIXED_TRACE));

    // Read of 0x8 returning a drifted value is not a timeline change
    let timeline_start = report.find("SECTION 4").unwrap();
    let timeline_end = report.find("SECTION 5").unwrap();
    let timeline = &report[timeline_start..timeline_end];

    let marked: Vec<&str> = timeline
        .lines()
        .filter(|l| l.starts_with(">>>"))
        .collect();
    assert_eq!(marked.len(), 4); // the four writes, all first-sight changes
    assert!(marked.iter().all(|l| l.contains("Write")));
}

#[test]
fn empty_report_states_no_entries() {
    let report = render_report(&analyze(""));
    assert!(report.contains("No entries found."));
}

#[test]
fn verilog_seed_covers_both_schemes() {
    let trace = "\
Write 0x0 0x3 0x4
Read 0x4 0xbeef 0x4
Read 0x14 0xdead 0x4
";
    let seed = render_verilog_seed(&analyze(trace));

    assert!(seed.contains("data_reg_3"));
    assert!(seed.contains("32'h0000BEEF"));
    assert!(seed.contains("reg_14"));
    assert!(seed.contains("32'h0000DEAD"));
}

#[test]
fn verilog_flags_device_controlled_registers() {
    let trace = "\
Write 0x8 0x1 0x4
Read 0x8 0x1 0x4
Read 0x8 0x2 0x4
Read 0x8 0x1 0x4
";
    let seed = render_verilog_seed(&analyze(trace));
    assert!(seed.contains("// Offset 0x8: toggles between 0x1, 0x2"));
}
