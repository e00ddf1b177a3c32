//! End-to-end checks of the analysis contract, from trace text to
//! recorded views.

use pretty_assertions::assert_eq;
use regtrace::analyzer::{analyze_trace, AnalyzerConfig, TraceAnalysis};
use regtrace::parser::parse_trace;

fn analyze(text: &str) -> TraceAnalysis {
    analyze_trace(&parse_trace(text), &AnalyzerConfig::default())
}

#[test]
fn timeline_has_one_entry_per_event() {
    let analysis = analyze(
        "Write 0x0 0x5 0x4\nWrite 0x4 0xa 0x4\nRead 0x8 0x1 0x4\nRead 0x4 0xb 0x4\n",
    );
    assert_eq!(analysis.timeline.len(), 4);
    assert_eq!(analysis.total_events, 4);
}

#[test]
fn pairing_contract_example() {
    // Idx<-5, Data<-10, Data<-10, Idx<-6, Data<-20
    let analysis = analyze(
        "Write 0x0 0x5 0x4\nWrite 0x4 0xa 0x4\nWrite 0x4 0xa 0x4\nWrite 0x0 0x6 0x4\nWrite 0x4 0x14 0x4\n",
    );

    let pairs: Vec<(u64, u64, bool)> = analysis
        .pairs
        .iter()
        .map(|p| (p.reg_select, p.data_value, p.data_changed))
        .collect();
    assert_eq!(pairs, vec![(5, 10, true), (5, 10, false), (6, 20, true)]);
}

#[test]
fn pair_change_is_tracked_per_register() {
    // The same data value is written to two different register selects;
    // each is a first sight for its own key.
    let analysis = analyze(
        "Write 0x0 0x5 0x4\nWrite 0x4 0xa 0x4\nWrite 0x0 0x6 0x4\nWrite 0x4 0xa 0x4\n",
    );

    assert_eq!(analysis.pairs.len(), 2);
    assert!(analysis.pairs[0].data_changed);
    assert!(analysis.pairs[1].data_changed);
}

#[test]
fn read_before_write_scenario() {
    // Offset 0x8 is never written, so its first read needs a seed value
    let analysis = analyze("Read 0x8 0x1 0x4\n");

    assert_eq!(analysis.read_before_write_direct.len(), 1);
    assert_eq!(analysis.read_before_write_direct[0].key, 0x8);
    assert_eq!(analysis.read_before_write_direct[0].value, 0x1);
    assert_eq!(analysis.read_before_write_direct[0].sequence_index, 0);
    assert!(analysis.changes.is_empty());
    assert!(analysis.device_controlled_direct.is_empty());
}

#[test]
fn device_controlled_scenario() {
    let analysis = analyze("Write 0x8 0x1 0x4\nRead 0x8 0x1 0x4\nRead 0x8 0x2 0x4\n");

    assert_eq!(analysis.device_controlled_direct.len(), 1);
    let record = analysis.device_controlled_direct[0];
    assert_eq!(record.key, 0x8);
    assert_eq!(record.old_value, 0x1);
    assert_eq!(record.new_value, 0x2);
    assert!(analysis.read_before_write_direct.is_empty());
}

#[test]
fn device_window_is_bounded_by_reads_of_the_same_key() {
    // A write to a *different* offset does not close 0x8's window
    let analysis = analyze(
        "Write 0x8 0x1 0x4\nRead 0x8 0x1 0x4\nWrite 0xc 0xff 0x4\nRead 0x8 0x2 0x4\n",
    );
    assert_eq!(analysis.device_controlled_direct.len(), 1);

    // But a write to 0x8 itself does
    let analysis = analyze(
        "Write 0x8 0x1 0x4\nRead 0x8 0x1 0x4\nWrite 0x8 0x2 0x4\nRead 0x8 0x2 0x4\n",
    );
    assert!(analysis.device_controlled_direct.is_empty());
}

#[test]
fn read_before_write_is_reported_once_per_key() {
    let analysis = analyze("Read 0x8 0x1 0x4\nRead 0x8 0x1 0x4\nRead 0x8 0x3 0x4\n");
    assert_eq!(analysis.read_before_write_direct.len(), 1);
}

#[test]
fn index_selection_is_last_write_wins() {
    // Two index writes in a row; only the second pairs
    let analysis = analyze(
        "Write 0x0 0x5 0x4\nWrite 0x0 0x6 0x4\nWrite 0x4 0xa 0x4\n",
    );
    assert_eq!(analysis.pairs.len(), 1);
    assert_eq!(analysis.pairs[0].reg_select, 6);
}

#[test]
fn unpaired_data_writes_are_counted() {
    let analysis = analyze("Write 0x4 0xa 0x4\nWrite 0x0 0x5 0x4\nWrite 0x4 0xb 0x4\n");
    assert_eq!(analysis.unpaired_data_writes, 1);
    assert_eq!(analysis.pairs.len(), 1);
}

#[test]
fn indexed_classification_uses_register_select_keys() {
    let analysis = analyze(
        "Write 0x0 0x7 0x4\nRead 0x4 0xaa 0x4\nRead 0x4 0xbb 0x4\n",
    );

    assert_eq!(analysis.read_before_write_indexed.len(), 1);
    assert_eq!(analysis.read_before_write_indexed[0].key, 0x7);
    assert_eq!(analysis.read_before_write_indexed[0].value, 0xaa);

    assert_eq!(analysis.device_controlled_indexed.len(), 1);
    assert_eq!(analysis.device_controlled_indexed[0].old_value, 0xaa);
    assert_eq!(analysis.device_controlled_indexed[0].new_value, 0xbb);
}

#[test]
fn change_sequences_contain_only_real_changes() {
    let analysis = analyze(
        "Write 0x8 0x1 0x4\nWrite 0x8 0x1 0x4\nWrite 0x8 0x2 0x4\nWrite 0x8 0x1 0x4\n",
    );

    let changes = &analysis.changes[&0x8];
    let sequence: Vec<u64> = changes.iter().map(|c| c.new_value).collect();
    assert_eq!(sequence, vec![0x1, 0x2, 0x1]);
    assert_eq!(changes[0].old_value, None);
    assert_eq!(changes[1].old_value, Some(0x1));
}

#[test]
fn empty_trace_produces_empty_views() {
    let analysis = analyze("");

    assert_eq!(analysis.total_events, 0);
    assert!(analysis.timeline.is_empty());
    assert!(analysis.changes.is_empty());
    assert!(analysis.pairs.is_empty());
    assert!(analysis.read_before_write_indexed.is_empty());
    assert!(analysis.read_before_write_direct.is_empty());
    assert!(analysis.device_controlled_indexed.is_empty());
    assert!(analysis.device_controlled_direct.is_empty());
}

#[test]
fn access_width_does_not_affect_classification() {
    // Same trace, mixed widths: identical findings
    let narrow = analyze("Write 0x8 0x1 0x1\nRead 0x8 0x1 0x1\nRead 0x8 0x2 0x1\n");
    let wide = analyze("Write 0x8 0x1 0x4\nRead 0x8 0x1 0x4\nRead 0x8 0x2 0x4\n");

    assert_eq!(
        narrow.device_controlled_direct,
        wide.device_controlled_direct
    );
    assert_eq!(narrow.changes, wide.changes);
}

#[test]
fn read_before_write_lists_are_sorted_by_key() {
    let analysis = analyze("Read 0x18 0x0 0x4\nRead 0x8 0x0 0x4\nRead 0xc 0x0 0x4\n");
    let keys: Vec<u64> = analysis
        .read_before_write_direct
        .iter()
        .map(|r| r.key)
        .collect();
    assert_eq!(keys, vec![0x8, 0xc, 0x18]);
}
