//! Integration tests: run full verification vectors end to end.
//!
//! Each fixture in tests/fixtures/ has:
//! - rewrites.json: the source-of-truth rewrite table
//! - placements.csv: the placement log
//! - expect.json: the expected verification report
//!
//! These tests load both inputs through the store layer, reconcile them
//! through the kernel, and compare the aggregated report to the expected
//! output, fingerprints included.

use galley_kernel::{DEFAULT_SAMPLE_LIMIT, VerificationReport, reconcile};
use galley_store::{load_placement_log, load_rewrite_table};
use serde_json::Value;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);

    let table = load_rewrite_table(dir.join("rewrites.json"))
        .unwrap_or_else(|e| panic!("failed to load rewrite table for {name}: {e}"));
    let observations = load_placement_log(dir.join("placements.csv"))
        .unwrap_or_else(|e| panic!("failed to load placement log for {name}: {e}"));

    let reconciliation = reconcile(&table.records, &observations);
    let report = VerificationReport::from_reconciliation(&reconciliation, DEFAULT_SAMPLE_LIMIT);
    let report_json = serde_json::to_value(&report).expect("failed to serialize report");

    let expect_path = dir.join("expect.json");
    let expect_str = std::fs::read_to_string(&expect_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", expect_path.display()));
    let expected: Value = serde_json::from_str(&expect_str)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", expect_path.display()));

    assert_eq!(
        report_json,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n",
        serde_json::to_string_pretty(&report_json).unwrap(),
        serde_json::to_string_pretty(&expected).unwrap(),
    );
}

#[test]
fn golden_clean_batch() {
    run_fixture("golden_clean_batch");
}

#[test]
fn adversarial_mixed_failures() {
    run_fixture("adversarial_mixed_failures");
}
