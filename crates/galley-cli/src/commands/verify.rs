use crate::support::{load_placement_log_or_exit, load_rewrite_table_or_exit, print_sample_block};
use galley_kernel::{VerificationReport, reconcile};
use galley_store::{ReportArtifact, write_report_artifact};

pub fn run(
    rewrites: String,
    placements: String,
    report_path: String,
    sample_limit: usize,
    json_output: bool,
) {
    let table = load_rewrite_table_or_exit(&rewrites);
    let observations = load_placement_log_or_exit(&placements);

    let reconciliation = reconcile(&table.records, &observations);
    let report = VerificationReport::from_reconciliation(&reconciliation, sample_limit);

    // The artifact is written before the verdict is acted on: a rejected
    // batch still leaves a complete report for triage.
    let artifact = ReportArtifact::new(
        rewrites.clone(),
        placements.clone(),
        table.snapshot_ref.clone(),
        report.clone(),
    );
    write_report_artifact(&report_path, &artifact).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(2);
    });

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&artifact).expect("json serialization")
        );
    } else {
        print_human_summary(&artifact, &report_path, table.records.len(), observations.len());
    }

    if !report.accepted() {
        std::process::exit(1);
    }
}

fn print_human_summary(
    artifact: &ReportArtifact,
    report_path: &str,
    paragraph_count: usize,
    observation_count: usize,
) {
    let report = &artifact.report;

    println!("galley verify");
    println!("  Rewrites: {} ({paragraph_count} paragraphs)", artifact.rewrites_path);
    println!("  Snapshot: {}", artifact.rewrites_snapshot_ref);
    println!(
        "  Placements: {} ({observation_count} observations)",
        artifact.placements_path
    );
    println!("  Result: {}", report.result);
    println!("  Checked: {} paragraph groups", report.checked);
    println!("  Exact: {}", report.counts.exact_match);
    println!("  Multi-apply: {}", report.counts.multi_apply_match);
    println!("  Merge: {}", report.counts.merge_match);
    println!("  Mismatch: {}", report.counts.mismatch);
    println!("  Missing in source: {}", report.counts.missing_in_source);
    println!("  Fuzzy rejected: {}", report.counts.fuzzy_rejected);

    print_sample_block("Mismatches", &report.mismatch_samples);
    print_sample_block("Missing in source", &report.missing_in_source_samples);
    print_sample_block("Fuzzy rejected", &report.fuzzy_rejected_samples);

    if !report.warnings.is_empty() {
        println!("  Warnings:");
        for warning in &report.warnings {
            println!("    - {warning}");
        }
    }

    println!("  Report: {report_path}");
}
