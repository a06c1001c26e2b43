use galley_kernel::{PlacementObservation, SampleBlock};
use galley_store::{RewriteTable, load_placement_log, load_rewrite_table};

pub fn load_rewrite_table_or_exit(path: &str) -> RewriteTable {
    load_rewrite_table(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(2);
    })
}

pub fn load_placement_log_or_exit(path: &str) -> Vec<PlacementObservation> {
    load_placement_log(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(2);
    })
}

pub fn print_sample_block(header: &str, block: &SampleBlock) {
    if block.samples.is_empty() {
        return;
    }

    println!("  {header} (showing up to {}):", block.samples.len());
    for finding in &block.samples {
        println!("    - {}: {}", finding.paragraph_id, finding.message);
        if let Some(detail) = &finding.detail {
            println!("      {detail}");
        }
    }
    if block.truncated > 0 {
        println!("    - ... and {} more", block.truncated);
    }
}
