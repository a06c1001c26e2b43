use clap::{Parser, Subcommand};
use galley_kernel::DEFAULT_SAMPLE_LIMIT;

#[derive(Parser)]
#[command(
    name = "galley",
    about = "Galley: prove every rewritten paragraph landed intact, exactly once",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify the placement log against the rewrite table (release gate)
    Verify {
        /// Path to the rewrite table JSON
        #[arg(long, default_value = "artifacts/rewrites.json")]
        rewrites: String,

        /// Path to the placement log CSV
        #[arg(long, default_value = "artifacts/placement_log.csv")]
        placements: String,

        /// Path for the report artifact (always written, pass or fail)
        #[arg(long, default_value = "artifacts/verification/latest.json")]
        report: String,

        /// Samples kept per failing category
        #[arg(long, default_value_t = DEFAULT_SAMPLE_LIMIT)]
        sample_limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize and fingerprint text (reference for the placement side)
    Fingerprint {
        /// Text to fingerprint; omit to use --file
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(long, conflicts_with = "text")]
        file: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a rewrite decomposes into list items and layer blocks
    Split {
        /// Rewrite text
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
