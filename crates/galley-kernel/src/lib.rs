//! # Galley Kernel
//!
//! The verification core of the galley pipeline: after rewritten text has
//! been placed back into a layout document, this crate proves that every
//! rewritten paragraph landed in the right place, intact, exactly once.
//!
//! The kernel is **pure**: all inputs arrive in memory, all results leave
//! as values. File formats, process exit codes, and timestamps belong to
//! the store and CLI layers.
//!
//! ## Architecture
//!
//! ```text
//! normalize       <- canonical text form, stable under formatting noise
//!     |
//! fingerprint     <- (normalized length, FNV-1a hash) identity key
//!     |
//! decompose       <- list splitting, layer blocks, merge reconstruction
//!     |
//! reconcile       <- per-paragraph classification of placement outcomes
//!     |
//! report          <- counts, bounded samples, accept/reject verdict
//! ```

pub mod decompose;
pub mod fingerprint;
pub mod normalize;
pub mod reconcile;
pub mod report;

pub use decompose::{
    LAYER_MARKERS, merge_is_uncharted, merge_rewrites, split_layer_blocks, split_list_items,
};
pub use fingerprint::{Fingerprint, FingerprintParseError, fingerprint, fnv1a_32};
pub use normalize::normalize;
pub use reconcile::{
    Finding, MatchType, Outcome, PlacementObservation, Reconciliation, RewriteRecord, reconcile,
};
pub use report::{DEFAULT_SAMPLE_LIMIT, OutcomeCounts, SampleBlock, VerificationReport};
