//! Store layer for the galley verifier.
//!
//! Everything that touches the filesystem lives here: the rewrite-table
//! JSON loader, the placement-log CSV loader, and the report artifact
//! writer. Input-contract violations (missing files, missing columns,
//! malformed rows) surface as [`StoreError`] before any verification
//! logic runs; they are never verification findings.

mod error;
mod placements;
mod report_io;
mod rewrites;

pub use error::StoreError;
pub use placements::{
    COL_COMPANION_PARAGRAPH_ID, COL_MATCH_TYPE, COL_OBSERVED_FINGERPRINT, COL_PARAGRAPH_ID,
    load_placement_log,
};
pub use report_io::{REPORT_SCHEMA, ReportArtifact, write_report_artifact};
pub use rewrites::{RewriteTable, load_rewrite_table};
