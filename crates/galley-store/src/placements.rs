//! Placement-log loading.
//!
//! The placement step appends one CSV row per physical placement site.
//! Required columns are validated against the header before any row is
//! parsed: a missing column is a pipeline contract break, reported
//! immediately, not a per-row data issue. Malformed row values (unknown
//! match type, unparseable fingerprint) also reject the invocation; the
//! log writer is a machine and a machine that emits garbage cannot be
//! verified against.

use crate::error::StoreError;
use galley_kernel::{MatchType, PlacementObservation};
use std::path::Path;

pub const COL_PARAGRAPH_ID: &str = "paragraph_id";
pub const COL_OBSERVED_FINGERPRINT: &str = "observed_fingerprint";
pub const COL_MATCH_TYPE: &str = "match_type";
pub const COL_COMPANION_PARAGRAPH_ID: &str = "companion_paragraph_id";

const REQUIRED_COLUMNS: &[&str] = &[COL_PARAGRAPH_ID, COL_OBSERVED_FINGERPRINT, COL_MATCH_TYPE];

/// Load every observation row from the placement log.
pub fn load_placement_log(path: impl AsRef<Path>) -> Result<Vec<PlacementObservation>, StoreError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| StoreError::io(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| StoreError::parse(path, e))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    for required in REQUIRED_COLUMNS {
        if column(required).is_none() {
            return Err(StoreError::MissingColumn {
                path: path.display().to_string(),
                column: (*required).to_string(),
            });
        }
    }

    let paragraph_id_at = column(COL_PARAGRAPH_ID).expect("validated above");
    let fingerprint_at = column(COL_OBSERVED_FINGERPRINT).expect("validated above");
    let match_type_at = column(COL_MATCH_TYPE).expect("validated above");
    let companion_at = column(COL_COMPANION_PARAGRAPH_ID);

    let mut observations = Vec::new();
    for (index, result) in reader.records().enumerate() {
        // Header occupies row 1.
        let row = index + 2;
        let record = result.map_err(|e| StoreError::row(path, row, e))?;
        let field = |at: usize| record.get(at).unwrap_or("").to_string();

        let paragraph_id = field(paragraph_id_at);
        if paragraph_id.is_empty() {
            return Err(StoreError::row(path, row, "empty paragraph_id"));
        }

        let observed_fingerprint = field(fingerprint_at)
            .parse()
            .map_err(|e| StoreError::row(path, row, e))?;

        let match_type = match field(match_type_at).as_str() {
            "exact" => MatchType::Exact,
            "fuzzy" => MatchType::Fuzzy,
            other => {
                return Err(StoreError::row(
                    path,
                    row,
                    format!("unknown match_type `{other}` (expected `exact` or `fuzzy`)"),
                ));
            }
        };

        let companion_paragraph_id = companion_at
            .map(|at| field(at))
            .filter(|value| !value.is_empty());

        observations.push(PlacementObservation {
            paragraph_id,
            observed_fingerprint,
            match_type,
            companion_paragraph_id,
        });
    }

    Ok(observations)
}
