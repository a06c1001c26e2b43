//! Rewrite-table loading.
//!
//! The source of truth: a JSON document keyed by `paragraphs`, one entry
//! per approved rewrite. Paragraph ids must be unique within a batch;
//! a duplicate means the upstream rewrite step misbehaved and the whole
//! invocation is rejected.

use crate::error::StoreError;
use galley_kernel::RewriteRecord;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

const SNAPSHOT_REF_PREFIX: &str = "rewrites:sha256:";

#[derive(Debug, Deserialize)]
struct RewriteTableDoc {
    paragraphs: Vec<RewriteRecord>,
}

/// The loaded rewrite table, indexed by paragraph id.
#[derive(Debug, Clone)]
pub struct RewriteTable {
    pub records: BTreeMap<String, RewriteRecord>,
    /// Content digest of the table file, recorded in the report artifact
    /// so a verdict can be tied to the exact input it judged.
    pub snapshot_ref: String,
}

/// Load and index the rewrite table.
pub fn load_rewrite_table(path: impl AsRef<Path>) -> Result<RewriteTable, StoreError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| StoreError::io(path, e))?;

    let doc: RewriteTableDoc =
        serde_json::from_slice(&bytes).map_err(|e| StoreError::parse(path, e))?;

    let mut records = BTreeMap::new();
    for record in doc.paragraphs {
        let id = record.paragraph_id.clone();
        if records.insert(id.clone(), record).is_some() {
            return Err(StoreError::DuplicateParagraph {
                path: path.display().to_string(),
                paragraph_id: id,
            });
        }
    }

    let snapshot_ref = format!("{SNAPSHOT_REF_PREFIX}{:x}", Sha256::digest(&bytes));
    Ok(RewriteTable {
        records,
        snapshot_ref,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "galley-rewrites-{prefix}-{}-{unique}.json",
            std::process::id()
        ))
    }

    #[test]
    fn loads_and_indexes_by_paragraph_id() {
        let path = temp_path("ok");
        std::fs::write(
            &path,
            r#"{"paragraphs": [
                {"paragraph_id": "p1", "rewritten_text": "Hello world."},
                {"paragraph_id": "p2", "rewritten_text": "a; b; c;"}
            ]}"#,
        )
        .expect("fixture should write");

        let table = load_rewrite_table(&path).expect("table should load");
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records["p1"].rewritten_text, "Hello world.");
        assert!(table.snapshot_ref.starts_with("rewrites:sha256:"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn duplicate_paragraph_id_is_a_contract_error() {
        let path = temp_path("dup");
        std::fs::write(
            &path,
            r#"{"paragraphs": [
                {"paragraph_id": "p1", "rewritten_text": "one"},
                {"paragraph_id": "p1", "rewritten_text": "two"}
            ]}"#,
        )
        .expect("fixture should write");

        match load_rewrite_table(&path) {
            Err(StoreError::DuplicateParagraph { paragraph_id, .. }) => {
                assert_eq!(paragraph_id, "p1");
            }
            other => panic!("expected duplicate-paragraph error, got {other:?}"),
        }

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_and_malformed_json_fail_fast() {
        let missing = temp_path("missing");
        assert!(matches!(
            load_rewrite_table(&missing),
            Err(StoreError::Io { .. })
        ));

        let path = temp_path("bad");
        std::fs::write(&path, "not json").expect("fixture should write");
        assert!(matches!(
            load_rewrite_table(&path),
            Err(StoreError::Parse { .. })
        ));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn snapshot_ref_tracks_content() {
        let a = temp_path("digest-a");
        let b = temp_path("digest-b");
        std::fs::write(&a, r#"{"paragraphs": []}"#).expect("fixture should write");
        std::fs::write(&b, r#"{"paragraphs": [] }"#).expect("fixture should write");

        let ref_a = load_rewrite_table(&a).expect("load").snapshot_ref;
        let ref_b = load_rewrite_table(&b).expect("load").snapshot_ref;
        assert_ne!(ref_a, ref_b);

        let _ = std::fs::remove_file(a);
        let _ = std::fs::remove_file(b);
    }
}
