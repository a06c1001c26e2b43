//! Report artifact persistence.
//!
//! The artifact is always written in full, pass or fail, so downstream
//! tooling and humans can inspect every finding without re-running the
//! batch. Writes go through a tmp-file/rename sequence: a crashed run
//! leaves either the previous artifact or none, never a torn one.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use galley_kernel::VerificationReport;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Artifact schema version.
pub const REPORT_SCHEMA: u32 = 1;

/// The persisted envelope around a [`VerificationReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportArtifact {
    pub schema: u32,
    pub generated_at: DateTime<Utc>,
    pub rewrites_path: String,
    pub placements_path: String,
    pub rewrites_snapshot_ref: String,
    pub report: VerificationReport,
}

impl ReportArtifact {
    pub fn new(
        rewrites_path: impl Into<String>,
        placements_path: impl Into<String>,
        rewrites_snapshot_ref: impl Into<String>,
        report: VerificationReport,
    ) -> Self {
        Self {
            schema: REPORT_SCHEMA,
            generated_at: Utc::now(),
            rewrites_path: rewrites_path.into(),
            placements_path: placements_path.into(),
            rewrites_snapshot_ref: rewrites_snapshot_ref.into(),
            report,
        }
    }
}

/// Write the artifact atomically (tmp file, fsync, rename, dir fsync).
pub fn write_report_artifact(
    path: impl AsRef<Path>,
    artifact: &ReportArtifact,
) -> Result<(), StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
    }

    let rendered =
        serde_json::to_vec_pretty(artifact).map_err(|e| StoreError::write(path, e))?;

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), StoreError> {
        let mut file = File::create(&tmp_path).map_err(|e| StoreError::write(&tmp_path, e))?;
        file.write_all(&rendered)
            .map_err(|e| StoreError::write(&tmp_path, e))?;
        file.write_all(b"\n")
            .map_err(|e| StoreError::write(&tmp_path, e))?;
        file.sync_all().map_err(|e| StoreError::write(&tmp_path, e))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::write(path, e)
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let dir = File::open(parent).map_err(|e| StoreError::write(parent, e))?;
        dir.sync_all().map_err(|e| StoreError::write(parent, e))?;
    }

    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galley_kernel::{DEFAULT_SAMPLE_LIMIT, Reconciliation};
    use std::path::PathBuf;

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "galley-report-{prefix}-{}-{unique}.json",
            std::process::id()
        ))
    }

    fn empty_report() -> VerificationReport {
        VerificationReport::from_reconciliation(&Reconciliation::default(), DEFAULT_SAMPLE_LIMIT)
    }

    #[test]
    fn writes_and_replaces_atomically() {
        let path = temp_path("atomic");

        let first = ReportArtifact::new("a.json", "a.csv", "rewrites:sha256:aa", empty_report());
        write_report_artifact(&path, &first).expect("first write should succeed");

        let second = ReportArtifact::new("b.json", "b.csv", "rewrites:sha256:bb", empty_report());
        write_report_artifact(&path, &second).expect("second write should succeed");

        let contents = std::fs::read_to_string(&path).expect("artifact should exist");
        assert!(!contents.contains("rewrites:sha256:aa"));
        assert!(contents.contains("rewrites:sha256:bb"));

        let parsed: ReportArtifact =
            serde_json::from_str(&contents).expect("artifact should parse back");
        assert_eq!(parsed.schema, REPORT_SCHEMA);
        assert_eq!(parsed.placements_path, "b.csv");

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = temp_path("nested-dir");
        let path = dir.join("artifacts").join("latest.json");

        let artifact = ReportArtifact::new("r.json", "p.csv", "rewrites:sha256:cc", empty_report());
        write_report_artifact(&path, &artifact).expect("nested write should succeed");
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(dir);
    }
}
