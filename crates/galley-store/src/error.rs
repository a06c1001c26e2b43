//! Input-contract errors.
//!
//! All of these indicate a broken pipeline invocation, not a flaky read:
//! none are retried, and all abort before verification starts.

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("{path}: missing required column `{column}`")]
    MissingColumn { path: String, column: String },

    #[error("{path} row {row}: {message}")]
    Row {
        path: String,
        row: usize,
        message: String,
    },

    #[error("{path}: duplicate paragraph id `{paragraph_id}`")]
    DuplicateParagraph { path: String, paragraph_id: String },

    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },
}

impl StoreError {
    pub(crate) fn io(path: &Path, err: impl ToString) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(path: &Path, err: impl ToString) -> Self {
        StoreError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn row(path: &Path, row: usize, err: impl ToString) -> Self {
        StoreError::Row {
            path: path.display().to_string(),
            row,
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: &Path, err: impl ToString) -> Self {
        StoreError::Write {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
