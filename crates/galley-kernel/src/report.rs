//! Aggregation of reconciliation findings into the release-gate report.
//!
//! The report is binary: a batch is accepted only when every failing
//! category is empty. There is no "mostly passed". Failing categories
//! carry bounded samples so a human can triage every problem from one
//! run.

use crate::reconcile::{Finding, Outcome, Reconciliation};
use serde::{Deserialize, Serialize};

/// Samples kept per failing category; the counts are always complete.
pub const DEFAULT_SAMPLE_LIMIT: usize = 10;

/// Identifies this report shape to downstream tooling.
pub const VERIFICATION_CHECK_KIND: &str = "galley.rewrite_application.v1";

/// Per-outcome totals across the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeCounts {
    pub exact_match: usize,
    pub multi_apply_match: usize,
    pub merge_match: usize,
    pub mismatch: usize,
    pub missing_in_source: usize,
    pub fuzzy_rejected: usize,
}

impl OutcomeCounts {
    fn bump(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::ExactMatch => self.exact_match += 1,
            Outcome::MultiApplyMatch => self.multi_apply_match += 1,
            Outcome::MergeMatch => self.merge_match += 1,
            Outcome::Mismatch => self.mismatch += 1,
            Outcome::MissingInSource => self.missing_in_source += 1,
            Outcome::FuzzyRejected => self.fuzzy_rejected += 1,
        }
    }
}

/// Bounded sample of findings in one failing category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleBlock {
    pub samples: Vec<Finding>,
    /// Findings beyond the sample limit; counted, not shown.
    pub truncated: usize,
}

impl SampleBlock {
    fn collect(findings: &[Finding], outcome: Outcome, limit: usize) -> Self {
        let matching: Vec<&Finding> = findings.iter().filter(|f| f.outcome == outcome).collect();
        let truncated = matching.len().saturating_sub(limit);
        Self {
            samples: matching.into_iter().take(limit).cloned().collect(),
            truncated,
        }
    }
}

/// The complete verification verdict for one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub check_kind: String,
    /// "accepted" or "rejected".
    pub result: String,
    /// Distinct paragraph groups examined.
    pub checked: usize,
    pub counts: OutcomeCounts,
    pub mismatch_samples: SampleBlock,
    pub missing_in_source_samples: SampleBlock,
    pub fuzzy_rejected_samples: SampleBlock,
    pub warnings: Vec<String>,
}

impl VerificationReport {
    /// Aggregate a reconciliation into the gate report.
    pub fn from_reconciliation(reconciliation: &Reconciliation, sample_limit: usize) -> Self {
        let mut counts = OutcomeCounts::default();
        for finding in &reconciliation.findings {
            counts.bump(finding.outcome);
        }

        let accepted = reconciliation
            .findings
            .iter()
            .all(|finding| !finding.outcome.is_failure());

        Self {
            check_kind: VERIFICATION_CHECK_KIND.to_string(),
            result: if accepted { "accepted" } else { "rejected" }.to_string(),
            checked: reconciliation.groups,
            mismatch_samples: SampleBlock::collect(
                &reconciliation.findings,
                Outcome::Mismatch,
                sample_limit,
            ),
            missing_in_source_samples: SampleBlock::collect(
                &reconciliation.findings,
                Outcome::MissingInSource,
                sample_limit,
            ),
            fuzzy_rejected_samples: SampleBlock::collect(
                &reconciliation.findings,
                Outcome::FuzzyRejected,
                sample_limit,
            ),
            counts,
            warnings: reconciliation.warnings.clone(),
        }
    }

    /// Whether the batch may be promoted.
    pub fn accepted(&self) -> bool {
        self.result == "accepted"
    }
}
