//! The verification state machine.
//!
//! One finite pass over the placement observations, grouped by source
//! paragraph identity. Every group reaches exactly one terminal
//! classification; findings accumulate across the whole batch so a single
//! run reports every problem, not just the first.

use crate::decompose::{merge_is_uncharted, merge_rewrites, split_list_items};
use crate::fingerprint::{Fingerprint, fingerprint};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};

/// One unit of approved rewritten text, keyed by paragraph identity.
///
/// Produced upstream by the rewrite step; immutable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRecord {
    pub paragraph_id: String,
    pub rewritten_text: String,
}

/// How the placement step located the anchor for an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Fuzzy,
}

/// One row of the placement log: what text the placement step actually
/// committed at one physical site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementObservation {
    pub paragraph_id: String,
    pub observed_fingerprint: Fingerprint,
    pub match_type: MatchType,
    /// Set when the placement step merged a second source paragraph into
    /// this site.
    pub companion_paragraph_id: Option<String>,
}

/// Terminal classification of one observation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    ExactMatch,
    MultiApplyMatch,
    MergeMatch,
    Mismatch,
    MissingInSource,
    FuzzyRejected,
}

impl Outcome {
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Outcome::Mismatch | Outcome::MissingInSource | Outcome::FuzzyRejected
        )
    }
}

/// One classified result, with enough context for a human to triage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub paragraph_id: String,
    pub outcome: Outcome,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl Finding {
    fn new(
        paragraph_id: &str,
        outcome: Outcome,
        message: impl Into<String>,
        detail: Option<Value>,
    ) -> Self {
        Self {
            paragraph_id: paragraph_id.to_string(),
            outcome,
            message: message.into(),
            detail,
        }
    }
}

/// The engine's output: one finding per group (several for all-fuzzy
/// groups), plus warnings about conventions applied outside their
/// verified territory.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Number of distinct paragraph groups examined.
    pub groups: usize,
    pub findings: Vec<Finding>,
    pub warnings: Vec<String>,
}

/// Verify every placement observation against the rewrite table.
///
/// Groups are visited in sorted paragraph-id order, so output is
/// deterministic regardless of log row order. Group classification rules,
/// in order:
///
/// 1. Any fuzzy observation poisons its group: one `fuzzy_rejected`
///    finding per fuzzy observation, and nothing in the group reaches any
///    other classification. A fuzzy anchor can place correct-looking text
///    in the wrong paragraph, so fingerprint agreement proves nothing.
/// 2. A paragraph id absent from the rewrite table is `missing_in_source`.
/// 3. A single observation is checked against the record's fingerprint,
///    then (on disagreement, when a companion is named) against the
///    reconstructed merge of record and companion.
/// 4. Multiple observations are checked as a multiset against the
///    record's list items. Placement order is not guaranteed to mirror
///    source order, but every expected fragment must appear exactly once.
pub fn reconcile(
    rewrites: &BTreeMap<String, RewriteRecord>,
    observations: &[PlacementObservation],
) -> Reconciliation {
    let mut groups: BTreeMap<&str, Vec<&PlacementObservation>> = BTreeMap::new();
    for observation in observations {
        groups
            .entry(observation.paragraph_id.as_str())
            .or_default()
            .push(observation);
    }

    let mut reconciliation = Reconciliation {
        groups: groups.len(),
        ..Reconciliation::default()
    };

    for (paragraph_id, group) in &groups {
        classify_group(rewrites, paragraph_id, group, &mut reconciliation);
    }

    reconciliation
}

fn classify_group(
    rewrites: &BTreeMap<String, RewriteRecord>,
    paragraph_id: &str,
    group: &[&PlacementObservation],
    out: &mut Reconciliation,
) {
    // Fuzzy gate: checked first, independent of everything else.
    let fuzzy: Vec<&&PlacementObservation> = group
        .iter()
        .filter(|o| o.match_type == MatchType::Fuzzy)
        .collect();
    if !fuzzy.is_empty() {
        for observation in fuzzy {
            out.findings.push(Finding::new(
                paragraph_id,
                Outcome::FuzzyRejected,
                "anchor was located by fuzzy search; placement identity is untrusted",
                Some(json!({
                    "observedFingerprint": observation.observed_fingerprint.to_string(),
                })),
            ));
        }
        return;
    }

    let Some(record) = rewrites.get(paragraph_id) else {
        out.findings.push(Finding::new(
            paragraph_id,
            Outcome::MissingInSource,
            "placement log references a paragraph absent from the rewrite table",
            Some(json!({ "observationCount": group.len() })),
        ));
        return;
    };

    if let [observation] = group {
        classify_single(rewrites, record, observation, out);
    } else {
        classify_multi(record, group, out);
    }
}

fn classify_single(
    rewrites: &BTreeMap<String, RewriteRecord>,
    record: &RewriteRecord,
    observation: &PlacementObservation,
    out: &mut Reconciliation,
) {
    let expected = fingerprint(&record.rewritten_text);
    if expected == observation.observed_fingerprint {
        out.findings.push(Finding::new(
            &record.paragraph_id,
            Outcome::ExactMatch,
            "placed text matches the rewrite",
            None,
        ));
        return;
    }

    // Disagreement with a named companion: the placement step claims two
    // source paragraphs were merged into this site.
    if let Some(companion_id) = observation.companion_paragraph_id.as_deref()
        && let Some(companion) = rewrites.get(companion_id)
    {
        if merge_is_uncharted(&record.rewritten_text, &companion.rewritten_text) {
            out.warnings.push(format!(
                "merge of `{}` and `{companion_id}`: both sides carry multiple layer \
                 markers; the merge ordering convention is unverified for this shape",
                record.paragraph_id
            ));
        }
        let merged = merge_rewrites(&record.rewritten_text, &companion.rewritten_text);
        let expected_merged = fingerprint(&merged);
        if expected_merged == observation.observed_fingerprint {
            out.findings.push(Finding::new(
                &record.paragraph_id,
                Outcome::MergeMatch,
                format!("placed text matches the merge with `{companion_id}`"),
                None,
            ));
        } else {
            out.findings.push(Finding::new(
                &record.paragraph_id,
                Outcome::Mismatch,
                format!("placed text matches neither the rewrite nor the merge with `{companion_id}`"),
                Some(json!({
                    "expectedFingerprint": expected.to_string(),
                    "expectedMergedFingerprint": expected_merged.to_string(),
                    "observedFingerprint": observation.observed_fingerprint.to_string(),
                })),
            ));
        }
        return;
    }

    let message = match observation.companion_paragraph_id.as_deref() {
        Some(companion_id) => format!(
            "fingerprint disagrees and claimed companion `{companion_id}` is absent from the rewrite table"
        ),
        None => "fingerprint disagrees with the rewrite".to_string(),
    };
    out.findings.push(Finding::new(
        &record.paragraph_id,
        Outcome::Mismatch,
        message,
        Some(json!({
            "expectedFingerprint": expected.to_string(),
            "observedFingerprint": observation.observed_fingerprint.to_string(),
        })),
    ));
}

fn classify_multi(record: &RewriteRecord, group: &[&PlacementObservation], out: &mut Reconciliation) {
    let items = split_list_items(&record.rewritten_text);

    if items.len() != group.len() {
        out.findings.push(Finding::new(
            &record.paragraph_id,
            Outcome::Mismatch,
            format!(
                "rewrite splits into {} item(s) but {} placement(s) were observed",
                items.len(),
                group.len()
            ),
            Some(json!({
                "expectedItems": items.len(),
                "observedPlacements": group.len(),
            })),
        ));
        return;
    }

    // Multiset comparison: every expected fragment consumed exactly once,
    // in any order.
    let mut remaining: HashMap<Fingerprint, usize> = HashMap::new();
    for item in &items {
        *remaining.entry(fingerprint(item)).or_insert(0) += 1;
    }

    let mut unmatched: Vec<String> = Vec::new();
    for observation in group {
        match remaining.get_mut(&observation.observed_fingerprint) {
            Some(count) if *count > 0 => *count -= 1,
            _ => unmatched.push(observation.observed_fingerprint.to_string()),
        }
    }

    if unmatched.is_empty() {
        out.findings.push(Finding::new(
            &record.paragraph_id,
            Outcome::MultiApplyMatch,
            format!("all {} list items placed exactly once", items.len()),
            None,
        ));
    } else {
        let unconsumed: Vec<String> = remaining
            .iter()
            .filter(|(_, count)| **count > 0)
            .flat_map(|(fp, count)| std::iter::repeat_n(fp.to_string(), *count))
            .collect();
        out.findings.push(Finding::new(
            &record.paragraph_id,
            Outcome::Mismatch,
            "observed placements do not cover the rewrite's list items",
            Some(json!({
                "unmatchedObserved": unmatched,
                "unplacedExpected": unconsumed,
            })),
        ));
    }
}
