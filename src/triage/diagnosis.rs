use std::cmp::Ordering;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::knowledge::KnowledgeBase;
use super::TriageError;

/// Minimum probability (percent) a disease must strictly exceed to be
/// retained as a candidate.
pub const MATCH_THRESHOLD_PERCENT: f64 = 50.0;

/// One ranked candidate: disease name and match probability in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub disease: String,
    pub probability: f64,
}

/// Score every catalog disease against the session's reported symptoms.
///
/// probability = matched signature symptoms / signature size * 100.
/// Only candidates strictly above 50% are retained, sorted by
/// probability descending. Equal probabilities keep catalog file order
/// (stable sort). Returns `NoMatchFound` when nothing clears the
/// threshold; never mutates the session.
pub fn diagnose(kb: &KnowledgeBase) -> Result<Vec<DiagnosisResult>, TriageError> {
    let start = Instant::now();
    let reported = kb.reported();

    let mut results: Vec<DiagnosisResult> = kb
        .catalog()
        .entries()
        .iter()
        .filter_map(|entry| {
            let match_count = reported
                .iter()
                .filter(|s| entry.symptoms.contains(*s))
                .count();
            let probability = match_count as f64 / entry.symptoms.len() as f64 * 100.0;
            (probability > MATCH_THRESHOLD_PERCENT).then(|| DiagnosisResult {
                disease: entry.name.clone(),
                probability,
            })
        })
        .collect();

    if results.is_empty() {
        return Err(TriageError::NoMatchFound);
    }

    results.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });

    tracing::debug!(
        reported = reported.len(),
        candidates = results.len(),
        processing_us = start.elapsed().as_micros() as u64,
        "Diagnosis pass complete"
    );

    Ok(results)
}
