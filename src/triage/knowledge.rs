use std::collections::HashSet;
use std::path::Path;

use super::catalog::{normalize, DiseaseCatalog};
use super::TriageError;

/// One patient session: the loaded catalog plus the symptoms reported
/// so far.
///
/// Owned exclusively by the caller. Reported symptoms keep insertion
/// order, contain no duplicates, and are cleared only by a successful
/// record save.
#[derive(Debug)]
pub struct KnowledgeBase {
    catalog: DiseaseCatalog,
    reported: Vec<String>,
}

impl KnowledgeBase {
    /// Load the catalog from `data_dir` and start an empty session.
    pub fn load(data_dir: &Path) -> Result<Self, TriageError> {
        Ok(Self::new(DiseaseCatalog::load(data_dir)?))
    }

    pub fn new(catalog: DiseaseCatalog) -> Self {
        Self {
            catalog,
            reported: Vec::new(),
        }
    }

    /// Validate and record a reported symptom. Re-adding an already
    /// reported symptom is a no-op; an unrecognized symptom leaves the
    /// session unchanged.
    pub fn add_symptom(&mut self, raw: &str) -> Result<(), TriageError> {
        let symptom = normalize(raw);
        if !self.catalog.is_valid_symptom(&symptom) {
            return Err(TriageError::UnrecognizedSymptom(raw.trim().to_string()));
        }
        if !self.reported.contains(&symptom) {
            tracing::debug!(symptom = %symptom, "Symptom reported");
            self.reported.push(symptom);
        }
        Ok(())
    }

    /// Symptoms reported this session, in the order they were added.
    pub fn reported(&self) -> &[String] {
        &self.reported
    }

    /// The disease's required-symptom signature, empty if the disease
    /// is unknown.
    pub fn symptoms_for_disease(&self, disease: &str) -> HashSet<String> {
        self.catalog.symptoms_for_disease(disease)
    }

    /// Diseases whose signature includes the given symptom.
    pub fn diseases_for_symptom(&self, raw: &str) -> HashSet<String> {
        self.catalog.diseases_for_symptom(&normalize(raw))
    }

    /// Reported symptoms that belong to the disease's signature, in
    /// reported order. Display helper only; not part of the score.
    pub fn matching_symptoms(&self, disease: &str) -> Vec<String> {
        let required = self.catalog.symptoms_for_disease(disease);
        self.reported
            .iter()
            .filter(|s| required.contains(*s))
            .cloned()
            .collect()
    }

    pub(crate) fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    /// Reset the session once its record has been persisted.
    pub(crate) fn clear_reported(&mut self) {
        self.reported.clear();
    }
}
