use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::TriageError;
use crate::config::{DISEASE_FILE, SYMPTOM_FILE};

/// Normalize a raw symptom token to catalog form.
pub(crate) fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One disease definition: name plus its required-symptom signature.
#[derive(Debug, Clone)]
pub struct DiseaseEntry {
    pub name: String,
    pub symptoms: HashSet<String>,
}

/// Loaded reference data: the symptom vocabulary, disease signatures in
/// catalog file order, and the symptom→diseases reverse index built
/// during the same pass.
///
/// Disease entries keep file order so ranking ties downstream are
/// deterministic.
#[derive(Debug, Default)]
pub struct DiseaseCatalog {
    pub(crate) valid_symptoms: HashSet<String>,
    pub(crate) diseases: Vec<DiseaseEntry>,
    pub(crate) symptom_to_diseases: HashMap<String, HashSet<String>>,
}

impl DiseaseCatalog {
    /// Load the symptom vocabulary and disease catalog from `data_dir`.
    /// Either source being unreadable is fatal.
    pub fn load(data_dir: &Path) -> Result<Self, TriageError> {
        let mut catalog = Self::default();
        catalog.load_symptoms(&data_dir.join(SYMPTOM_FILE))?;
        catalog.load_diseases(&data_dir.join(DISEASE_FILE))?;

        tracing::info!(
            symptoms = catalog.valid_symptoms.len(),
            diseases = catalog.diseases.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    fn load_symptoms(&mut self, path: &Path) -> Result<(), TriageError> {
        let file = File::open(path).map_err(|e| TriageError::CatalogLoad {
            path: path.display().to_string(),
            source: e,
        })?;
        for line in BufReader::new(file).lines() {
            let symptom = normalize(&line?);
            if !symptom.is_empty() {
                self.valid_symptoms.insert(symptom);
            }
        }
        Ok(())
    }

    fn load_diseases(&mut self, path: &Path) -> Result<(), TriageError> {
        let file = File::open(path).map_err(|e| TriageError::CatalogLoad {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut skipped = 0usize;
        for line in BufReader::new(file).lines() {
            if !self.parse_disease_line(&line?) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            tracing::warn!(
                skipped,
                path = %path.display(),
                "Skipped malformed disease lines"
            );
        }
        Ok(())
    }

    /// Parse one `Name:symptom1,symptom2,...` line into the catalog and
    /// the reverse index. Returns false for lines that do not split into
    /// exactly two parts on `:` (permissive skip, not an error).
    pub(crate) fn parse_disease_line(&mut self, line: &str) -> bool {
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() != 2 {
            return false;
        }
        let name = parts[0].trim().to_string();
        let mut symptoms = HashSet::new();
        for token in parts[1].split(',') {
            let symptom = normalize(token);
            self.symptom_to_diseases
                .entry(symptom.clone())
                .or_default()
                .insert(name.clone());
            symptoms.insert(symptom);
        }
        // A redefined disease replaces its signature but keeps its slot.
        match self.diseases.iter_mut().find(|d| d.name == name) {
            Some(entry) => entry.symptoms = symptoms,
            None => self.diseases.push(DiseaseEntry { name, symptoms }),
        }
        true
    }

    /// Disease signatures in catalog file order.
    pub(crate) fn entries(&self) -> &[DiseaseEntry] {
        &self.diseases
    }

    pub fn is_valid_symptom(&self, symptom: &str) -> bool {
        self.valid_symptoms.contains(symptom)
    }

    /// The disease's required-symptom signature, empty if unknown.
    pub fn symptoms_for_disease(&self, disease: &str) -> HashSet<String> {
        self.diseases
            .iter()
            .find(|d| d.name == disease)
            .map(|d| d.symptoms.clone())
            .unwrap_or_default()
    }

    /// Diseases whose signature includes the given (normalized) symptom.
    pub fn diseases_for_symptom(&self, symptom: &str) -> HashSet<String> {
        self.symptom_to_diseases
            .get(symptom)
            .cloned()
            .unwrap_or_default()
    }

    /// Build an in-memory catalog for tests (no file I/O).
    pub fn load_test() -> Self {
        let mut catalog = Self::default();
        for symptom in [
            "fever",
            "cough",
            "headache",
            "sore throat",
            "sneeze",
            "fatigue",
            "nausea",
        ] {
            catalog.valid_symptoms.insert(symptom.to_string());
        }
        for line in [
            "Flu:fever,cough,headache",
            "Common Cold:cough,sneeze,sore throat",
            "Migraine:headache,nausea",
        ] {
            catalog.parse_disease_line(line);
        }
        catalog
    }
}
