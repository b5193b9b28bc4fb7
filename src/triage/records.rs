use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::diagnosis::DiagnosisResult;
use super::knowledge::KnowledgeBase;
use super::TriageError;
use crate::config::RECORD_FILE;

/// CSV header, written once when the log file is first created.
const RECORD_HEADER: &str = "patient id,patient name,symptoms list,disease 1,disease 2";

/// One persisted row of the patient record log. Written once,
/// append-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: u32,
    pub name: String,
    pub symptoms: Vec<String>,
    pub disease_1: String,
    pub disease_2: String,
}

/// Append-only patient record log with a fixed, validated target name.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    file_name: String,
}

impl RecordStore {
    /// Store writing to the canonical `medicalDatabase.csv` under
    /// `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_file(data_dir, RECORD_FILE)
    }

    /// Store with an explicit target file name. Anything other than the
    /// canonical name is rejected at save time with `InvalidTarget`, a
    /// guard against accidental misdirection.
    pub fn with_file(data_dir: &Path, file_name: &str) -> Self {
        Self {
            path: data_dir.join(file_name),
            file_name: file_name.to_string(),
        }
    }

    /// Full path of the record log.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next patient id: max leading integer field over all data rows,
    /// plus one. A missing log or one with no valid rows yields 1. Rows
    /// whose leading field is not an integer are skipped.
    pub fn next_patient_id(&self) -> Result<u32, TriageError> {
        if !self.path.exists() {
            return Ok(1);
        }
        let file = std::fs::File::open(&self.path)?;
        let mut max_id = 0u32;
        let mut skipped = 0usize;
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if index == 0 {
                continue; // header row
            }
            let leading = line.split(',').next().unwrap_or("").trim();
            match leading.parse::<u32>() {
                Ok(id) => max_id = max_id.max(id),
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "Ignored rows without an integer patient id");
        }
        Ok(max_id + 1)
    }

    /// Append one finalized record: header on first creation, then a
    /// single buffered row flushed before returning. On success the
    /// session's reported symptoms are cleared. The symptoms cell is
    /// always double-quoted because it joins with commas.
    pub fn save_record(
        &self,
        patient_id: u32,
        name: &str,
        diagnoses: &[DiagnosisResult],
        kb: &mut KnowledgeBase,
    ) -> Result<PatientRecord, TriageError> {
        self.validate_target()?;

        let record = PatientRecord {
            patient_id,
            name: name.to_string(),
            symptoms: kb.reported().to_vec(),
            disease_1: diagnoses
                .first()
                .map(|d| d.disease.clone())
                .unwrap_or_default(),
            disease_2: diagnoses
                .get(1)
                .map(|d| d.disease.clone())
                .unwrap_or_default(),
        };

        let write_header = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        if write_header {
            writeln!(writer, "{RECORD_HEADER}")?;
        }
        writeln!(
            writer,
            "{},{},\"{}\",{},{}",
            record.patient_id,
            record.name,
            record.symptoms.join(","),
            record.disease_1,
            record.disease_2
        )?;
        writer.flush()?;

        kb.clear_reported();
        tracing::info!(
            patient_id,
            path = %self.path.display(),
            "Patient record saved"
        );
        Ok(record)
    }

    fn validate_target(&self) -> Result<(), TriageError> {
        if self.file_name != RECORD_FILE || !self.file_name.ends_with(".csv") {
            return Err(TriageError::InvalidTarget(self.file_name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::catalog::DiseaseCatalog;

    fn session_with(symptoms: &[&str]) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new(DiseaseCatalog::load_test());
        for s in symptoms {
            kb.add_symptom(s).unwrap();
        }
        kb
    }

    fn flu_diagnoses() -> Vec<DiagnosisResult> {
        vec![DiagnosisResult {
            disease: "Flu".into(),
            probability: 200.0 / 3.0,
        }]
    }

    #[test]
    fn next_id_is_one_for_missing_log() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        assert_eq!(store.next_patient_id().unwrap(), 1);
    }

    #[test]
    fn save_then_scan_yields_next_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let mut kb = session_with(&["fever", "cough"]);

        let id = store.next_patient_id().unwrap();
        store.save_record(id, "Ada", &flu_diagnoses(), &mut kb).unwrap();

        assert_eq!(store.next_patient_id().unwrap(), id + 1);
    }

    #[test]
    fn header_written_only_on_creation() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());

        let mut kb = session_with(&["fever", "cough"]);
        store.save_record(1, "Ada", &flu_diagnoses(), &mut kb).unwrap();
        kb.add_symptom("fever").unwrap();
        kb.add_symptom("cough").unwrap();
        store.save_record(2, "Grace", &flu_diagnoses(), &mut kb).unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], RECORD_HEADER);
        assert!(lines[1].starts_with("1,Ada,"));
        assert!(lines[2].starts_with("2,Grace,"));
    }

    #[test]
    fn symptoms_cell_is_quoted_and_disease_2_may_be_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let mut kb = session_with(&["fever", "cough"]);

        store.save_record(1, "Ada", &flu_diagnoses(), &mut kb).unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("1,Ada,\"fever,cough\",Flu,\n"));
    }

    #[test]
    fn successful_save_clears_reported_symptoms() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let mut kb = session_with(&["fever", "cough"]);

        store.save_record(1, "Ada", &flu_diagnoses(), &mut kb).unwrap();
        assert!(kb.reported().is_empty());
    }

    #[test]
    fn invalid_target_writes_nothing_and_keeps_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::with_file(dir.path(), "records.csv");
        let mut kb = session_with(&["fever", "cough"]);

        let err = store
            .save_record(1, "Ada", &flu_diagnoses(), &mut kb)
            .unwrap_err();

        assert!(matches!(err, TriageError::InvalidTarget(_)));
        assert!(!store.path().exists());
        assert_eq!(kb.reported(), ["fever", "cough"]);
    }

    #[test]
    fn wrong_extension_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::with_file(dir.path(), "medicalDatabase.txt");
        let mut kb = session_with(&["fever", "cough"]);

        let err = store
            .save_record(1, "Ada", &flu_diagnoses(), &mut kb)
            .unwrap_err();
        assert!(matches!(err, TriageError::InvalidTarget(_)));
    }

    #[test]
    fn id_scan_skips_non_integer_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        std::fs::write(
            store.path(),
            format!("{RECORD_HEADER}\n7,Ada,\"fever\",Flu,\nnot-a-number,Bob,\"cough\",Flu,\n3,Eve,\"fever\",Flu,\n"),
        )
        .unwrap();

        assert_eq!(store.next_patient_id().unwrap(), 8);
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = PatientRecord {
            patient_id: 4,
            name: "Ada".into(),
            symptoms: vec!["fever".into(), "cough".into()],
            disease_1: "Flu".into(),
            disease_2: String::new(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: PatientRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.patient_id, 4);
        assert_eq!(back.symptoms, ["fever", "cough"]);
    }
}
