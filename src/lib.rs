//! MedAssist — symptom triage core.
//!
//! Loads a symptom vocabulary and disease catalog from flat text files,
//! validates patient-reported symptoms, scores every disease by
//! signature coverage, and appends finalized patient records to an
//! append-only CSV log. The interactive console in `main.rs` is a thin
//! collaborator over this library.

pub mod config;
pub mod triage;
