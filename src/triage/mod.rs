//! Symptom triage core: catalog loading, symptom validation, threshold
//! diagnosis, and the append-only patient record log.

pub mod catalog;
pub mod diagnosis;
pub mod knowledge;
pub mod records;

pub use catalog::*;
pub use diagnosis::*;
pub use knowledge::*;
pub use records::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    /// User input outside the loaded vocabulary. Recoverable; the
    /// session is left unchanged.
    #[error("Symptom '{0}' not recognized.")]
    UnrecognizedSymptom(String),

    /// No disease cleared the 50% threshold. Recoverable; the caller
    /// presents an empty result rather than aborting the session.
    #[error("No disease matched the provided symptoms with probability > 50%.")]
    NoMatchFound,

    /// Record log target does not match the expected fixed filename.
    #[error("Invalid record target '{0}'. Must be named 'medicalDatabase.csv' and have a .csv extension.")]
    InvalidTarget(String),

    /// Vocabulary or catalog source unreadable. Fatal at startup: no
    /// partial knowledge base is usable.
    #[error("Catalog load failed ({path}): {source}")]
    CatalogLoad {
        path: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
