use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MedAssist";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Symptom vocabulary source: one symptom token per non-blank line.
pub const SYMPTOM_FILE: &str = "symptom.txt";

/// Disease catalog source: one `Name:symptom1,symptom2,...` line per disease.
pub const DISEASE_FILE: &str = "disease.txt";

/// Patient record log. The record store refuses any other target name.
pub const RECORD_FILE: &str = "medicalDatabase.csv";

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/MedAssist/ on all platforms (user-visible, holds catalog and record log)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}
