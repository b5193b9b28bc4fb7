use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use medassist::config;
use medassist::triage::{diagnose, KnowledgeBase, RecordStore, TriageError};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let data_dir = config::app_data_dir();
    let mut kb = match KnowledgeBase::load(&data_dir) {
        Ok(kb) => kb,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load catalog");
            eprintln!("Error initializing database: {e}");
            return ExitCode::FAILURE;
        }
    };
    let store = RecordStore::new(&data_dir);

    match run_session(&mut kb, &store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// One patient interaction: id, name, symptom entry, diagnosis, save.
fn run_session(kb: &mut KnowledgeBase, store: &RecordStore) -> Result<(), TriageError> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let patient_id = store.next_patient_id()?;
    println!("Patient ID: {patient_id}");

    let name = loop {
        print!("Patient name: ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let name = line?.trim().to_string();
        if !name.is_empty() {
            break name;
        }
        println!("Please enter patient name.");
    };

    println!("Enter symptoms one per line ('done' to diagnose, 'quit' to exit):");
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let input = line?.trim().to_string();
        match input.as_str() {
            "" => continue,
            "quit" => return Ok(()),
            "done" => {
                if kb.reported().is_empty() {
                    println!("Please add at least one symptom.");
                    continue;
                }
                return finish_session(kb, store, patient_id, &name);
            }
            symptom => match kb.add_symptom(symptom) {
                Ok(()) => println!("  added ({} so far)", kb.reported().len()),
                Err(e) => println!("  {e}"),
            },
        }
    }
}

/// Diagnose, display the top two candidates, and persist the record.
/// No record is written when nothing clears the threshold.
fn finish_session(
    kb: &mut KnowledgeBase,
    store: &RecordStore,
    patient_id: u32,
    name: &str,
) -> Result<(), TriageError> {
    match diagnose(kb) {
        Ok(diagnoses) => {
            println!("Diagnosis:");
            for (rank, result) in diagnoses.iter().take(2).enumerate() {
                let matching = kb.matching_symptoms(&result.disease).join(", ");
                println!(
                    "  {}. {} {:.1}% (matching: {})",
                    rank + 1,
                    result.disease,
                    result.probability,
                    matching
                );
            }
            let record = store.save_record(patient_id, name, &diagnoses, kb)?;
            println!(
                "Record {} saved to {}",
                record.patient_id,
                store.path().display()
            );
            Ok(())
        }
        Err(TriageError::NoMatchFound) => {
            println!("No high probability matches found.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
