//! Check command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use super::{Session, EXIT_SUCCESS};

/// Execute the check command
pub fn run_check(session: &Session, paths: &[PathBuf], json: bool) -> ExitCode {
    let loaded = match session.load_recipes("check", paths) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    if json {
        let output = serde_json::json!({
            "grid": session.grid().to_string(),
            "files": loaded.files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>(),
            "recipes": loaded.registry.len(),
            "skipped": loaded.skipped,
            "warnings": loaded.warnings,
        });
        println!("{}", output);
        return ExitCode::from(EXIT_SUCCESS);
    }

    for warning in &loaded.warnings {
        warning.print();
    }
    println!(
        "Loaded {} recipe(s) from {} file(s) on a {} grid",
        loaded.registry.len(),
        loaded.files.len(),
        session.grid()
    );
    if loaded.skipped > 0 {
        println!("Skipped {} malformed record(s)", loaded.skipped);
    }

    ExitCode::from(EXIT_SUCCESS)
}
