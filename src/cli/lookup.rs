//! Lookup and batch query command implementations

use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::import::read_layouts;

use super::{Session, EXIT_ERROR, EXIT_NO_MATCH, EXIT_SUCCESS};

/// Execute the lookup command
pub fn run_lookup(session: &Session, recipes: &[PathBuf], rows: &[String], json: bool) -> ExitCode {
    let query = match session.recipe_from_rows("lookup", rows) {
        Ok(query) => query,
        Err(code) => return code,
    };
    let loaded = match session.load_recipes("lookup", recipes) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    for warning in &loaded.warnings {
        warning.print();
    }

    let output = loaded.registry.lookup(&query);
    if json {
        println!("{}", serde_json::json!({ "output": output }));
    } else {
        match output {
            Some(output) => println!("{}", output),
            None => println!("no match"),
        }
    }

    if output.is_some() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_NO_MATCH)
    }
}

/// Execute the query command: look up every layout in a file, in parallel
pub fn run_query(session: &Session, layouts: &Path, recipes: &[PathBuf], json: bool) -> ExitCode {
    let loaded = match session.load_recipes("query", recipes) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    for warning in &loaded.warnings {
        warning.print();
    }

    let file = match File::open(layouts) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: Failed to open '{}': {}", layouts.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let display = layouts.display().to_string();
    let (layouts, warnings) =
        match read_layouts(BufReader::new(file), &session.config.import_options()) {
            Ok(parsed) => parsed,
            Err(e) => {
                session.report("query", &display, &e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
    for warning in &warnings {
        eprintln!("Warning: {}:{}: {}", display, warning.line, warning.message);
    }

    let registry = &loaded.registry;
    let matches: Vec<_> = layouts
        .par_iter()
        .map(|layout| (layout, registry.lookup(&layout.recipe)))
        .collect();

    if json {
        let results: Vec<_> = matches
            .iter()
            .map(|(layout, output)| {
                serde_json::json!({ "label": layout.label, "line": layout.line, "output": output })
            })
            .collect();
        println!("{}", serde_json::json!({ "results": results }));
    } else {
        for (layout, output) in &matches {
            match output {
                Some(output) => println!("{}: {}", layout.label, output),
                None => println!("{}: no match", layout.label),
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
