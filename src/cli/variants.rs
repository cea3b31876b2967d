//! Variants command implementation

use std::process::ExitCode;

use crate::recipe::Recipe;

use super::{Session, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the variants command
pub fn run_variants(session: &Session, rows: &[String]) -> ExitCode {
    let mut recipe = match session.recipe_from_rows("variants", rows) {
        Ok(recipe) => recipe,
        Err(code) => return code,
    };
    let grid = recipe.grid();
    let Some(margins) = recipe.margins() else {
        eprintln!("Error: layout has no items");
        return ExitCode::from(EXIT_INVALID_ARGS);
    };

    let variants = match recipe.variants() {
        Ok(variants) => variants,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    println!("Margins: {}", margins);
    println!("{} variant(s):", variants.len());
    for variant in variants {
        let cells = variant.cells().map(|(position, item)| (*position, item.clone()));
        match Recipe::from_cells(grid, cells) {
            Ok(shifted) => println!("\n{}", shifted.to_string().trim_end()),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
