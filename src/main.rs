//! Craftgrid - command-line tool for matching crafting grid layouts against recipes

use std::process::ExitCode;

use craftgrid::cli;

fn main() -> ExitCode {
    cli::run()
}
