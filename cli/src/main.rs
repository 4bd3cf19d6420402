//! hitodo - terminal front-end for hierarchical todo lists

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = hitodo_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
