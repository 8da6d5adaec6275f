//! Plugkit - Authoring toolkit for AgentOS plugin catalogs

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = plugkit::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
