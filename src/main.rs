//! scaffold - identity scaffolding for generated application projects

use std::process::ExitCode;

fn main() -> ExitCode {
    match identity_scaffold::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
