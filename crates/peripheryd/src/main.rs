//! Entry point for the `peripheryd` binary.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match peripheryd::run_daemon() {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed yet, so write straight to stderr.
            let mut stderr = io::stderr().lock();
            drop(writeln!(stderr, "peripheryd: {error}"));
            ExitCode::FAILURE
        }
    }
}
