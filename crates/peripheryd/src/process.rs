//! Process entry point: bootstrap, then serve commands from stdin.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use periphery_registry::{ErrorSink, FanoutErrorSink, TracingErrorSink};
use thiserror::Error;
use tracing::info;

use crate::bootstrap::{BootstrapError, ConfigLoader, Daemon, SystemConfigLoader, bootstrap_with};
use crate::dispatch::{InboundCommand, JsonlErrorSink, ResponseLine, ResponseWriter};
use crate::health::{HealthReporter, StructuredHealthReporter, SystemSnapshot};

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors that stop the daemon process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrap failed.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// Reading commands or writing responses failed.
    #[error("transport I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Runs the daemon against the process's stdin and stdout.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap fails or stdio breaks.
pub fn run_daemon() -> Result<SystemSnapshot, LaunchError> {
    let reporter = Arc::new(StructuredHealthReporter::new());
    run_daemon_with(&SystemConfigLoader, reporter, io::stdin().lock(), io::stdout())
}

/// Runs the daemon with injected collaborators until `input` is exhausted.
///
/// Success lines and `error` lines share `output`. A final snapshot is
/// reported and returned on shutdown.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap fails or the transport breaks.
pub fn run_daemon_with<R, W>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    input: R,
    output: W,
) -> Result<SystemSnapshot, LaunchError>
where
    R: BufRead,
    W: Write + Send + 'static,
{
    let responses = ResponseWriter::new(output);
    let sink: Arc<dyn ErrorSink> = Arc::new(
        FanoutErrorSink::new()
            .with(Arc::new(TracingErrorSink::new()))
            .with(Arc::new(JsonlErrorSink::new(responses.clone()))),
    );
    let mut daemon = bootstrap_with(loader, Arc::clone(&reporter), sink)?;

    info!(target: PROCESS_TARGET, "serving commands from stdin");
    serve(&mut daemon, input, &responses)?;

    let snapshot = daemon.snapshot();
    reporter.snapshot(&snapshot);
    info!(target: PROCESS_TARGET, "input closed; shutting down");
    Ok(snapshot)
}

/// Routes every command line from `input`, writing an `ok` line per success.
///
/// # Errors
///
/// Returns the first I/O error from reading `input` or writing `responses`.
pub fn serve<R, W>(daemon: &mut Daemon, input: R, responses: &ResponseWriter<W>) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let text = line?;
        let Some(command) = InboundCommand::parse(&text) else {
            continue;
        };
        if let Ok(outcome) = daemon.handle(&command) {
            responses.write_line(&ResponseLine::ok(command.command(), &outcome))?;
        }
    }
    Ok(())
}
