//! Diagnostic logging for the daemon.
//!
//! The daemon speaks two channels. Stdout carries exactly one JSON response
//! line per routed command and nothing else, so controllers can parse it line
//! by line. Every tracing event goes to stderr through [`DiagnosticWriter`].

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use periphery_config::{Config, LogFormat};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Writer factory for diagnostic output.
///
/// Always yields stderr. Response lines are written by
/// [`ResponseWriter`](crate::dispatch::ResponseWriter) to stdout, and the two
/// must never interleave on one stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiagnosticWriter;

impl DiagnosticWriter {
    /// Whether diagnostics land on a terminal, which enables ANSI colour.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        io::stderr().is_terminal()
    }
}

impl<'a> MakeWriter<'a> for DiagnosticWriter {
    type Writer = io::Stderr;

    fn make_writer(&'a self) -> Self::Writer {
        io::stderr()
    }
}

/// Installs the global subscriber on the first call.
///
/// Later calls return a fresh [`TelemetryHandle`] and leave global state
/// alone, so every bootstrap in a test binary may call this.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured filter does not
/// parse and [`TelemetryError::Subscriber`] when another subscriber is
/// already installed.
///
/// # Examples
///
/// ```rust
/// use periphery_config::Config;
/// use peripheryd::telemetry;
///
/// # fn main() -> Result<(), peripheryd::TelemetryError> {
/// let config = Config::default();
/// let first = telemetry::initialise(&config)?;
/// let second = telemetry::initialise(&config)?;
/// drop(first);
/// drop(second);
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install(config))
        .map(|_| TelemetryHandle)
}

fn install(config: &Config) -> Result<(), TelemetryError> {
    let filter = parse_filter(config.log_filter())?;
    let layer = diagnostic_layer(config.log_format()).with_filter(filter);
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn diagnostic_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    let writer = DiagnosticWriter;
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(writer.is_terminal())
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    match format {
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}
