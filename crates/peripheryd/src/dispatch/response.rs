//! JSONL response lines written back over the transport.
//!
//! Successful commands produce an `ok` line; failures reported through
//! [`JsonlErrorSink`] produce an `error` line on the same stream.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use periphery_registry::{ErrorReport, ErrorSink};
use serde::Serialize;
use serde_json::Value;

use super::router::{DISPATCH_TARGET, RouteOutcome};

/// One response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseLine {
    /// A command completed.
    Ok {
        /// Final topic segment of the command.
        command: String,
        /// Peripheral the command addressed.
        name: String,
        /// Task output, or `null` for `add` and `remove`.
        result: Value,
    },
    /// A command failed.
    Error {
        /// Operation that failed, such as `execute` or `route`.
        operation: String,
        /// Human-readable failure description.
        message: String,
    },
}

impl ResponseLine {
    /// Builds the success line for a routed command.
    #[must_use]
    pub fn ok(command: &str, outcome: &RouteOutcome) -> Self {
        Self::Ok {
            command: command.to_owned(),
            name: outcome.name().to_owned(),
            result: outcome.output().cloned().unwrap_or(Value::Null),
        }
    }

    /// Builds the failure line for an error report.
    #[must_use]
    pub fn error(report: &ErrorReport) -> Self {
        Self::Error {
            operation: report.operation().to_owned(),
            message: report.message().to_owned(),
        }
    }
}

/// Writer that serialises response lines to a shared stream.
///
/// Clones share the underlying stream, so the transport and the error sink
/// can interleave lines on the same output.
pub struct ResponseWriter<W> {
    writer: Arc<Mutex<W>>,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps the given output stream.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    /// Writes one line and flushes the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub fn write_line(&self, line: &ResponseLine) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *writer, line)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl<W> Clone for ResponseWriter<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
        }
    }
}

/// Error sink that writes `error` lines to a [`ResponseWriter`].
pub struct JsonlErrorSink<W> {
    writer: ResponseWriter<W>,
}

impl<W: Write> JsonlErrorSink<W> {
    /// Creates a sink sharing the given writer.
    #[must_use]
    pub const fn new(writer: ResponseWriter<W>) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> ErrorSink for JsonlErrorSink<W> {
    fn report(&self, report: &ErrorReport) {
        if let Err(error) = self.writer.write_line(&ResponseLine::error(report)) {
            tracing::warn!(
                target: DISPATCH_TARGET,
                %error,
                operation = report.operation(),
                "failed to write error line"
            );
        }
    }
}
