//! Error reporting sinks.
//!
//! Failures are delivered to an [`ErrorSink`] as they happen. Reports are
//! neither buffered nor retried; a sink that cannot deliver simply drops the
//! report.

use std::sync::Arc;

use serde::Serialize;

/// Tracing target for reports emitted by [`TracingErrorSink`].
pub(crate) const SINK_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::sink");

/// A single failure report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    operation: String,
    message: String,
}

impl ErrorReport {
    /// Creates a report for the originating operation.
    #[must_use]
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Identifier of the operation that failed.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Destination for failure reports.
pub trait ErrorSink: Send + Sync {
    /// Delivers one report.
    fn report(&self, report: &ErrorReport);
}

impl<T> ErrorSink for Arc<T>
where
    T: ErrorSink + ?Sized,
{
    fn report(&self, report: &ErrorReport) {
        (**self).report(report);
    }
}

/// Sink that records reports with `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl TracingErrorSink {
    /// Builds a new sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ErrorSink for TracingErrorSink {
    fn report(&self, report: &ErrorReport) {
        tracing::error!(
            target: SINK_TARGET,
            operation = report.operation(),
            message = report.message(),
            "command failed"
        );
    }
}

/// Sink that forwards every report to each inner sink in order.
#[derive(Default)]
pub struct FanoutErrorSink {
    sinks: Vec<Arc<dyn ErrorSink>>,
}

impl FanoutErrorSink {
    /// Creates an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a downstream sink.
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl ErrorSink for FanoutErrorSink {
    fn report(&self, report: &ErrorReport) {
        for sink in &self.sinks {
            sink.report(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Collect(Mutex<Vec<ErrorReport>>);

    impl ErrorSink for Collect {
        fn report(&self, report: &ErrorReport) {
            self.0.lock().expect("collect mutex").push(report.clone());
        }
    }

    #[test]
    fn fanout_delivers_to_every_sink() {
        let first = Arc::new(Collect::default());
        let second = Arc::new(Collect::default());
        let fanout = FanoutErrorSink::new()
            .with(first.clone())
            .with(second.clone())
            .with(Arc::new(TracingErrorSink::new()));

        fanout.report(&ErrorReport::new("add", "boom"));

        for sink in [&first, &second] {
            let reports = sink.0.lock().expect("collect mutex");
            assert_eq!(reports.as_slice(), &[ErrorReport::new("add", "boom")]);
        }
    }

    #[test]
    fn report_serialises_operation_and_message() {
        let value = serde_json::to_value(ErrorReport::new("route", "bad topic")).expect("serialise");
        assert_eq!(value["operation"], "route");
        assert_eq!(value["message"], "bad topic");
    }
}
