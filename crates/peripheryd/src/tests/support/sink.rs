//! Error sink that keeps reports for assertions.

use std::sync::Mutex;

use periphery_registry::{ErrorReport, ErrorSink};

/// Records every report it receives.
#[derive(Debug, Default)]
pub struct RecordingErrorSink {
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingErrorSink {
    /// Captures a copy of the recorded reports.
    #[must_use]
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().expect("sink mutex poisoned").clone()
    }

    /// Operations named by the recorded reports, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<String> {
        self.reports()
            .iter()
            .map(|report| report.operation().to_owned())
            .collect()
    }
}

impl ErrorSink for RecordingErrorSink {
    fn report(&self, report: &ErrorReport) {
        self.reports
            .lock()
            .expect("sink mutex poisoned")
            .push(report.clone());
    }
}
