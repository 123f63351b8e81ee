//! Crate-level test doubles and behaviour tests.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::document::CommandDocument;
use crate::error::{ConfigurationError, TaskError};
use crate::peripheral::{
    Peripheral, PeripheralFactory, PeripheralHandle, PeripheralTask, TaskFactory, TaskOutcome,
};
use crate::registry::PeripheralRegistry;
use crate::sink::{ErrorReport, ErrorSink};


pub(crate) const STUB_TYPE: &str = "stub";

// ---------------------------------------------------------------------------
// Error sink
// ---------------------------------------------------------------------------

/// Sink that keeps every report for later assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingErrorSink {
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingErrorSink {
    pub(crate) fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().expect("sink mutex poisoned").clone()
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

// ---------------------------------------------------------------------------
// Peripheral
// ---------------------------------------------------------------------------

/// Software-only peripheral offering `echo`, `fail` and `observe` tasks.
pub(crate) struct StubPeripheral {
    valid: bool,
    observed_holders: AtomicUsize,
}

impl StubPeripheral {
    pub(crate) fn observed_holders(&self) -> usize {
        self.observed_holders.load(Ordering::SeqCst)
    }
}

impl Peripheral for StubPeripheral {
    fn peripheral_type(&self) -> &str {
        STUB_TYPE
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn task_factory(&self, document: &CommandDocument) -> Result<&dyn TaskFactory, TaskError> {
        match document.task().unwrap_or("echo") {
            "echo" => Ok(&EchoFactory),
            "fail" => Ok(&FailFactory),
            "observe" => Ok(&ObserveFactory),
            other => Err(TaskError::unsupported(other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct EchoFactory;

impl TaskFactory for EchoFactory {
    fn task_name(&self) -> &str {
        "echo"
    }

    fn create_task(
        &self,
        _peripheral: PeripheralHandle,
        parameter: &Value,
    ) -> Result<Box<dyn PeripheralTask>, TaskError> {
        if !parameter.is_object() {
            return Err(TaskError::invalid_parameter("expected an object"));
        }
        Ok(Box::new(EchoTask {
            parameter: parameter.clone(),
        }))
    }
}

struct EchoTask {
    parameter: Value,
}

impl PeripheralTask for EchoTask {
    fn run(self: Box<Self>) -> Result<TaskOutcome, TaskError> {
        Ok(TaskOutcome::with_output(self.parameter))
    }
}

struct FailFactory;

impl TaskFactory for FailFactory {
    fn task_name(&self) -> &str {
        "fail"
    }

    fn create_task(
        &self,
        _peripheral: PeripheralHandle,
        _parameter: &Value,
    ) -> Result<Box<dyn PeripheralTask>, TaskError> {
        Ok(Box::new(FailTask))
    }
}

struct FailTask;

impl PeripheralTask for FailTask {
    fn run(self: Box<Self>) -> Result<TaskOutcome, TaskError> {
        Err(TaskError::failed("stub hardware fault"))
    }
}

struct ObserveFactory;

impl TaskFactory for ObserveFactory {
    fn task_name(&self) -> &str {
        "observe"
    }

    fn create_task(
        &self,
        peripheral: PeripheralHandle,
        _parameter: &Value,
    ) -> Result<Box<dyn PeripheralTask>, TaskError> {
        Ok(Box::new(ObserveTask { peripheral }))
    }
}

/// Records how many holders the peripheral had while the task ran.
struct ObserveTask {
    peripheral: PeripheralHandle,
}

impl PeripheralTask for ObserveTask {
    fn run(self: Box<Self>) -> Result<TaskOutcome, TaskError> {
        let holders = Arc::strong_count(&self.peripheral);
        let stub = self
            .peripheral
            .downcast_ref::<StubPeripheral>()
            .ok_or_else(|| TaskError::failed("not a stub peripheral"))?;
        stub.observed_holders.store(holders, Ordering::SeqCst);
        Ok(TaskOutcome::with_output(json!({ "holders": holders })))
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Builds stubs for `type: "stub"`, invalid stubs for `type: "broken"`, and
/// rejects everything else.
pub(crate) struct StubFactory;

impl PeripheralFactory for StubFactory {
    fn create(&self, document: &CommandDocument) -> Result<PeripheralHandle, ConfigurationError> {
        let valid = match document.peripheral_type() {
            Some(STUB_TYPE) => true,
            Some("broken") => false,
            Some(other) => {
                return Err(ConfigurationError::new(format!(
                    "unknown peripheral type '{other}'"
                )));
            }
            None => return Err(ConfigurationError::new("missing property: type (string)")),
        };
        Ok(Arc::new(StubPeripheral {
            valid,
            observed_holders: AtomicUsize::new(0),
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn registry_with_sink() -> (PeripheralRegistry, Arc<RecordingErrorSink>) {
    let sink = Arc::new(RecordingErrorSink::default());
    let registry = PeripheralRegistry::new(Arc::new(StubFactory), sink.clone());
    (registry, sink)
}

pub(crate) fn document(value: Value) -> CommandDocument {
    CommandDocument::try_from(value).expect("test documents are objects")
}

pub(crate) fn add_stub(name: &str) -> CommandDocument {
    document(json!({ "name": name, "type": STUB_TYPE }))
}

#[test]
fn end_to_end_add_execute_remove() {
    let (mut registry, sink) = registry_with_sink();
    registry.add(&add_stub("sensorA")).expect("add");

    let outcome = registry
        .execute(&document(json!({"name": "sensorA", "parameter": {"x": 1}})))
        .expect("execute");
    assert_eq!(outcome.output(), &json!({"x": 1}));

    registry
        .remove(&document(json!({"name": "sensorA"})))
        .expect("remove");
    assert!(registry.is_empty());
    assert!(sink.reports().is_empty());
}
