//! Collaborator contracts for peripherals and their tasks.
//!
//! A peripheral is a driver for one piece of hardware. The registry shares
//! ownership of each instance through a [`PeripheralHandle`]; tasks built by
//! a [`TaskFactory`] clone that handle for as long as they live, which is
//! what the busy check in
//! [`PeripheralRegistry::remove`](crate::PeripheralRegistry::remove) observes.

use std::any::Any;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::document::CommandDocument;
use crate::error::{ConfigurationError, TaskError};

/// Shared ownership handle to a registered peripheral.
pub type PeripheralHandle = Arc<dyn Peripheral>;

/// A driver for one piece of hardware.
pub trait Peripheral: Send + Sync + 'static {
    /// Type tag used for diagnostics, e.g. `led`.
    fn peripheral_type(&self) -> &str;

    /// Returns `false` when construction left the driver unusable.
    fn is_valid(&self) -> bool;

    /// Selects the task factory matching the document.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Unsupported`] when the peripheral offers no task
    /// matching the document.
    fn task_factory(&self, document: &CommandDocument) -> Result<&dyn TaskFactory, TaskError>;

    /// Exposes the concrete driver so tasks can recover it.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Peripheral {
    /// Borrows the concrete driver behind a handle.
    #[must_use]
    pub fn downcast_ref<P: Peripheral>(&self) -> Option<&P> {
        self.as_any().downcast_ref::<P>()
    }
}

/// Builds peripherals from `add` documents.
pub trait PeripheralFactory: Send + Sync {
    /// Constructs a peripheral from the whole document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the document does not describe a
    /// peripheral this factory knows how to build.
    fn create(&self, document: &CommandDocument) -> Result<PeripheralHandle, ConfigurationError>;
}

/// Builds tasks bound to a peripheral handle.
pub trait TaskFactory: Send + Sync {
    /// Name of the tasks this factory produces.
    fn task_name(&self) -> &str;

    /// Builds a task that owns a clone of `peripheral` until it is run.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::InvalidParameter`] when the parameter does not
    /// fit the task.
    fn create_task(
        &self,
        peripheral: PeripheralHandle,
        parameter: &Value,
    ) -> Result<Box<dyn PeripheralTask>, TaskError>;
}

/// One-shot unit of work bound to a peripheral.
pub trait PeripheralTask {
    /// Runs the task to completion, consuming it.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskError`] when the work cannot complete.
    fn run(self: Box<Self>) -> Result<TaskOutcome, TaskError>;
}

/// Result produced by a successful task.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskOutcome {
    #[serde(skip_serializing_if = "Value::is_null")]
    output: Value,
}

impl TaskOutcome {
    /// An outcome without output.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            output: Value::Null,
        }
    }

    /// An outcome carrying structured output, such as a sensor reading.
    #[must_use]
    pub const fn with_output(output: Value) -> Self {
        Self { output }
    }

    /// Returns the structured output (`Null` when there is none).
    #[must_use]
    pub const fn output(&self) -> &Value {
        &self.output
    }
}
