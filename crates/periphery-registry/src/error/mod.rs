//! Domain errors raised by registry operations.
//!
//! Every failure is recoverable and local to one request. The registry
//! reports each error to its [`ErrorSink`](crate::sink::ErrorSink) before
//! returning it, so callers may simply discard the `Err` when the sink is
//! the only consumer they care about.

use std::fmt;

use thiserror::Error;

/// Registry operation that originated a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Attach a new peripheral.
    Add,
    /// Detach an existing peripheral.
    Remove,
    /// Run a task against an existing peripheral.
    Execute,
}

impl Operation {
    /// Returns the identifier used in error reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Execute => "execute",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required document field was absent or had the wrong type.
    MissingField,
    /// The name is already taken.
    DuplicateName,
    /// The peripheral factory rejected the configuration.
    InvalidConfiguration,
    /// No peripheral is registered under the name.
    NotFound,
    /// The peripheral is still shared with another holder.
    ResourceBusy,
    /// The peripheral cannot run the requested task.
    TaskIncompatible,
    /// The task ran and reported failure.
    TaskFailed,
}

/// Errors arising from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required field was absent or had the wrong type.
    #[error("{operation}: missing property: {field} ({expected})")]
    MissingField {
        /// Operation that required the field.
        operation: Operation,
        /// Name of the field.
        field: &'static str,
        /// Human-readable description of the expected value.
        expected: &'static str,
    },

    /// A peripheral with the same name is already registered.
    #[error("peripheral '{name}' has already been added")]
    DuplicateName {
        /// Name that collided.
        name: String,
    },

    /// The peripheral could not be constructed from the document.
    #[error("invalid configuration for peripheral '{name}': {source}")]
    InvalidConfiguration {
        /// Name the peripheral would have been registered under.
        name: String,
        /// Reason reported by the factory.
        #[source]
        source: ConfigurationError,
    },

    /// No peripheral is registered under the name.
    #[error("no peripheral found with name '{name}'")]
    NotFound {
        /// Name that was looked up.
        name: String,
    },

    /// The peripheral is still referenced outside the registry.
    #[error("peripheral '{name}' is still in use ({holders} holders); try again later")]
    ResourceBusy {
        /// Name of the busy peripheral.
        name: String,
        /// Number of live references, including the registry's own.
        holders: usize,
    },

    /// The peripheral cannot build a task from the document.
    #[error("peripheral '{name}' of type '{peripheral_type}' cannot execute this task: {source}")]
    TaskIncompatible {
        /// Name of the peripheral.
        name: String,
        /// Type tag of the peripheral.
        peripheral_type: String,
        /// Reason reported by the peripheral or task factory.
        #[source]
        source: TaskError,
    },

    /// The task ran and reported failure.
    #[error("task on peripheral '{name}' of type '{peripheral_type}' failed: {source}")]
    TaskFailed {
        /// Name of the peripheral.
        name: String,
        /// Type tag of the peripheral.
        peripheral_type: String,
        /// Failure reported by the task.
        #[source]
        source: TaskError,
    },
}

impl RegistryError {
    /// Creates a missing-field error.
    #[must_use]
    pub const fn missing_field(
        operation: Operation,
        field: &'static str,
        expected: &'static str,
    ) -> Self {
        Self::MissingField {
            operation,
            field,
            expected,
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Classifies a task error against the peripheral it targeted.
    ///
    /// Unsupported tasks and rejected parameters become
    /// [`RegistryError::TaskIncompatible`]; everything else becomes
    /// [`RegistryError::TaskFailed`].
    #[must_use]
    pub fn from_task_error(
        name: impl Into<String>,
        peripheral_type: impl Into<String>,
        source: TaskError,
    ) -> Self {
        let name = name.into();
        let peripheral_type = peripheral_type.into();
        if source.is_incompatibility() {
            Self::TaskIncompatible {
                name,
                peripheral_type,
                source,
            }
        } else {
            Self::TaskFailed {
                name,
                peripheral_type,
                source,
            }
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ResourceBusy { .. } => ErrorKind::ResourceBusy,
            Self::TaskIncompatible { .. } => ErrorKind::TaskIncompatible,
            Self::TaskFailed { .. } => ErrorKind::TaskFailed,
        }
    }
}

/// Rejection reported by a [`PeripheralFactory`](crate::PeripheralFactory)
/// or by a peripheral's own validity check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    /// Creates a configuration error with a human-readable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failures reported by task factories and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The peripheral offers no task with this name.
    #[error("unsupported task '{task}'")]
    Unsupported {
        /// Requested task name.
        task: String,
    },

    /// The parameter payload does not fit the task.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the mismatch.
        message: String,
    },

    /// The task ran and could not complete.
    #[error("{message}")]
    Failed {
        /// Description of the failure.
        message: String,
    },
}

impl TaskError {
    /// Creates an unsupported-task error.
    #[must_use]
    pub fn unsupported(task: impl Into<String>) -> Self {
        Self::Unsupported { task: task.into() }
    }

    /// Creates an invalid-parameter error.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Creates a run failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Returns `true` when the task never matched the peripheral's
    /// capabilities, as opposed to failing while it ran.
    #[must_use]
    pub const fn is_incompatibility(&self) -> bool {
        matches!(self, Self::Unsupported { .. } | Self::InvalidParameter { .. })
    }
}
