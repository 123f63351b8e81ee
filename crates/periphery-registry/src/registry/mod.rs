//! Peripheral registry and command dispatch.
//!
//! The [`PeripheralRegistry`] owns the mapping from peripheral name to shared
//! handle. It is the only mutator of that mapping: `add` inserts validated
//! peripherals, `remove` erases them once nobody else holds a reference, and
//! `execute` only reads an entry to build and run a transient task.
//!
//! Each operation is checked before it acts, so a failing call never leaves
//! a partial mutation behind. Failures are logged, forwarded to the
//! configured [`ErrorSink`], and returned to the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::document::{CommandDocument, NAME_FIELD, PARAMETER_FIELD};
use crate::error::{ConfigurationError, Operation, RegistryError};
use crate::peripheral::{PeripheralFactory, PeripheralHandle, TaskOutcome};
use crate::sink::{ErrorReport, ErrorSink};

/// Tracing target for registry operations.
pub(crate) const REGISTRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::registry");

/// Registry of live peripherals keyed by name.
///
/// The registry is created once at startup and passed to whatever drives it;
/// there is no process-wide instance.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
///
/// use periphery_registry::{
///     CommandDocument, ConfigurationError, Peripheral, PeripheralFactory, PeripheralHandle,
///     PeripheralRegistry, TaskError, TaskFactory, TracingErrorSink,
/// };
/// use serde_json::json;
///
/// struct Relay;
///
/// impl Peripheral for Relay {
///     fn peripheral_type(&self) -> &str { "relay" }
///     fn is_valid(&self) -> bool { true }
///     fn task_factory(&self, document: &CommandDocument) -> Result<&dyn TaskFactory, TaskError> {
///         Err(TaskError::unsupported(document.task().unwrap_or_default()))
///     }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// struct RelayFactory;
///
/// impl PeripheralFactory for RelayFactory {
///     fn create(&self, _document: &CommandDocument) -> Result<PeripheralHandle, ConfigurationError> {
///         Ok(Arc::new(Relay))
///     }
/// }
///
/// let mut registry = PeripheralRegistry::new(Arc::new(RelayFactory), Arc::new(TracingErrorSink));
/// let add = CommandDocument::try_from(json!({"name": "relay0"})).unwrap();
/// registry.add(&add).unwrap();
/// assert!(registry.contains("relay0"));
/// ```
pub struct PeripheralRegistry {
    peripherals: BTreeMap<String, PeripheralHandle>,
    factory: Arc<dyn PeripheralFactory>,
    sink: Arc<dyn ErrorSink>,
}

impl PeripheralRegistry {
    /// Creates an empty registry using the given factory and error sink.
    #[must_use]
    pub fn new(factory: Arc<dyn PeripheralFactory>, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            peripherals: BTreeMap::new(),
            factory,
            sink,
        }
    }

    /// Constructs a peripheral from the document and registers it by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingField`] when `name` is absent or not a
    /// non-empty string, [`RegistryError::DuplicateName`] when the name is taken, and
    /// [`RegistryError::InvalidConfiguration`] when the factory rejects the
    /// document or builds an invalid peripheral.
    pub fn add(&mut self, document: &CommandDocument) -> Result<(), RegistryError> {
        let result = self.try_add(document);
        self.reported(Operation::Add, result)
    }

    /// Removes a peripheral once the registry is its only holder.
    ///
    /// Removing a name that is not registered succeeds without effect.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingField`] when `name` is absent or not a
    /// non-empty string, and [`RegistryError::ResourceBusy`] when another holder still
    /// references the peripheral.
    pub fn remove(&mut self, document: &CommandDocument) -> Result<(), RegistryError> {
        let result = self.try_remove(document);
        self.reported(Operation::Remove, result)
    }

    /// Builds a task for the named peripheral and runs it once.
    ///
    /// The registry is never modified. The task's reference to the peripheral
    /// is released before this method returns.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingField`] when `name` or `parameter` is
    /// missing, [`RegistryError::NotFound`] when the name is not registered,
    /// [`RegistryError::TaskIncompatible`] when the peripheral cannot build the
    /// requested task, and [`RegistryError::TaskFailed`] when the task fails.
    pub fn execute(&self, document: &CommandDocument) -> Result<TaskOutcome, RegistryError> {
        let result = self.try_execute(document);
        self.reported(Operation::Execute, result)
    }

    /// Returns a cloned handle to the named peripheral.
    ///
    /// Holding the returned handle keeps the peripheral busy; `remove` will
    /// refuse to erase it until the handle is dropped.
    #[must_use]
    pub fn get_peripheral(&self, name: &str) -> Option<PeripheralHandle> {
        self.peripherals.get(name).map(Arc::clone)
    }

    /// Returns `true` when a peripheral is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.peripherals.contains_key(name)
    }

    /// Returns the registered names in ascending order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.peripherals.keys().map(String::as_str).collect()
    }

    /// Returns `(name, type)` pairs in ascending name order.
    #[must_use]
    pub fn peripheral_types(&self) -> Vec<(&str, &str)> {
        self.peripherals
            .iter()
            .map(|(name, peripheral)| (name.as_str(), peripheral.peripheral_type()))
            .collect()
    }

    /// Returns the number of registered peripherals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.peripherals.len()
    }

    /// Returns `true` when no peripherals are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peripherals.is_empty()
    }

    fn try_add(&mut self, document: &CommandDocument) -> Result<(), RegistryError> {
        let name = required_name(document, Operation::Add)?;
        if self.peripherals.contains_key(name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_owned(),
            });
        }

        let peripheral =
            self.factory
                .create(document)
                .map_err(|source| RegistryError::InvalidConfiguration {
                    name: name.to_owned(),
                    source,
                })?;
        if !peripheral.is_valid() {
            return Err(RegistryError::InvalidConfiguration {
                name: name.to_owned(),
                source: ConfigurationError::new(format!(
                    "{} peripheral failed validation",
                    peripheral.peripheral_type()
                )),
            });
        }

        debug!(
            target: REGISTRY_TARGET,
            name,
            peripheral_type = peripheral.peripheral_type(),
            "peripheral added"
        );
        self.peripherals.insert(name.to_owned(), peripheral);
        Ok(())
    }

    fn try_remove(&mut self, document: &CommandDocument) -> Result<(), RegistryError> {
        let name = required_name(document, Operation::Remove)?;
        let Some(peripheral) = self.peripherals.get(name) else {
            debug!(target: REGISTRY_TARGET, name, "remove ignored for unknown peripheral");
            return Ok(());
        };

        let holders = Arc::strong_count(peripheral);
        if holders > 1 {
            return Err(RegistryError::ResourceBusy {
                name: name.to_owned(),
                holders,
            });
        }

        self.peripherals.remove(name);
        debug!(target: REGISTRY_TARGET, name, "peripheral removed");
        Ok(())
    }

    fn try_execute(&self, document: &CommandDocument) -> Result<TaskOutcome, RegistryError> {
        let name = required_name(document, Operation::Execute)?;
        let parameter = document.parameter().ok_or(RegistryError::missing_field(
            Operation::Execute,
            PARAMETER_FIELD,
            "any non-null value",
        ))?;
        let peripheral = self
            .peripherals
            .get(name)
            .ok_or_else(|| RegistryError::not_found(name))?;
        let peripheral_type = peripheral.peripheral_type();

        let task = peripheral
            .task_factory(document)
            .and_then(|factory| factory.create_task(Arc::clone(peripheral), parameter))
            .map_err(|source| RegistryError::from_task_error(name, peripheral_type, source))?;

        // `run` consumes the task, so its handle clone is gone once it returns.
        let outcome = task
            .run()
            .map_err(|source| RegistryError::from_task_error(name, peripheral_type, source))?;

        debug!(
            target: REGISTRY_TARGET,
            name,
            peripheral_type,
            "task executed"
        );
        Ok(outcome)
    }

    fn reported<T>(
        &self,
        operation: Operation,
        result: Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        result.inspect_err(|error| {
            warn!(
                target: REGISTRY_TARGET,
                operation = operation.as_str(),
                kind = ?error.kind(),
                %error,
                "registry operation failed"
            );
            self.sink
                .report(&ErrorReport::new(operation.as_str(), error.to_string()));
        })
    }
}

impl fmt::Debug for PeripheralRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeripheralRegistry")
            .field("peripherals", &self.names())
            .finish_non_exhaustive()
    }
}

fn required_name(document: &CommandDocument, operation: Operation) -> Result<&str, RegistryError> {
    document
        .name()
        .filter(|name| !name.is_empty())
        .ok_or(RegistryError::missing_field(
            operation,
            NAME_FIELD,
            "non-empty string",
        ))
}
