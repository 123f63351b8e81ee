//! Peripheral registry and command dispatcher.
//!
//! The `periphery-registry` crate owns the set of live peripheral instances
//! on a device and routes structured commands to them. A remote controller
//! attaches peripherals with `add`, detaches them with `remove`, and invokes
//! one-shot tasks on them with `execute`. Every command arrives as a decoded
//! [`CommandDocument`].
//!
//! # Ownership
//!
//! Peripherals are shared through [`PeripheralHandle`] (`Arc<dyn Peripheral>`).
//! A task built for `execute` holds its own clone of the handle while it runs,
//! and any collaborator may hold one obtained from
//! [`PeripheralRegistry::get_peripheral`]. `remove` only erases an entry when
//! the registry is the sole remaining holder; otherwise it fails with
//! [`RegistryError::ResourceBusy`] and the caller may retry later.
//!
//! # Collaborators
//!
//! Drivers are supplied from outside the crate through three traits:
//!
//! - [`PeripheralFactory`] builds a peripheral from an `add` document.
//! - [`Peripheral`] exposes a type tag, a validity flag and a
//!   [`TaskFactory`] lookup.
//! - [`PeripheralTask`] performs one unit of work and yields a
//!   [`TaskOutcome`].
//!
//! Failures are reported to an injected [`ErrorSink`] as well as returned.

pub mod document;
pub mod error;
pub mod peripheral;
pub mod registry;
pub mod sink;

#[cfg(test)]
mod tests;

pub use self::document::CommandDocument;
pub use self::error::{ConfigurationError, ErrorKind, Operation, RegistryError, TaskError};
pub use self::peripheral::{
    Peripheral, PeripheralFactory, PeripheralHandle, PeripheralTask, TaskFactory, TaskOutcome,
};
pub use self::registry::PeripheralRegistry;
pub use self::sink::{ErrorReport, ErrorSink, FanoutErrorSink, TracingErrorSink};
