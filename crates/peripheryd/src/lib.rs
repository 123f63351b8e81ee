//! Daemon hosting the peripheral registry.
//!
//! `peripheryd` reads commands from stdin, one per line, as a topic followed
//! by a JSON payload. The final topic segment selects `add`, `remove` or
//! `execute` on a [`periphery_registry::PeripheralRegistry`] populated with
//! the built-in drivers from [`peripherals`]. Each success is answered with
//! an `ok` JSONL line on stdout; each failure is logged and answered with an
//! `error` line on the same stream.
//!
//! Bootstrap loads configuration through [`periphery_config`], installs
//! structured telemetry, and reports lifecycle events through a
//! [`HealthReporter`]. While serving, a [`SystemMonitor`] emits periodic
//! activity snapshots.

mod bootstrap;
pub mod dispatch;
mod health;
pub mod peripherals;
mod process;
pub mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter, SystemMonitor, SystemSnapshot};
pub use process::{LaunchError, run_daemon, run_daemon_with, serve};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
