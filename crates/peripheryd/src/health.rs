//! Structured health reporting for daemon lifecycle events.
//!
//! Besides bootstrap events, the daemon emits a periodic [`SystemSnapshot`]
//! summarising how many peripherals are registered and how many commands have
//! been handled. [`SystemMonitor`] decides when a snapshot is due; it has no
//! timer of its own and is polled after each command.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use periphery_config::Config;

use crate::bootstrap::BootstrapError;

/// Tracing target for health events.
pub(crate) const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked when a periodic or final snapshot is taken.
    fn snapshot(&self, snapshot: &SystemSnapshot);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn snapshot(&self, snapshot: &SystemSnapshot) {
        (**self).snapshot(snapshot);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        let topics = config.command_topics();
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            log_filter = %config.log_filter(),
            log_format = ?config.log_format(),
            add_suffix = topics.add_suffix(),
            remove_prefix = topics.remove_prefix(),
            execute_prefix = topics.execute_prefix(),
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn snapshot(&self, snapshot: &SystemSnapshot) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "system_snapshot",
            peripherals = snapshot.peripherals,
            commands_handled = snapshot.commands_handled,
            commands_failed = snapshot.commands_failed,
            uptime_secs = snapshot.uptime.as_secs(),
            "system snapshot"
        );
    }
}

/// Point-in-time summary of daemon activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SystemSnapshot {
    /// Number of registered peripherals.
    pub peripherals: usize,
    /// Commands routed since startup.
    pub commands_handled: u64,
    /// Commands that ended in an error report.
    pub commands_failed: u64,
    /// Time since the monitor was created.
    #[serde(serialize_with = "serialize_secs")]
    pub uptime: Duration,
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

/// Counts commands and decides when a snapshot is due.
#[derive(Debug, Clone)]
pub struct SystemMonitor {
    interval: Option<Duration>,
    started: Instant,
    last_snapshot: Instant,
    commands_handled: u64,
    commands_failed: u64,
}

impl SystemMonitor {
    /// Creates a monitor. `None` disables periodic snapshots.
    #[must_use]
    pub const fn new(interval: Option<Duration>, now: Instant) -> Self {
        Self {
            interval,
            started: now,
            last_snapshot: now,
            commands_handled: 0,
            commands_failed: 0,
        }
    }

    /// Records the outcome of one routed command.
    pub const fn record(&mut self, succeeded: bool) {
        self.commands_handled = self.commands_handled.saturating_add(1);
        if !succeeded {
            self.commands_failed = self.commands_failed.saturating_add(1);
        }
    }

    /// Builds a snapshot without affecting the schedule.
    #[must_use]
    pub fn snapshot(&self, peripherals: usize, now: Instant) -> SystemSnapshot {
        SystemSnapshot {
            peripherals,
            commands_handled: self.commands_handled,
            commands_failed: self.commands_failed,
            uptime: now.saturating_duration_since(self.started),
        }
    }

    /// Returns a snapshot when the interval has elapsed since the last one.
    pub fn poll(&mut self, peripherals: usize, now: Instant) -> Option<SystemSnapshot> {
        let interval = self.interval?;
        if now.saturating_duration_since(self.last_snapshot) < interval {
            return None;
        }
        self.last_snapshot = now;
        Some(self.snapshot(peripherals, now))
    }
}
