//! Daemon bootstrap orchestration.

use std::sync::Arc;
use std::time::Instant;

use ortho_config::OrthoError;
use periphery_registry::{ErrorSink, PeripheralRegistry};
use thiserror::Error;

use periphery_config::Config;

use crate::dispatch::{CommandRouter, InboundCommand, RouteError, RouteOutcome};
use crate::health::{HealthReporter, SystemMonitor, SystemSnapshot};
use crate::peripherals::BuiltinPeripheralFactory;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader error when no valid configuration can be resolved.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that returns a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already loaded configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// A bootstrapped daemon: configuration, registry and router.
pub struct Daemon {
    config: Config,
    registry: PeripheralRegistry,
    router: CommandRouter,
    monitor: SystemMonitor,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Daemon {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the peripheral registry.
    #[must_use]
    pub const fn registry(&self) -> &PeripheralRegistry {
        &self.registry
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Routes one inbound command and emits a snapshot when one is due.
    ///
    /// # Errors
    ///
    /// Returns the routing or registry error; it has already been delivered
    /// to the error sink.
    pub fn handle(&mut self, command: &InboundCommand) -> Result<RouteOutcome, RouteError> {
        let result = self
            .router
            .route(&mut self.registry, command.topic(), command.payload());
        self.monitor.record(result.is_ok());
        if let Some(snapshot) = self.monitor.poll(self.registry.len(), Instant::now()) {
            self.reporter.snapshot(&snapshot);
        }
        result
    }

    /// Builds a snapshot of current activity without reporting it.
    #[must_use]
    pub fn snapshot(&self) -> SystemSnapshot {
        self.monitor.snapshot(self.registry.len(), Instant::now())
    }
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// Registry and routing failures are delivered to `sink`.
///
/// # Errors
///
/// Returns [`BootstrapError`] when configuration or telemetry cannot be
/// initialised. The reporter observes the failure before it is returned.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    sink: Arc<dyn ErrorSink>,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let registry = PeripheralRegistry::new(
        Arc::new(BuiltinPeripheralFactory::new()),
        Arc::clone(&sink),
    );
    let router = CommandRouter::new(config.command_topics(), sink);
    let monitor = SystemMonitor::new(config.health_interval(), Instant::now());
    reporter.bootstrap_succeeded(&config);

    Ok(Daemon {
        config,
        registry,
        router,
        monitor,
        telemetry,
        reporter,
    })
}
