//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::OrthoError;
use periphery_config::Config;

use crate::bootstrap::ConfigLoader;

/// Loader returning defaults with a chosen snapshot interval.
pub struct TestConfigLoader {
    health_interval_secs: u64,
}

impl TestConfigLoader {
    /// Loader with periodic snapshots disabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            health_interval_secs: 0,
        }
    }

    /// Loader with snapshots every `secs` seconds.
    #[must_use]
    pub const fn with_health_interval(secs: u64) -> Self {
        Self {
            health_interval_secs: secs,
        }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            health_interval_secs: self.health_interval_secs,
            ..Config::default()
        })
    }
}

/// Loader that intentionally fails by passing an unparsable CLI value.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("peripheryd"),
            OsString::from("--health-interval-secs"),
            OsString::from("soon"),
        ];
        Config::load_from_iter(args)
    }
}
