//! Shared configuration for the periphery daemon.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults, an
//! optional configuration file (`--config-path` or `PERIPHERY_CONFIG_PATH`),
//! `PERIPHERY_*` environment variables, and finally command-line flags. The
//! resolved [`Config`] carries the logging settings consumed by the daemon's
//! telemetry layer and the topic identifiers the command router uses to
//! classify inbound messages.

mod defaults;
mod logging;
mod topics;

use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

pub use self::defaults::{
    DEFAULT_ADD_SUFFIX, DEFAULT_EXECUTE_PREFIX, DEFAULT_HEALTH_INTERVAL_SECS, DEFAULT_LOG_FILTER,
    DEFAULT_REMOVE_PREFIX, default_log_filter, default_log_filter_string, default_log_format,
};
pub use self::logging::{LogFormat, LogFormatParseError};
pub use self::topics::CommandTopics;

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PERIPHERY")]
pub struct Config {
    /// Filter expression handed to the tracing subscriber.
    #[serde(default = "defaults::default_log_filter_string")]
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format of structured logs.
    #[serde(default = "defaults::default_log_format")]
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
    /// Topic suffix that selects the `add` command.
    #[serde(default = "defaults::default_add_suffix")]
    #[ortho_config(default = defaults::default_add_suffix())]
    pub add_suffix: String,
    /// Topic prefix that selects the `remove` command.
    #[serde(default = "defaults::default_remove_prefix")]
    #[ortho_config(default = defaults::default_remove_prefix())]
    pub remove_prefix: String,
    /// Topic prefix that selects the `execute` command.
    #[serde(default = "defaults::default_execute_prefix")]
    #[ortho_config(default = defaults::default_execute_prefix())]
    pub execute_prefix: String,
    /// Seconds between health snapshots; zero disables them.
    #[serde(default = "defaults::default_health_interval_secs")]
    #[ortho_config(default = defaults::default_health_interval_secs())]
    pub health_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
            add_suffix: defaults::default_add_suffix(),
            remove_prefix: defaults::default_remove_prefix(),
            execute_prefix: defaults::default_execute_prefix(),
            health_interval_secs: defaults::default_health_interval_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from the process arguments, environment and files.
    ///
    /// # Errors
    ///
    /// Returns the loader error when any configuration layer is malformed.
    pub fn load() -> Result<Self, Arc<OrthoError>> {
        <Self as OrthoConfig>::load()
    }

    /// Loads configuration from an explicit argument list.
    ///
    /// The first item is treated as the binary name, mirroring
    /// `std::env::args_os`.
    ///
    /// # Errors
    ///
    /// Returns the loader error when any configuration layer is malformed.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Filter expression handed to the tracing subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format of structured logs.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Topic identifiers used to classify inbound commands.
    #[must_use]
    pub fn command_topics(&self) -> CommandTopics {
        CommandTopics::new(
            self.add_suffix.clone(),
            self.remove_prefix.clone(),
            self.execute_prefix.clone(),
        )
    }

    /// Interval between health snapshots, or `None` when disabled.
    #[must_use]
    pub const fn health_interval(&self) -> Option<Duration> {
        if self.health_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.health_interval_secs))
        }
    }
}
