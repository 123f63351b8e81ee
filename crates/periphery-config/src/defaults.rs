use crate::logging::LogFormat;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Topic suffix that selects the `add` command.
pub const DEFAULT_ADD_SUFFIX: &str = "add";

/// Topic prefix that selects the `remove` command.
pub const DEFAULT_REMOVE_PREFIX: &str = "remove";

/// Topic prefix that selects the `execute` command.
pub const DEFAULT_EXECUTE_PREFIX: &str = "execute";

/// Seconds between system health snapshots.
pub const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 30;

/// Default log filter expression used by the daemon.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

pub(crate) fn default_add_suffix() -> String {
    DEFAULT_ADD_SUFFIX.to_owned()
}

pub(crate) fn default_remove_prefix() -> String {
    DEFAULT_REMOVE_PREFIX.to_owned()
}

pub(crate) fn default_execute_prefix() -> String {
    DEFAULT_EXECUTE_PREFIX.to_owned()
}

pub(crate) const fn default_health_interval_secs() -> u64 {
    DEFAULT_HEALTH_INTERVAL_SECS
}
