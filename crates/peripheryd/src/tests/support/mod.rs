//! Test harness utilities shared by the daemon suites.

mod buffer;
mod config_loader;
mod reporter;
mod sink;

pub use buffer::SharedBuffer;
pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use sink::RecordingErrorSink;
