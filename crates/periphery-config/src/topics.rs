//! Topic identifiers that select registry commands.

use crate::defaults::{DEFAULT_ADD_SUFFIX, DEFAULT_EXECUTE_PREFIX, DEFAULT_REMOVE_PREFIX};

/// The three identifiers matched against the last topic segment.
///
/// Every identifier matches as a prefix of the segment, so controllers may
/// append qualifiers such as `addSensor` or `execute-now`. Add is tested
/// first, then remove, then execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTopics {
    add_suffix: String,
    remove_prefix: String,
    execute_prefix: String,
}

impl CommandTopics {
    /// Builds a topic set from explicit identifiers.
    #[must_use]
    pub const fn new(add_suffix: String, remove_prefix: String, execute_prefix: String) -> Self {
        Self {
            add_suffix,
            remove_prefix,
            execute_prefix,
        }
    }

    /// Identifier selecting `add`.
    #[must_use]
    pub fn add_suffix(&self) -> &str {
        &self.add_suffix
    }

    /// Identifier prefix selecting `remove`.
    #[must_use]
    pub fn remove_prefix(&self) -> &str {
        &self.remove_prefix
    }

    /// Identifier prefix selecting `execute`.
    #[must_use]
    pub fn execute_prefix(&self) -> &str {
        &self.execute_prefix
    }
}

impl Default for CommandTopics {
    fn default() -> Self {
        Self::new(
            DEFAULT_ADD_SUFFIX.to_owned(),
            DEFAULT_REMOVE_PREFIX.to_owned(),
            DEFAULT_EXECUTE_PREFIX.to_owned(),
        )
    }
}
