//! Error types for command routing failures.

use periphery_registry::{ErrorKind, RegistryError};
use thiserror::Error;

/// Errors surfaced while routing a command.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The payload was not a JSON object.
    #[error("malformed payload: {message}")]
    MalformedPayload {
        /// Description of the decoding failure.
        message: String,
        /// Underlying JSON error, when decoding got that far.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The topic's final segment matched no command identifier.
    #[error("unknown command '{command}'")]
    UnknownCommand {
        /// The unmatched command segment.
        command: String,
    },

    /// The registry rejected the operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl RouteError {
    /// Creates a malformed payload error from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedPayload {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed payload error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unknown command error.
    #[must_use]
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }

    /// Returns the registry classification when the registry produced the error.
    #[must_use]
    pub const fn registry_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Registry(error) => Some(error.kind()),
            Self::MalformedPayload { .. } | Self::UnknownCommand { .. } => None,
        }
    }
}
