//! Topic classification and registry dispatch.
//!
//! Routing has no state beyond its configuration: the registry is passed in
//! for each command, so the router never holds peripherals itself.

use std::sync::Arc;

use periphery_config::CommandTopics;
use periphery_registry::{CommandDocument, ErrorReport, ErrorSink, PeripheralRegistry, TaskOutcome};
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::RouteError;
use super::request::command_segment;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Operation identifier used when reporting routing failures.
pub const ROUTE_OPERATION: &str = "route";

/// Registry operation selected by a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Register a new peripheral.
    Add,
    /// Remove a peripheral.
    Remove,
    /// Run a task against a peripheral.
    Execute,
}

impl CommandKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Execute => "execute",
        }
    }
}

/// Result of a successfully routed command.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The peripheral was registered.
    Added {
        /// Name of the new peripheral.
        name: String,
    },
    /// The peripheral was removed, or was not registered.
    Removed {
        /// Name from the command.
        name: String,
    },
    /// A task ran to completion.
    Executed {
        /// Name of the peripheral the task ran against.
        name: String,
        /// What the task produced.
        outcome: TaskOutcome,
    },
}

impl RouteOutcome {
    /// The operation that produced this outcome.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Added { .. } => CommandKind::Add,
            Self::Removed { .. } => CommandKind::Remove,
            Self::Executed { .. } => CommandKind::Execute,
        }
    }

    /// The peripheral name the command addressed.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Added { name } | Self::Removed { name } | Self::Executed { name, .. } => name,
        }
    }

    /// Task output for `execute`, when the task produced any.
    #[must_use]
    pub fn output(&self) -> Option<&Value> {
        match self {
            Self::Executed { outcome, .. } => Some(outcome.output()).filter(|value| !value.is_null()),
            Self::Added { .. } | Self::Removed { .. } => None,
        }
    }
}

/// Routes topic/payload pairs to registry operations.
pub struct CommandRouter {
    topics: CommandTopics,
    sink: Arc<dyn ErrorSink>,
}

impl CommandRouter {
    /// Creates a router matching the given identifiers.
    ///
    /// Routing failures go to `sink`; registry failures are reported by the
    /// registry itself.
    #[must_use]
    pub fn new(topics: CommandTopics, sink: Arc<dyn ErrorSink>) -> Self {
        Self { topics, sink }
    }

    /// Classifies a command segment.
    ///
    /// Each identifier matches as a prefix of the segment. Add is checked
    /// first, then remove, then execute.
    #[must_use]
    pub fn classify(&self, command: &str) -> Option<CommandKind> {
        if command.starts_with(self.topics.add_suffix()) {
            Some(CommandKind::Add)
        } else if command.starts_with(self.topics.remove_prefix()) {
            Some(CommandKind::Remove)
        } else if command.starts_with(self.topics.execute_prefix()) {
            Some(CommandKind::Execute)
        } else {
            None
        }
    }

    /// Decodes the payload and invokes the registry operation the topic names.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::MalformedPayload`] when the payload is not a JSON
    /// object, [`RouteError::UnknownCommand`] when the topic matches no
    /// identifier, and [`RouteError::Registry`] when the registry rejects the
    /// operation. The registry is untouched in the first two cases.
    pub fn route(
        &self,
        registry: &mut PeripheralRegistry,
        topic: &str,
        payload: &str,
    ) -> Result<RouteOutcome, RouteError> {
        let command = command_segment(topic);
        let result = self.try_route(registry, command, payload);
        if let Err(error) = &result
            && error.registry_kind().is_none()
        {
            warn!(target: DISPATCH_TARGET, topic, %error, "command rejected");
            self.sink
                .report(&ErrorReport::new(ROUTE_OPERATION, error.to_string()));
        }
        result
    }

    fn try_route(
        &self,
        registry: &mut PeripheralRegistry,
        command: &str,
        payload: &str,
    ) -> Result<RouteOutcome, RouteError> {
        let document = decode_payload(payload)?;
        let kind = self
            .classify(command)
            .ok_or_else(|| RouteError::unknown_command(command))?;

        debug!(
            target: DISPATCH_TARGET,
            command,
            kind = kind.as_str(),
            "routing command"
        );

        // The registry has validated the name by the time it returns `Ok`.
        let name = || document.name().unwrap_or_default().to_owned();
        match kind {
            CommandKind::Add => {
                registry.add(&document)?;
                Ok(RouteOutcome::Added { name: name() })
            }
            CommandKind::Remove => {
                registry.remove(&document)?;
                Ok(RouteOutcome::Removed { name: name() })
            }
            CommandKind::Execute => {
                let outcome = registry.execute(&document)?;
                Ok(RouteOutcome::Executed {
                    name: name(),
                    outcome,
                })
            }
        }
    }
}

fn decode_payload(payload: &str) -> Result<CommandDocument, RouteError> {
    if payload.trim().is_empty() {
        return Err(RouteError::malformed("empty payload"));
    }

    let value: Value = serde_json::from_str(payload).map_err(RouteError::from_json_error)?;
    CommandDocument::try_from(value).map_err(|other| {
        RouteError::malformed(format!("expected a JSON object, found {}", json_kind(&other)))
    })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
