//! Line parsing for the stdin transport.
//!
//! Each non-blank line carries `<topic> <payload>`, split on the first run of
//! whitespace. The payload is kept as raw text so the router can report a
//! malformed payload instead of the transport dropping the line.

/// A command read from the transport before routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    topic: String,
    payload: String,
}

impl InboundCommand {
    /// Creates a command from an already separated topic and payload.
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Parses a transport line, returning `None` for blank lines.
    ///
    /// A line without whitespace is a topic with an empty payload.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let (topic, payload) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        Some(Self::new(topic, payload.trim_start()))
    }

    /// The full topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The raw payload text.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The final `/`-separated segment of the topic.
    #[must_use]
    pub fn command(&self) -> &str {
        command_segment(&self.topic)
    }
}

/// Returns the text after the last `/`, or the whole topic without one.
pub(crate) fn command_segment(topic: &str) -> &str {
    topic.rsplit_once('/').map_or(topic, |(_, last)| last)
}
