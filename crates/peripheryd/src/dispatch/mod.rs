//! Command routing from topics to registry operations.
//!
//! Inbound commands arrive as a topic plus a JSON payload. The router reduces
//! the topic to its final segment, decodes the payload into a
//! [`CommandDocument`](periphery_registry::CommandDocument), and calls the
//! matching registry operation. Successful outcomes become JSONL response
//! lines; failures are delivered to the configured error sink.

mod errors;
mod request;
mod response;
mod router;

pub use errors::RouteError;
pub use request::InboundCommand;
pub use response::{JsonlErrorSink, ResponseLine, ResponseWriter};
pub use router::{CommandKind, CommandRouter, ROUTE_OPERATION, RouteOutcome};
