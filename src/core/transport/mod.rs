//! Transport layer for the adapter servers.
//!
//! Adapters are launched by an editor as child processes and speak MCP over
//! standard input/output, so stdio is the only transport.

mod error;
mod stdio;

pub use error::{TransportError, TransportResult};
pub use stdio::StdioTransport;
