//! Bridges an acoustic data channel to a motor controller.
//!
//! Payloads decoded from the audio channel arrive as opaque byte
//! buffers. Each one is validated against a small fixed binary command
//! protocol, re-encoded as a wire envelope (header + body, big-endian),
//! and forwarded over a fresh TCP connection to the downstream
//! controller, optionally waiting a bounded time for an acknowledgment
//! header.

pub mod bridge;
pub mod config;
pub mod decoder;
pub mod forwarder;
pub mod protocol;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use bridge::{BridgeAdapter, BridgeController, BridgeResult, ReceiveEvents};
pub use config::{BridgeConfig, ConnectionTarget};
pub use decoder::decode;
pub use forwarder::{ForwardError, ForwardOutcome, Forwarder};
pub use protocol::{Command, DecodeError, EncodeError, HEADER_SIZE, Header};
