//! Bridge orchestration.
//!
//! [`BridgeController`] is the entry point the inbound payload source
//! invokes once per completed reception: decode the payload, forward the
//! typed command, report the outcome. Every failure is per-payload; the
//! bridge itself never goes down because one payload was bad or one send
//! failed.
//!
//! [`BridgeAdapter`] wraps the controller in the receive-callback shape
//! the audio SDK expects, so the core stays independent of that
//! interface.

use std::io;

use crate::config::BridgeConfig;
use crate::decoder;
use crate::forwarder::{ForwardError, ForwardOutcome, Forwarder};
use crate::protocol::DecodeError;

/// Per-payload outcome reported to the caller.
#[derive(Debug)]
pub enum BridgeResult {
    /// Decoded and transmitted; see the outcome for ack status
    Forwarded(ForwardOutcome),
    /// Payload was not a valid command; dropped, nothing sent
    DecodeFailed(DecodeError),
    /// Valid command, but delivery to the target failed
    ForwardFailed(ForwardError),
}

impl BridgeResult {
    /// Whether the command reached the wire (acknowledged or not).
    pub fn is_delivered(&self) -> bool {
        matches!(self, BridgeResult::Forwarded(_))
    }
}

/// Decodes inbound payloads and forwards them downstream.
///
/// Holds no cross-call state besides the forwarder's immutable target,
/// so a shared reference can serve overlapping receptions; each forward
/// still gets its own connection.
pub struct BridgeController {
    forwarder: Forwarder,
}

impl BridgeController {
    /// Resolve the downstream target and build the bridge. Called once
    /// by the lifecycle host before any payload is processed.
    pub async fn connect(config: &BridgeConfig) -> io::Result<Self> {
        let target = config.resolve().await?;
        match target.response_timeout {
            Some(bound) => println!(
                "Bridge: forwarding to {} (response wait {}ms)",
                target.addr,
                bound.as_millis()
            ),
            None => println!("Bridge: forwarding to {} (no response wait)", target.addr),
        }

        Ok(BridgeController {
            forwarder: Forwarder::new(target),
        })
    }

    /// Process one received payload to completion.
    pub async fn on_payload_received(&self, payload: &[u8]) -> BridgeResult {
        println!("Bridge: payload received: {}", hex::encode(payload));

        let command = match decoder::decode(payload) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("Bridge: dropping payload: {}", e);
                return BridgeResult::DecodeFailed(e);
            }
        };

        println!("Bridge: forwarding {}", command);
        match self.forwarder.forward(&command).await {
            Ok(outcome) => BridgeResult::Forwarded(outcome),
            Err(e) => {
                eprintln!("Bridge: forward failed: {}", e);
                BridgeResult::ForwardFailed(e)
            }
        }
    }

    /// Called once by the lifecycle host after processing ends. The
    /// bridge holds no open resources; this only marks the teardown.
    pub fn shutdown(&self) {
        println!("Bridge: shutting down");
    }
}

/// Receive-event interface in the shape the audio SDK calls back with.
#[allow(async_fn_in_trait)]
pub trait ReceiveEvents {
    /// Incoming transmission detected on `channel`
    fn on_receiving(&self, channel: u8);
    /// Reception on `channel` completed; `None` means the upstream
    /// decoder could not recover a payload
    async fn on_received(&self, payload: Option<&[u8]>, channel: u8);
}

/// Adapter binding the SDK callback shape to the bridge controller.
pub struct BridgeAdapter {
    controller: BridgeController,
}

impl BridgeAdapter {
    pub fn new(controller: BridgeController) -> Self {
        BridgeAdapter { controller }
    }

    pub fn controller(&self) -> &BridgeController {
        &self.controller
    }
}

impl ReceiveEvents for BridgeAdapter {
    fn on_receiving(&self, channel: u8) {
        println!("Bridge: incoming data [ch{}]...", channel);
    }

    async fn on_received(&self, payload: Option<&[u8]>, channel: u8) {
        match payload {
            Some(payload) => {
                let result = self.controller.on_payload_received(payload).await;
                println!("Bridge: [ch{}] result: {:?}", channel, result);
            }
            None => eprintln!("Bridge: [ch{}] upstream decoding failed", channel),
        }
    }
}
