//! Forwarding to the downstream controller.
//!
//! Each forward call opens a fresh TCP connection, writes the envelope
//! header and then the body, and optionally waits a bounded time for one
//! header-sized acknowledgment. The connection is closed on every exit
//! path; there is no pooling and no internal retry. A caller wanting
//! retries re-invokes [`Forwarder::forward`].

use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::ConnectionTarget;
use crate::protocol::{Command, HEADER_SIZE, Header, decode_header, encode_body, encode_header};

/// Errors that make a single forward attempt fail.
///
/// Both are per-call and recoverable; the bridge keeps accepting
/// payloads after either.
#[derive(Debug)]
pub enum ForwardError {
    /// Could not establish the connection to the target
    ConnectFailed(io::Error),
    /// Connection established but a write did not complete
    SendFailed(io::Error),
}

impl std::fmt::Display for ForwardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForwardError::ConnectFailed(e) => write!(f, "connect failed: {}", e),
            ForwardError::SendFailed(e) => write!(f, "send failed: {}", e),
        }
    }
}

impl std::error::Error for ForwardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ForwardError::ConnectFailed(e) | ForwardError::SendFailed(e) => Some(e),
        }
    }
}

/// Result of a completed send.
///
/// `NoAcknowledgment` is not a failure: the command was transmitted, the
/// peer just never confirmed within the bound.
#[derive(Debug, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Sent; no response wait was configured
    Sent,
    /// Sent and the peer wrote back a header within the bound. Its
    /// `command_id` is a peer-defined status byte, not validated here.
    Acknowledged(Header),
    /// Sent but no complete header arrived within the bound
    NoAcknowledgment,
}

/// Owns the resolved downstream endpoint and performs forwards.
pub struct Forwarder {
    target: ConnectionTarget,
}

impl Forwarder {
    pub fn new(target: ConnectionTarget) -> Self {
        Forwarder { target }
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// Re-encode `command` and transmit it: header, then body (omitted
    /// when empty). Exactly one delivery attempt per call.
    pub async fn forward(&self, command: &Command) -> Result<ForwardOutcome, ForwardError> {
        let body = encode_body(command);
        let header = match encode_header(command.id(), body.len()) {
            Ok(h) => h,
            // Registry bodies all fit the u16 length field; only reachable
            // if a future command outgrows it.
            Err(e) => {
                return Err(ForwardError::SendFailed(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    e.to_string(),
                )));
            }
        };

        let mut stream = self.connect().await?;

        stream
            .write_all(&header)
            .await
            .map_err(ForwardError::SendFailed)?;
        if !body.is_empty() {
            stream
                .write_all(&body)
                .await
                .map_err(ForwardError::SendFailed)?;
        }

        // Socket closes when `stream` drops, on success and error alike.
        match self.target.response_timeout {
            Some(bound) => Ok(Self::await_acknowledgment(&mut stream, bound).await),
            None => Ok(ForwardOutcome::Sent),
        }
    }

    async fn connect(&self) -> Result<TcpStream, ForwardError> {
        match self.target.response_timeout {
            Some(bound) => match timeout(bound, TcpStream::connect(self.target.addr)).await {
                Ok(result) => result.map_err(ForwardError::ConnectFailed),
                Err(_) => Err(ForwardError::ConnectFailed(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "connect timed out",
                ))),
            },
            // Legacy behavior: no configured timeout means an unbounded connect.
            None => TcpStream::connect(self.target.addr)
                .await
                .map_err(ForwardError::ConnectFailed),
        }
    }

    /// Wait up to `bound` for one header-sized response. Never escalates:
    /// a silent, short-writing, or disconnecting peer all degrade to
    /// `NoAcknowledgment`.
    async fn await_acknowledgment(stream: &mut TcpStream, bound: std::time::Duration) -> ForwardOutcome {
        let mut buf = [0u8; HEADER_SIZE];

        match timeout(bound, stream.read_exact(&mut buf)).await {
            Ok(Ok(_)) => match decode_header(&buf) {
                Ok(header) => {
                    println!(
                        "Remote: acknowledgment: status=0x{:02x} length={}",
                        header.command_id, header.body_length
                    );
                    ForwardOutcome::Acknowledged(header)
                }
                Err(e) => {
                    eprintln!("Remote: unreadable acknowledgment: {}", e);
                    ForwardOutcome::NoAcknowledgment
                }
            },
            Ok(Err(e)) => {
                eprintln!("Remote: response read failed: {}", e);
                ForwardOutcome::NoAcknowledgment
            }
            Err(_) => {
                println!("Remote: response timed out");
                ForwardOutcome::NoAcknowledgment
            }
        }
    }
}
