//! Binary wire codec for the motor-control protocol.
//!
//! The protocol uses big-endian byte order throughout. Every transmission
//! is a fixed-size envelope header followed by a fixed-size command body:
//!
//! ```text
//! +------------+---------------+------------------+
//! | command_id | body_length   | body             |
//! | (u8)       | (u16, BE)     | (body_length B)  |
//! +------------+---------------+------------------+
//! ```
//!
//! All functions here are pure transformations over byte buffers; no I/O
//! and no state. Body lengths are validated against the command registry
//! before the per-command parsers run.

use byteorder::{BigEndian, ByteOrder};

use super::commands::Command;
use super::registry::command_spec;

/// Size of the wire envelope header in bytes.
pub const HEADER_SIZE: usize = 3;

/// The fixed-size envelope sent before every command body.
///
/// Also the shape of the acknowledgment a downstream peer may send back,
/// in which case `command_id` is a peer-defined status byte.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Header {
    pub command_id: u8,
    pub body_length: u16,
}

/// Errors that can occur when encoding wire data.
#[derive(Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// Body length does not fit the header's u16 length field
    BodyTooLarge(usize),
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::BodyTooLarge(len) => {
                write!(f, "body of {} bytes exceeds the u16 length field", len)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Errors that can occur when decoding payloads or wire data.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Zero-length inbound payload
    EmptyPayload,
    /// Command identifier byte not present in the registry
    UnknownCommand(u8),
    /// Body byte count does not equal the command's fixed body size
    LengthMismatch { expected: usize, actual: usize },
    /// Fewer bytes than a complete header
    TruncatedInput,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::EmptyPayload => write!(f, "empty payload"),
            DecodeError::UnknownCommand(id) => write!(f, "unknown command id 0x{:02x}", id),
            DecodeError::LengthMismatch { expected, actual } => {
                write!(f, "body length mismatch: expected {}, got {}", expected, actual)
            }
            DecodeError::TruncatedInput => write!(f, "truncated input"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Encode an envelope header for the given command id and body length.
pub fn encode_header(command_id: u8, body_length: usize) -> Result<Vec<u8>, EncodeError> {
    let len = u16::try_from(body_length).map_err(|_| EncodeError::BodyTooLarge(body_length))?;

    let mut buf = vec![0u8; HEADER_SIZE];
    buf[0] = command_id;
    BigEndian::write_u16(&mut buf[1..HEADER_SIZE], len);
    Ok(buf)
}

/// Decode an envelope header from the front of `data`.
pub fn decode_header(data: &[u8]) -> Result<Header, DecodeError> {
    if data.len() < HEADER_SIZE {
        return Err(DecodeError::TruncatedInput);
    }

    Ok(Header {
        command_id: data[0],
        body_length: BigEndian::read_u16(&data[1..HEADER_SIZE]),
    })
}

/// Encode a command's body in wire order. Bodiless commands yield an
/// empty buffer.
pub fn encode_body(command: &Command) -> Vec<u8> {
    match command {
        Command::MotorSettings { value } => {
            let mut buf = vec![0u8; 4];
            BigEndian::write_i32(&mut buf, *value);
            buf
        }
        Command::MotorSpeed { left, right } => {
            let mut buf = vec![0u8; 8];
            BigEndian::write_i32(&mut buf[0..4], *left);
            BigEndian::write_i32(&mut buf[4..8], *right);
            buf
        }
        Command::MotorStop => Vec::new(),
    }
}

/// Decode a command body for the given identifier.
///
/// The body length is checked against the registry before the per-command
/// parser runs, so parsers never see a wrong-sized buffer.
pub fn decode_body(command_id: u8, body: &[u8]) -> Result<Command, DecodeError> {
    let spec = command_spec(command_id).ok_or(DecodeError::UnknownCommand(command_id))?;

    if body.len() != spec.body_len {
        return Err(DecodeError::LengthMismatch {
            expected: spec.body_len,
            actual: body.len(),
        });
    }

    (spec.decode_body)(body)
}

/// Read a big-endian `i32` from the data at the current cursor position.
///
/// Advances the cursor by 4 bytes on success.
fn read_i32_be(data: &[u8], cursor: &mut usize) -> Result<i32, DecodeError> {
    let bytes = data
        .get(*cursor..*cursor + 4)
        .ok_or(DecodeError::TruncatedInput)?;
    *cursor += 4;
    Ok(i32::from_be_bytes(bytes.try_into().unwrap()))
}

/// Parse a MOTOR_SETTINGS body: `[value: i32 BE]`.
pub(super) fn parse_motor_settings(body: &[u8]) -> Result<Command, DecodeError> {
    let mut cursor = 0;
    let value = read_i32_be(body, &mut cursor)?;

    Ok(Command::MotorSettings { value })
}

/// Parse a MOTOR_SPEED body: `[left: i32 BE][right: i32 BE]`.
pub(super) fn parse_motor_speed(body: &[u8]) -> Result<Command, DecodeError> {
    let mut cursor = 0;
    let left = read_i32_be(body, &mut cursor)?;
    let right = read_i32_be(body, &mut cursor)?;

    Ok(Command::MotorSpeed { left, right })
}

/// Parse a MOTOR_STOP body (always empty).
pub(super) fn parse_motor_stop(_body: &[u8]) -> Result<Command, DecodeError> {
    Ok(Command::MotorStop)
}
