//! Inbound payload decoding.
//!
//! An inbound payload is the raw byte buffer handed over by the audio
//! channel: one identifier byte followed by that command's fixed-size
//! body. Decoding is pure and deterministic; the same payload always
//! yields the same result.

use crate::protocol::{Command, DecodeError, command_spec, decode_body};

/// Decode an inbound payload into a typed command.
///
/// Byte 0 selects the command; the rest must be exactly that command's
/// body. Errors are per-payload and recoverable; the caller drops the
/// payload and continues.
pub fn decode(payload: &[u8]) -> Result<Command, DecodeError> {
    if payload.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let raw_id = payload[0];
    let spec = command_spec(raw_id).ok_or(DecodeError::UnknownCommand(raw_id))?;

    let body = &payload[1..];
    if body.len() != spec.body_len {
        return Err(DecodeError::LengthMismatch {
            expected: spec.body_len,
            actual: body.len(),
        });
    }

    decode_body(raw_id, body)
}
