//! Command identifier constants for the motor-control wire protocol.
//!
//! Each inbound payload and each wire envelope starts with one of these
//! bytes. Identifier values are stable for the lifetime of the protocol
//! version; a byte outside this set is a decode error, never a fallback.

/// Apply persistent motor settings (body: one i32, big-endian)
pub const CMD_MOTOR_SETTINGS: u8 = 1;

/// Set left/right motor speed (body: two i32, big-endian)
pub const CMD_MOTOR_SPEED: u8 = 2;

/// Stop all motors (no body)
pub const CMD_MOTOR_STOP: u8 = 3;
