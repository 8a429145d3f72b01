//! Static command registry.
//!
//! Maps a command identifier byte to its fixed body length and body
//! parser. This table is the single source of truth for body shapes;
//! the decoder and forwarder never hardcode lengths elsewhere. An
//! identifier absent from the table is a decode error.

use super::codec::{self, DecodeError};
use super::commands::Command;
use super::constants::*;

/// Registry entry describing one command's body shape.
pub struct CommandSpec {
    pub id: u8,
    pub name: &'static str,
    /// Exact body size in bytes (0 for bodiless commands)
    pub body_len: usize,
    pub decode_body: fn(&[u8]) -> Result<Command, DecodeError>,
}

/// All commands known to this protocol version.
pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        id: CMD_MOTOR_SETTINGS,
        name: "MOTOR_SETTINGS",
        body_len: 4,
        decode_body: codec::parse_motor_settings,
    },
    CommandSpec {
        id: CMD_MOTOR_SPEED,
        name: "MOTOR_SPEED",
        body_len: 8,
        decode_body: codec::parse_motor_speed,
    },
    CommandSpec {
        id: CMD_MOTOR_STOP,
        name: "MOTOR_STOP",
        body_len: 0,
        decode_body: codec::parse_motor_stop,
    },
];

/// Look up a registry entry by raw identifier byte.
pub fn command_spec(id: u8) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.id == id)
}
