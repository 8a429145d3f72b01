//! Typed command representation.
//!
//! A [`Command`] is the strongly shaped result of a successful protocol
//! decode. It is created by the decoder, consumed by the forwarder, and
//! never mutated in between.

use super::constants::*;
use super::registry::{CommandSpec, command_spec};

/// A decoded motor-control command.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Command {
    MotorSettings { value: i32 },
    MotorSpeed { left: i32, right: i32 },
    MotorStop,
}

impl Command {
    /// The wire identifier byte for this command.
    pub fn id(&self) -> u8 {
        match self {
            Command::MotorSettings { .. } => CMD_MOTOR_SETTINGS,
            Command::MotorSpeed { .. } => CMD_MOTOR_SPEED,
            Command::MotorStop => CMD_MOTOR_STOP,
        }
    }

    /// The registry entry describing this command's body shape.
    pub fn spec(&self) -> &'static CommandSpec {
        // Every variant has a registry entry by construction.
        match command_spec(self.id()) {
            Some(spec) => spec,
            None => unreachable!("command id {} missing from registry", self.id()),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::MotorSettings { value } => write!(f, "MOTOR_SETTINGS(value={})", value),
            Command::MotorSpeed { left, right } => {
                write!(f, "MOTOR_SPEED(left={}, right={})", left, right)
            }
            Command::MotorStop => write!(f, "MOTOR_STOP"),
        }
    }
}
