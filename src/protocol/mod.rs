mod codec;
mod commands;
mod constants;
mod registry;

pub use codec::{
    DecodeError, EncodeError, HEADER_SIZE, Header, decode_body, decode_header, encode_body,
    encode_header,
};
pub use commands::Command;
pub use constants::*;
pub use registry::{COMMANDS, CommandSpec, command_spec};
