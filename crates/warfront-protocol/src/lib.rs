//! Shared protocol types for Warfront.
//!
//! Everything that crosses the wire between clients, the server relay and
//! the game record lives here: identifiers, player/team/relation enums,
//! intents, turns, client/server messages and the MessagePack/JSON codecs.
//! All types serialize deterministically; the state hash helpers are the
//! backbone of cross-client desync detection.

mod ids;
mod intent;
mod record;
mod types;
pub mod wire;

pub use crate::ids::*;
pub use crate::intent::*;
pub use crate::record::*;
pub use crate::types::*;
pub use crate::wire::{
    deserialize_client_message, deserialize_game_record, deserialize_server_message,
    hash_bytes_fnv1a64, serialize_client_message, serialize_game_record, serialize_game_record_json,
    serialize_server_message, ClientMessage, ServerMessage, Turn, WireError,
};
