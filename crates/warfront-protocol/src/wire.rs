//! Wire messages and codecs.
//!
//! MessagePack (via `rmp-serde`) is the binary wire format; JSON helpers
//! exist for records and debugging. The FNV-1a hash here is the stable
//! 64-bit hash used for state fingerprints and id-derived seeds.

use rmp_serde::{decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AllPlayersStats, GameRecord, GameStartInfo, Intent, Tick, Winner};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("encode error: {0}")]
    Encode(#[from] encode::Error),
    #[error("decode error: {0}")]
    Decode(#[from] decode::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The batch of intents resolved at a given tick.
///
/// Created by the scheduler when the turn interval elapses; immutable
/// afterwards except for attaching a reported state hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub turn_number: Tick,
    pub intents: Vec<Intent>,
    /// State fingerprint reported by the consumer, attached after the fact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<u64>,
}

impl Turn {
    pub fn new(turn_number: Tick, intents: Vec<Intent>) -> Self {
        Self {
            turn_number,
            intents,
            hash: None,
        }
    }
}

/// Client-to-server messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Submit an action for the next turn.
    Intent { intent: Intent },
    /// Report the computed state hash for a finished turn.
    Hash { turn_number: Tick, hash: u64 },
    /// Request a full-state resend of all turns so far.
    Rejoin,
    /// Report the terminal game result and per-player statistics.
    Winner {
        winner: Winner,
        all_players_stats: AllPlayersStats,
    },
}

/// Server-to-client messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Session start (or rejoin catch-up: `turns` holds everything so far).
    Start {
        game_start_info: GameStartInfo,
        turns: Vec<Turn>,
        lobby_created_at: u64,
    },
    /// A closed turn, ready for execution.
    Turn { turn: Turn },
    /// Divergence report. Informational; turn production continues.
    Desync {
        turn: Tick,
        correct_hash: u64,
        clients_with_correct_hash: u32,
        total_active_clients: u32,
        your_hash: u64,
    },
}

pub fn serialize_client_message(msg: &ClientMessage) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec(msg)?)
}

pub fn deserialize_client_message(bytes: &[u8]) -> Result<ClientMessage, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_server_message(msg: &ServerMessage) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec(msg)?)
}

pub fn deserialize_server_message(bytes: &[u8]) -> Result<ServerMessage, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_game_record(record: &GameRecord) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec(record)?)
}

pub fn deserialize_game_record(bytes: &[u8]) -> Result<GameRecord, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_game_record_json(record: &GameRecord) -> Result<String, WireError> {
    Ok(serde_json::to_string(record)?)
}

/// Deterministic, stable 64-bit hash for raw bytes (FNV-1a).
pub fn hash_bytes_fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut hash = OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameSettings, PlayerId};

    #[test]
    fn fnv1a64_known_values() {
        // Empty input hashes to the offset basis.
        assert_eq!(hash_bytes_fnv1a64(b""), 0xcbf29ce484222325);
        assert_ne!(hash_bytes_fnv1a64(b"a"), hash_bytes_fnv1a64(b"b"));
    }

    #[test]
    fn client_message_roundtrip() {
        let msg = ClientMessage::Intent {
            intent: Intent::Attack {
                player: PlayerId(2),
                target: Some(PlayerId(5)),
                troops: 300,
            },
        };
        let bytes = serialize_client_message(&msg).unwrap();
        assert_eq!(deserialize_client_message(&bytes).unwrap(), msg);
    }

    #[test]
    fn server_message_roundtrip() {
        let msg = ServerMessage::Desync {
            turn: 42,
            correct_hash: 0xabc,
            clients_with_correct_hash: 0,
            total_active_clients: 1,
            your_hash: 0xdef,
        };
        let bytes = serialize_server_message(&msg).unwrap();
        assert_eq!(deserialize_server_message(&bytes).unwrap(), msg);
    }

    #[test]
    fn turn_hash_is_optional_on_the_wire() {
        let start = ServerMessage::Start {
            game_start_info: GameStartInfo {
                game_id: "g1".into(),
                settings: GameSettings::default(),
                players: Vec::new(),
                lobby_created_at: 0,
            },
            turns: vec![Turn::new(0, Vec::new())],
            lobby_created_at: 0,
        };
        let bytes = serialize_server_message(&start).unwrap();
        let ServerMessage::Start { turns, .. } = deserialize_server_message(&bytes).unwrap() else {
            panic!("expected start message");
        };
        assert_eq!(turns[0].hash, None);
    }
}
