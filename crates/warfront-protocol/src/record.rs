use serde::{Deserialize, Serialize};

use crate::{AllPlayersStats, GameId, GameStartInfo, Turn, Winner};

/// Current game record schema version.
pub const GAME_RECORD_VERSION: u32 = 1;

/// Archived game: start info plus every closed turn.
///
/// Replaying a record feeds its turns to the scheduler verbatim; archived
/// per-turn hashes (stored every 100th turn live) are compared against the
/// replaying client's reported hashes to detect divergence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Record schema version.
    pub version: u32,
    pub game_id: GameId,
    pub start_info: GameStartInfo,
    pub turns: Vec<Turn>,
    #[serde(default)]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub all_players_stats: AllPlayersStats,
}

impl GameRecord {
    pub fn new(start_info: GameStartInfo, turns: Vec<Turn>) -> Self {
        Self {
            version: GAME_RECORD_VERSION,
            game_id: start_info.game_id.clone(),
            start_info,
            turns,
            winner: None,
            all_players_stats: AllPlayersStats::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{serialize_game_record, deserialize_game_record, GameSettings};

    #[test]
    fn record_roundtrip_preserves_turn_hashes() {
        let start_info = GameStartInfo {
            game_id: "g-rec".into(),
            settings: GameSettings::default(),
            players: Vec::new(),
            lobby_created_at: 1,
        };
        let mut turn = Turn::new(0, Vec::new());
        turn.hash = Some(0xfeed);
        let record = GameRecord::new(start_info, vec![turn]);

        let bytes = serialize_game_record(&record).unwrap();
        let back = deserialize_game_record(&bytes).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.turns[0].hash, Some(0xfeed));
    }
}
