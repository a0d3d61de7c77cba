use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ClientId, PlayerId};

/// A single discrete simulation step; one tick resolves one Turn.
pub type Tick = u64;

/// Opaque reference to a map tile (index into the map grid).
pub type TileRef = u32;

/// Troop counts are whole soldiers.
pub type Troops = u64;

/// Gold is wide enough that late-game economies never saturate.
pub type Gold = u128;

/// What kind of entity controls a player slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerType {
    Human,
    /// Small, unnamed AI filler players.
    Bot,
    /// Named AI powers with full diplomatic behavior.
    Nation,
}

/// AI difficulty. Scales attack parallelism, generosity and human-leniency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Affinity tier toward another player, derived from an i32 relation score
/// clamped to [-100, 100].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
    Hostile,
    Distrustful,
    Neutral,
    Friendly,
}

impl Relation {
    /// Tier thresholds: Hostile < -50 <= Distrustful < 0 <= Neutral < 50 <= Friendly.
    pub fn from_score(score: i32) -> Self {
        if score < -50 {
            Relation::Hostile
        } else if score < 0 {
            Relation::Distrustful
        } else if score < 50 {
            Relation::Neutral
        } else {
            Relation::Friendly
        }
    }
}

/// Team labels. Colored teams for team games, `Humans`/`Nations` for the
/// humans-vs-nations mode, `Bots` for the shared bot team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
    Yellow,
    Green,
    Purple,
    Orange,
    Teal,
    Humans,
    Nations,
    Bots,
}

/// How players are grouped for the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    #[default]
    FreeForAll,
    /// Balanced colored teams; the count selects how many labels are used.
    Teams {
        count: u8,
    },
    HumansVsNations,
}

/// Immutable player identity, fixed at lobby time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub player_type: PlayerType,
    /// Present for humans only; bots and nations have no client.
    pub client_id: Option<ClientId>,
}

impl PlayerInfo {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        player_type: PlayerType,
        client_id: Option<ClientId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            player_type,
            client_id,
        }
    }

    /// Clan tag parsed from a `[TAG]Name` prefix, if any.
    pub fn clan(&self) -> Option<&str> {
        let rest = self.name.strip_prefix('[')?;
        let end = rest.find(']')?;
        if end == 0 {
            return None;
        }
        Some(&rest[..end])
    }
}

/// Host-provided team overrides, keyed by client id. Always win over
/// automatic balancing, subject to team capacity.
pub type ManualTeamAssignments = BTreeMap<ClientId, Team>;

/// Match settings agreed at lobby time and identical on every client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    /// Number of filler bots spawned at game start.
    pub bot_count: u32,
    /// Ticks during which only spawn placements execute.
    pub spawn_phase_turns: Tick,
    /// Starting troops granted on spawn.
    pub starting_troops: Troops,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            game_mode: GameMode::FreeForAll,
            bot_count: 0,
            spawn_phase_turns: 30,
            starting_troops: 5_000,
        }
    }
}

/// Mandatory startup payload. A session without one cannot proceed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStartInfo {
    pub game_id: crate::GameId,
    pub settings: GameSettings,
    pub players: Vec<PlayerInfo>,
    /// Unix millis when the lobby was created (for client display/records).
    pub lobby_created_at: u64,
}

/// Terminal result reported by a client at game end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Winner {
    Player { id: PlayerId },
    Team { team: Team },
}

/// Per-player end-of-game statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub tiles_owned_max: u32,
    pub troops_peak: Troops,
    pub gold_earned: Gold,
    pub alive_at_end: bool,
}

/// Stats for every player, keyed by stable player id.
pub type AllPlayersStats = BTreeMap<PlayerId, PlayerStats>;
