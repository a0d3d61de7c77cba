//! Deterministic turn-execution engine and AI decision layer for
//! Warfront.
//!
//! The core invariant: given the same seed and the same ordered intent
//! stream, two independent `Game` instances stay bit-identical forever,
//! which is what makes lockstep multiplayer, replay files and
//! cross-client hash verification possible. Everything random routes
//! through one seeded [`PseudoRandom`], every iterated collection is
//! ordered, and all simulation state is mutated single-threaded inside
//! the tick loop.

pub mod behavior;
mod bot_names;
mod bots;
mod config;
pub mod execution;
mod game;
mod map;
mod player;
mod rng;
mod team;

pub use crate::bot_names::{BOT_NAMES, SPECIAL_NAMES};
pub use crate::bots::{BotSpawn, BotSpawner};
pub use crate::config::GameConfig;
pub use crate::game::{AttackRecord, Game, GameEvent, IntentError};
pub use crate::map::{closest_two_tiles, GameMap};
pub use crate::player::Player;
pub use crate::rng::PseudoRandom;
pub use crate::team::{
    assign_teams, assign_teams_for_mode, assign_teams_lobby_preview, teams_for_count, Assigned,
};
