//! Turn production. The scheduler owns the authoritative turn list and
//! decides, on wall-clock cadence, when to close the next turn. It
//! never touches game state itself; the session executes turns and
//! reports hashes back.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};
use warfront_protocol::{
    AllPlayersStats, ClientMessage, GameStartInfo, Intent, ServerMessage, Tick, Turn, Winner,
};

use crate::config::ServerConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The mandatory start payload is absent; the session cannot run.
    #[error("game start info is missing")]
    MissingStartInfo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Paused,
    Ended,
}

pub struct TurnScheduler {
    config: ServerConfig,
    start_info: Option<GameStartInfo>,
    /// Archived turns when replaying a recorded game.
    replay_archive: Option<Vec<Turn>>,
    turns: Vec<Turn>,
    /// Turns the consumer has confirmed executing. Production stalls
    /// until this catches up with `turns.len()`.
    turns_executed: u64,
    intent_buffer: Vec<Intent>,
    state: SchedulerState,
    turn_start: Option<Instant>,
    winner: Option<(Winner, AllPlayersStats)>,
    outbound: Vec<ServerMessage>,
}

impl TurnScheduler {
    pub fn new(config: ServerConfig, start_info: Option<GameStartInfo>) -> Self {
        Self {
            config,
            start_info,
            replay_archive: None,
            turns: Vec::new(),
            turns_executed: 0,
            intent_buffer: Vec::new(),
            state: SchedulerState::Idle,
            turn_start: None,
            winner: None,
            outbound: Vec::new(),
        }
    }

    /// Scheduler that re-runs an archived game verbatim.
    pub fn new_replay(
        config: ServerConfig,
        start_info: Option<GameStartInfo>,
        archive: Vec<Turn>,
    ) -> Self {
        let mut scheduler = Self::new(config, start_info);
        scheduler.replay_archive = Some(archive);
        scheduler
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_replay(&self) -> bool {
        self.replay_archive.is_some()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn winner(&self) -> Option<&(Winner, AllPlayersStats)> {
        self.winner.as_ref()
    }

    /// Messages produced since the last call, in order.
    pub fn take_outbound(&mut self) -> Vec<ServerMessage> {
        std::mem::take(&mut self.outbound)
    }

    pub fn start(&mut self, now: Instant) -> Result<(), SchedulerError> {
        let info = self
            .start_info
            .as_ref()
            .ok_or(SchedulerError::MissingStartInfo)?;
        if self.state != SchedulerState::Idle {
            return Ok(());
        }
        info!(
            game_id = %info.game_id,
            replay = self.is_replay(),
            "session starting"
        );
        self.outbound.push(ServerMessage::Start {
            game_start_info: info.clone(),
            turns: self.turns.clone(),
            lobby_created_at: info.lobby_created_at,
        });
        self.state = SchedulerState::Running;
        self.turn_start = Some(now);
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Paused;
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.state == SchedulerState::Paused {
            self.state = SchedulerState::Running;
            self.turn_start = Some(now);
        }
    }

    pub fn end_game(&mut self) {
        if self.state != SchedulerState::Ended {
            info!(turns = self.turns.len(), "session ended");
            self.state = SchedulerState::Ended;
        }
    }

    /// Adjusts the wall-clock pacing mid-game. Takes effect from the
    /// next turn boundary.
    pub fn set_replay_speed(&mut self, percent: u32) {
        self.config.replay_speed_percent = percent.max(1);
    }

    /// The cadence check, called every poll interval. Fires a turn only
    /// when the consumer has fully executed all produced turns AND the
    /// effective turn interval has elapsed. Slow consumers therefore
    /// throttle production naturally.
    pub fn poll(&mut self, now: Instant) {
        if self.state != SchedulerState::Running {
            return;
        }
        if self.turns_executed < self.turns.len() as u64 {
            return;
        }
        let due = self
            .turn_start
            .map_or(true, |start| now.duration_since(start) >= self.config.effective_turn_interval());
        if due {
            self.end_turn(now);
        }
    }

    fn end_turn(&mut self, now: Instant) {
        let turn_number = self.turns.len() as Tick;
        let turn = if let Some(archive) = &self.replay_archive {
            // Replay: archived intents verbatim, live intents ignored.
            match archive.get(turn_number as usize) {
                Some(t) => t.clone(),
                None => {
                    info!(turn = turn_number, "replay archive exhausted");
                    self.end_game();
                    return;
                }
            }
        } else {
            Turn::new(turn_number, std::mem::take(&mut self.intent_buffer))
        };
        self.turns.push(turn.clone());
        self.turn_start = Some(now);
        self.outbound.push(ServerMessage::Turn { turn });
    }

    pub fn on_message(&mut self, message: ClientMessage) {
        match message {
            ClientMessage::Intent { intent } => {
                if self.state == SchedulerState::Paused {
                    warn!("intent rejected: game is paused");
                    return;
                }
                if self.is_replay() {
                    warn!("intent rejected: live actions cannot alter a replay");
                    return;
                }
                if self.state != SchedulerState::Running {
                    warn!(state = ?self.state, "intent rejected: not running");
                    return;
                }
                self.intent_buffer.push(intent);
            }
            ClientMessage::Hash { turn_number, hash } => {
                self.turns_executed = self.turns_executed.max(turn_number + 1);
                if self.is_replay() {
                    self.verify_replay_hash(turn_number, hash);
                } else if turn_number % self.config.hash_store_period == 0 {
                    if let Some(turn) = self.turns.get_mut(turn_number as usize) {
                        turn.hash = Some(hash);
                    }
                }
            }
            ClientMessage::Rejoin => match &self.start_info {
                Some(info) => {
                    debug!(turns = self.turns.len(), "rejoin: resending all turns");
                    self.outbound.push(ServerMessage::Start {
                        game_start_info: info.clone(),
                        turns: self.turns.clone(),
                        lobby_created_at: info.lobby_created_at,
                    });
                }
                None => warn!("rejoin without start info"),
            },
            ClientMessage::Winner {
                winner,
                all_players_stats,
            } => {
                info!(?winner, "winner reported");
                self.winner = Some((winner, all_players_stats));
            }
        }
    }

    /// Every reported hash is checked in replay mode. A mismatch is
    /// informational; production continues.
    fn verify_replay_hash(&mut self, turn_number: Tick, your_hash: u64) {
        let archived = self
            .replay_archive
            .as_ref()
            .and_then(|a| a.get(turn_number as usize))
            .and_then(|t| t.hash);
        match archived {
            Some(correct_hash) if correct_hash != your_hash => {
                warn!(
                    turn = turn_number,
                    correct_hash, your_hash, "desync detected during replay"
                );
                self.outbound.push(ServerMessage::Desync {
                    turn: turn_number,
                    correct_hash,
                    clients_with_correct_hash: 0,
                    total_active_clients: 1,
                    your_hash,
                });
            }
            Some(_) => {}
            None => {
                warn!(turn = turn_number, "no archived hash for turn, skipping check");
            }
        }
    }
}
