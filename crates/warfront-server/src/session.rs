//! Ties a [`TurnScheduler`] to a core [`Game`] over the wire-message
//! boundary. The session owns both sides: it forwards closed turns into
//! the engine, reports the resulting state hashes back, and watches for
//! a terminal result.

use std::collections::BTreeMap;

use tokio::time::sleep;
use tracing::{debug, info};
use warfront_core::execution::{BotExecution, NationExecution, SpawnExecution};
use warfront_core::{assign_teams_for_mode, Assigned, BotSpawner, Game, GameConfig, GameMap};
use warfront_protocol::{
    simple_hash, AllPlayersStats, ClientMessage, GameRecord, GameStartInfo, Intent,
    ManualTeamAssignments, PlayerId, PlayerInfo, PlayerStats, PlayerType, ServerMessage, Turn,
    Winner,
};

use crate::config::ServerConfig;
use crate::scheduler::{SchedulerError, SchedulerState, TurnScheduler};

/// A running game: scheduler, engine, and the bookkeeping between them.
pub struct GameSession {
    config: ServerConfig,
    start_info: GameStartInfo,
    scheduler: TurnScheduler,
    game: Game,
    stats: AllPlayersStats,
    last_gold: BTreeMap<PlayerId, u128>,
    winner_sent: bool,
}

impl GameSession {
    /// Builds the session: constructs the map and engine from the start
    /// info, assigns teams, seats every human and nation, and scatters
    /// the requested bots.
    pub fn new(config: ServerConfig, start_info: GameStartInfo) -> Self {
        let seed = simple_hash(&start_info.game_id);
        let map = GameMap::all_land(config.map_size, config.map_size);
        let mut game = Game::new(
            GameConfig::new(start_info.settings.clone()),
            map,
            seed,
        );

        let assignments = assign_teams_for_mode(
            start_info.settings.game_mode,
            &start_info.players,
            &ManualTeamAssignments::new(),
        );

        let mut nations = Vec::new();
        for info in &start_info.players {
            if matches!(assignments.get(&info.id), Some(Assigned::Kicked)) {
                info!(player = %info.name, "kicked during team assignment, not seated");
                continue;
            }
            let id = game.add_player(info.clone());
            if let Some(Assigned::Team(team)) = assignments.get(&id) {
                if let Some(player) = game.player_mut(id) {
                    player.set_team(Some(*team));
                }
            }
            if info.player_type == PlayerType::Nation {
                nations.push(id);
            }
        }

        // Nations and bots share one spawner so their sites keep the
        // minimum separation from each other as well as among themselves.
        let spawner_map = game.map().clone();
        let mut spawner = BotSpawner::new(&spawner_map, seed.wrapping_add(1));
        let bot_count = start_info.settings.bot_count;
        let spawns = spawner.spawn_bots(nations.len() as u32 + bot_count);

        let (nation_spawns, bot_spawns) = spawns.split_at(nations.len().min(spawns.len()));
        for (id, spawn) in nations.iter().zip(nation_spawns) {
            game.add_execution(Box::new(SpawnExecution::new(*id, spawn.tile)));
            let driver = NationExecution::new(*id, &game);
            game.add_execution(Box::new(driver));
        }
        for spawn in bot_spawns {
            let id = PlayerId(game.rng().next_id());
            game.add_player(PlayerInfo::new(id, spawn.name.clone(), PlayerType::Bot, None));
            game.add_execution(Box::new(SpawnExecution::new(id, spawn.tile)));
            let driver = BotExecution::new(id, &game);
            game.add_execution(Box::new(driver));
        }

        let scheduler = TurnScheduler::new(config.clone(), Some(start_info.clone()));
        Self {
            config,
            start_info,
            scheduler,
            game,
            stats: AllPlayersStats::new(),
            last_gold: BTreeMap::new(),
            winner_sent: false,
        }
    }

    /// Builds a replay session over an archived record. Turns come from
    /// the record; live intents are refused by the scheduler.
    pub fn new_replay(config: ServerConfig, record: GameRecord) -> Self {
        let mut live = Self::new(config.clone(), record.start_info.clone());
        live.scheduler = TurnScheduler::new_replay(config, Some(record.start_info), record.turns);
        live
    }

    pub fn start(&mut self, now: std::time::Instant) -> Result<(), SchedulerError> {
        self.scheduler.start(now)
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn scheduler_mut(&mut self) -> &mut TurnScheduler {
        &mut self.scheduler
    }

    /// Validates a live intent against current state before handing it
    /// to the scheduler. Invalid intents never reach a turn.
    pub fn submit_intent(&mut self, intent: Intent) -> Result<(), warfront_core::IntentError> {
        self.game.validate_intent(&intent)?;
        self.scheduler.on_message(ClientMessage::Intent { intent });
        Ok(())
    }

    /// One driver iteration: polls the scheduler, executes any closed
    /// turn, acknowledges it with the computed hash, and checks for a
    /// terminal result. Returns the messages to forward to clients.
    pub fn step(&mut self, now: std::time::Instant) -> Vec<ServerMessage> {
        self.scheduler.poll(now);
        let outbound = self.scheduler.take_outbound();
        for message in &outbound {
            if let ServerMessage::Turn { turn } = message {
                self.execute(turn);
            }
        }
        outbound
    }

    fn execute(&mut self, turn: &Turn) {
        let hash = self.game.execute_turn(turn);
        self.scheduler.on_message(ClientMessage::Hash {
            turn_number: turn.turn_number,
            hash,
        });
        for event in self.game.drain_events() {
            match serde_json::to_string(&event) {
                Ok(json) => debug!(turn = turn.turn_number, event = %json, "game event"),
                Err(_) => debug!(turn = turn.turn_number, ?event, "game event"),
            }
        }
        self.update_stats();
        if !self.winner_sent && !self.game.in_spawn_phase() {
            if let Some(winner) = self.determine_winner() {
                self.finish(winner);
            }
        }
    }

    fn update_stats(&mut self) {
        for player in self.game.players() {
            let entry = self.stats.entry(player.id()).or_insert_with(PlayerStats::default);
            entry.tiles_owned_max = entry.tiles_owned_max.max(player.num_tiles() as u32);
            entry.troops_peak = entry.troops_peak.max(player.troops());
            let last = self.last_gold.entry(player.id()).or_insert(0);
            if player.gold() > *last {
                entry.gold_earned += player.gold() - *last;
            }
            *last = player.gold();
        }
    }

    /// The game ends when a single player, or a single team, holds all
    /// remaining territory among spawned players.
    fn determine_winner(&self) -> Option<Winner> {
        let alive: Vec<_> = self
            .game
            .players()
            .filter(|p| p.has_spawned() && p.is_alive())
            .collect();
        match alive.as_slice() {
            [] => None,
            [sole] => Some(Winner::Player { id: sole.id() }),
            [first, rest @ ..] => {
                let team = first.team()?;
                rest.iter()
                    .all(|p| p.team() == Some(team))
                    .then_some(Winner::Team { team })
            }
        }
    }

    fn finish(&mut self, winner: Winner) {
        info!(?winner, turn = self.game.tick_number(), "game over");
        self.winner_sent = true;
        let mut stats = self.stats.clone();
        for player in self.game.players() {
            if let Some(entry) = stats.get_mut(&player.id()) {
                entry.alive_at_end = player.is_alive();
            }
        }
        self.scheduler.on_message(ClientMessage::Winner {
            winner,
            all_players_stats: stats,
        });
        self.scheduler.end_game();
    }

    /// Drives the session to completion on the configured poll cadence.
    pub async fn run(mut self) -> GameRecord {
        while self.scheduler.state() != SchedulerState::Ended {
            self.step(std::time::Instant::now());
            sleep(self.config.poll_interval).await;
        }
        self.into_record()
    }

    /// Final archive payload: every closed turn plus the terminal result.
    pub fn into_record(self) -> GameRecord {
        let mut record = GameRecord::new(self.start_info, self.scheduler.turns().to_vec());
        if let Some((winner, stats)) = self.scheduler.winner() {
            record.winner = Some(winner.clone());
            record.all_players_stats = stats.clone();
        }
        record
    }
}
