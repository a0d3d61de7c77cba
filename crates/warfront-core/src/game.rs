use std::collections::{BTreeMap, BTreeSet};
use std::mem;

use serde::Serialize;
use thiserror::Error;
use warfront_protocol::wire::{hash_bytes_fnv1a64, Turn};
use warfront_protocol::{Gold, Intent, PlayerId, PlayerInfo, Tick, TileRef, Troops};

use crate::config::GameConfig;
use crate::execution::spawn_executions_for_intent;
use crate::execution::Execution;
use crate::map::GameMap;
use crate::player::Player;
use crate::rng::PseudoRandom;

/// Relation penalty applied to both sides when an attack lands.
pub const ATTACK_RELATION_PENALTY: i32 = -30;
/// Relation penalty an ally pays for betrayal.
pub const BETRAYAL_RELATION_PENALTY: i32 = -100;

/// Rejection reasons for client intents. Replayed intents are applied
/// unchecked; these exist for the live ingestion path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("spawn phase is over")]
    SpawnPhaseOver,
    #[error("tile {0} is not land")]
    NotLand(TileRef),
    #[error("cannot target yourself")]
    SelfTarget,
    #[error("no troops committed")]
    ZeroTroops,
    #[error("donations require an alliance or shared team")]
    NotAllied,
}

/// Observable events produced by a tick, drained by the host after each
/// turn for display and chat forwarding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Chat {
        sender: PlayerId,
        recipient: PlayerId,
        key: String,
        target: Option<PlayerId>,
    },
    Emoji {
        sender: PlayerId,
        recipient: PlayerId,
        emoji: u16,
    },
    AllianceRequested {
        from: PlayerId,
        to: PlayerId,
    },
    AllianceFormed {
        a: PlayerId,
        b: PlayerId,
    },
    AllianceBroken {
        breaker: PlayerId,
        other: PlayerId,
    },
    GoldDonated {
        from: PlayerId,
        to: PlayerId,
        amount: Gold,
    },
    TroopsDonated {
        from: PlayerId,
        to: PlayerId,
        amount: Troops,
    },
    PlayerEliminated {
        player: PlayerId,
        by: Option<PlayerId>,
    },
}

/// An in-flight attack, registered by its execution for the lifetime of
/// the assault so the AI layer can observe who is fighting whom.
#[derive(Clone, Debug)]
pub struct AttackRecord {
    pub id: u32,
    pub attacker: PlayerId,
    pub target: Option<PlayerId>,
    pub troops: Troops,
}

struct ExecutionEntry {
    exec: Box<dyn Execution>,
    initialized: bool,
}

/// The deterministic simulation. Given the same seed and the same
/// ordered intent stream, two instances stay bit-identical forever.
pub struct Game {
    config: GameConfig,
    map: GameMap,
    rng: PseudoRandom,
    tick: Tick,
    players: BTreeMap<PlayerId, Player>,
    active: Vec<ExecutionEntry>,
    pending: Vec<Box<dyn Execution>>,
    attacks: BTreeMap<u32, AttackRecord>,
    alliance_requests: BTreeMap<(PlayerId, PlayerId), Tick>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig, map: GameMap, seed: u64) -> Self {
        Self {
            config,
            map,
            rng: PseudoRandom::seed_from_u64(seed),
            tick: 0,
            players: BTreeMap::new(),
            active: Vec::new(),
            pending: Vec::new(),
            attacks: BTreeMap::new(),
            alliance_requests: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn rng(&mut self) -> &mut PseudoRandom {
        &mut self.rng
    }

    pub fn tick_number(&self) -> Tick {
        self.tick
    }

    pub fn in_spawn_phase(&self) -> bool {
        self.tick < self.config.spawn_phase_turns()
    }

    pub fn add_player(&mut self, info: PlayerInfo) -> PlayerId {
        let id = info.id;
        let player = Player::new(info, self.config.starting_troops());
        self.players.insert(id, player);
        id
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|p| p.is_alive())
    }

    /// Queues an execution. It becomes visible to the tick loop on the
    /// NEXT tick, never the current one.
    pub fn add_execution(&mut self, exec: Box<dyn Execution>) {
        self.pending.push(exec);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drains the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Checks a live client intent before it is queued into a turn.
    /// Replay application never calls this; a recorded turn is ground
    /// truth.
    pub fn validate_intent(&self, intent: &Intent) -> Result<(), IntentError> {
        let issuer = intent.issuer();
        if self.player(issuer).is_none() {
            return Err(IntentError::UnknownPlayer(issuer));
        }
        match intent {
            Intent::Spawn { tile, .. } => {
                if !self.in_spawn_phase() {
                    return Err(IntentError::SpawnPhaseOver);
                }
                if !self.map.is_land(*tile) {
                    return Err(IntentError::NotLand(*tile));
                }
            }
            Intent::Attack { player, target, troops } => {
                if *target == Some(*player) {
                    return Err(IntentError::SelfTarget);
                }
                if *troops == 0 {
                    return Err(IntentError::ZeroTroops);
                }
            }
            Intent::BoatAttack {
                player,
                target,
                destination,
                troops,
            } => {
                if target == player {
                    return Err(IntentError::SelfTarget);
                }
                if *troops == 0 {
                    return Err(IntentError::ZeroTroops);
                }
                if !self.map.is_land(*destination) {
                    return Err(IntentError::NotLand(*destination));
                }
            }
            Intent::DonateGold { player, recipient, .. }
            | Intent::DonateTroops { player, recipient, .. } => {
                if player == recipient {
                    return Err(IntentError::SelfTarget);
                }
                if self.player(*recipient).is_none() {
                    return Err(IntentError::UnknownPlayer(*recipient));
                }
                if !self.is_friendly(*player, *recipient) {
                    return Err(IntentError::NotAllied);
                }
            }
            Intent::Emoji { player, recipient, .. }
            | Intent::QuickChat { player, recipient, .. }
            | Intent::AllianceRequest { player, recipient } => {
                if player == recipient {
                    return Err(IntentError::SelfTarget);
                }
                if self.player(*recipient).is_none() {
                    return Err(IntentError::UnknownPlayer(*recipient));
                }
            }
            Intent::MarkTarget { player, target }
            | Intent::BreakAlliance { player, target } => {
                if player == target {
                    return Err(IntentError::SelfTarget);
                }
                if self.player(*target).is_none() {
                    return Err(IntentError::UnknownPlayer(*target));
                }
            }
            Intent::AllianceReply { player, requestor, .. } => {
                if player == requestor {
                    return Err(IntentError::SelfTarget);
                }
                if self.player(*requestor).is_none() {
                    return Err(IntentError::UnknownPlayer(*requestor));
                }
            }
        }
        Ok(())
    }

    /// Applies one turn's intents, advances the simulation a single
    /// tick, and returns the post-tick state hash.
    pub fn execute_turn(&mut self, turn: &Turn) -> u64 {
        for intent in &turn.intents {
            for exec in spawn_executions_for_intent(self, intent) {
                self.pending.push(exec);
            }
        }
        self.execute_tick();
        self.state_hash()
    }

    fn execute_tick(&mut self) {
        for exec in self.pending.drain(..) {
            self.active.push(ExecutionEntry {
                exec,
                initialized: false,
            });
        }
        let spawn_phase = self.in_spawn_phase();
        let tick = self.tick;
        let mut entries = mem::take(&mut self.active);
        for entry in entries.iter_mut() {
            if spawn_phase && !entry.exec.active_during_spawn_phase() {
                continue;
            }
            if !entry.initialized {
                entry.exec.init(self, tick);
                entry.initialized = true;
            }
            if entry.exec.is_active() {
                entry.exec.tick(self, tick);
            }
        }
        entries.retain(|e| !e.initialized || e.exec.is_active());
        // Executions queued from within the loop still wait a tick.
        self.active = entries;

        if !spawn_phase {
            self.regenerate();
        }
        self.tick += 1;
    }

    fn regenerate(&mut self) {
        for player in self.players.values_mut() {
            if !player.has_spawned() || !player.is_alive() {
                continue;
            }
            let max = self.config.max_troops(player.num_tiles());
            let gain = self.config.troop_increase(player.troops(), max);
            player.add_troops(gain);
            player.add_gold(self.config.gold_per_tick(player.num_tiles()));
        }
    }

    // ---- territory ----

    /// Transfers one tile to `conqueror`, emitting an elimination event
    /// when the previous owner loses their last tile.
    pub fn conquer(&mut self, conqueror: PlayerId, tile: TileRef) {
        let previous = self.map.owner(tile);
        if previous == Some(conqueror) {
            return;
        }
        if let Some(prev) = previous {
            if let Some(p) = self.players.get_mut(&prev) {
                p.remove_tile(tile);
                if !p.is_alive() {
                    self.events.push(GameEvent::PlayerEliminated {
                        player: prev,
                        by: Some(conqueror),
                    });
                }
            }
        }
        self.map.set_owner(tile, Some(conqueror));
        if let Some(p) = self.players.get_mut(&conqueror) {
            p.add_tile(tile);
        }
    }

    pub fn relinquish(&mut self, tile: TileRef) {
        if let Some(prev) = self.map.owner(tile) {
            if let Some(p) = self.players.get_mut(&prev) {
                p.remove_tile(tile);
            }
        }
        self.map.set_owner(tile, None);
    }

    /// Players whose territory touches `player`'s border.
    pub fn bordering_players(&self, player: PlayerId) -> BTreeSet<PlayerId> {
        let mut out = BTreeSet::new();
        let Some(p) = self.players.get(&player) else {
            return out;
        };
        for &tile in p.tiles() {
            for n in self.map.neighbors(tile) {
                if let Some(owner) = self.map.owner(n) {
                    if owner != player {
                        out.insert(owner);
                    }
                }
            }
        }
        out
    }

    pub fn shares_border(&self, a: PlayerId, b: PlayerId) -> bool {
        self.bordering_players(a).contains(&b)
    }

    /// Whether any unowned land tile touches the player's territory,
    /// optionally restricted to fallout-covered ground.
    pub fn borders_terra_nullius(&self, player: PlayerId, fallout_only: bool) -> bool {
        let Some(p) = self.players.get(&player) else {
            return false;
        };
        for &tile in p.tiles() {
            for n in self.map.neighbors(tile) {
                if self.map.is_land(n)
                    && self.map.owner(n).is_none()
                    && (!fallout_only || self.map.has_fallout(n))
                {
                    return true;
                }
            }
        }
        false
    }

    // ---- attacks ----

    pub fn register_attack(&mut self, attacker: PlayerId, target: Option<PlayerId>, troops: Troops) -> u32 {
        let id = self.rng.next_id();
        self.attacks.insert(
            id,
            AttackRecord {
                id,
                attacker,
                target,
                troops,
            },
        );
        if let Some(target) = target {
            self.on_attack_landed(attacker, target);
        }
        id
    }

    pub fn unregister_attack(&mut self, id: u32) {
        self.attacks.remove(&id);
    }

    pub fn update_attack_troops(&mut self, id: u32, troops: Troops) {
        if let Some(a) = self.attacks.get_mut(&id) {
            a.troops = troops;
        }
    }

    pub fn incoming_attacks(&self, target: PlayerId) -> Vec<&AttackRecord> {
        self.attacks
            .values()
            .filter(|a| a.target == Some(target))
            .collect()
    }

    pub fn outgoing_attacks(&self, attacker: PlayerId) -> Vec<&AttackRecord> {
        self.attacks
            .values()
            .filter(|a| a.attacker == attacker)
            .collect()
    }

    fn on_attack_landed(&mut self, attacker: PlayerId, target: PlayerId) {
        if let Some(t) = self.players.get_mut(&target) {
            t.update_relation(attacker, ATTACK_RELATION_PENALTY);
        }
    }

    // ---- diplomacy ----

    pub fn are_allied(&self, a: PlayerId, b: PlayerId) -> bool {
        self.players
            .get(&a)
            .map(|p| p.is_allied_with(b))
            .unwrap_or(false)
    }

    pub fn on_same_team(&self, a: PlayerId, b: PlayerId) -> bool {
        match (self.players.get(&a), self.players.get(&b)) {
            (Some(pa), Some(pb)) => match (pa.team(), pb.team()) {
                (Some(ta), Some(tb)) => ta == tb,
                _ => false,
            },
            _ => false,
        }
    }

    /// Hostile when on opposing teams, under mutual attack, or deep in
    /// negative relations. Friendly teams and allies are never hostile.
    pub fn is_friendly(&self, a: PlayerId, b: PlayerId) -> bool {
        self.on_same_team(a, b) || self.are_allied(a, b)
    }

    pub fn request_alliance(&mut self, from: PlayerId, to: PlayerId) {
        if self.are_allied(from, to) || from == to {
            return;
        }
        self.alliance_requests.insert((from, to), self.tick);
        self.events.push(GameEvent::AllianceRequested { from, to });
    }

    pub fn pending_alliance_request(&self, from: PlayerId, to: PlayerId) -> bool {
        self.alliance_requests.contains_key(&(from, to))
    }

    /// Requests from anyone addressed to `to`, oldest first.
    pub fn alliance_requests_for(&self, to: PlayerId) -> Vec<PlayerId> {
        let mut reqs: Vec<(Tick, PlayerId)> = self
            .alliance_requests
            .iter()
            .filter(|((_, t), _)| *t == to)
            .map(|((f, _), tick)| (*tick, *f))
            .collect();
        reqs.sort();
        reqs.into_iter().map(|(_, f)| f).collect()
    }

    pub fn reply_alliance(&mut self, requestor: PlayerId, to: PlayerId, accept: bool) {
        if self.alliance_requests.remove(&(requestor, to)).is_none() {
            return;
        }
        if accept {
            self.form_alliance(requestor, to);
        }
    }

    pub fn form_alliance(&mut self, a: PlayerId, b: PlayerId) {
        if a == b {
            return;
        }
        if let Some(p) = self.players.get_mut(&a) {
            p.add_alliance(b);
        }
        if let Some(p) = self.players.get_mut(&b) {
            p.add_alliance(a);
        }
        self.events.push(GameEvent::AllianceFormed { a, b });
    }

    /// Dissolves the pact. The breaker is branded a traitor and takes
    /// the full relation penalty from the wronged side.
    pub fn break_alliance(&mut self, breaker: PlayerId, other: PlayerId) {
        let was_allied = self.are_allied(breaker, other);
        if let Some(p) = self.players.get_mut(&breaker) {
            p.remove_alliance(other);
        }
        if let Some(p) = self.players.get_mut(&other) {
            p.remove_alliance(breaker);
            if was_allied {
                p.update_relation(breaker, BETRAYAL_RELATION_PENALTY);
            }
        }
        if was_allied {
            if let Some(p) = self.players.get_mut(&breaker) {
                p.mark_traitor();
            }
            self.events.push(GameEvent::AllianceBroken { breaker, other });
        }
    }

    // ---- hashing ----

    /// FNV-1a over the canonical state. Covers everything an intent can
    /// influence, so any divergence surfaces on the next report.
    pub fn state_hash(&self) -> u64 {
        let mut bytes = Vec::with_capacity(64 + self.players.len() * 64);
        bytes.extend_from_slice(&self.tick.to_le_bytes());
        for (id, player) in &self.players {
            bytes.extend_from_slice(&id.0.to_le_bytes());
            bytes.extend_from_slice(&player.troops().to_le_bytes());
            bytes.extend_from_slice(&player.gold().to_le_bytes());
            bytes.extend_from_slice(&(player.num_tiles() as u64).to_le_bytes());
            bytes.push(player.is_traitor() as u8);
            bytes.push(player.has_spawned() as u8);
            for &ally in player.alliances() {
                bytes.extend_from_slice(&ally.0.to_le_bytes());
            }
        }
        for tile in 0..self.map.len() {
            let owner = self.map.owner(tile as TileRef).map(|p| p.0).unwrap_or(0);
            bytes.extend_from_slice(&owner.to_le_bytes());
        }
        hash_bytes_fnv1a64(&bytes)
    }
}
