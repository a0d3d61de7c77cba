use warfront_protocol::{PlayerId, Tick, TileRef, Troops};

use crate::execution::Execution;
use crate::game::Game;

/// Boat speed in tiles per tick (Manhattan distance).
const BOAT_SPEED: u32 = 2;
const TILES_PER_TICK: usize = 4;
const DEFENDED_TILE_COST: Troops = 30;
const DEFENDER_TILE_LOSS: Troops = 15;
const LANDING_COST: Troops = 50;

enum Phase {
    Sailing { ticks_left: u32 },
    Fighting,
}

/// An amphibious assault. Troops sail from the nearest owned shore tile
/// to the destination, storm the beachhead, then grind inland exactly
/// like a land attack.
pub struct TransportExecution {
    player: PlayerId,
    target: PlayerId,
    destination: TileRef,
    requested: Troops,
    troops: Troops,
    attack_id: u32,
    phase: Phase,
    active: bool,
}

impl TransportExecution {
    pub fn new(player: PlayerId, target: PlayerId, destination: TileRef, troops: Troops) -> Self {
        Self {
            player,
            target,
            destination,
            requested: troops,
            troops: 0,
            attack_id: 0,
            phase: Phase::Sailing { ticks_left: 0 },
            active: true,
        }
    }

    fn launch_shore(&self, game: &Game) -> Option<TileRef> {
        let p = game.player(self.player)?;
        let mut best: Option<(u32, TileRef)> = None;
        for &tile in p.tiles() {
            if !game.map().is_ocean_shore(tile) {
                continue;
            }
            let d = game.map().manhattan_dist(tile, self.destination);
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, tile));
            }
        }
        best.map(|(_, t)| t)
    }

    fn sink(&mut self, game: &mut Game) {
        self.troops = 0;
        game.unregister_attack(self.attack_id);
        self.active = false;
    }

    fn retreat(&mut self, game: &mut Game) {
        if self.troops > 0 {
            if let Some(p) = game.player_mut(self.player) {
                p.add_troops(self.troops);
            }
            self.troops = 0;
        }
        game.unregister_attack(self.attack_id);
        self.active = false;
    }
}

impl Execution for TransportExecution {
    fn init(&mut self, game: &mut Game, _tick: Tick) {
        if self.target == self.player || !game.map().is_land(self.destination) {
            self.active = false;
            return;
        }
        let Some(shore) = self.launch_shore(game) else {
            self.active = false;
            return;
        };
        let committed = match game.player_mut(self.player) {
            Some(p) if p.is_alive() => p.remove_troops(self.requested),
            _ => 0,
        };
        if committed == 0 {
            self.active = false;
            return;
        }
        self.troops = committed;
        let dist = game.map().manhattan_dist(shore, self.destination);
        self.phase = Phase::Sailing {
            ticks_left: dist / BOAT_SPEED + 1,
        };
        self.attack_id = game.register_attack(self.player, Some(self.target), committed);
    }

    fn tick(&mut self, game: &mut Game, _tick: Tick) {
        match &mut self.phase {
            Phase::Sailing { ticks_left } => {
                if *ticks_left > 0 {
                    *ticks_left -= 1;
                    return;
                }
                // Storm the beachhead. A landing that cannot pay the
                // assault cost is lost at sea with its troops.
                let owner = game.map().owner(self.destination);
                if owner.map_or(false, |o| o != self.target) {
                    self.sink(game);
                    return;
                }
                if self.troops < LANDING_COST {
                    self.sink(game);
                    return;
                }
                self.troops -= LANDING_COST;
                if let Some(t) = game.player_mut(self.target) {
                    t.remove_troops(DEFENDER_TILE_LOSS);
                }
                game.conquer(self.player, self.destination);
                self.phase = Phase::Fighting;
            }
            Phase::Fighting => {
                let target_alive = game
                    .player(self.target)
                    .map(|p| p.is_alive())
                    .unwrap_or(false);
                if !target_alive {
                    self.retreat(game);
                    return;
                }
                let mut frontier: Vec<TileRef> = Vec::new();
                if let Some(p) = game.player(self.player) {
                    for &tile in p.tiles() {
                        for n in game.map().neighbors(tile) {
                            if game.map().owner(n) == Some(self.target) && !frontier.contains(&n) {
                                frontier.push(n);
                            }
                        }
                    }
                }
                frontier.sort_unstable();
                if frontier.is_empty() {
                    self.retreat(game);
                    return;
                }
                for tile in frontier.into_iter().take(TILES_PER_TICK) {
                    if self.troops < DEFENDED_TILE_COST {
                        break;
                    }
                    self.troops -= DEFENDED_TILE_COST;
                    if let Some(t) = game.player_mut(self.target) {
                        t.remove_troops(DEFENDER_TILE_LOSS);
                    }
                    game.conquer(self.player, tile);
                }
                if self.troops < DEFENDED_TILE_COST {
                    self.retreat(game);
                    return;
                }
                game.update_attack_troops(self.attack_id, self.troops);
            }
        }
    }

    fn owner(&self) -> PlayerId {
        self.player
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
