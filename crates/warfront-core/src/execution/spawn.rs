use warfront_protocol::{PlayerId, Tick, TileRef};

use crate::execution::Execution;
use crate::game::Game;

/// Places a player on the map during the spawn phase. The player takes
/// the chosen tile plus its immediate land neighbors. Re-spawning moves
/// the player: previously held tiles are released first.
pub struct SpawnExecution {
    player: PlayerId,
    tile: TileRef,
    active: bool,
}

impl SpawnExecution {
    pub fn new(player: PlayerId, tile: TileRef) -> Self {
        Self {
            player,
            tile,
            active: true,
        }
    }
}

impl Execution for SpawnExecution {
    fn init(&mut self, game: &mut Game, _tick: Tick) {
        if !game.in_spawn_phase() || !game.map().is_land(self.tile) {
            self.active = false;
            return;
        }
        let previous: Vec<TileRef> = game
            .player(self.player)
            .map(|p| p.tiles().iter().copied().collect())
            .unwrap_or_default();
        for tile in previous {
            game.relinquish(tile);
        }
        game.conquer(self.player, self.tile);
        for n in game.map().neighbors(self.tile) {
            if game.map().is_land(n) && !game.map().has_owner(n) {
                game.conquer(self.player, n);
            }
        }
        if let Some(p) = game.player_mut(self.player) {
            p.mark_spawned();
        }
        self.active = false;
    }

    fn tick(&mut self, _game: &mut Game, _tick: Tick) {}

    fn owner(&self) -> PlayerId {
        self.player
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn active_during_spawn_phase(&self) -> bool {
        true
    }
}
