use warfront_protocol::{PlayerId, Tick, TileRef, Troops};

use crate::execution::Execution;
use crate::game::Game;

/// Tiles a single assault can take per tick.
const TILES_PER_TICK: usize = 4;
/// Troop cost of claiming one unowned tile.
const TERRA_NULLIUS_TILE_COST: Troops = 20;
/// Base troop cost of taking one defended tile.
const DEFENDED_TILE_COST: Troops = 30;
/// Troops the defender loses per tile lost.
const DEFENDER_TILE_LOSS: Troops = 15;

/// A land assault. Troops are committed up front and ground forward one
/// border tile at a time until the force is spent or the front closes.
pub struct AttackExecution {
    player: PlayerId,
    target: Option<PlayerId>,
    requested: Troops,
    troops: Troops,
    attack_id: u32,
    active: bool,
}

impl AttackExecution {
    pub fn new(player: PlayerId, target: Option<PlayerId>, troops: Troops) -> Self {
        Self {
            player,
            target,
            requested: troops,
            troops: 0,
            attack_id: 0,
            active: true,
        }
    }

    fn frontier(&self, game: &Game) -> Vec<TileRef> {
        let Some(p) = game.player(self.player) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for &tile in p.tiles() {
            for n in game.map().neighbors(tile) {
                if !game.map().is_land(n) {
                    continue;
                }
                let owner = game.map().owner(n);
                if owner == self.target && owner != Some(self.player) && !out.contains(&n) {
                    out.push(n);
                }
            }
        }
        out.sort_unstable();
        out
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

impl Execution for AttackExecution {
    fn init(&mut self, game: &mut Game, _tick: Tick) {
        if self.target == Some(self.player) {
            self.active = false;
            return;
        }
        // Allies and teammates must break the pact before marching.
        if let Some(target) = self.target {
            if game.is_friendly(self.player, target) {
                self.active = false;
                return;
            }
        }
        let committed = match game.player_mut(self.player) {
            Some(p) if p.is_alive() => p.remove_troops(self.requested),
            _ => 0,
        };
        if committed == 0 {
            self.active = false;
            return;
        }
        self.troops = committed;
        self.attack_id = game.register_attack(self.player, self.target, committed);
    }

    fn tick(&mut self, game: &mut Game, _tick: Tick) {
        if let Some(target) = self.target {
            let target_alive = game.player(target).map(|p| p.is_alive()).unwrap_or(false);
            if !target_alive {
                self.retreat(game);
                return;
            }
        }
        let frontier = self.frontier(game);
        if frontier.is_empty() {
            self.retreat(game);
            return;
        }
        let tile_cost = if self.target.is_some() {
            DEFENDED_TILE_COST
        } else {
            TERRA_NULLIUS_TILE_COST
        };
        for tile in frontier.into_iter().take(TILES_PER_TICK) {
            if self.troops < tile_cost {
                break;
            }
            self.troops -= tile_cost;
            if let Some(target) = self.target {
                if let Some(t) = game.player_mut(target) {
                    t.remove_troops(DEFENDER_TILE_LOSS);
                }
            }
            game.conquer(self.player, tile);
        }
        if self.troops < tile_cost {
            self.retreat(game);
            return;
        }
        game.update_attack_troops(self.attack_id, self.troops);
    }

    fn owner(&self) -> PlayerId {
        self.player
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use warfront_protocol::{PlayerInfo, PlayerType};

    use super::*;
    use crate::config::GameConfig;
    use crate::map::GameMap;
    use warfront_protocol::wire::Turn;
    use warfront_protocol::{GameSettings, Intent};

    fn two_player_game() -> Game {
        let settings = GameSettings {
            spawn_phase_turns: 1,
            ..GameSettings::default()
        };
        let mut game = Game::new(GameConfig::new(settings), GameMap::all_land(8, 8), 42);
        game.add_player(PlayerInfo::new(PlayerId(1), "A", PlayerType::Human, None));
        game.add_player(PlayerInfo::new(PlayerId(2), "B", PlayerType::Human, None));
        game
    }

    #[test]
    fn attack_conquers_adjacent_terra_nullius() {
        let mut game = two_player_game();
        let spawn = Turn::new(
            0,
            vec![Intent::Spawn {
                player: PlayerId(1),
                tile: game.map().tile(4, 4),
            }],
        );
        game.execute_turn(&spawn);
        let before = game.player(PlayerId(1)).unwrap().num_tiles();

        let attack = Turn::new(
            1,
            vec![Intent::Attack {
                player: PlayerId(1),
                target: None,
                troops: 500,
            }],
        );
        game.execute_turn(&attack);
        game.execute_turn(&Turn::new(2, vec![]));
        assert!(game.player(PlayerId(1)).unwrap().num_tiles() > before);
    }

    #[test]
    fn attack_against_an_ally_is_refused_at_init() {
        let mut game = two_player_game();
        game.form_alliance(PlayerId(1), PlayerId(2));
        let before = game.player(PlayerId(1)).unwrap().troops();

        let mut exec = AttackExecution::new(PlayerId(1), Some(PlayerId(2)), 500);
        exec.init(&mut game, 0);

        assert!(!exec.is_active());
        assert_eq!(game.player(PlayerId(1)).unwrap().troops(), before);
        assert!(game.are_allied(PlayerId(1), PlayerId(2)));
    }

    #[test]
    fn breaking_an_alliance_brands_the_breaker_a_traitor() {
        let mut game = two_player_game();
        game.form_alliance(PlayerId(1), PlayerId(2));
        game.break_alliance(PlayerId(1), PlayerId(2));
        assert!(!game.are_allied(PlayerId(1), PlayerId(2)));
        assert!(game.player(PlayerId(1)).unwrap().is_traitor());
        assert!(
            game.player(PlayerId(2)).unwrap().relation_score(PlayerId(1))
                <= crate::game::BETRAYAL_RELATION_PENALTY
        );
    }
}
