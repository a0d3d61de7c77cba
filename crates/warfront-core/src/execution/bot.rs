use warfront_protocol::{PlayerId, Tick};

use crate::behavior::AttackBehavior;
use crate::execution::Execution;
use crate::game::Game;

/// Ticks between bot decisions.
const CADENCE: Tick = 10;

/// Driver for one bot. Bots have no diplomacy and no chat; they pick
/// random border victims on a fixed cadence, phase-offset by id so the
/// whole bot population doesn't think on the same tick.
pub struct BotExecution {
    player: PlayerId,
    behavior: AttackBehavior,
    offset: Tick,
    active: bool,
}

impl BotExecution {
    pub fn new(player: PlayerId, game: &Game) -> Self {
        let (trigger, reserve, expand) = game.config().bot_attack_ratios();
        Self {
            player,
            behavior: AttackBehavior::new(player, trigger, reserve, expand),
            offset: u64::from(player.0) % CADENCE,
            active: true,
        }
    }
}

impl Execution for BotExecution {
    fn init(&mut self, _game: &mut Game, _tick: Tick) {}

    fn tick(&mut self, game: &mut Game, tick: Tick) {
        let alive = game
            .player(self.player)
            .map(|p| p.is_alive())
            .unwrap_or(false);
        if !alive {
            self.active = false;
            return;
        }
        if tick % CADENCE != self.offset {
            return;
        }
        self.behavior.attack_random_target(game);
    }

    fn owner(&self) -> PlayerId {
        self.player
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
