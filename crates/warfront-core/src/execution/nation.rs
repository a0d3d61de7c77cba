use warfront_protocol::{PlayerId, Tick};

use crate::behavior::{AttackBehavior, ChatBehavior};
use crate::execution::Execution;
use crate::game::Game;

const CADENCE: Tick = 10;

/// Driver for one AI nation: full diplomacy, assists, heckling and the
/// priority-chain attack logic, phase-offset by id like the bots.
pub struct NationExecution {
    player: PlayerId,
    attack: AttackBehavior,
    chat: ChatBehavior,
    offset: Tick,
    active: bool,
}

impl NationExecution {
    pub fn new(player: PlayerId, game: &Game) -> Self {
        let (trigger, reserve, expand) = game.config().nation_attack_ratios();
        Self {
            player,
            attack: AttackBehavior::new(player, trigger, reserve, expand),
            chat: ChatBehavior::new(player),
            offset: u64::from(player.0) % CADENCE,
            active: true,
        }
    }
}

impl Execution for NationExecution {
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
        self.attack.heckle_attackers(game, tick);
        self.chat.consider_alliance_requests(game, tick);
        self.attack.assist_allies(game);
        self.attack.attack_best_target(game);
    }

    fn owner(&self) -> PlayerId {
        self.player
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
