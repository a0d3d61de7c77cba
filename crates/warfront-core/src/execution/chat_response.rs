use warfront_protocol::{PlayerId, Tick};

use crate::behavior::ChatBehavior;
use crate::execution::Execution;
use crate::game::Game;

const MIN_DELAY: Tick = 10;
const MAX_DELAY: Tick = 30;

/// Delayed nation reply to a quick-chat request. The delay is seeded
/// from the arrival tick and the nation id rather than the shared match
/// RNG, so response timing never perturbs the main random stream.
pub struct NationChatResponseExecution {
    behavior: ChatBehavior,
    nation: PlayerId,
    requestor: PlayerId,
    key: String,
    target: Option<PlayerId>,
    respond_at: Tick,
    active: bool,
}

impl NationChatResponseExecution {
    pub fn new(nation: PlayerId, requestor: PlayerId, key: String, target: Option<PlayerId>) -> Self {
        Self {
            behavior: ChatBehavior::new(nation),
            nation,
            requestor,
            key,
            target,
            respond_at: 0,
            active: true,
        }
    }
}

impl Execution for NationChatResponseExecution {
    fn init(&mut self, _game: &mut Game, tick: Tick) {
        let mut rng =
            crate::rng::PseudoRandom::seed_from_u64(tick.wrapping_add(u64::from(self.nation.0)));
        self.respond_at = tick + rng.next_int(MIN_DELAY as i64, MAX_DELAY as i64 + 1) as Tick;
    }

    fn tick(&mut self, game: &mut Game, tick: Tick) {
        if tick < self.respond_at {
            return;
        }
        self.behavior
            .handle_request(game, self.requestor, &self.key, self.target, tick);
        self.active = false;
    }

    fn owner(&self) -> PlayerId {
        self.nation
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use warfront_protocol::{GameSettings, PlayerInfo, PlayerType};

    use super::*;
    use crate::config::GameConfig;
    use crate::map::GameMap;

    #[test]
    fn response_lands_within_the_delay_window() {
        let settings = GameSettings {
            spawn_phase_turns: 0,
            ..GameSettings::default()
        };
        let mut game = Game::new(GameConfig::new(settings), GameMap::all_land(6, 6), 3);
        game.add_player(PlayerInfo::new(
            PlayerId(1),
            "Nation",
            PlayerType::Nation,
            None,
        ));
        game.add_player(PlayerInfo::new(
            PlayerId(2),
            "Human",
            PlayerType::Human,
            None,
        ));

        let mut exec =
            NationChatResponseExecution::new(PlayerId(1), PlayerId(2), "help.gold".into(), None);
        exec.init(&mut game, 40);
        assert!(exec.respond_at >= 40 + MIN_DELAY);
        assert!(exec.respond_at <= 40 + MAX_DELAY);

        exec.tick(&mut game, 40);
        assert!(exec.is_active());
        exec.tick(&mut game, exec.respond_at);
        assert!(!exec.is_active());
    }

    #[test]
    fn delay_is_deterministic_for_the_same_tick_and_nation() {
        let settings = GameSettings::default();
        let mut game = Game::new(
            GameConfig::new(settings),
            GameMap::all_land(6, 6),
            3,
        );
        let mut a =
            NationChatResponseExecution::new(PlayerId(5), PlayerId(2), "help.troops".into(), None);
        let mut b =
            NationChatResponseExecution::new(PlayerId(5), PlayerId(2), "help.troops".into(), None);
        a.init(&mut game, 123);
        b.init(&mut game, 123);
        assert_eq!(a.respond_at, b.respond_at);
    }
}
