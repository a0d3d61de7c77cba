use warfront_protocol::{Gold, PlayerId, Tick, Troops};

use crate::execution::Execution;
use crate::game::Game;

/// Warming effect a donation has on the recipient's view of the donor.
const DONATION_RELATION_BONUS: i32 = 10;

/// One-shot gold transfer between two living players. Player intents
/// are gated on an alliance at validation time; nation chat grants
/// queue this directly for any accepted requestor.
pub struct DonateGoldExecution {
    player: PlayerId,
    recipient: PlayerId,
    amount: Gold,
    active: bool,
}

impl DonateGoldExecution {
    pub fn new(player: PlayerId, recipient: PlayerId, amount: Gold) -> Self {
        Self {
            player,
            recipient,
            amount,
            active: true,
        }
    }
}

impl Execution for DonateGoldExecution {
    fn init(&mut self, game: &mut Game, _tick: Tick) {
        self.active = false;
        if self.player == self.recipient {
            return;
        }
        let recipient_alive = game
            .player(self.recipient)
            .map(|p| p.is_alive())
            .unwrap_or(false);
        if !recipient_alive {
            return;
        }
        let taken = match game.player_mut(self.player) {
            Some(p) => p.remove_gold(self.amount),
            None => return,
        };
        if taken == 0 {
            return;
        }
        if let Some(r) = game.player_mut(self.recipient) {
            r.add_gold(taken);
            r.update_relation(self.player, DONATION_RELATION_BONUS);
        }
        game.push_event(crate::game::GameEvent::GoldDonated {
            from: self.player,
            to: self.recipient,
            amount: taken,
        });
    }

    fn tick(&mut self, _game: &mut Game, _tick: Tick) {}

    fn owner(&self) -> PlayerId {
        self.player
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// One-shot troop transfer, with the same validation split as gold.
pub struct DonateTroopsExecution {
    player: PlayerId,
    recipient: PlayerId,
    troops: Troops,
    active: bool,
}

impl DonateTroopsExecution {
    pub fn new(player: PlayerId, recipient: PlayerId, troops: Troops) -> Self {
        Self {
            player,
            recipient,
            troops,
            active: true,
        }
    }
}

impl Execution for DonateTroopsExecution {
    fn init(&mut self, game: &mut Game, _tick: Tick) {
        self.active = false;
        if self.player == self.recipient {
            return;
        }
        let recipient_alive = game
            .player(self.recipient)
            .map(|p| p.is_alive())
            .unwrap_or(false);
        if !recipient_alive {
            return;
        }
        let taken = match game.player_mut(self.player) {
            Some(p) => p.remove_troops(self.troops),
            None => return,
        };
        if taken == 0 {
            return;
        }
        if let Some(r) = game.player_mut(self.recipient) {
            r.add_troops(taken);
            r.update_relation(self.player, DONATION_RELATION_BONUS);
        }
        game.push_event(crate::game::GameEvent::TroopsDonated {
            from: self.player,
            to: self.recipient,
            amount: taken,
        });
    }

    fn tick(&mut self, _game: &mut Game, _tick: Tick) {}

    fn owner(&self) -> PlayerId {
        self.player
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use warfront_protocol::{GameSettings, Intent, PlayerInfo, PlayerType};
    use warfront_protocol::wire::Turn;

    use super::*;
    use crate::config::GameConfig;
    use crate::map::GameMap;

    #[test]
    fn troop_donation_moves_troops_and_warms_relations() {
        let settings = GameSettings {
            spawn_phase_turns: 0,
            ..GameSettings::default()
        };
        let mut game = Game::new(GameConfig::new(settings), GameMap::all_land(4, 4), 1);
        game.add_player(PlayerInfo::new(PlayerId(1), "A", PlayerType::Human, None));
        game.add_player(PlayerInfo::new(PlayerId(2), "B", PlayerType::Human, None));
        game.form_alliance(PlayerId(1), PlayerId(2));

        let turn = Turn::new(
            0,
            vec![Intent::DonateTroops {
                player: PlayerId(1),
                recipient: PlayerId(2),
                troops: 2_000,
            }],
        );
        game.execute_turn(&turn);

        assert!(game.player(PlayerId(1)).unwrap().troops() < 5_000);
        assert!(game.player(PlayerId(2)).unwrap().troops() >= 7_000);
        assert_eq!(
            game.player(PlayerId(2)).unwrap().relation_score(PlayerId(1)),
            DONATION_RELATION_BONUS
        );
    }

    #[test]
    fn queued_grants_flow_without_an_alliance() {
        let settings = GameSettings {
            spawn_phase_turns: 0,
            ..GameSettings::default()
        };
        let mut game = Game::new(GameConfig::new(settings), GameMap::all_land(4, 4), 1);
        game.add_player(PlayerInfo::new(PlayerId(1), "Nation", PlayerType::Nation, None));
        game.add_player(PlayerInfo::new(PlayerId(2), "Human", PlayerType::Human, None));

        // A nation granting a chat request queues the execution directly,
        // with no alliance between the two.
        game.add_execution(Box::new(DonateTroopsExecution::new(
            PlayerId(1),
            PlayerId(2),
            1_000,
        )));
        game.execute_turn(&Turn::new(0, vec![]));
        game.execute_turn(&Turn::new(1, vec![]));

        assert_eq!(game.player(PlayerId(2)).unwrap().troops(), 6_000);
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, crate::game::GameEvent::TroopsDonated { .. })));
    }
}
