use warfront_protocol::{Difficulty, Gold, PlayerId, Relation, Tick, Troops};

use crate::behavior::emoji;
use crate::execution::{
    AttackExecution, DonateGoldExecution, DonateTroopsExecution, EmojiExecution,
};
use crate::game::Game;

/// Ticks a nation ignores further requests from the same player after
/// answering one.
const REQUEST_COOLDOWN: Tick = 100;
/// Relation hit a requested attack target takes from the nation.
const REQUESTED_TARGET_PENALTY: i32 = -30;

/// Base acceptance chance (percent), rolled within a band set by the
/// requestor's standing. Attack requests ask for blood, not spare
/// change, so their bands sit lower than resource requests at every
/// tier.
fn base_accept_chance(
    game: &mut Game,
    nation: PlayerId,
    requestor: PlayerId,
    is_attack: bool,
) -> u32 {
    let relation = game
        .player(nation)
        .map(|p| p.relation(requestor))
        .unwrap_or(Relation::Neutral);
    let (lo, hi) = if game.on_same_team(nation, requestor) {
        if is_attack { (85, 95) } else { (90, 99) }
    } else if game.are_allied(nation, requestor) {
        if is_attack { (70, 85) } else { (80, 95) }
    } else {
        match relation {
            Relation::Friendly => {
                if is_attack { (30, 50) } else { (40, 60) }
            }
            Relation::Neutral => {
                if is_attack { (5, 10) } else { (5, 15) }
            }
            Relation::Distrustful => {
                if is_attack { (0, 2) } else { (1, 5) }
            }
            Relation::Hostile => return 0,
        }
    };
    game.rng().next_int(lo, hi) as u32
}

/// Quick-chat handling for one AI nation: help requests, attack
/// requests, and alliance proposals. The per-requestor answer cooldown
/// lives on the nation's player record so delayed response executions
/// share it.
pub struct ChatBehavior {
    nation: PlayerId,
}

impl ChatBehavior {
    pub fn new(nation: PlayerId) -> Self {
        Self { nation }
    }

    fn on_cooldown(&self, game: &Game, requestor: PlayerId, tick: Tick) -> bool {
        game.player(self.nation)
            .and_then(|p| p.last_chat_response(requestor))
            .map_or(false, |t| tick.saturating_sub(t) < REQUEST_COOLDOWN)
    }

    fn mark_answered(&self, game: &mut Game, requestor: PlayerId, tick: Tick) {
        if let Some(p) = game.player_mut(self.nation) {
            p.record_chat_response(requestor, tick);
        }
    }

    fn accept_chance(&self, game: &mut Game, requestor: PlayerId, is_attack: bool) -> u32 {
        let base = base_accept_chance(game, self.nation, requestor, is_attack) as f64;
        let difficulty = match game.config().difficulty() {
            Difficulty::Easy => 1.5,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 0.7,
        };
        let mut chance = base * difficulty;
        if !game.incoming_attacks(self.nation).is_empty() {
            // A nation fighting for its life keeps its resources,
            // though teammates still get most of the usual goodwill.
            chance *= if game.on_same_team(self.nation, requestor) {
                0.8
            } else {
                0.5
            };
        }
        (chance as u32).min(100)
    }

    fn roll_accept(&self, game: &mut Game, requestor: PlayerId, is_attack: bool) -> bool {
        let chance = self.accept_chance(game, requestor, is_attack);
        (game.rng().next_int(0, 100) as u32) < chance
    }

    fn send_emoji(&self, game: &mut Game, recipient: PlayerId, set: &[u16]) {
        let e = *game.rng().rand_element(set);
        game.add_execution(Box::new(EmojiExecution::new(self.nation, recipient, e)));
    }

    /// Refusals carry a mood: besieged nations plead busy, enemies get
    /// open contempt, everyone else a shrug.
    fn send_reject_emoji(&self, game: &mut Game, requestor: PlayerId) {
        let set = if !game.incoming_attacks(self.nation).is_empty() {
            emoji::REJECT_BUSY
        } else if game
            .player(self.nation)
            .map(|p| p.relation(requestor) == Relation::Hostile)
            .unwrap_or(false)
        {
            emoji::REJECT_HOSTILE
        } else {
            emoji::REJECT_NEUTRAL
        };
        self.send_emoji(game, requestor, set);
    }

    /// Answers one quick-chat request. Called by the delayed response
    /// execution, never directly from intent application.
    pub fn handle_request(
        &mut self,
        game: &mut Game,
        requestor: PlayerId,
        key: &str,
        target: Option<PlayerId>,
        tick: Tick,
    ) {
        let alive = game
            .player(self.nation)
            .map(|p| p.is_alive())
            .unwrap_or(false);
        let requestor_alive = game
            .player(requestor)
            .map(|p| p.is_alive())
            .unwrap_or(false);
        if !alive || !requestor_alive {
            return;
        }
        if self.on_cooldown(game, requestor, tick) {
            return;
        }
        self.mark_answered(game, requestor, tick);

        let is_attack = key.starts_with("attack.");
        let granted = match key {
            "help.troops" => {
                self.roll_accept(game, requestor, false) && self.grant_troops(game, requestor)
            }
            "help.gold" => {
                self.roll_accept(game, requestor, false) && self.grant_gold(game, requestor)
            }
            _ if is_attack => match target {
                Some(target) => {
                    self.roll_accept(game, requestor, true)
                        && self.grant_attack(game, requestor, target)
                }
                None => false,
            },
            _ => false,
        };
        if granted {
            let set = if is_attack {
                emoji::ATTACK_ACCEPT
            } else {
                emoji::ACCEPT
            };
            self.send_emoji(game, requestor, set);
        } else {
            self.send_reject_emoji(game, requestor);
        }
    }

    /// Share of troops granted, by standing. Hard-capped at a quarter
    /// of the army.
    fn troop_grant(&self, game: &Game, requestor: PlayerId) -> Troops {
        let troops = game.player(self.nation).map(|p| p.troops()).unwrap_or(0);
        let percent = self.grant_percent(game, requestor).min(25);
        troops * percent as Troops / 100
    }

    fn gold_grant(&self, game: &Game, requestor: PlayerId) -> Gold {
        let gold = game.player(self.nation).map(|p| p.gold()).unwrap_or(0);
        let percent = self.grant_percent(game, requestor).min(30);
        gold * percent as Gold / 100
    }

    fn grant_percent(&self, game: &Game, requestor: PlayerId) -> u32 {
        if game.on_same_team(self.nation, requestor) {
            20
        } else if game.are_allied(self.nation, requestor) {
            15
        } else if game
            .player(self.nation)
            .map(|p| p.relation(requestor) == Relation::Friendly)
            .unwrap_or(false)
        {
            8
        } else {
            3
        }
    }

    fn grant_troops(&self, game: &mut Game, requestor: PlayerId) -> bool {
        let amount = self.troop_grant(game, requestor);
        if amount == 0 {
            return false;
        }
        game.add_execution(Box::new(DonateTroopsExecution::new(
            self.nation,
            requestor,
            amount,
        )));
        true
    }

    fn grant_gold(&self, game: &mut Game, requestor: PlayerId) -> bool {
        let amount = self.gold_grant(game, requestor);
        if amount == 0 {
            return false;
        }
        game.add_execution(Box::new(DonateGoldExecution::new(
            self.nation,
            requestor,
            amount,
        )));
        true
    }

    /// A requested attack only goes out against a player the nation
    /// actually borders, and sours relations with the target either way
    /// once agreed.
    fn grant_attack(&self, game: &mut Game, _requestor: PlayerId, target: PlayerId) -> bool {
        if target == self.nation
            || game.is_friendly(self.nation, target)
            || !game.shares_border(self.nation, target)
        {
            return false;
        }
        if let Some(p) = game.player_mut(self.nation) {
            p.update_relation(target, REQUESTED_TARGET_PENALTY);
        }
        let troops = game.player(self.nation).map(|p| p.troops()).unwrap_or(0) / 3;
        if troops == 0 {
            return false;
        }
        game.add_execution(Box::new(AttackExecution::new(
            self.nation,
            Some(target),
            troops,
        )));
        true
    }

    /// Pending alliance proposals get the same tiered treatment as help
    /// requests.
    pub fn consider_alliance_requests(&mut self, game: &mut Game, tick: Tick) {
        for requestor in game.alliance_requests_for(self.nation) {
            if self.on_cooldown(game, requestor, tick) {
                continue;
            }
            self.mark_answered(game, requestor, tick);
            let accept = self.roll_accept(game, requestor, false);
            game.reply_alliance(requestor, self.nation, accept);
            if accept {
                self.send_emoji(game, requestor, emoji::ACCEPT);
            } else {
                self.send_reject_emoji(game, requestor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use warfront_protocol::wire::Turn;
    use warfront_protocol::{GameSettings, PlayerInfo, PlayerType};

    use super::*;
    use crate::config::GameConfig;
    use crate::map::GameMap;

    fn setup(difficulty: Difficulty) -> Game {
        let settings = GameSettings {
            difficulty,
            spawn_phase_turns: 0,
            ..GameSettings::default()
        };
        let mut game = Game::new(GameConfig::new(settings), GameMap::all_land(8, 8), 11);
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
        game
    }

    #[test]
    fn hostile_requestors_are_never_helped() {
        let mut game = setup(Difficulty::Easy);
        game.player_mut(PlayerId(1))
            .unwrap()
            .update_relation(PlayerId(2), -80);
        let behavior = ChatBehavior::new(PlayerId(1));
        for _ in 0..20 {
            assert_eq!(behavior.accept_chance(&mut game, PlayerId(2), false), 0);
        }
    }

    #[test]
    fn accept_bands_track_standing_and_request_kind() {
        let mut game = setup(Difficulty::Medium);
        let behavior = ChatBehavior::new(PlayerId(1));
        for _ in 0..50 {
            let neutral = behavior.accept_chance(&mut game, PlayerId(2), false);
            assert!((5..15).contains(&neutral), "neutral roll {neutral}");
        }
        game.form_alliance(PlayerId(1), PlayerId(2));
        for _ in 0..50 {
            let resource = behavior.accept_chance(&mut game, PlayerId(2), false);
            assert!((80..95).contains(&resource), "allied resource roll {resource}");
            let attack = behavior.accept_chance(&mut game, PlayerId(2), true);
            assert!((70..85).contains(&attack), "allied attack roll {attack}");
        }
    }

    #[test]
    fn nations_under_attack_tighten_their_purse() {
        let mut game = setup(Difficulty::Medium);
        game.form_alliance(PlayerId(1), PlayerId(2));
        let behavior = ChatBehavior::new(PlayerId(1));
        game.register_attack(PlayerId(2), Some(PlayerId(1)), 500);
        for _ in 0..50 {
            // the allied 80-95 band halves under siege
            let besieged = behavior.accept_chance(&mut game, PlayerId(2), false);
            assert!(besieged < 48, "besieged roll {besieged}");
        }
    }

    #[test]
    fn neutral_strangers_still_get_the_occasional_handout() {
        // The neutral resource band is 5-15 percent on Medium, so a few
        // hundred pleas from a stranger must land some troop grants
        // without ever being a sure thing.
        let mut game = setup(Difficulty::Medium);
        let mut behavior = ChatBehavior::new(PlayerId(1));
        let mut granted = 0u32;
        let mut turn = 0;
        for i in 0..400u64 {
            game.player_mut(PlayerId(1)).unwrap().set_troops(10_000);
            behavior.handle_request(
                &mut game,
                PlayerId(2),
                "help.troops",
                None,
                i * (REQUEST_COOLDOWN + 1),
            );
            game.execute_turn(&Turn::new(turn, vec![]));
            turn += 1;
            for event in game.drain_events() {
                if matches!(event, crate::game::GameEvent::TroopsDonated { .. }) {
                    granted += 1;
                }
            }
        }
        assert!((10..90).contains(&granted), "granted {granted} of 400");
    }

    #[test]
    fn request_cooldown_silences_repeat_begging() {
        let mut game = setup(Difficulty::Easy);
        game.form_alliance(PlayerId(1), PlayerId(2));
        let mut behavior = ChatBehavior::new(PlayerId(1));
        behavior.handle_request(&mut game, PlayerId(2), "help.troops", None, 10);
        // inside the cooldown window the second request changes nothing
        behavior.handle_request(&mut game, PlayerId(2), "help.troops", None, 50);
        assert_eq!(
            game.player(PlayerId(1)).unwrap().last_chat_response(PlayerId(2)),
            Some(10)
        );
        behavior.handle_request(&mut game, PlayerId(2), "help.troops", None, 10 + REQUEST_COOLDOWN);
        assert_eq!(
            game.player(PlayerId(1)).unwrap().last_chat_response(PlayerId(2)),
            Some(10 + REQUEST_COOLDOWN)
        );
    }

    #[test]
    fn refusal_emojis_match_the_nations_mood() {
        let mut game = setup(Difficulty::Medium);
        let behavior = ChatBehavior::new(PlayerId(1));

        game.player_mut(PlayerId(1))
            .unwrap()
            .update_relation(PlayerId(2), -80);
        behavior.send_reject_emoji(&mut game, PlayerId(2));
        game.execute_turn(&Turn::new(0, vec![]));
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            crate::game::GameEvent::Emoji { emoji, .. } if emoji::REJECT_HOSTILE.contains(emoji)
        )));

        game.register_attack(PlayerId(2), Some(PlayerId(1)), 500);
        behavior.send_reject_emoji(&mut game, PlayerId(2));
        game.execute_turn(&Turn::new(1, vec![]));
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            crate::game::GameEvent::Emoji { emoji, .. } if emoji::REJECT_BUSY.contains(emoji)
        )));
    }

    #[test]
    fn attack_requests_need_a_shared_border() {
        let mut game = setup(Difficulty::Hard);
        game.add_player(PlayerInfo::new(
            PlayerId(3),
            "Victim",
            PlayerType::Human,
            None,
        ));
        let behavior = ChatBehavior::new(PlayerId(1));
        assert!(!behavior.grant_attack(&mut game, PlayerId(2), PlayerId(3)));
    }
}
