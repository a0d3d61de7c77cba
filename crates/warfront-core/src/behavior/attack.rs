use std::collections::BTreeMap;

use warfront_protocol::{Difficulty, PlayerId, PlayerType, Relation, Tick, TileRef, Troops};

use crate::behavior::emoji;
use crate::execution::{AttackExecution, EmojiExecution, TransportExecution};
use crate::game::Game;
use crate::map::closest_two_tiles;

/// Ticks between heckle emojis aimed at the same enemy.
const HECKLE_COOLDOWN: Tick = 300;
/// Relation cost toward the target of an assist attack.
const ASSIST_RELATION_PENALTY: i32 = -20;
/// Troop advantage at which an ally becomes prey.
const BETRAYAL_TROOP_RATIO: f64 = 10.0;
/// Targets above this troop multiple are refused for assists.
const ASSIST_TARGET_STRENGTH_RATIO: f64 = 2.0;
/// Minimum fraction of troop capacity kept on hand before assisting.
const ASSIST_MIN_TROOP_RATIO: f64 = 0.3;
/// Incoming troops above this fraction of our own count as a siege.
const HEAVY_ATTACK_RATIO: f64 = 0.2;

/// Attack decision-making for one AI player, tuned by three ratios:
/// `trigger` (troop fraction needed to start non-retaliatory attacks),
/// `reserve` (fraction always kept home) and `expand` (reserve while
/// expanding into unclaimed land).
pub struct AttackBehavior {
    player: PlayerId,
    trigger_ratio: f64,
    reserve_ratio: f64,
    expand_ratio: f64,
    /// Troops already committed during the current decision pass, which
    /// the player record does not reflect until the executions init.
    committed: Troops,
    last_heckle: BTreeMap<PlayerId, Tick>,
}

impl AttackBehavior {
    pub fn new(
        player: PlayerId,
        trigger_ratio: f64,
        reserve_ratio: f64,
        expand_ratio: f64,
    ) -> Self {
        Self {
            player,
            trigger_ratio,
            reserve_ratio,
            expand_ratio,
            committed: 0,
            last_heckle: BTreeMap::new(),
        }
    }

    fn max_troops(&self, game: &Game) -> Troops {
        let tiles = game.player(self.player).map(|p| p.num_tiles()).unwrap_or(0);
        game.config().max_troops(tiles)
    }

    fn troops(&self, game: &Game) -> Troops {
        game.player(self.player)
            .map(|p| p.troops())
            .unwrap_or(0)
            .saturating_sub(self.committed)
    }

    fn reserve(&self, game: &Game) -> Troops {
        (self.max_troops(game) as f64 * self.reserve_ratio) as Troops
    }

    fn is_bot(&self, game: &Game, id: PlayerId) -> bool {
        game.player(id)
            .map(|p| p.player_type() == PlayerType::Bot)
            .unwrap_or(false)
    }

    fn incoming_troops(&self, game: &Game) -> Troops {
        game.incoming_attacks(self.player)
            .iter()
            .map(|a| a.troops)
            .sum()
    }

    fn under_heavy_attack(&self, game: &Game) -> bool {
        self.incoming_troops(game) as f64 > self.troops(game) as f64 * HEAVY_ATTACK_RATIO
    }

    /// Emoji displeasure at current attackers. Independent of the
    /// attack chain; rate-limited per enemy.
    pub fn heckle_attackers(&mut self, game: &mut Game, tick: Tick) {
        let attackers: Vec<PlayerId> = game
            .incoming_attacks(self.player)
            .iter()
            .map(|a| a.attacker)
            .collect();
        for attacker in attackers {
            let recent = self
                .last_heckle
                .get(&attacker)
                .map_or(false, |&t| tick.saturating_sub(t) < HECKLE_COOLDOWN);
            if recent {
                continue;
            }
            self.last_heckle.insert(attacker, tick);
            let e = *game.rng().rand_element(emoji::HECKLE);
            game.add_execution(Box::new(EmojiExecution::new(self.player, attacker, e)));
        }
    }

    /// Whether to engage `target` at all. Unclaimed land, non-humans
    /// and traitors are always fair game; humans are occasionally
    /// spared on lower difficulties.
    pub fn should_attack(&self, game: &mut Game, target: Option<PlayerId>) -> bool {
        let Some(target) = target else {
            return true;
        };
        let Some(t) = game.player(target) else {
            return false;
        };
        if t.player_type() != PlayerType::Human || t.is_traitor() {
            return true;
        }
        match game.config().difficulty() {
            Difficulty::Easy => !game.rng().chance(4),
            Difficulty::Medium => !game.rng().chance(2),
            Difficulty::Hard => true,
        }
    }

    /// Force to commit against a bot from the given budget. Easy throws
    /// the whole budget; otherwise 4x the bot's troops, and below a 2x
    /// advantage the attack is skipped rather than poked with a token
    /// army.
    fn bot_attack_troops(&self, game: &Game, target: PlayerId, budget: Troops) -> Troops {
        if game.config().difficulty() == Difficulty::Easy {
            return budget;
        }
        let enemy = game.player(target).map(|p| p.troops()).unwrap_or(0);
        let wanted = enemy.saturating_mul(4);
        if wanted > budget {
            if budget < enemy.saturating_mul(2) {
                0
            } else {
                budget
            }
        } else {
            wanted
        }
    }

    /// Troops to commit against `target` in a land attack, or `None`
    /// when nothing can be spared.
    pub fn calculate_attack_troops(&self, game: &Game, target: Option<PlayerId>) -> Option<Troops> {
        let troops = self.troops(game);
        match target {
            None => {
                let keep = (self.max_troops(game) as f64 * self.expand_ratio) as Troops;
                let force = troops.saturating_sub(keep);
                (force > 0).then_some(force)
            }
            Some(target) => {
                let budget = troops.saturating_sub(self.reserve(game));
                if budget == 0 {
                    return None;
                }
                if self.is_bot(game, target) && !self.is_bot(game, self.player) {
                    let force = self.bot_attack_troops(game, target, budget);
                    (force > 0).then_some(force)
                } else {
                    Some(budget)
                }
            }
        }
    }

    fn enqueue_land_attack(&mut self, game: &mut Game, target: Option<PlayerId>, troops: Troops) {
        self.committed = self.committed.saturating_add(troops);
        game.add_execution(Box::new(AttackExecution::new(self.player, target, troops)));
    }

    fn send_land_attack(&mut self, game: &mut Game, target: Option<PlayerId>) -> bool {
        match self.calculate_attack_troops(game, target) {
            Some(troops) => {
                self.enqueue_land_attack(game, target, troops);
                true
            }
            None => false,
        }
    }

    fn send_boat_attack(&mut self, game: &mut Game, target: PlayerId) -> bool {
        let my_shores = self.shore_tiles(game, self.player);
        let enemy_shores = self.shore_tiles(game, target);
        let Some((_, destination)) = closest_two_tiles(game.map(), &my_shores, &enemy_shores)
        else {
            return false;
        };
        let budget = self.troops(game) / 5;
        let troops = if self.is_bot(game, target) && !self.is_bot(game, self.player) {
            self.bot_attack_troops(game, target, budget)
        } else {
            budget
        };
        if troops == 0 {
            return false;
        }
        self.committed = self.committed.saturating_add(troops);
        game.add_execution(Box::new(TransportExecution::new(
            self.player,
            target,
            destination,
            troops,
        )));
        true
    }

    /// Dispatches an attack over land when a border exists, otherwise
    /// by boat. `force` skips the human-leniency roll, for retaliation
    /// and betrayal. Allies and teammates are never valid targets.
    fn send_attack(&mut self, game: &mut Game, target: Option<PlayerId>, force: bool) -> bool {
        if let Some(t) = target {
            if game.is_friendly(self.player, t) {
                return false;
            }
        }
        if !force && !self.should_attack(game, target) {
            return false;
        }
        match target {
            None => self.send_land_attack(game, None),
            Some(t) if game.shares_border(self.player, t) => {
                self.send_land_attack(game, Some(t))
            }
            Some(t) => self.send_boat_attack(game, t),
        }
    }

    /// The priority chain. Evaluated top to bottom, first qualifying
    /// action wins.
    pub fn attack_best_target(&mut self, game: &mut Game) {
        self.committed = 0;
        let alive = game
            .player(self.player)
            .map(|p| p.has_spawned() && p.is_alive())
            .unwrap_or(false);
        if !alive {
            return;
        }
        let troops = self.troops(game);
        if troops < self.reserve(game) {
            return;
        }
        let below_trigger = (troops as f64) < self.max_troops(game) as f64 * self.trigger_ratio;
        if below_trigger && !game.rng().chance(10) {
            return;
        }

        if self.retaliate(game) {
            return;
        }
        if self.attack_bots(game) {
            return;
        }
        if self.betray_weak_ally(game) {
            return;
        }
        if game.borders_terra_nullius(self.player, true) && self.send_attack(game, None, false) {
            return;
        }
        if self.attack_most_hostile(game) {
            return;
        }
        if self.attack_weakest_neighbor(game) {
            return;
        }
        self.boat_attack(game);
    }

    /// Bot-grade targeting: pick a random border victim, with a soft
    /// preference for traitors and difficulty-scaled reluctance toward
    /// nations and humans.
    pub fn attack_random_target(&mut self, game: &mut Game) {
        self.committed = 0;
        let alive = game
            .player(self.player)
            .map(|p| p.has_spawned() && p.is_alive())
            .unwrap_or(false);
        if !alive {
            return;
        }
        let trigger = (self.max_troops(game) as f64 * self.trigger_ratio) as Troops;
        if self.troops(game) < trigger {
            return;
        }

        if self.retaliate(game) {
            return;
        }

        let neighbors: Vec<PlayerId> = game
            .bordering_players(self.player)
            .into_iter()
            .filter(|&id| !game.is_friendly(self.player, id))
            .collect();

        let traitors: Vec<PlayerId> = neighbors
            .iter()
            .copied()
            .filter(|&id| {
                game.player(id)
                    .map(|p| p.is_traitor() && p.is_alive())
                    .unwrap_or(false)
            })
            .collect();
        if !traitors.is_empty() && game.rng().chance(3) {
            let target = *game.rng().rand_element(&traitors);
            self.send_attack(game, Some(target), false);
            return;
        }

        let mut candidates: Vec<Option<PlayerId>> =
            neighbors.iter().copied().map(Some).collect();
        if game.borders_terra_nullius(self.player, false) {
            candidates.push(None);
        }
        if candidates.is_empty() {
            return;
        }
        let pick = *game.rng().rand_element(&candidates);
        if let Some(target) = pick {
            let timid = game
                .player(target)
                .map(|p| p.player_type() != PlayerType::Bot)
                .unwrap_or(false);
            if timid {
                match game.config().difficulty() {
                    Difficulty::Easy => return,
                    Difficulty::Medium => {
                        if game.rng().chance(2) {
                            return;
                        }
                    }
                    Difficulty::Hard => {}
                }
            }
        }
        self.send_attack(game, pick, false);
    }

    /// Hit back at the single largest force currently attacking us,
    /// unconditionally: no leniency roll, and by boat if the attacker
    /// holds no shared border. Bot attacks are beneath notice unless we
    /// are a bot ourselves.
    fn retaliate(&mut self, game: &mut Game) -> bool {
        let self_is_bot = self.is_bot(game, self.player);
        let mut best: Option<(Troops, PlayerId)> = None;
        for attack in game.incoming_attacks(self.player) {
            if !self_is_bot && self.is_bot(game, attack.attacker) {
                continue;
            }
            if best.map_or(true, |(t, _)| attack.troops > t) {
                best = Some((attack.troops, attack.attacker));
            }
        }
        match best {
            Some((_, attacker)) => {
                self.send_attack(game, Some(attacker), true);
                true
            }
            None => false,
        }
    }

    /// Clear out bordering bots, thinnest defense first. Difficulty
    /// sets how many bot fronts this pass may open. Returns whether any
    /// troops were allocated.
    fn attack_bots(&mut self, game: &mut Game) -> bool {
        let parallelism = match game.config().difficulty() {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 4,
        };
        let mut bots: Vec<(u64, PlayerId)> = Vec::new();
        for id in game.bordering_players(self.player) {
            let Some(p) = game.player(id) else { continue };
            if p.player_type() != PlayerType::Bot || !p.is_alive() {
                continue;
            }
            if game.is_friendly(self.player, id) {
                continue;
            }
            // density scaled up to keep the ordering integral
            let density = p.troops().saturating_mul(1_000) / p.num_tiles().max(1) as u64;
            bots.push((density, id));
        }
        bots.sort_unstable();
        let before = self.committed;
        for &(_, bot) in bots.iter().take(parallelism) {
            self.send_attack(game, Some(bot), false);
        }
        self.committed > before
    }

    /// An allied neighbor outnumbered ten to one is worth more as
    /// territory. Betrayal skips the human-leniency gate entirely.
    fn betray_weak_ally(&mut self, game: &mut Game) -> bool {
        let my_troops = self.troops(game);
        for id in game.bordering_players(self.player) {
            if !game.are_allied(self.player, id) || game.on_same_team(self.player, id) {
                continue;
            }
            let Some(ally) = game.player(id) else { continue };
            if (my_troops as f64) < ally.troops() as f64 * BETRAYAL_TROOP_RATIO {
                continue;
            }
            game.break_alliance(self.player, id);
            self.send_attack(game, Some(id), true);
            return true;
        }
        false
    }

    /// Most hated player across every relation held, attack-worthy only
    /// at the Hostile tier.
    fn most_hated(&self, game: &Game) -> Option<PlayerId> {
        let mut worst: Option<(i32, PlayerId)> = None;
        if let Some(me) = game.player(self.player) {
            for (other, score) in me.relations() {
                if other == self.player {
                    continue;
                }
                if worst.map_or(true, |(s, _)| score < s) {
                    worst = Some((score, other));
                }
            }
        }
        let (score, id) = worst?;
        if Relation::from_score(score) != Relation::Hostile {
            return None;
        }
        if game.is_friendly(self.player, id) {
            return None;
        }
        let alive = game.player(id).map(|p| p.is_alive()).unwrap_or(false);
        alive.then_some(id)
    }

    fn attack_most_hostile(&mut self, game: &mut Game) -> bool {
        match self.most_hated(game) {
            Some(id) => self.send_attack(game, Some(id), false),
            None => false,
        }
    }

    fn attack_weakest_neighbor(&mut self, game: &mut Game) -> bool {
        match self.weakest_neighbor(game) {
            Some(id) => self.send_attack(game, Some(id), false),
            None => false,
        }
    }

    fn weakest_neighbor(&self, game: &Game) -> Option<PlayerId> {
        let mut weakest: Option<(Troops, PlayerId)> = None;
        for id in game.bordering_players(self.player) {
            if game.is_friendly(self.player, id) {
                continue;
            }
            let Some(p) = game.player(id) else { continue };
            if !p.is_alive() {
                continue;
            }
            if weakest.map_or(true, |(t, _)| p.troops() < t) {
                weakest = Some((p.troops(), id));
            }
        }
        weakest.map(|(_, id)| id)
    }

    fn shore_tiles(&self, game: &Game, id: PlayerId) -> Vec<TileRef> {
        game.player(id)
            .map(|p| {
                p.tiles()
                    .iter()
                    .copied()
                    .filter(|&t| game.map().is_ocean_shore(t))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn island_candidates(&self, game: &Game) -> Vec<(u32, PlayerId, TileRef)> {
        let my_troops = self.troops(game);
        let my_shores = self.shore_tiles(game, self.player);
        if my_shores.is_empty() {
            return Vec::new();
        }
        let mut candidates: Vec<(u32, PlayerId, TileRef)> = Vec::new();
        let others: Vec<PlayerId> = game
            .alive_players()
            .filter(|p| {
                p.id() != self.player
                    && p.has_spawned()
                    && p.troops() <= my_troops.saturating_mul(2)
            })
            .map(|p| p.id())
            .collect();
        for id in others {
            if game.is_friendly(self.player, id) {
                continue;
            }
            let shores = self.shore_tiles(game, id);
            if let Some((from, to)) = closest_two_tiles(game.map(), &my_shores, &shores) {
                candidates.push((game.map().manhattan_dist(from, to), id, to));
            }
        }
        candidates.sort_unstable();
        candidates
    }

    /// Landlocked on an island: ship a fifth of the army at the
    /// nearest reachable enemy, with an even-odds swerve to the second
    /// nearest so fleets don't pile onto one victim.
    fn boat_attack(&mut self, game: &mut Game) -> bool {
        if !game.bordering_players(self.player).is_empty()
            || game.borders_terra_nullius(self.player, false)
        {
            return false;
        }
        let candidates = self.island_candidates(game);
        let pick = if candidates.len() >= 2 && game.rng().chance(2) {
            candidates.get(1)
        } else {
            candidates.first()
        };
        let Some(&(_, target, _)) = pick else {
            return false;
        };
        if !self.should_attack(game, Some(target)) {
            return false;
        }
        self.send_boat_attack(game, target)
    }

    /// Pure target selection for strategic strikes: the attack chain's
    /// retaliate, most-hated, weakest-neighbor and nearest-island
    /// steps, with no probability gates and no state changes.
    pub fn find_best_nuke_target(&self, game: &Game) -> Option<PlayerId> {
        let mut largest: Option<(Troops, PlayerId)> = None;
        for attack in game.incoming_attacks(self.player) {
            if largest.map_or(true, |(t, _)| attack.troops > t) {
                largest = Some((attack.troops, attack.attacker));
            }
        }
        if let Some((_, attacker)) = largest {
            return Some(attacker);
        }
        if let Some(id) = self.most_hated(game) {
            return Some(id);
        }
        if let Some(id) = self.weakest_neighbor(game) {
            return Some(id);
        }
        self.island_candidates(game).first().map(|&(_, id, _)| id)
    }

    fn emoji_to(&self, game: &mut Game, recipient: PlayerId, set: &[u16]) {
        let human = game
            .player(recipient)
            .map(|p| p.is_human())
            .unwrap_or(false);
        if !human {
            return;
        }
        let e = *game.rng().rand_element(set);
        game.add_execution(Box::new(EmojiExecution::new(self.player, recipient, e)));
    }

    fn assist_notice(
        &self,
        game: &mut Game,
        friend: PlayerId,
        key: &str,
        target: Option<PlayerId>,
    ) {
        let human = game.player(friend).map(|p| p.is_human()).unwrap_or(false);
        if !human {
            return;
        }
        game.push_event(crate::game::GameEvent::Chat {
            sender: self.player,
            recipient: friend,
            key: key.into(),
            target,
        });
    }

    /// Likelihood (percent) of joining an assist call, from a
    /// difficulty base scaled by loyalty, relative strength, sieges in
    /// progress, and whether a boat would be needed.
    fn assist_chance(&self, game: &Game, target: PlayerId, teammate: bool) -> f64 {
        let mut chance: f64 = match game.config().difficulty() {
            Difficulty::Easy => 90.0,
            Difficulty::Medium => 70.0,
            Difficulty::Hard => 50.0,
        };
        if teammate {
            chance *= 1.3;
        }
        let mine = self.troops(game) as f64;
        let theirs = game
            .player(target)
            .map(|p| p.troops())
            .unwrap_or(0)
            .max(1) as f64;
        let ratio = mine / theirs;
        if ratio < 0.5 {
            chance *= 0.3;
        } else if ratio < 1.0 {
            chance *= 0.6;
        }
        if !game.incoming_attacks(self.player).is_empty() {
            chance *= if teammate { 0.7 } else { 0.5 };
        }
        if !game.shares_border(self.player, target) {
            chance *= 0.7;
        }
        chance.clamp(0.0, 100.0)
    }

    /// Come to the aid of allies and teammates with marked targets.
    /// Teammates are considered first and get softer guards; every
    /// refusal carries a reason, as an emoji plus a chat notice to
    /// human allies. Stops after the first accepted call.
    pub fn assist_allies(&mut self, game: &mut Game) {
        self.committed = 0;
        let my_troops = self.troops(game);
        let heavy_attack = self.under_heavy_attack(game);
        let low_troops =
            (my_troops as f64) < self.max_troops(game) as f64 * ASSIST_MIN_TROOP_RATIO;

        let mut friends: Vec<(bool, PlayerId)> = Vec::new();
        for p in game.alive_players() {
            if p.id() == self.player {
                continue;
            }
            let teammate = game.on_same_team(self.player, p.id());
            if teammate || game.are_allied(self.player, p.id()) {
                friends.push((teammate, p.id()));
            }
        }
        // teammates first
        friends.sort_by_key(|&(teammate, id)| (!teammate, id));

        for (teammate, friend) in friends {
            let targets: Vec<PlayerId> = game
                .player(friend)
                .map(|p| p.targets().iter().copied().collect())
                .unwrap_or_default();
            if targets.is_empty() {
                continue;
            }
            if !teammate {
                let relation = game
                    .player(self.player)
                    .map(|p| p.relation(friend))
                    .unwrap_or(Relation::Neutral);
                if relation != Relation::Friendly {
                    self.emoji_to(game, friend, emoji::RELATION_TOO_LOW);
                    self.assist_notice(game, friend, "assist.relation_too_low", None);
                    continue;
                }
            }
            for target in targets {
                if target == self.player {
                    self.emoji_to(game, friend, emoji::TARGET_ME);
                    self.assist_notice(game, friend, "assist.target_is_me", Some(target));
                    continue;
                }
                if game.is_friendly(self.player, target) {
                    self.emoji_to(game, friend, emoji::TARGET_ALLY);
                    self.assist_notice(game, friend, "assist.target_is_ally", Some(target));
                    continue;
                }
                let target_alive = game.player(target).map(|p| p.is_alive()).unwrap_or(false);
                if !target_alive {
                    continue;
                }
                // Busy defending ourselves; teammates get even odds.
                if heavy_attack && !(teammate && game.rng().chance(2)) {
                    self.emoji_to(game, friend, emoji::BUSY);
                    self.assist_notice(game, friend, "assist.busy", Some(target));
                    continue;
                }
                let threshold = if teammate {
                    ASSIST_TARGET_STRENGTH_RATIO * 1.25
                } else {
                    ASSIST_TARGET_STRENGTH_RATIO
                };
                let enemy_troops = game.player(target).map(|p| p.troops()).unwrap_or(0);
                if enemy_troops as f64 > my_troops as f64 * threshold {
                    self.emoji_to(game, friend, emoji::TOO_STRONG);
                    self.assist_notice(game, friend, "assist.target_too_strong", Some(target));
                    continue;
                }
                if low_troops {
                    self.emoji_to(game, friend, emoji::LOW_TROOPS);
                    self.assist_notice(game, friend, "assist.low_troops", Some(target));
                    continue;
                }
                let chance = self.assist_chance(game, target, teammate);
                if game.rng().next_int(0, 100) as f64 > chance {
                    self.emoji_to(game, friend, emoji::REJECT);
                    self.assist_notice(game, friend, "assist.declined", Some(target));
                    continue;
                }
                if let Some(p) = game.player_mut(self.player) {
                    p.update_relation(target, ASSIST_RELATION_PENALTY);
                }
                self.send_attack(game, Some(target), false);
                self.emoji_to(game, friend, emoji::ASSIST_ACCEPT);
                self.assist_notice(game, friend, "assist.accepted", Some(target));
                return;
            }
        }
    }
}
