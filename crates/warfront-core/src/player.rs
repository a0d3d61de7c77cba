use std::collections::{BTreeMap, BTreeSet};

use warfront_protocol::{
    Gold, PlayerId, PlayerInfo, PlayerType, Relation, Team, Tick, TileRef, Troops,
};

pub const RELATION_MIN: i32 = -100;
pub const RELATION_MAX: i32 = 100;

/// One participant in the match. Humans, bots and nations all share this
/// representation; only the decision layer differs between them.
#[derive(Clone, Debug)]
pub struct Player {
    info: PlayerInfo,
    troops: Troops,
    gold: Gold,
    relations: BTreeMap<PlayerId, i32>,
    alliances: BTreeSet<PlayerId>,
    team: Option<Team>,
    traitor: bool,
    targets: BTreeSet<PlayerId>,
    tiles: BTreeSet<TileRef>,
    spawned: bool,
    last_chat_response: BTreeMap<PlayerId, Tick>,
}

impl Player {
    pub fn new(info: PlayerInfo, starting_troops: Troops) -> Self {
        Self {
            info,
            troops: starting_troops,
            gold: 0,
            relations: BTreeMap::new(),
            alliances: BTreeSet::new(),
            team: None,
            traitor: false,
            targets: BTreeSet::new(),
            tiles: BTreeSet::new(),
            spawned: false,
            last_chat_response: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.info.id
    }

    pub fn info(&self) -> &PlayerInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn player_type(&self) -> PlayerType {
        self.info.player_type
    }

    pub fn is_human(&self) -> bool {
        self.info.player_type == PlayerType::Human
    }

    pub fn troops(&self) -> Troops {
        self.troops
    }

    pub fn set_troops(&mut self, troops: Troops) {
        self.troops = troops;
    }

    pub fn add_troops(&mut self, troops: Troops) {
        self.troops = self.troops.saturating_add(troops);
    }

    pub fn remove_troops(&mut self, troops: Troops) -> Troops {
        let removed = troops.min(self.troops);
        self.troops -= removed;
        removed
    }

    pub fn gold(&self) -> Gold {
        self.gold
    }

    pub fn add_gold(&mut self, gold: Gold) {
        self.gold = self.gold.saturating_add(gold);
    }

    pub fn remove_gold(&mut self, gold: Gold) -> Gold {
        let removed = gold.min(self.gold);
        self.gold -= removed;
        removed
    }

    /// Raw relation score toward `other`, zero when never adjusted.
    pub fn relation_score(&self, other: PlayerId) -> i32 {
        self.relations.get(&other).copied().unwrap_or(0)
    }

    pub fn relation(&self, other: PlayerId) -> Relation {
        Relation::from_score(self.relation_score(other))
    }

    /// Every relation this player holds, in id order.
    pub fn relations(&self) -> impl Iterator<Item = (PlayerId, i32)> + '_ {
        self.relations.iter().map(|(&id, &score)| (id, score))
    }

    /// Adjusts the relation toward `other`, clamping to [-100, 100].
    pub fn update_relation(&mut self, other: PlayerId, delta: i32) {
        let score = self.relation_score(other) + delta;
        self.relations
            .insert(other, score.clamp(RELATION_MIN, RELATION_MAX));
    }

    pub fn alliances(&self) -> &BTreeSet<PlayerId> {
        &self.alliances
    }

    pub fn is_allied_with(&self, other: PlayerId) -> bool {
        self.alliances.contains(&other)
    }

    pub(crate) fn add_alliance(&mut self, other: PlayerId) {
        self.alliances.insert(other);
    }

    pub(crate) fn remove_alliance(&mut self, other: PlayerId) {
        self.alliances.remove(&other);
    }

    pub fn team(&self) -> Option<Team> {
        self.team
    }

    pub fn set_team(&mut self, team: Option<Team>) {
        self.team = team;
    }

    pub fn is_traitor(&self) -> bool {
        self.traitor
    }

    pub fn mark_traitor(&mut self) {
        self.traitor = true;
    }

    pub fn targets(&self) -> &BTreeSet<PlayerId> {
        &self.targets
    }

    pub fn add_target(&mut self, target: PlayerId) {
        self.targets.insert(target);
    }

    pub fn tiles(&self) -> &BTreeSet<TileRef> {
        &self.tiles
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub(crate) fn add_tile(&mut self, tile: TileRef) {
        self.tiles.insert(tile);
    }

    pub(crate) fn remove_tile(&mut self, tile: TileRef) {
        self.tiles.remove(&tile);
    }

    pub fn has_spawned(&self) -> bool {
        self.spawned
    }

    pub fn mark_spawned(&mut self) {
        self.spawned = true;
    }

    /// A player stays in the match while it holds territory or has not
    /// yet placed a spawn.
    pub fn is_alive(&self) -> bool {
        !self.spawned || !self.tiles.is_empty()
    }

    pub fn last_chat_response(&self, requestor: PlayerId) -> Option<Tick> {
        self.last_chat_response.get(&requestor).copied()
    }

    pub fn record_chat_response(&mut self, requestor: PlayerId, tick: Tick) {
        self.last_chat_response.insert(requestor, tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32) -> Player {
        Player::new(
            PlayerInfo::new(PlayerId(id), format!("P{id}"), PlayerType::Human, None),
            1_000,
        )
    }

    #[test]
    fn relations_clamp_to_bounds() {
        let mut p = player(1);
        p.update_relation(PlayerId(2), -250);
        assert_eq!(p.relation_score(PlayerId(2)), RELATION_MIN);
        p.update_relation(PlayerId(2), 500);
        assert_eq!(p.relation_score(PlayerId(2)), RELATION_MAX);
        assert_eq!(p.relation(PlayerId(2)), Relation::Friendly);
    }

    #[test]
    fn troop_removal_never_underflows() {
        let mut p = player(1);
        let removed = p.remove_troops(5_000);
        assert_eq!(removed, 1_000);
        assert_eq!(p.troops(), 0);
    }

    #[test]
    fn alive_tracks_spawn_and_territory() {
        let mut p = player(1);
        assert!(p.is_alive());
        p.mark_spawned();
        assert!(!p.is_alive());
        p.add_tile(7);
        assert!(p.is_alive());
    }
}
