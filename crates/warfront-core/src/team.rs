//! Deterministic team assignment: manual picks first, then whole clans
//! largest-first, then everyone else onto the currently smallest team,
//! with AI nations placed last in seeded-shuffled order so they don't
//! bias any one team.

use std::collections::BTreeMap;

use warfront_protocol::{
    GameMode, ManualTeamAssignments, PlayerId, PlayerInfo, PlayerType, Team,
};

use crate::rng::PseudoRandom;

/// Where a player ended up. Capacity overflow inside a clan is a kick,
/// never a spill onto another team.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assigned {
    Team(Team),
    Kicked,
}

/// Team labels used for the `Teams { count }` game mode, in draft order.
const TEAM_LABELS: &[Team] = &[
    Team::Red,
    Team::Blue,
    Team::Yellow,
    Team::Green,
    Team::Purple,
    Team::Orange,
    Team::Teal,
];

pub fn teams_for_count(count: u8) -> Vec<Team> {
    TEAM_LABELS
        .iter()
        .copied()
        .take((count as usize).clamp(2, TEAM_LABELS.len()))
        .collect()
}

fn ceil_div(a: usize, b: usize) -> usize {
    a.div_ceil(b)
}

struct Balancer<'a> {
    teams: &'a [Team],
    counts: Vec<usize>,
    max_team_size: usize,
}

impl<'a> Balancer<'a> {
    fn new(teams: &'a [Team], max_team_size: usize) -> Self {
        Self {
            teams,
            counts: vec![0; teams.len()],
            max_team_size,
        }
    }

    /// Index of the team with the fewest members; ties go to the
    /// earliest team in the label list.
    fn smallest(&self) -> usize {
        let mut best = 0;
        for (i, &c) in self.counts.iter().enumerate() {
            if c < self.counts[best] {
                best = i;
            }
        }
        best
    }

    fn has_room(&self, idx: usize) -> bool {
        self.counts[idx] < self.max_team_size
    }

    fn place(&mut self, idx: usize) -> Team {
        self.counts[idx] += 1;
        self.teams[idx]
    }

    fn place_smallest(&mut self) -> Option<Team> {
        let idx = self.smallest();
        self.has_room(idx).then(|| self.place(idx))
    }
}

/// Assigns every player to a team or kicks them. Ordering is
/// load-bearing: manual overrides, then clans largest-first, then
/// individual balancing with nations shuffled last.
pub fn assign_teams(
    players: &[PlayerInfo],
    teams: &[Team],
    max_team_size: Option<usize>,
    manual: &ManualTeamAssignments,
) -> BTreeMap<PlayerId, Assigned> {
    let mut result: BTreeMap<PlayerId, Assigned> = BTreeMap::new();
    if teams.is_empty() {
        return result;
    }
    let max_team_size = max_team_size.unwrap_or_else(|| ceil_div(players.len(), teams.len()));
    let mut balancer = Balancer::new(teams, max_team_size);

    // 1. Manual picks, in player order. A full team falls through to
    //    automatic placement rather than dropping the player.
    let mut remaining: Vec<&PlayerInfo> = Vec::with_capacity(players.len());
    for p in players {
        let wanted = p
            .client_id
            .as_ref()
            .and_then(|cid| manual.get(cid))
            .and_then(|team| teams.iter().position(|t| t == team));
        match wanted {
            Some(idx) if balancer.has_room(idx) => {
                let team = balancer.place(idx);
                result.insert(p.id, Assigned::Team(team));
            }
            _ => remaining.push(p),
        }
    }

    // 2. Clans, largest first. Each clan lands whole on the smallest
    //    team; members past capacity are kicked.
    let mut clans: BTreeMap<String, Vec<&PlayerInfo>> = BTreeMap::new();
    let mut unclanned: Vec<&PlayerInfo> = Vec::new();
    for p in remaining {
        match p.clan() {
            Some(tag) => clans.entry(tag.to_string()).or_default().push(p),
            None => unclanned.push(p),
        }
    }
    let mut clan_groups: Vec<(String, Vec<&PlayerInfo>)> = clans.into_iter().collect();
    clan_groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)));
    for (_, members) in clan_groups {
        let idx = balancer.smallest();
        for p in members {
            if balancer.has_room(idx) {
                let team = balancer.place(idx);
                result.insert(p.id, Assigned::Team(team));
            } else {
                result.insert(p.id, Assigned::Kicked);
            }
        }
    }

    // 3. Individuals onto the smallest team, nations shuffled last.
    let (nations, others): (Vec<&PlayerInfo>, Vec<&PlayerInfo>) = unclanned
        .into_iter()
        .partition(|p| p.player_type == PlayerType::Nation);
    let mut nations = nations;
    if let Some(first) = nations.first() {
        let mut rng = PseudoRandom::seed_from_u64(u64::from(first.id.0));
        rng.shuffle(&mut nations);
    }
    for p in others.into_iter().chain(nations) {
        let assigned = match balancer.place_smallest() {
            Some(team) => Assigned::Team(team),
            None => Assigned::Kicked,
        };
        result.insert(p.id, assigned);
    }
    result
}

/// Lobby preview variant: the expected AI nation headcount inflates the
/// capacity denominator so the preview matches the final assignment
/// once nations join.
pub fn assign_teams_lobby_preview(
    players: &[PlayerInfo],
    teams: &[Team],
    nation_count: usize,
    manual: &ManualTeamAssignments,
) -> BTreeMap<PlayerId, Assigned> {
    if teams.is_empty() {
        return BTreeMap::new();
    }
    let max = ceil_div(players.len() + nation_count, teams.len());
    assign_teams(players, teams, Some(max), manual)
}

/// Mode-aware entry point. `HumansVsNations` bypasses balancing
/// entirely; free-for-all assigns no teams at all.
pub fn assign_teams_for_mode(
    mode: GameMode,
    players: &[PlayerInfo],
    manual: &ManualTeamAssignments,
) -> BTreeMap<PlayerId, Assigned> {
    match mode {
        GameMode::FreeForAll => BTreeMap::new(),
        GameMode::Teams { count } => {
            assign_teams(players, &teams_for_count(count), None, manual)
        }
        GameMode::HumansVsNations => players
            .iter()
            .map(|p| {
                let team = match p.player_type {
                    PlayerType::Human => Team::Humans,
                    PlayerType::Nation => Team::Nations,
                    PlayerType::Bot => Team::Bots,
                };
                (p.id, Assigned::Team(team))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human(id: u32, name: &str) -> PlayerInfo {
        PlayerInfo::new(
            PlayerId(id),
            name.to_string(),
            PlayerType::Human,
            Some(format!("client-{id}")),
        )
    }

    fn nation(id: u32, name: &str) -> PlayerInfo {
        PlayerInfo::new(PlayerId(id), name.to_string(), PlayerType::Nation, None)
    }

    fn team_of(result: &BTreeMap<PlayerId, Assigned>, id: u32) -> Assigned {
        result[&PlayerId(id)]
    }

    #[test]
    fn four_players_two_teams_alternate() {
        let players = vec![
            human(1, "P1"),
            human(2, "P2"),
            human(3, "P3"),
            human(4, "P4"),
        ];
        let teams = teams_for_count(2);
        let result = assign_teams(&players, &teams, None, &ManualTeamAssignments::new());
        assert_eq!(team_of(&result, 1), Assigned::Team(Team::Red));
        assert_eq!(team_of(&result, 2), Assigned::Team(Team::Blue));
        assert_eq!(team_of(&result, 3), Assigned::Team(Team::Red));
        assert_eq!(team_of(&result, 4), Assigned::Team(Team::Blue));
    }

    #[test]
    fn clan_overflow_is_kicked_not_spilled() {
        // capacity 3 per team, clan of 4 + clan of 2
        let players = vec![
            human(1, "[AAA]One"),
            human(2, "[AAA]Two"),
            human(3, "[AAA]Three"),
            human(4, "[AAA]Four"),
            human(5, "[BB]Five"),
            human(6, "[BB]Six"),
        ];
        let teams = teams_for_count(2);
        let result = assign_teams(&players, &teams, Some(3), &ManualTeamAssignments::new());

        let kicked = result
            .values()
            .filter(|a| **a == Assigned::Kicked)
            .count();
        assert_eq!(kicked, 1);

        // the larger clan occupies one team to capacity
        let aaa_teams: Vec<Assigned> = (1..=4).map(|i| team_of(&result, i)).collect();
        let placed: Vec<&Assigned> = aaa_teams
            .iter()
            .filter(|a| matches!(a, Assigned::Team(_)))
            .collect();
        assert_eq!(placed.len(), 3);
        assert!(placed.windows(2).all(|w| w[0] == w[1]));

        // the smaller clan stays together on the other team
        assert_eq!(team_of(&result, 5), team_of(&result, 6));
        assert_ne!(team_of(&result, 5), *placed[0]);
    }

    #[test]
    fn clan_members_stay_together() {
        let players = vec![
            human(1, "[X]A"),
            human(2, "NoClan"),
            human(3, "[X]B"),
            human(4, "[X]C"),
        ];
        let teams = teams_for_count(2);
        let result = assign_teams(&players, &teams, None, &ManualTeamAssignments::new());
        assert_eq!(team_of(&result, 1), team_of(&result, 3));
        assert_eq!(team_of(&result, 1), team_of(&result, 4));
    }

    #[test]
    fn manual_assignment_wins_when_capacity_allows() {
        let players = vec![human(1, "P1"), human(2, "P2"), human(3, "P3")];
        let mut manual = ManualTeamAssignments::new();
        manual.insert("client-3".to_string(), Team::Blue);
        let teams = teams_for_count(2);
        let result = assign_teams(&players, &teams, None, &manual);
        assert_eq!(team_of(&result, 3), Assigned::Team(Team::Blue));
    }

    #[test]
    fn manual_overflow_falls_back_to_balancing() {
        let players = vec![human(1, "P1"), human(2, "P2"), human(3, "P3"), human(4, "P4")];
        let mut manual = ManualTeamAssignments::new();
        for id in 1..=4 {
            manual.insert(format!("client-{id}"), Team::Red);
        }
        let teams = teams_for_count(2);
        // capacity 2: only the first two manual picks fit on Red
        let result = assign_teams(&players, &teams, Some(2), &manual);
        assert_eq!(team_of(&result, 1), Assigned::Team(Team::Red));
        assert_eq!(team_of(&result, 2), Assigned::Team(Team::Red));
        assert_eq!(team_of(&result, 3), Assigned::Team(Team::Blue));
        assert_eq!(team_of(&result, 4), Assigned::Team(Team::Blue));
    }

    #[test]
    fn no_team_exceeds_max_size() {
        let players: Vec<PlayerInfo> = (1..=11).map(|i| human(i, "P")).collect();
        let teams = teams_for_count(3);
        let result = assign_teams(&players, &teams, None, &ManualTeamAssignments::new());
        let max = 4; // ceil(11 / 3)
        for team in &teams {
            let members = result
                .values()
                .filter(|a| **a == Assigned::Team(*team))
                .count();
            assert!(members <= max);
        }
    }

    #[test]
    fn nation_shuffle_is_deterministic() {
        let players: Vec<PlayerInfo> = (1..=4)
            .map(|i| human(i, "H"))
            .chain((10..=15).map(|i| nation(i, "N")))
            .collect();
        let teams = teams_for_count(2);
        let a = assign_teams(&players, &teams, None, &ManualTeamAssignments::new());
        let b = assign_teams(&players, &teams, None, &ManualTeamAssignments::new());
        assert_eq!(a, b);
    }

    #[test]
    fn humans_vs_nations_bypasses_balancing() {
        let players = vec![
            human(1, "H1"),
            human(2, "H2"),
            human(3, "H3"),
            nation(10, "N1"),
        ];
        let result = assign_teams_for_mode(
            GameMode::HumansVsNations,
            &players,
            &ManualTeamAssignments::new(),
        );
        assert_eq!(team_of(&result, 1), Assigned::Team(Team::Humans));
        assert_eq!(team_of(&result, 2), Assigned::Team(Team::Humans));
        assert_eq!(team_of(&result, 3), Assigned::Team(Team::Humans));
        assert_eq!(team_of(&result, 10), Assigned::Team(Team::Nations));
    }

    #[test]
    fn lobby_preview_inflates_the_denominator() {
        let players: Vec<PlayerInfo> = (1..=4).map(|i| human(i, "P")).collect();
        let teams = teams_for_count(2);
        // 4 humans + 4 expected nations over 2 teams: capacity 4, so
        // all four humans fit even if balancing would otherwise cap at 2
        let result = assign_teams_lobby_preview(&players, &teams, 4, &ManualTeamAssignments::new());
        assert!(result.values().all(|a| matches!(a, Assigned::Team(_))));
    }

    #[test]
    fn everyone_kicked_when_all_teams_full() {
        let players: Vec<PlayerInfo> = (1..=5).map(|i| human(i, "P")).collect();
        let teams = teams_for_count(2);
        let result = assign_teams(&players, &teams, Some(2), &ManualTeamAssignments::new());
        let kicked = result
            .values()
            .filter(|a| **a == Assigned::Kicked)
            .count();
        assert_eq!(kicked, 1);
    }
}
