use warfront_protocol::TileRef;

use crate::bot_names::{BOT_NAMES, SPECIAL_NAMES};
use crate::map::GameMap;
use crate::rng::PseudoRandom;

/// Minimum Manhattan separation between bot spawn points.
const MIN_SEPARATION: u32 = 30;
/// Total placement attempts across all bots, not per bot.
const MAX_TRIES: u32 = 10_000;
/// Percent chance a bot draws from the special name pool.
const SPECIAL_NAME_PERCENT: i64 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotSpawn {
    pub name: String,
    pub tile: TileRef,
}

/// Places bots on land with mutual separation, naming them from a
/// shuffled pool. Placement failure is not an error: after the global
/// try budget runs out the spawner returns whatever it managed.
pub struct BotSpawner<'a> {
    map: &'a GameMap,
    rng: PseudoRandom,
    name_order: Vec<usize>,
    name_cursor: usize,
}

impl<'a> BotSpawner<'a> {
    pub fn new(map: &'a GameMap, seed: u64) -> Self {
        let mut rng = PseudoRandom::seed_from_u64(seed);
        let mut name_order: Vec<usize> = (0..BOT_NAMES.len()).collect();
        rng.shuffle(&mut name_order);
        Self {
            map,
            rng,
            name_order,
            name_cursor: 0,
        }
    }

    fn next_name(&mut self) -> String {
        if self.rng.next_int(0, 100) < SPECIAL_NAME_PERCENT {
            return (*self.rng.rand_element(SPECIAL_NAMES)).to_string();
        }
        let idx = self.name_cursor;
        self.name_cursor += 1;
        if idx < self.name_order.len() {
            BOT_NAMES[self.name_order[idx]].to_string()
        } else {
            // pool exhausted: recycle with a numeric suffix
            let base = self.name_order[idx % self.name_order.len()];
            format!("{} {}", BOT_NAMES[base], idx / self.name_order.len() + 1)
        }
    }

    pub fn spawn_bots(&mut self, count: u32) -> Vec<BotSpawn> {
        let mut spawns: Vec<BotSpawn> = Vec::with_capacity(count as usize);
        if self.map.is_empty() {
            return spawns;
        }
        let mut tries = 0u32;
        while spawns.len() < count as usize && tries < MAX_TRIES {
            tries += 1;
            let tile = self.rng.next_int(0, self.map.len() as i64) as TileRef;
            if !self.map.is_land(tile) || self.map.has_owner(tile) {
                continue;
            }
            let too_close = spawns
                .iter()
                .any(|s| self.map.manhattan_dist(s.tile, tile) < MIN_SEPARATION);
            if too_close {
                continue;
            }
            let name = self.next_name();
            spawns.push(BotSpawn { name, tile });
        }
        spawns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_requested_count_with_separation() {
        let map = GameMap::all_land(200, 200);
        let mut spawner = BotSpawner::new(&map, 99);
        let spawns = spawner.spawn_bots(5);
        assert_eq!(spawns.len(), 5);
        for (i, a) in spawns.iter().enumerate() {
            assert!(map.is_land(a.tile));
            for b in spawns.iter().skip(i + 1) {
                assert!(map.manhattan_dist(a.tile, b.tile) >= MIN_SEPARATION);
            }
        }
    }

    #[test]
    fn gives_up_after_the_try_budget_instead_of_looping() {
        // a map too small to hold 10 separated spawns
        let map = GameMap::all_land(10, 10);
        let mut spawner = BotSpawner::new(&map, 5);
        let spawns = spawner.spawn_bots(10);
        assert!(spawns.len() < 10);
        assert!(!spawns.is_empty());
    }

    #[test]
    fn same_seed_places_identically() {
        let map = GameMap::all_land(150, 150);
        let a = BotSpawner::new(&map, 1234).spawn_bots(8);
        let b = BotSpawner::new(&map, 1234).spawn_bots(8);
        assert_eq!(a, b);
    }

    #[test]
    fn names_are_unique_while_the_pool_lasts() {
        let map = GameMap::all_land(400, 400);
        let mut spawner = BotSpawner::new(&map, 77);
        let spawns = spawner.spawn_bots(20);
        let regular: Vec<&String> = spawns
            .iter()
            .map(|s| &s.name)
            .filter(|n| !SPECIAL_NAMES.contains(&n.as_str()))
            .collect();
        let mut deduped = regular.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(regular.len(), deduped.len());
    }
}
