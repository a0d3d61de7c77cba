use warfront_protocol::{Difficulty, GameMode, GameSettings, Troops};

/// Game-rule configuration, explicitly constructed once per match and
/// passed down by reference into every component that needs it.
#[derive(Clone, Debug)]
pub struct GameConfig {
    settings: GameSettings,
}

impl GameConfig {
    pub fn new(settings: GameSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    pub fn game_mode(&self) -> GameMode {
        self.settings.game_mode
    }

    pub fn bot_count(&self) -> u32 {
        self.settings.bot_count
    }

    pub fn spawn_phase_turns(&self) -> u64 {
        self.settings.spawn_phase_turns
    }

    pub fn starting_troops(&self) -> Troops {
        self.settings.starting_troops
    }

    /// Troop ceiling for a player, scaling with held territory.
    pub fn max_troops(&self, num_tiles: usize) -> Troops {
        10_000 + 20 * num_tiles as Troops
    }

    /// Troops regenerated per tick toward the ceiling.
    pub fn troop_increase(&self, troops: Troops, max_troops: Troops) -> Troops {
        if troops >= max_troops {
            return 0;
        }
        (10 + (max_troops - troops) / 100).min(max_troops - troops)
    }

    /// Gold income per tick per player.
    pub fn gold_per_tick(&self, num_tiles: usize) -> u128 {
        10 + num_tiles as u128 / 10
    }

    /// (trigger, reserve, expand) troop-ratio knobs for nation AI.
    pub fn nation_attack_ratios(&self) -> (f64, f64, f64) {
        (0.6, 0.33, 0.1)
    }

    /// (trigger, reserve, expand) troop-ratio knobs for bot AI.
    pub fn bot_attack_ratios(&self) -> (f64, f64, f64) {
        (0.7, 0.2, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_troops_scales_with_territory() {
        let config = GameConfig::new(GameSettings::default());
        assert_eq!(config.max_troops(0), 10_000);
        assert!(config.max_troops(500) > config.max_troops(100));
    }

    #[test]
    fn troop_increase_caps_at_ceiling() {
        let config = GameConfig::new(GameSettings::default());
        assert_eq!(config.troop_increase(10_000, 10_000), 0);
        let near_cap = config.troop_increase(9_995, 10_000);
        assert_eq!(near_cap, 5);
    }
}
