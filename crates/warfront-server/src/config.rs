//! Server configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scheduler and session configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Wall-clock time between turns
    pub turn_interval: Duration,
    /// How often the scheduler checks whether to fire the next turn
    pub poll_interval: Duration,
    /// Every Nth turn gets its reported hash archived (bounds record size)
    pub hash_store_period: u64,
    /// Replay speed multiplier applied to the turn interval (percent,
    /// 100 = realtime, 50 = double speed)
    pub replay_speed_percent: u32,
    /// Map edge length for locally generated games
    pub map_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            turn_interval: Duration::from_millis(100),
            poll_interval: Duration::from_millis(5),
            hash_store_period: 100,
            replay_speed_percent: 100,
            map_size: 100,
        }
    }
}

impl ServerConfig {
    /// Config from the `WARFRONT_ENV` profile. `dev` runs a fast small
    /// game; anything else gets production defaults.
    pub fn from_env() -> Self {
        match std::env::var("WARFRONT_ENV").as_deref() {
            Ok("dev") => Self {
                turn_interval: Duration::from_millis(25),
                map_size: 50,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Effective wall-clock interval between turns, replay speed applied.
    pub fn effective_turn_interval(&self) -> Duration {
        self.turn_interval * self.replay_speed_percent.max(1) / 100
    }
}
