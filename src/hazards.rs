//! Asteroid storms, enemy swarms and the level table.
//!
//! Both generators wait an interval sampled uniformly in `[min, max]` and
//! re-sample it after each trigger.
//!
//! | Generator | Suppressed while                               | Size                     |
//! |-----------|------------------------------------------------|--------------------------|
//! | Storm     | passive bodies ≥ `ast_cap`                     | `ast_storm` asteroids    |
//! | Swarm     | any enemy is active (timer restarts meanwhile) | `1..=swarm` for the level |
//!
//! The caller also skips both while the player is on a supply run or
//! trading.

use crate::config::GameConfig;
use rand::Rng;

/// `(level, score threshold, max swarm size)`, ascending by threshold.
pub const LEVELS: [(u32, u32, u32); 6] = [
    (0, 0, 1),
    (1, 20_000, 3),
    (2, 40_000, 5),
    (3, 60_000, 5),
    (4, 80_000, 8),
    (5, 1_000_000, 10),
];

/// Highest level whose threshold `score` has reached.
pub fn level_for_score(score: u32) -> u32 {
    LEVELS
        .iter()
        .rev()
        .find(|(_, threshold, _)| score >= *threshold)
        .map_or(0, |(level, _, _)| *level)
}

/// Largest swarm the given level can send.
pub fn max_swarm(level: u32) -> u32 {
    LEVELS
        .iter()
        .find(|(l, _, _)| *l == level)
        .or(LEVELS.last())
        .map_or(1, |(_, _, swarm)| *swarm)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HazardTimers {
    last_storm_ms: u64,
    storm_interval_ms: u64,
    last_swarm_ms: u64,
    swarm_interval_ms: u64,
}

impl HazardTimers {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            last_storm_ms: 0,
            storm_interval_ms: config.ast_max_interval_ms,
            last_swarm_ms: 0,
            swarm_interval_ms: config.enemy_max_interval_ms,
        }
    }

    /// Restart both intervals from `now_ms`.
    pub fn restart(&mut self, now_ms: u64) {
        self.last_storm_ms = now_ms;
        self.last_swarm_ms = now_ms;
    }

    /// Number of asteroids to spawn this tick, if a storm is due.
    pub fn poll_storm(
        &mut self,
        now_ms: u64,
        junk_count: usize,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Option<u32> {
        if !config.asteroids_enabled || junk_count >= config.ast_cap {
            return None;
        }
        if now_ms.saturating_sub(self.last_storm_ms) <= self.storm_interval_ms {
            return None;
        }
        self.last_storm_ms = now_ms;
        self.storm_interval_ms =
            rng.gen_range(config.ast_min_interval_ms..=config.ast_max_interval_ms);
        Some(config.ast_storm)
    }

    /// Number of enemies to spawn this tick, if a swarm is due.
    pub fn poll_swarm(
        &mut self,
        now_ms: u64,
        enemies_active: usize,
        level: u32,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Option<u32> {
        if !config.enemies_enabled {
            return None;
        }
        if enemies_active > 0 {
            self.last_swarm_ms = now_ms;
            return None;
        }
        if now_ms.saturating_sub(self.last_swarm_ms) <= self.swarm_interval_ms {
            return None;
        }
        self.last_swarm_ms = now_ms;
        self.swarm_interval_ms =
            rng.gen_range(config.enemy_min_interval_ms..=config.enemy_max_interval_ms);
        Some(rng.gen_range(1..=max_swarm(level).max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn levels_follow_score_thresholds() {
        assert_eq!(level_for_score(0), 0);
        assert_eq!(level_for_score(19_999), 0);
        assert_eq!(level_for_score(20_000), 1);
        assert_eq!(level_for_score(85_000), 4);
        assert_eq!(level_for_score(u32::MAX), 5);
        assert_eq!(max_swarm(0), 1);
        assert_eq!(max_swarm(4), 8);
        assert_eq!(max_swarm(99), 10);
    }

    #[test]
    fn storm_waits_for_interval_then_resamples() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut timers = HazardTimers::new(&config);

        assert_eq!(timers.poll_storm(config.ast_max_interval_ms, 0, &config, &mut rng), None);
        assert_eq!(
            timers.poll_storm(config.ast_max_interval_ms + 1, 0, &config, &mut rng),
            Some(config.ast_storm)
        );
        assert!(timers.storm_interval_ms >= config.ast_min_interval_ms);
        assert!(timers.storm_interval_ms <= config.ast_max_interval_ms);
        // Immediately after a trigger nothing is due.
        assert_eq!(
            timers.poll_storm(config.ast_max_interval_ms + 2, 0, &config, &mut rng),
            None
        );
    }

    #[test]
    fn storm_is_suppressed_at_the_hazard_cap() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut timers = HazardTimers::new(&config);
        assert_eq!(timers.poll_storm(60_000, config.ast_cap, &config, &mut rng), None);
        assert!(timers.poll_storm(60_000, config.ast_cap - 1, &config, &mut rng).is_some());
    }

    #[test]
    fn swarm_only_when_no_enemies_are_active() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut timers = HazardTimers::new(&config);

        assert_eq!(timers.poll_swarm(10_000, 2, 0, &config, &mut rng), None);
        // The timer restarted while enemies were active.
        assert_eq!(timers.poll_swarm(10_100, 0, 0, &config, &mut rng), None);
        let size = timers
            .poll_swarm(10_000 + config.enemy_max_interval_ms + 1, 0, 0, &config, &mut rng)
            .unwrap();
        assert_eq!(size, 1);
    }

    #[test]
    fn swarm_size_is_bounded_by_level() {
        let config = GameConfig {
            enemy_min_interval_ms: 0,
            enemy_max_interval_ms: 0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut timers = HazardTimers::new(&config);
        for t in 1..200 {
            if let Some(n) = timers.poll_swarm(t, 0, 4, &config, &mut rng) {
                assert!((1..=8).contains(&n));
            }
        }
    }

    #[test]
    fn disabled_generators_never_fire() {
        let config = GameConfig {
            asteroids_enabled: false,
            enemies_enabled: false,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut timers = HazardTimers::new(&config);
        assert_eq!(timers.poll_storm(1_000_000, 0, &config, &mut rng), None);
        assert_eq!(timers.poll_swarm(1_000_000, 0, 0, &config, &mut rng), None);
    }
}
