//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the runtime-tunable
//! constants in [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! ## Usage
//!
//! The simulation context copies the config at construction; systems read it
//! back through `Res<Simulation>` via [`crate::simulation::Simulation::config`].
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{validate_interval_range, validate_positive, SimResult};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Arena ─────────────────────────────────────────────────────────────────
    pub arena_width: f32,
    pub arena_height: f32,
    pub fps: u32,
    pub in_play_range: f32,
    pub warning_duration_ms: u64,

    // ── Feature toggles ───────────────────────────────────────────────────────
    pub asteroids_enabled: bool,
    pub enemies_enabled: bool,
    pub enemy_shoots: bool,

    // ── Hazard generators ─────────────────────────────────────────────────────
    pub ast_min_interval_ms: u64,
    pub ast_max_interval_ms: u64,
    pub ast_storm: u32,
    pub ast_cap: usize,
    pub asteroid_min_radius: u32,
    pub asteroid_max_radius: u32,
    pub enemy_min_interval_ms: u64,
    pub enemy_max_interval_ms: u64,

    // ── Enemy ─────────────────────────────────────────────────────────────────
    pub enemy_max_speed: u32,
    pub enemy_bounty: u32,
    pub wreckage_pieces: u32,

    // ── Player ────────────────────────────────────────────────────────────────
    pub player_lives: i32,
    pub max_shield: i32,
    pub new_life_interval_ms: u64,

    // ── Weapons ───────────────────────────────────────────────────────────────
    pub wpn_cooloff_interval_ms: u64,
    pub wpn_cooloff_rate: u32,
    pub refresh_ammo_ms: u64,

    // ── Supply ship ───────────────────────────────────────────────────────────
    pub docking_proximity: f32,

    // ── Misc ──────────────────────────────────────────────────────────────────
    /// Fixed RNG seed for reproducible sessions; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    pub save_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Arena
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            fps: FPS,
            in_play_range: IN_PLAY_RANGE,
            warning_duration_ms: WARNING_DURATION_MS,
            // Toggles
            asteroids_enabled: true,
            enemies_enabled: true,
            enemy_shoots: true,
            // Hazard generators
            ast_min_interval_ms: AST_MIN_INTERVAL_MS,
            ast_max_interval_ms: AST_MAX_INTERVAL_MS,
            ast_storm: AST_STORM,
            ast_cap: AST_CAP,
            asteroid_min_radius: ASTEROID_MIN_RADIUS,
            asteroid_max_radius: ASTEROID_MAX_RADIUS,
            enemy_min_interval_ms: ENEMY_MIN_INTERVAL_MS,
            enemy_max_interval_ms: ENEMY_MAX_INTERVAL_MS,
            // Enemy
            enemy_max_speed: ENEMY_MAX_SPEED,
            enemy_bounty: ENEMY_BOUNTY,
            wreckage_pieces: WRECKAGE_PIECES,
            // Player
            player_lives: PLAYER_LIVES,
            max_shield: MAX_SHIELD,
            new_life_interval_ms: NEW_LIFE_INTERVAL_MS,
            // Weapons
            wpn_cooloff_interval_ms: WPN_COOLOFF_INTERVAL_MS,
            wpn_cooloff_rate: WPN_COOLOFF_RATE,
            refresh_ammo_ms: REFRESH_AMMO_MS,
            // Supply ship
            docking_proximity: DOCKING_PROXIMITY,
            // Misc
            rng_seed: None,
            save_path: SAVE_PATH.to_string(),
        }
    }
}

impl GameConfig {
    /// Arena centre in screen coordinates.
    #[inline]
    pub fn arena_center(&self) -> Vec2 {
        Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }

    /// Radius around the arena centre beyond which culled actors die.
    #[inline]
    pub fn in_play_radius(&self) -> f32 {
        self.arena_width * self.in_play_range
    }

    /// Whether `pos` lies strictly inside the visible arena.
    #[inline]
    pub fn on_screen(&self, pos: Vec2) -> bool {
        pos.x > 0.0 && pos.x < self.arena_width && pos.y > 0.0 && pos.y < self.arena_height
    }

    /// Whether `pos` is beyond the in-play radius around the arena centre.
    #[inline]
    pub fn out_of_play(&self, pos: Vec2) -> bool {
        pos.distance(self.arena_center()) > self.in_play_radius()
    }

    /// Milliseconds of simulation time covered by one tick.
    #[inline]
    pub fn ms_per_tick(&self) -> f64 {
        1000.0 / f64::from(self.fps.max(1))
    }

    /// Reject values that would stall or destabilise the simulation.
    pub fn validate(&self) -> SimResult<()> {
        validate_positive("arena_width", self.arena_width)?;
        validate_positive("arena_height", self.arena_height)?;
        validate_positive("in_play_range", self.in_play_range)?;
        validate_positive("fps", self.fps as f32)?;
        validate_interval_range(
            "ast_interval_ms",
            self.ast_min_interval_ms,
            self.ast_max_interval_ms,
        )?;
        validate_interval_range(
            "enemy_interval_ms",
            self.enemy_min_interval_ms,
            self.enemy_max_interval_ms,
        )?;
        validate_positive("enemy_max_speed", self.enemy_max_speed as f32)?;
        if self.asteroid_min_radius > self.asteroid_max_radius {
            return Err(crate::error::SimError::UnsafeConstant {
                name: "asteroid_min_radius",
                value: self.asteroid_min_radius as f32,
                safe_range: "≤ asteroid_max_radius",
            });
        }
        Ok(())
    }
}

/// Read a config file, returning the compiled defaults when the file is
/// missing, unparsable or fails validation.
pub fn load_config_from(path: &Path) -> GameConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    info!("Loaded game config from {}", path.display());
                    loaded
                }
                Err(e) => {
                    warn!("Rejected {}: {e}; using defaults", path.display());
                    GameConfig::default()
                }
            },
            Err(e) => {
                warn!("Failed to parse {}: {e}; using defaults", path.display());
                GameConfig::default()
            }
        },
        Err(_) => {
            // Missing file is the normal case.
            info!("No {} found; using compiled defaults", path.display());
            GameConfig::default()
        }
    }
}

/// Load `assets/game.toml` (see [`CONFIG_PATH`]).
pub fn load_game_config() -> GameConfig {
    load_config_from(Path::new(CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: GameConfig = toml::from_str("ast_storm = 3\nenemy_shoots = false\n").unwrap();
        assert_eq!(cfg.ast_storm, 3);
        assert!(!cfg.enemy_shoots);
        assert_eq!(cfg.player_lives, PLAYER_LIVES);
        assert_eq!(cfg.arena_width, ARENA_WIDTH);
    }

    #[test]
    fn inverted_interval_range_is_rejected() {
        let cfg = GameConfig {
            ast_min_interval_ms: 5000,
            ast_max_interval_ms: 1000,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn in_play_radius_is_multiple_of_width() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.in_play_radius(), ARENA_WIDTH * IN_PLAY_RANGE);
        assert_eq!(cfg.arena_center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config_from(Path::new("definitely/not/here.toml"));
        assert_eq!(cfg.fps, FPS);
    }
}
