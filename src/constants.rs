//! Centralised gameplay and dynamics constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! Units follow the simulation's screen space: positions in pixels with the
//! y axis pointing **down**, velocities in pixels per tick, rotations in
//! degrees where 0° is "up" and angles grow counter-clockwise on screen.
//! Intervals are milliseconds of simulation time.
//!
//! `GameConfig::default()` (see [`crate::config`]) mirrors the runtime-tunable
//! subset of these values.

// ── Arena ─────────────────────────────────────────────────────────────────────

/// Arena width (pixels).
pub const ARENA_WIDTH: f32 = 800.0;

/// Arena height (pixels).
pub const ARENA_HEIGHT: f32 = 600.0;

/// Logical ticks per second; one tick per rendered frame.
pub const FPS: u32 = 60;

/// Multiple of the arena width considered "in play", measured from the arena
/// centre.  Culled actors die beyond this radius.
pub const IN_PLAY_RANGE: f32 = 3.0;

/// How long a warning message stays visible.
pub const WARNING_DURATION_MS: u64 = 2000;

// ── Automaton defaults ────────────────────────────────────────────────────────

/// Default max linear speed of an automaton (pixels/tick).
pub const AUTOMATON_MAX_SPEED: f32 = 10.0;

/// Default max angular speed of an automaton (degrees/tick).
pub const AUTOMATON_MAX_ANGVEL: f32 = 3.0;

/// Default automaton health.
pub const AUTOMATON_MAX_HEALTH: i32 = 100;

/// Inside this distance seek slows proportionally (arrival behaviour).
pub const APPROACH_RADIUS: f32 = 100.0;

/// Max steering force for seek.
pub const SEEK_FORCE: f32 = 0.6;

/// Max steering force for flee.
pub const FLEE_FORCE: f32 = 0.6;

/// Flee only urgently runs away from targets closer than this.
pub const FLEE_DISTANCE: f32 = 100.0;

/// Interval between new wander ring points.
pub const WANDER_INTERVAL_MS: u64 = 100;

/// Max change of the wander angle per interval (degrees).
pub const WANDER_MAX_TURN: f32 = 180.0;

/// Radius of the wander ring.
pub const WANDER_RING_RADIUS: f32 = 200.0;

/// Look-ahead distance of the wander ring centre along the heading.
pub const WANDER_RING_DISTANCE: f32 = 100.0;

// ── Enemy ─────────────────────────────────────────────────────────────────────

/// Upper bound of the per-enemy random max speed (sampled in `1..=N`).
pub const ENEMY_MAX_SPEED: u32 = 3;

/// Max yaw speed of an enemy ship (degrees/tick).
pub const ENEMY_MAX_YAW: f32 = 5.0;

pub const ENEMY_APPROACH_RADIUS: f32 = 50.0;
pub const ENEMY_SEEK_FORCE: f32 = 0.1;
pub const ENEMY_FLEE_FORCE: f32 = 0.1;

/// Enemies only break off to dodge projectiles this close.
pub const ENEMY_FLEE_DISTANCE: f32 = 20.0;

/// Enemy collision radius.
pub const ENEMY_RADIUS: f32 = 24.0;

/// Minimum pause between enemy bursts of fire.
pub const ENEMY_MIN_SHOOT_INTERVAL_MS: u64 = 2000;

/// Maximum pause between enemy bursts of fire.
pub const ENEMY_MAX_SHOOT_INTERVAL_MS: u64 = 5000;

/// Minimum burst length.
pub const ENEMY_MIN_BURST_MS: u64 = 50;

/// Maximum burst length.
pub const ENEMY_MAX_BURST_MS: u64 = 500;

/// Player score for destroying an enemy.
pub const ENEMY_BOUNTY: u32 = 1000;

/// Entry ring radius beyond the half-width of the arena.
pub const ENEMY_ENTRY_MARGIN: f32 = 1000.0;

/// Number of wreckage pieces left by a destroyed enemy.
pub const WRECKAGE_PIECES: u32 = 4;

// ── Weapons ───────────────────────────────────────────────────────────────────

/// Interval at which every weapon slot cools down.
pub const WPN_COOLOFF_INTERVAL_MS: u64 = 3000;

/// Heat removed from every slot per cool-off interval.
pub const WPN_COOLOFF_RATE: u32 = 10;

/// Ammo auto-replenish interval (0 = no auto-replenish).
pub const REFRESH_AMMO_MS: u64 = 5000;

/// Delay before a guided missile acquires its target.
pub const GUIDED_ACQUIRE_MS: u64 = 300;

/// Every N-th Gatling round is a tracer.
pub const GATLING_TRACER_EVERY: u32 = 10;

// ── Player ────────────────────────────────────────────────────────────────────

/// Max forward speed relative to the ship's orientation.
pub const PLAYER_MAX_SPEED: f32 = 10.0;

/// Max reverse speed relative to the ship's orientation.
pub const PLAYER_MAX_REVERSE: f32 = 5.0;

/// Max sideways (strafe) speed relative to the ship's orientation.
pub const PLAYER_MAX_SIDEWAYS: f32 = 5.0;

/// Below this speed residual velocity snaps to zero while damping.
pub const PLAYER_MIN_SPEED: f32 = 0.1;

/// Max yaw speed (degrees/tick).
pub const PLAYER_MAX_YAW: f32 = 3.0;

/// Below this yaw residual rotation snaps to zero while damping.
pub const PLAYER_MIN_YAW: f32 = 0.0;

/// Velocity damping strength (percent per tick) when no thrust is applied.
pub const PLAYER_VEL_DAMPING: f32 = 1.0;

/// Yaw damping strength (percent per tick) when no yaw is applied.
pub const PLAYER_YAW_DAMPING: f32 = 5.0;

/// Thrust sensitivity applied to the longitudinal input axis.
pub const THRUST_SENS: f32 = 0.4;

/// Strafe sensitivity applied to the lateral input axis.
pub const SIDEWAYS_SENS: f32 = 0.2;

/// Yaw sensitivity applied to the yaw input axis.
pub const YAW_SENS: f32 = 0.05;

/// Player collision radius.
pub const PLAYER_RADIUS: f32 = 20.0;

/// Shield at full strength.
pub const MAX_SHIELD: i32 = 100;

/// Initial number of lives.
pub const PLAYER_LIVES: i32 = 3;

/// Max number of weapon slots in a payload.
pub const MAX_WEAPONS: usize = 5;

/// How long the ship stays hidden while a new life spawns.
pub const NEW_LIFE_INTERVAL_MS: u64 = 2000;

/// Passive bodies with a radius at or below this do no damage to the player.
pub const NEGLIGIBLE_RADIUS: u32 = 3;

// ── Supply ship ───────────────────────────────────────────────────────────────

pub const SUPPLY_MAX_SPEED: f32 = 3.0;
pub const SUPPLY_APPROACH_RADIUS: f32 = 150.0;
pub const SUPPLY_SEEK_FORCE: f32 = 0.1;
pub const SUPPLY_RADIUS: f32 = 40.0;

/// Max distance between supply ship and player for docking.
pub const DOCKING_PROXIMITY: f32 = 3.0;

/// Parking ring radius beyond the arena width.
pub const PARKING_MARGIN: f32 = 500.0;

// ── Space junk ────────────────────────────────────────────────────────────────

/// Max asteroid speed component (pixels/tick).
///
/// Also bounds the velocity jitter given to debris and wreckage.
pub const AST_SPEED: i32 = 6;

/// Asteroid spin range (degrees/tick, symmetric).
pub const AST_SPIN: i32 = 8;

/// Debris and wreckage spin range (degrees/tick, symmetric).
pub const DEBRIS_SPIN: i32 = 15;

/// Smallest asteroid radius.
pub const ASTEROID_MIN_RADIUS: u32 = 8;

/// Largest asteroid radius.
pub const ASTEROID_MAX_RADIUS: u32 = 48;

/// Smallest wreckage radius.
pub const WRECKAGE_MIN_RADIUS: u32 = 6;

/// Largest wreckage radius.
pub const WRECKAGE_MAX_RADIUS: u32 = 16;

/// Kinetic damage divisor for asteroids and debris.
pub const JUNK_DAMAGE_DIVISOR: f32 = 4.0;

/// Kinetic damage divisor for wreckage.
pub const WRECKAGE_DAMAGE_DIVISOR: f32 = 8.0;

// ── Hazard generators ─────────────────────────────────────────────────────────

/// Minimum asteroid storm interval.
pub const AST_MIN_INTERVAL_MS: u64 = 1000;

/// Maximum asteroid storm interval.
pub const AST_MAX_INTERVAL_MS: u64 = 5000;

/// Number of asteroids per storm.
pub const AST_STORM: u32 = 10;

/// Storms are suppressed while this many passive bodies are active.
///
/// Too many active bodies slows the collision pass quadratically.
pub const AST_CAP: usize = 20;

/// Minimum enemy swarm interval.
pub const ENEMY_MIN_INTERVAL_MS: u64 = 1000;

/// Maximum enemy swarm interval.
pub const ENEMY_MAX_INTERVAL_MS: u64 = 5000;

// ── Explosions ────────────────────────────────────────────────────────────────

pub const EXPLOSION_SMALL_MS: u64 = 450;
pub const EXPLOSION_LARGE_MS: u64 = 450;
pub const EXPLOSION_DEATH_MS: u64 = 450;

// ── Persistence ───────────────────────────────────────────────────────────────

/// Default save file location, relative to the working directory.
pub const SAVE_PATH: &str = "saves/gamestate.toml";

/// Runtime config file location.
pub const CONFIG_PATH: &str = "assets/game.toml";
