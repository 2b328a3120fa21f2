//! The player ship.
//!
//! Unlike the autonomous actors, the player is driven by input signals and
//! moves in its own frame of reference:
//!
//! * thrust and strafe accelerate **relative to the ship's orientation**;
//! * speed limits are applied in the ship frame (forward, reverse and
//!   sideways separately), yaw speed is capped at [`PLAYER_MAX_YAW`];
//! * with no input the ship coasts down under inertial damping;
//! * the ship is clamped to the arena, zeroing the velocity component that
//!   hit the wall.
//!
//! Shield ≤ 0 costs a life.  While a new life spawns the ship is hidden off
//! screen and cannot be hit.

use crate::config::GameConfig;
use crate::constants::*;
use crate::kinematics::{rotate_deg, KinematicBody};
use crate::weapon::{FireOutcome, Payload, WeaponKind};
use bevy::prelude::*;

/// What happened when the shield ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeLost {
    /// A new life is spawning; this many remain.
    Respawning(i32),
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: KinematicBody,
    pub score: u32,
    pub level: u32,
    pub lives: i32,
    pub shield: i32,
    pub payload: Payload,
    pub docked: bool,
    /// Set by weapon cycling; docking needs cold weapons.
    pub weapons_hot: bool,
    hidden: bool,
    hidden_since_ms: u64,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            body: KinematicBody::new(
                Self::start_position(config),
                PLAYER_RADIUS,
                PLAYER_MAX_SPEED,
                PLAYER_MAX_YAW,
            ),
            score: 0,
            level: 0,
            lives: config.player_lives,
            shield: config.max_shield,
            payload: Payload::starter(),
            docked: false,
            weapons_hot: false,
            hidden: false,
            hidden_since_ms: 0,
        }
    }

    fn start_position(config: &GameConfig) -> Vec2 {
        Vec2::new(config.arena_width / 2.0, config.arena_height - PLAYER_RADIUS)
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Set acceleration from input axes in `[-1, 1]`: `x` strafes, `y`
    /// thrusts (negative is forward), `yaw` turns.  Returns `false` and
    /// freezes the ship while docked.
    pub fn accelerate(&mut self, x: f32, y: f32, yaw: f32) -> bool {
        if self.docked {
            self.body.vel = Vec2::ZERO;
            self.body.acc = Vec2::ZERO;
            self.body.angvel = 0.0;
            self.body.angacc = 0.0;
            return false;
        }
        self.body.acc = rotate_deg(Vec2::new(x * SIDEWAYS_SENS, y * THRUST_SENS), -self.body.rot);
        self.body.angacc = yaw * YAW_SENS;
        true
    }

    /// Advance one tick: respawn timer, motion, damping, weapon upkeep and
    /// arena clamping.  Returns `true` on the tick the ship reappears.
    pub fn update(&mut self, now_ms: u64, config: &GameConfig) -> bool {
        let mut respawned = false;
        if self.hidden && now_ms.saturating_sub(self.hidden_since_ms) > config.new_life_interval_ms
        {
            self.hidden = false;
            self.body.pos = Self::start_position(config);
            respawned = true;
        }

        self.integrate();
        self.damp();

        self.payload.replenish(now_ms, config.refresh_ammo_ms);
        self.payload
            .cool_off(now_ms, config.wpn_cooloff_interval_ms, config.wpn_cooloff_rate);

        if !self.hidden {
            self.clamp_to_arena(config);
        }
        respawned
    }

    fn integrate(&mut self) {
        let body = &mut self.body;
        body.vel += body.acc;
        body.angvel += body.angacc;

        // Ship frame: -y is forward.
        let mut local = rotate_deg(body.vel, body.rot);
        local.y = local.y.clamp(-PLAYER_MAX_SPEED, PLAYER_MAX_REVERSE);
        local.x = local.x.clamp(-PLAYER_MAX_SIDEWAYS, PLAYER_MAX_SIDEWAYS);
        body.vel = rotate_deg(local, -body.rot);
        body.angvel = body.angvel.clamp(-PLAYER_MAX_YAW, PLAYER_MAX_YAW);

        body.pos += body.vel;
        body.rot = (body.rot + body.angvel).rem_euclid(360.0);
    }

    fn damp(&mut self) {
        let body = &mut self.body;
        if body.acc == Vec2::ZERO {
            body.vel /= 1.0 + PLAYER_VEL_DAMPING / 100.0;
        }
        if body.angacc == 0.0 {
            body.angvel /= 1.0 + PLAYER_YAW_DAMPING / 100.0;
        }
        if body.vel.length() < PLAYER_MIN_SPEED {
            body.vel = Vec2::ZERO;
        }
        if body.angvel.abs() < PLAYER_MIN_YAW {
            body.angvel = 0.0;
        }
    }

    fn clamp_to_arena(&mut self, config: &GameConfig) {
        let r = self.body.radius;
        let body = &mut self.body;
        if body.pos.x + r > config.arena_width {
            body.vel.x = 0.0;
            body.pos.x = config.arena_width - r;
        }
        if body.pos.x - r < 0.0 {
            body.vel.x = 0.0;
            body.pos.x = r;
        }
        if body.pos.y + r > config.arena_height {
            body.vel.y = 0.0;
            body.pos.y = config.arena_height - r;
        }
        if body.pos.y - r < 0.0 {
            body.vel.y = 0.0;
            body.pos.y = r;
        }
    }

    /// Single trigger pull on the selected bay.
    pub fn shoot(&mut self) -> FireOutcome {
        self.payload.fire()
    }

    /// Held-trigger fire on the selected bay.
    pub fn auto_shoot(&mut self, now_ms: u64) -> FireOutcome {
        self.payload.auto_fire(now_ms)
    }

    /// Select the next bay.  Ignored while docked.
    pub fn cycle_weapon(&mut self) -> Option<WeaponKind> {
        if self.docked {
            return None;
        }
        let class = self.payload.cycle()?;
        self.weapons_hot = class != WeaponKind::Empty;
        Some(class)
    }

    /// Selected class and its remaining ammo.
    pub fn ammo(&self) -> (WeaponKind, u32) {
        self.payload
            .selected()
            .map(|s| (s.class, s.ammo))
            .unwrap_or((WeaponKind::Empty, 0))
    }

    pub fn add_score(&mut self, points: i64) {
        self.score = (i64::from(self.score) + points).clamp(0, i64::from(u32::MAX)) as u32;
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.shield <= 0
    }

    /// Spend a life after the shield failed.
    pub fn lose_life(&mut self, now_ms: u64, config: &GameConfig) -> LifeLost {
        if self.lives > 0 {
            self.hide(now_ms, config);
            self.lives -= 1;
            self.shield = config.max_shield;
        }
        if self.lives > 0 {
            LifeLost::Respawning(self.lives)
        } else {
            LifeLost::GameOver
        }
    }

    /// Park the ship below the arena, motionless, until the respawn timer
    /// runs out.
    pub fn hide(&mut self, now_ms: u64, config: &GameConfig) {
        self.hidden = true;
        self.hidden_since_ms = now_ms;
        self.docked = false;
        self.body.pos = Vec2::new(config.arena_width / 2.0, config.arena_height + 200.0);
        self.body.vel = Vec2::ZERO;
        self.body.acc = Vec2::ZERO;
        self.body.angvel = 0.0;
        self.body.angacc = 0.0;
        self.body.rot = 0.0;
    }

    /// Overwrite progress from a saved snapshot.
    pub fn restore(&mut self, level: u32, score: u32, shield: i32, lives: i32, payload: Payload) {
        self.level = level;
        self.score = score;
        self.shield = shield;
        self.lives = lives;
        self.payload = payload;
    }
}
