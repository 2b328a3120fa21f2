//! Enemy ships: swarm entry, burst-fire behaviour and weapon upkeep.
//!
//! Enemies enter from a ring far outside the arena with `FLEE | SEEK`
//! instincts: they hunt the player and break off only when a player round
//! comes within [`ENEMY_FLEE_DISTANCE`].  Each carries a Laser and a Gatling
//! bay and fires in random bursts, but only while visible on screen.
//!
//! ## Burst fire
//!
//! ```text
//! idle ──(on screen, pause elapsed)──▶ shooting ──(burst elapsed)──▶ idle
//!          pick random bay, burst ∈ [50, 500) ms       pause ∈ [2000, 5000) ms
//! ```
//!
//! While shooting, rounds leave at the selected class's automatic rate.

use crate::actor::{Actor, ActorId, ActorKind, EdgePolicy, Group, PLAYER_ID};
use crate::constants::*;
use crate::instinct::{Instinct, Steering, SteeringProfile, Target};
use crate::kinematics::{rotate_deg, KinematicBody};
use crate::weapon::{FireOutcome, Payload, WeaponBayEntry, WeaponKind};
use bevy::prelude::*;
use rand::Rng;

/// Enemy-only state carried in [`ActorKind::Enemy`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyState {
    pub payload: Payload,
    shooting: bool,
    last_shooting_ms: u64,
    shooting_interval_ms: u64,
    burst_started_ms: u64,
    burst_ms: u64,
}

impl EnemyState {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut payload = Payload::from_entries(vec![
            WeaponBayEntry::full(WeaponKind::Laser),
            WeaponBayEntry::full(WeaponKind::Gatling),
        ]);
        payload.select(rng.gen_range(0..payload.slots().len()));
        Self {
            payload,
            shooting: false,
            last_shooting_ms: 0,
            shooting_interval_ms: ENEMY_MAX_SHOOT_INTERVAL_MS,
            burst_started_ms: 0,
            burst_ms: ENEMY_MAX_BURST_MS,
        }
    }

    #[inline]
    pub fn is_shooting(&self) -> bool {
        self.shooting
    }

    /// Advance the burst state machine.  Returns the class of a round that
    /// just left the bay, if any.
    pub fn update_fire(
        &mut self,
        now_ms: u64,
        on_screen: bool,
        rng: &mut impl Rng,
    ) -> Option<WeaponKind> {
        if !self.shooting
            && on_screen
            && now_ms.saturating_sub(self.last_shooting_ms) > self.shooting_interval_ms
        {
            self.payload
                .select(rng.gen_range(0..self.payload.slots().len().max(1)));
            self.burst_ms = rng.gen_range(ENEMY_MIN_BURST_MS..ENEMY_MAX_BURST_MS);
            self.burst_started_ms = now_ms;
            self.shooting = true;
        }

        if !self.shooting {
            return None;
        }

        if now_ms.saturating_sub(self.burst_started_ms) > self.burst_ms {
            self.shooting = false;
            self.shooting_interval_ms =
                rng.gen_range(ENEMY_MIN_SHOOT_INTERVAL_MS..ENEMY_MAX_SHOOT_INTERVAL_MS);
            self.last_shooting_ms = now_ms;
            return None;
        }

        match self.payload.auto_fire(now_ms) {
            FireOutcome::Fired(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Random entry point on the swarm ring around `center`.
pub fn entry_point(center: Vec2, half_width: f32, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.gen_range(0..=360) as f32;
    center + rotate_deg(Vec2::new(half_width + ENEMY_ENTRY_MARGIN, 0.0), angle)
}

/// A new enemy at `pos` hunting the player and dodging player rounds.
pub fn spawn_enemy(id: ActorId, pos: Vec2, max_speed: f32, rng: &mut impl Rng) -> Actor {
    let body = KinematicBody::new(pos, ENEMY_RADIUS, max_speed, ENEMY_MAX_YAW).facing_travel();
    let steering = Steering {
        instinct: Instinct::FLEE | Instinct::SEEK,
        seek_target: Some(Target::Actor(PLAYER_ID)),
        flee_target: Some(Target::Group(Group::PlayerWeapons)),
        ..Steering::default().with_profile(SteeringProfile::ENEMY)
    };
    Actor::new(id, ActorKind::Enemy(EnemyState::new(rng)), body)
        .with_steering(steering)
        .with_edge(EdgePolicy::Cull)
}
