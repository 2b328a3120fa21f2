//! Passive hazards: asteroids, debris and wreckage.
//!
//! Passive bodies have no instinct.  They drift at constant velocity, spin,
//! and carry a kinetic damage rating fixed at creation:
//!
//! ```text
//! damage = ⌊radius × |velocity|² / k⌋      k = 4 (asteroid, debris), 8 (wreckage)
//! ```
//!
//! A struck asteroid or debris fragment disintegrates into `⌊radius / 4⌋`
//! smaller debris fragments, each inheriting the parent velocity plus an
//! integer jitter in `[-AST_SPEED, AST_SPEED)` per component.  Fragment
//! radii shrink fast enough that the cascade always terminates.

use crate::config::GameConfig;
use crate::constants::*;
use crate::kinematics::KinematicBody;
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JunkKind {
    Asteroid,
    Debris,
    Wreckage,
}

impl JunkKind {
    #[inline]
    fn damage_divisor(self) -> f32 {
        match self {
            JunkKind::Asteroid | JunkKind::Debris => JUNK_DAMAGE_DIVISOR,
            JunkKind::Wreckage => WRECKAGE_DAMAGE_DIVISOR,
        }
    }
}

/// A drifting hazard.
#[derive(Debug, Clone, PartialEq)]
pub struct PassiveBody {
    pub kind: JunkKind,
    pub body: KinematicBody,
    /// Integer collision radius in pixels.
    pub radius: u32,
    pub damage: i32,
    pub alive: bool,
}

impl PassiveBody {
    pub fn new(kind: JunkKind, pos: Vec2, vel: Vec2, radius: u32, spin: f32) -> Self {
        let mut body = KinematicBody::new(pos, radius as f32, f32::MAX, spin.abs())
            .with_velocity(vel);
        body.angvel = spin;
        let damage = (radius as f32 * vel.length_squared() / kind.damage_divisor()) as i32;
        Self {
            kind,
            body,
            radius,
            damage,
            alive: true,
        }
    }

    /// A new asteroid far above the arena, falling roughly downward.
    pub fn spawn_asteroid(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let w = config.arena_width as i32;
        let h = config.arena_height;
        let pos = Vec2::new(rng.gen_range(-w * 2..=w * 2) as f32, -h * 3.0);
        let drift = AST_SPEED / 4;
        let vel = Vec2::new(
            rng.gen_range(-drift..=drift) as f32,
            rng.gen_range(1..=AST_SPEED) as f32,
        );
        let radius = rng.gen_range(config.asteroid_min_radius..=config.asteroid_max_radius);
        let spin = rng.gen_range(-AST_SPIN..=AST_SPIN) as f32;
        Self::new(JunkKind::Asteroid, pos, vel, radius, spin)
    }

    /// One debris fragment broken off a parent of `parent_radius`.
    pub fn spawn_debris(
        pos: Vec2,
        parent_radius: u32,
        parent_vel: Vec2,
        rng: &mut impl Rng,
    ) -> Self {
        let r = parent_radius as f32;
        let lo = (r / 5.0).min(1.0).round_ties_even() as u32;
        let hi = (r / 2.0).round_ties_even() as u32;
        let width = if hi > lo { rng.gen_range(lo..hi) } else { lo };
        let radius = (width as f32 * 0.85 / 2.0) as u32;
        let jitter = Vec2::new(
            rng.gen_range(-AST_SPEED..AST_SPEED) as f32,
            rng.gen_range(-AST_SPEED..AST_SPEED) as f32,
        );
        let spin = rng.gen_range(-DEBRIS_SPIN..DEBRIS_SPIN) as f32;
        Self::new(JunkKind::Debris, pos, parent_vel + jitter, radius, spin)
    }

    /// One wreckage piece thrown off a destroyed ship.
    pub fn spawn_wreckage(pos: Vec2, ship_vel: Vec2, rng: &mut impl Rng) -> Self {
        let speed = AST_SPEED as f32;
        let jitter = Vec2::new(rng.gen_range(-speed..speed), rng.gen_range(-speed..speed));
        let radius = rng.gen_range(WRECKAGE_MIN_RADIUS..=WRECKAGE_MAX_RADIUS);
        let spin = rng.gen_range(-DEBRIS_SPIN..DEBRIS_SPIN) as f32;
        Self::new(JunkKind::Wreckage, pos, ship_vel + jitter, radius, spin)
    }

    /// Number of fragments this body breaks into.
    #[inline]
    pub fn fragment_count(&self) -> u32 {
        self.radius / 4
    }

    /// Kill this body and return the debris it breaks into.
    pub fn disintegrate(&mut self, rng: &mut impl Rng) -> Vec<PassiveBody> {
        self.alive = false;
        (0..self.fragment_count())
            .map(|_| Self::spawn_debris(self.body.pos, self.radius, self.body.vel, rng))
            .collect()
    }

    /// Drift one tick and die once outside the in-play radius.
    pub fn step(&mut self, config: &GameConfig) {
        self.body.integrate();
        if config.out_of_play(self.body.pos) {
            self.alive = false;
        }
    }

    #[inline]
    pub fn is_negligible(&self) -> bool {
        self.radius <= NEGLIGIBLE_RADIUS
    }

    pub fn sprite_key(&self) -> &'static str {
        match self.kind {
            JunkKind::Asteroid => "asteroid",
            JunkKind::Debris => "debris",
            JunkKind::Wreckage => "wreckage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn damage_rating_is_kinetic() {
        let rock = PassiveBody::new(JunkKind::Asteroid, Vec2::ZERO, Vec2::new(3.0, 4.0), 10, 0.0);
        assert_eq!(rock.damage, 62); // 10 * 25 / 4 = 62.5
        let wreck = PassiveBody::new(JunkKind::Wreckage, Vec2::ZERO, Vec2::new(3.0, 4.0), 10, 0.0);
        assert_eq!(wreck.damage, 31);
    }

    #[test]
    fn asteroid_disintegrates_into_bounded_debris() {
        let mut rng = StdRng::seed_from_u64(7);
        for radius in [3_u32, 4, 17, 32, 48] {
            let parent_vel = Vec2::new(1.0, 5.0);
            let mut rock =
                PassiveBody::new(JunkKind::Asteroid, Vec2::new(100.0, 100.0), parent_vel, radius, 2.0);
            let debris = rock.disintegrate(&mut rng);
            assert!(!rock.alive);
            assert_eq!(debris.len(), (radius / 4) as usize);
            for piece in &debris {
                assert_eq!(piece.kind, JunkKind::Debris);
                assert_eq!(piece.body.pos, Vec2::new(100.0, 100.0));
                let jitter = piece.body.vel - parent_vel;
                assert!(jitter.x >= -6.0 && jitter.x < 6.0);
                assert!(jitter.y >= -6.0 && jitter.y < 6.0);
                assert!(piece.radius < radius);
            }
        }
    }

    #[test]
    fn disintegration_cascade_terminates() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut generation = vec![PassiveBody::new(
            JunkKind::Asteroid,
            Vec2::ZERO,
            Vec2::new(0.0, 3.0),
            ASTEROID_MAX_RADIUS,
            0.0,
        )];
        let mut rounds = 0;
        while !generation.is_empty() {
            generation = generation
                .iter_mut()
                .flat_map(|p| p.disintegrate(&mut rng))
                .collect();
            rounds += 1;
            assert!(rounds < 10, "cascade did not terminate");
        }
    }

    #[test]
    fn spawned_asteroid_starts_above_arena_and_falls() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = GameConfig::default();
        for _ in 0..50 {
            let rock = PassiveBody::spawn_asteroid(&config, &mut rng);
            assert_eq!(rock.body.pos.y, -config.arena_height * 3.0);
            assert!(rock.body.pos.x.abs() <= config.arena_width * 2.0);
            assert!(rock.body.vel.y >= 1.0 && rock.body.vel.y <= 6.0);
            assert!(rock.body.vel.x.abs() <= 1.0);
            assert!((config.asteroid_min_radius..=config.asteroid_max_radius).contains(&rock.radius));
        }
    }

    #[test]
    fn out_of_play_bodies_die() {
        let config = GameConfig::default();
        let edge = config.arena_center() + Vec2::new(config.in_play_radius() - 1.0, 0.0);
        let mut rock = PassiveBody::new(JunkKind::Asteroid, edge, Vec2::new(2.0, 0.0), 10, 0.0);
        rock.step(&config);
        assert!(!rock.alive);
    }

    #[test]
    fn small_fragments_are_negligible() {
        let dust = PassiveBody::new(JunkKind::Debris, Vec2::ZERO, Vec2::ONE, 3, 0.0);
        assert!(dust.is_negligible());
        let pebble = PassiveBody::new(JunkKind::Debris, Vec2::ZERO, Vec2::ONE, 4, 0.0);
        assert!(!pebble.is_negligible());
    }
}
