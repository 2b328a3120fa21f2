//! Instinct-driven steering: seek, flee, wander and passive drift.
//!
//! Every non-player actor carries a [`Steering`] block.  Each tick it picks
//! exactly one behaviour in fixed precedence order:
//!
//! | Order | Instinct  | Commits when                      |
//! |-------|-----------|-----------------------------------|
//! | 1     | `FLEE`    | the flee target resolves          |
//! | 2     | `SEEK`    | the seek target resolves          |
//! | 3     | `WANDER`  | always                            |
//! | 4     | `PASSIVE` | always (terminal fallback)        |
//!
//! The committed behaviour fully determines the tick's acceleration; lower
//! flags are never blended in.  An unresolved target (empty group, despawned
//! actor) skips its instinct and the next flag is tried.

use crate::actor::{ActorId, Group};
use crate::constants::*;
use crate::kinematics::{clamp_length, rotate_deg, KinematicBody};
use bevy::prelude::*;
use rand::Rng;
use std::collections::HashMap;
use std::ops::BitOr;

// ── Instinct flags ────────────────────────────────────────────────────────────

/// Behaviour-selection flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Instinct(u8);

impl Instinct {
    pub const SEEK: Self = Self(1);
    pub const FLEE: Self = Self(1 << 1);
    pub const WANDER: Self = Self(1 << 2);
    pub const PASSIVE: Self = Self(1 << 3);

    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for Instinct {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ── Targets ───────────────────────────────────────────────────────────────────

/// What an instinct steers toward (seek) or away from (flee).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// A fixed point in the arena.
    Fixed(Vec2),
    /// A single actor, tracked by id.
    Actor(ActorId),
    /// The nearest live member of a group.
    Group(Group),
}

impl Target {
    /// Current position of the target as seen from `from`, or `None` when the
    /// referenced actor is gone or the group is empty.
    pub fn resolve(&self, scene: &Scene, from: Vec2) -> Option<Vec2> {
        match *self {
            Target::Fixed(point) => Some(point),
            Target::Actor(id) => scene.position_of(id),
            Target::Group(group) => scene.nearest_in(group, from),
        }
    }
}

/// Read-only snapshot of every targetable position, rebuilt each tick
/// before the steering pass.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    positions: HashMap<ActorId, Vec2>,
    groups: HashMap<Group, Vec<Vec2>>,
}

impl Scene {
    pub fn insert(&mut self, id: ActorId, group: Group, pos: Vec2) {
        self.positions.insert(id, pos);
        self.groups.entry(group).or_default().push(pos);
    }

    #[inline]
    pub fn position_of(&self, id: ActorId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    /// Nearest member of `group` to `from` by Euclidean distance.
    pub fn nearest_in(&self, group: Group, from: Vec2) -> Option<Vec2> {
        self.groups.get(&group)?.iter().copied().min_by(|a, b| {
            a.distance_squared(from)
                .total_cmp(&b.distance_squared(from))
        })
    }
}

// ── Tuning profiles ───────────────────────────────────────────────────────────

/// Agility constants of a steering actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringProfile {
    pub approach_radius: f32,
    pub seek_force: f32,
    pub flee_force: f32,
    pub flee_distance: f32,
    pub wander_interval_ms: u64,
    pub wander_max_turn: f32,
    pub wander_ring_radius: f32,
    pub wander_ring_distance: f32,
}

impl SteeringProfile {
    pub const AUTOMATON: Self = Self {
        approach_radius: APPROACH_RADIUS,
        seek_force: SEEK_FORCE,
        flee_force: FLEE_FORCE,
        flee_distance: FLEE_DISTANCE,
        wander_interval_ms: WANDER_INTERVAL_MS,
        wander_max_turn: WANDER_MAX_TURN,
        wander_ring_radius: WANDER_RING_RADIUS,
        wander_ring_distance: WANDER_RING_DISTANCE,
    };

    pub const ENEMY: Self = Self {
        approach_radius: ENEMY_APPROACH_RADIUS,
        seek_force: ENEMY_SEEK_FORCE,
        flee_force: ENEMY_FLEE_FORCE,
        flee_distance: ENEMY_FLEE_DISTANCE,
        ..Self::AUTOMATON
    };

    pub const SUPPLY_SHIP: Self = Self {
        approach_radius: SUPPLY_APPROACH_RADIUS,
        seek_force: SUPPLY_SEEK_FORCE,
        ..Self::AUTOMATON
    };

    /// Guided missiles turn hard and barely brake on arrival.
    pub const GUIDED: Self = Self {
        approach_radius: 5.0,
        seek_force: 0.3,
        flee_force: 0.3,
        ..Self::AUTOMATON
    };
}

impl Default for SteeringProfile {
    fn default() -> Self {
        Self::AUTOMATON
    }
}

// ── Behaviours ────────────────────────────────────────────────────────────────

/// Steering force toward `target`, slowing inside the approach radius.
pub fn seek(body: &KinematicBody, target: Vec2, profile: &SteeringProfile) -> Vec2 {
    let offset = target - body.pos;
    let dist = offset.length();
    let mut desired = offset.normalize_or_zero();
    if dist < profile.approach_radius {
        desired *= dist / profile.approach_radius * body.max_speed;
    } else {
        desired *= body.max_speed;
    }
    clamp_length(desired - body.vel, profile.seek_force)
}

/// Steering force away from `threat`.  Outside the flee distance the actor
/// just holds its heading at full speed.
pub fn flee(body: &KinematicBody, threat: Vec2, profile: &SteeringProfile) -> Vec2 {
    let away = body.pos - threat;
    let desired = if away.length() < profile.flee_distance {
        away.normalize_or_zero() * body.max_speed
    } else {
        body.vel.normalize_or_zero() * body.max_speed
    };
    clamp_length(desired - body.vel, profile.flee_force)
}

/// Wander-ring state carried between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WanderState {
    /// Angle of the current ring point (degrees).
    pub angle: f32,
    /// Simulation time of the last ring pick.
    pub last_pick_ms: u64,
}

impl WanderState {
    /// Point on the wander ring projected ahead of `body`; the ring angle is
    /// re-picked within `±wander_max_turn` of the previous angle once per
    /// wander interval.
    pub fn wander_point(
        &mut self,
        body: &KinematicBody,
        profile: &SteeringProfile,
        now_ms: u64,
        rng: &mut impl Rng,
    ) -> Vec2 {
        if now_ms.saturating_sub(self.last_pick_ms) > profile.wander_interval_ms {
            self.last_pick_ms = now_ms;
            let turn = profile.wander_max_turn.abs();
            self.angle = (self.angle + rng.gen_range(-turn..=turn)).rem_euclid(360.0);
        }
        let ahead = body.pos + body.vel.normalize_or_zero() * profile.wander_ring_distance;
        ahead + rotate_deg(Vec2::new(profile.wander_ring_radius, 0.0), self.angle)
    }
}

// ── Composition ───────────────────────────────────────────────────────────────

/// The instinct that won this tick and the acceleration it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub instinct: Instinct,
    pub acc: Vec2,
}

/// Instinct flags, targets and tuning of one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Steering {
    pub instinct: Instinct,
    pub seek_target: Option<Target>,
    pub flee_target: Option<Target>,
    pub profile: SteeringProfile,
    /// Constant acceleration applied by the passive instinct.
    pub passive_acc: Vec2,
    pub wander: WanderState,
}

impl Default for Steering {
    fn default() -> Self {
        Self::passive(Vec2::ZERO)
    }
}

impl Steering {
    pub fn passive(acc: Vec2) -> Self {
        Self {
            instinct: Instinct::PASSIVE,
            seek_target: None,
            flee_target: None,
            profile: SteeringProfile::AUTOMATON,
            passive_acc: acc,
            wander: WanderState::default(),
        }
    }

    pub fn with_profile(mut self, profile: SteeringProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Pick this tick's behaviour.  `None` means no flag resolved.
    pub fn decide(
        &mut self,
        body: &KinematicBody,
        scene: &Scene,
        now_ms: u64,
        rng: &mut impl Rng,
    ) -> Option<Decision> {
        if self.instinct.contains(Instinct::FLEE) {
            if let Some(threat) = self.flee_target.and_then(|t| t.resolve(scene, body.pos)) {
                return Some(Decision {
                    instinct: Instinct::FLEE,
                    acc: flee(body, threat, &self.profile),
                });
            }
        }

        if self.instinct.contains(Instinct::SEEK) {
            if let Some(goal) = self.seek_target.and_then(|t| t.resolve(scene, body.pos)) {
                return Some(Decision {
                    instinct: Instinct::SEEK,
                    acc: seek(body, goal, &self.profile),
                });
            }
        }

        if self.instinct.contains(Instinct::WANDER) {
            let point = self.wander.wander_point(body, &self.profile, now_ms, rng);
            return Some(Decision {
                instinct: Instinct::WANDER,
                acc: seek(body, point, &self.profile),
            });
        }

        if self.instinct.contains(Instinct::PASSIVE) {
            return Some(Decision {
                instinct: Instinct::PASSIVE,
                acc: self.passive_acc,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn body_at(pos: Vec2) -> KinematicBody {
        KinematicBody::new(pos, 10.0, 3.0, 3.0)
    }

    #[test]
    fn instinct_flags_combine() {
        let both = Instinct::FLEE | Instinct::SEEK;
        assert!(both.contains(Instinct::FLEE));
        assert!(both.contains(Instinct::SEEK));
        assert!(!both.contains(Instinct::WANDER));
        assert!(!Instinct::empty().contains(Instinct::PASSIVE));
    }

    #[test]
    fn group_target_resolves_to_nearest_member() {
        let mut scene = Scene::default();
        scene.insert(ActorId(1), Group::Enemies, Vec2::new(100.0, 0.0));
        scene.insert(ActorId(2), Group::Enemies, Vec2::new(-20.0, 0.0));
        scene.insert(ActorId(3), Group::Enemies, Vec2::new(0.0, 50.0));
        let target = Target::Group(Group::Enemies);
        assert_eq!(target.resolve(&scene, Vec2::ZERO), Some(Vec2::new(-20.0, 0.0)));
        assert_eq!(Target::Group(Group::Friends).resolve(&scene, Vec2::ZERO), None);
        assert_eq!(Target::Actor(ActorId(3)).resolve(&scene, Vec2::ZERO), Some(Vec2::new(0.0, 50.0)));
        assert_eq!(Target::Actor(ActorId(9)).resolve(&scene, Vec2::ZERO), None);
    }

    #[test]
    fn seek_from_rest_closes_distance_monotonically() {
        let target = Vec2::new(600.0, 0.0);
        let profile = SteeringProfile::AUTOMATON;
        let mut body = body_at(Vec2::ZERO);
        let mut last = body.pos.distance(target);
        while last > profile.approach_radius {
            body.acc = seek(&body, target, &profile);
            body.integrate();
            let d = body.pos.distance(target);
            assert!(d < last, "distance grew from {last} to {d}");
            last = d;
        }
    }

    #[test]
    fn seek_arrival_slows_inside_approach_radius() {
        let profile = SteeringProfile {
            seek_force: 100.0,
            ..SteeringProfile::AUTOMATON
        };
        let body = body_at(Vec2::ZERO);
        // Half-way into the approach radius: desired speed is half max speed.
        let steer = seek(&body, Vec2::new(50.0, 0.0), &profile);
        assert!((steer.x - 1.5).abs() < 1e-4);
        assert!(steer.y.abs() < 1e-6);
    }

    #[test]
    fn flee_outside_trigger_distance_holds_heading() {
        let profile = SteeringProfile::AUTOMATON;
        let body = body_at(Vec2::ZERO).with_velocity(Vec2::new(0.0, 3.0));
        let steer = flee(&body, Vec2::new(500.0, 0.0), &profile);
        assert!(steer.length() < 1e-6);

        let stopped = body_at(Vec2::ZERO);
        assert_eq!(flee(&stopped, Vec2::new(500.0, 0.0), &profile), Vec2::ZERO);
    }

    #[test]
    fn flee_takes_precedence_over_seek() {
        let mut scene = Scene::default();
        scene.insert(ActorId(7), Group::PlayerWeapons, Vec2::new(10.0, 0.0));
        let mut steering = Steering {
            instinct: Instinct::FLEE | Instinct::SEEK,
            seek_target: Some(Target::Fixed(Vec2::new(300.0, 0.0))),
            flee_target: Some(Target::Group(Group::PlayerWeapons)),
            ..Steering::default()
        };
        let mut body = body_at(Vec2::ZERO);
        let mut rng = StdRng::seed_from_u64(1);

        let decision = steering.decide(&body, &scene, 0, &mut rng).unwrap();
        assert_eq!(decision.instinct, Instinct::FLEE);
        body.acc = decision.acc;
        body.integrate();
        // Moved away from the threat (+x), i.e. away from the seek goal too.
        assert!(body.pos.x < 0.0);
    }

    #[test]
    fn unresolved_flee_falls_through_to_seek() {
        let scene = Scene::default();
        let mut steering = Steering {
            instinct: Instinct::FLEE | Instinct::SEEK,
            seek_target: Some(Target::Fixed(Vec2::new(300.0, 0.0))),
            flee_target: Some(Target::Group(Group::PlayerWeapons)),
            ..Steering::default()
        };
        let body = body_at(Vec2::ZERO);
        let mut rng = StdRng::seed_from_u64(1);
        let decision = steering.decide(&body, &scene, 0, &mut rng).unwrap();
        assert_eq!(decision.instinct, Instinct::SEEK);
        assert!(decision.acc.x > 0.0);
    }

    #[test]
    fn seek_only_with_empty_group_decides_nothing() {
        let scene = Scene::default();
        let mut steering = Steering {
            instinct: Instinct::SEEK,
            seek_target: Some(Target::Group(Group::Enemies)),
            ..Steering::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(steering.decide(&body_at(Vec2::ZERO), &scene, 0, &mut rng).is_none());
    }

    #[test]
    fn passive_returns_configured_acceleration() {
        let mut steering = Steering::passive(Vec2::new(0.0, -0.1));
        let mut rng = StdRng::seed_from_u64(1);
        let decision = steering
            .decide(&body_at(Vec2::ZERO), &Scene::default(), 0, &mut rng)
            .unwrap();
        assert_eq!(decision.instinct, Instinct::PASSIVE);
        assert_eq!(decision.acc, Vec2::new(0.0, -0.1));
    }

    #[test]
    fn wander_repicks_only_on_interval_and_stays_on_ring() {
        let profile = SteeringProfile {
            wander_max_turn: 30.0,
            ..SteeringProfile::AUTOMATON
        };
        let body = body_at(Vec2::new(50.0, 50.0)).with_velocity(Vec2::new(2.0, 0.0));
        let mut state = WanderState::default();
        let mut rng = StdRng::seed_from_u64(42);

        let first = state.wander_point(&body, &profile, 500, &mut rng);
        let angle = state.angle;
        assert!(angle <= 30.0 || angle >= 330.0);
        let ring_centre = body.pos + Vec2::new(profile.wander_ring_distance, 0.0);
        assert!((first.distance(ring_centre) - profile.wander_ring_radius).abs() < 1e-3);

        // Within the interval the point does not move.
        let again = state.wander_point(&body, &profile, 550, &mut rng);
        assert_eq!(first, again);
        assert_eq!(state.angle, angle);
    }
}
