//! Autonomous actors: enemies, the supply ship and projectiles.
//!
//! All three share one [`Actor`] type.  Per-kind state lives in the
//! [`ActorKind`] tag and per-kind behaviour is dispatched by `match`.
//! Actors refer to one another only through [`ActorId`]s resolved against the
//! tick's [`Scene`] snapshot.

use crate::config::GameConfig;
use crate::constants::*;
use crate::enemy::EnemyState;
use crate::instinct::{Instinct, Scene, Steering, SteeringProfile, Target};
use crate::kinematics::KinematicBody;
use crate::weapon::{Faction, Launch, ProjectileState, WeaponKind};
use bevy::prelude::*;
use rand::Rng;

/// Opaque handle of an actor.  The player is always [`PLAYER_ID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

pub const PLAYER_ID: ActorId = ActorId(0);

/// Collision and targeting groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Player,
    Enemies,
    PlayerWeapons,
    EnemyWeapons,
    Friends,
    Junk,
    Wreckage,
}

/// What happens when an actor leaves the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Teleport to the opposite edge.
    #[default]
    Wrap,
    /// Die once beyond the in-play radius.
    Cull,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActorKind {
    Enemy(EnemyState),
    SupplyShip,
    Projectile(ProjectileState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub body: KinematicBody,
    pub health: i32,
    pub max_health: i32,
    pub steering: Steering,
    pub edge: EdgePolicy,
    pub alive: bool,
}

impl Actor {
    pub fn new(id: ActorId, kind: ActorKind, body: KinematicBody) -> Self {
        Self {
            id,
            kind,
            body,
            health: AUTOMATON_MAX_HEALTH,
            max_health: AUTOMATON_MAX_HEALTH,
            steering: Steering::default(),
            edge: EdgePolicy::default(),
            alive: true,
        }
    }

    pub fn with_steering(mut self, steering: Steering) -> Self {
        self.steering = steering;
        self
    }

    pub fn with_edge(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self.max_health = self.max_health.max(health);
        self
    }

    /// A freshly fired round.  Guided rounds coast on their launch thrust
    /// until acquisition, then seek the nearest member of the opposing group.
    pub fn projectile(
        id: ActorId,
        weapon: WeaponKind,
        source: Faction,
        launch: Launch,
        now_ms: u64,
        tracer: bool,
    ) -> Self {
        let mut steering = Steering::passive(launch.body.acc);
        if launch.guided {
            steering.seek_target = Some(Target::Group(match source {
                Faction::Player => Group::Enemies,
                Faction::Enemy => Group::Player,
            }));
            steering.profile = SteeringProfile::GUIDED;
        }
        let state = ProjectileState {
            weapon,
            source,
            damage: weapon.class().damage,
            launched_ms: now_ms,
            guided: launch.guided,
            tracer,
        };
        Self::new(id, ActorKind::Projectile(state), launch.body)
            .with_health(launch.health)
            .with_steering(steering)
            .with_edge(EdgePolicy::Cull)
    }

    pub fn group(&self) -> Group {
        match &self.kind {
            ActorKind::Enemy(_) => Group::Enemies,
            ActorKind::SupplyShip => Group::Friends,
            ActorKind::Projectile(p) => match p.source {
                Faction::Player => Group::PlayerWeapons,
                Faction::Enemy => Group::EnemyWeapons,
            },
        }
    }

    /// Damage dealt when this actor strikes something.
    pub fn damage(&self) -> i32 {
        match &self.kind {
            ActorKind::Projectile(p) => p.damage,
            _ => 0,
        }
    }

    pub fn sprite_key(&self) -> &'static str {
        match &self.kind {
            ActorKind::Enemy(_) => "enemy",
            ActorKind::SupplyShip => "supply_ship",
            ActorKind::Projectile(p) if p.tracer => "tracer",
            ActorKind::Projectile(p) => p.weapon.class().sprite,
        }
    }

    /// Run the instinct pass and set this tick's acceleration.
    pub fn steer(&mut self, scene: &Scene, now_ms: u64, rng: &mut impl Rng) {
        if let ActorKind::Projectile(p) = &mut self.kind {
            if p.guided && now_ms.saturating_sub(p.launched_ms) > GUIDED_ACQUIRE_MS {
                p.guided = false;
                self.steering.instinct = Instinct::SEEK;
            }
        }

        match self.steering.decide(&self.body, scene, now_ms, rng) {
            Some(decision) => {
                self.body.acc = decision.acc;
                if decision.instinct == Instinct::PASSIVE {
                    self.body.angacc = 0.0;
                }
            }
            None => self.body.acc = Vec2::ZERO,
        }
    }

    /// Integrate one tick and apply the edge policy.
    pub fn step(&mut self, config: &GameConfig) {
        self.body.integrate();
        match self.edge {
            EdgePolicy::Wrap => self
                .body
                .wrap_within(config.arena_width, config.arena_height),
            EdgePolicy::Cull => {
                if config.out_of_play(self.body.pos) {
                    self.alive = false;
                }
            }
        }
    }

    /// Subtract `amount` from health.  Returns `true` if this hit was fatal.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.health > 0;
        self.health -= amount;
        if self.health <= 0 {
            self.alive = false;
        }
        was_alive && self.health <= 0
    }

    /// Head for `pos` and stop there.
    pub fn park(&mut self, pos: Vec2) {
        self.steering.instinct = Instinct::SEEK;
        self.steering.seek_target = Some(Target::Fixed(pos));
    }
}
