//! The supply ship: a friendly actor the player summons to dock and trade.
//!
//! Lifecycle:
//!
//! ```text
//! parked ──summon──▶ inbound (seek player) ──dock──▶ docked ──undock──▶ parked
//! ```
//!
//! Docking needs the ship within [`DOCKING_PROXIMITY`] of the player and the
//! player's weapons cold.  The ship is culled if it drifts out of play and is
//! re-created on the next summon.

use crate::actor::{Actor, ActorId, ActorKind, EdgePolicy, PLAYER_ID};
use crate::config::GameConfig;
use crate::constants::*;
use crate::instinct::{Instinct, Steering, SteeringProfile, Target};
use crate::kinematics::{rotate_deg, KinematicBody};
use bevy::prelude::*;
use rand::Rng;

/// Why a dock request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockRefusal {
    TooFar,
    WeaponsHot,
}

impl DockRefusal {
    pub fn warning(self) -> &'static str {
        match self {
            DockRefusal::TooFar => "MANOEUVRE INTO POSITION BEFORE DOCKING",
            DockRefusal::WeaponsHot => "WEAPONS TO COLD BEFORE DOCKING",
        }
    }
}

/// A random parking spot on a ring well outside the arena.
pub fn parking_spot(config: &GameConfig, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.gen_range(0..360) as f32;
    config.arena_center()
        + rotate_deg(Vec2::new(config.arena_width + PARKING_MARGIN, 0.0), angle)
}

/// A supply ship idling at `pos`.
pub fn spawn_supply_ship(id: ActorId, pos: Vec2) -> Actor {
    let body = KinematicBody::new(pos, SUPPLY_RADIUS, SUPPLY_MAX_SPEED, AUTOMATON_MAX_ANGVEL)
        .facing_travel();
    Actor::new(id, ActorKind::SupplyShip, body)
        .with_steering(Steering::passive(Vec2::ZERO).with_profile(SteeringProfile::SUPPLY_SHIP))
        .with_edge(EdgePolicy::Cull)
}

/// Send the ship toward the player.
pub fn summon(ship: &mut Actor) {
    ship.body.max_speed = SUPPLY_MAX_SPEED;
    ship.steering.instinct = Instinct::SEEK;
    ship.steering.seek_target = Some(Target::Actor(PLAYER_ID));
}

/// Check the docking preconditions.
pub fn check_docking(
    ship_pos: Vec2,
    player_pos: Vec2,
    weapons_hot: bool,
    proximity: f32,
) -> Result<(), DockRefusal> {
    if ship_pos.distance(player_pos) > proximity {
        return Err(DockRefusal::TooFar);
    }
    if weapons_hot {
        return Err(DockRefusal::WeaponsHot);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instinct::Scene;
    use crate::actor::Group;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parking_spots_are_off_screen() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            let spot = parking_spot(&config, &mut rng);
            assert!(!config.on_screen(spot));
            assert!(!config.out_of_play(spot));
        }
    }

    #[test]
    fn summoned_ship_closes_on_player_and_can_dock() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let player = Vec2::new(400.0, 580.0);
        let mut scene = Scene::default();
        scene.insert(PLAYER_ID, Group::Player, player);

        let mut ship = spawn_supply_ship(ActorId(1), Vec2::new(400.0, -900.0));
        summon(&mut ship);
        for t in 0..20_000_u64 {
            ship.steer(&scene, t * 16, &mut rng);
            ship.step(&config);
            if check_docking(ship.body.pos, player, false, config.docking_proximity).is_ok() {
                return;
            }
        }
        panic!("supply ship never reached docking range");
    }

    #[test]
    fn docking_refusals() {
        assert_eq!(
            check_docking(Vec2::ZERO, Vec2::new(10.0, 0.0), false, 3.0),
            Err(DockRefusal::TooFar)
        );
        assert_eq!(
            check_docking(Vec2::ZERO, Vec2::new(1.0, 0.0), true, 3.0),
            Err(DockRefusal::WeaponsHot)
        );
        assert!(check_docking(Vec2::ZERO, Vec2::new(1.0, 0.0), false, 3.0).is_ok());
    }
}
