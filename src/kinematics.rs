//! Shared kinematic model for every moving body in the arena.
//!
//! ## Coordinate conventions
//!
//! The simulation runs in screen space: +x right, +y **down**.  Rotation is in
//! degrees, 0° points up the screen and angles grow counter-clockwise as seen
//! on screen (90° points left).  All rates are per tick.
//!
//! ## Integration step
//!
//! 1. `vel += acc`, `angvel += angacc`
//! 2. clamp `|vel|` to `max_speed` (direction preserved) and `angvel` to
//!    `[-max_angvel, max_angvel]`
//! 3. `pos += vel`, `rot = (rot + angvel) mod 360`
//! 4. if `face_travel`, `rot` is replaced by the heading of `vel`

use bevy::prelude::*;

/// Rotate `v` by `deg` degrees using the standard rotation matrix.
#[inline]
pub fn rotate_deg(v: Vec2, deg: f32) -> Vec2 {
    Vec2::from_angle(deg.to_radians()).rotate(v)
}

/// Unit vector pointing along rotation `rot` (0° = up the screen).
#[inline]
pub fn heading(rot: f32) -> Vec2 {
    rotate_deg(Vec2::NEG_Y, -rot)
}

/// Screen rotation that faces along `vel`.
///
/// The polar angle of `vel` has 0° at three o'clock; screen rotation has 0° at
/// twelve o'clock and the y axis flipped, hence the phase shift and sign flip.
/// Returns `None` for a zero vector, which has no heading.
pub fn direction_of_travel(vel: Vec2) -> Option<f32> {
    if vel == Vec2::ZERO {
        return None;
    }
    let phi = vel.y.atan2(vel.x).to_degrees();
    Some((-phi - 90.0).rem_euclid(360.0))
}

/// Scale `v` down to `max` length if it is longer; direction is preserved.
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    if v.length() > max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}

/// Position, motion and collision extent of a body.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees in `[0, 360)`.
    pub rot: f32,
    /// Degrees per tick.
    pub angvel: f32,
    pub acc: Vec2,
    pub angacc: f32,
    pub max_speed: f32,
    pub max_angvel: f32,
    /// Collision circle radius.
    pub radius: f32,
    /// Derive `rot` from the velocity heading after each step.
    pub face_travel: bool,
}

impl KinematicBody {
    /// A stationary body at `pos` with the given speed limits.
    pub fn new(pos: Vec2, radius: f32, max_speed: f32, max_angvel: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rot: 0.0,
            angvel: 0.0,
            acc: Vec2::ZERO,
            angacc: 0.0,
            max_speed,
            max_angvel,
            radius,
            face_travel: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_rotation(mut self, rot: f32) -> Self {
        self.rot = rot.rem_euclid(360.0);
        self
    }

    pub fn with_acceleration(mut self, acc: Vec2) -> Self {
        self.acc = acc;
        self
    }

    pub fn facing_travel(mut self) -> Self {
        self.face_travel = true;
        self
    }

    /// Clamp linear and angular velocity to the body's limits.
    pub fn clamp_motion(&mut self) {
        self.vel = clamp_length(self.vel, self.max_speed);
        self.angvel = self.angvel.clamp(-self.max_angvel, self.max_angvel);
    }

    /// Advance one tick.
    pub fn integrate(&mut self) {
        self.vel += self.acc;
        self.angvel += self.angacc;
        self.clamp_motion();

        self.pos += self.vel;
        self.rot = (self.rot + self.angvel).rem_euclid(360.0);
        if self.face_travel {
            if let Some(dir) = direction_of_travel(self.vel) {
                self.rot = dir;
            }
        }
    }

    /// Centre-to-centre circle overlap test.
    #[inline]
    pub fn overlaps(&self, other_pos: Vec2, other_radius: f32) -> bool {
        self.pos.distance(other_pos) < self.radius + other_radius
    }

    /// Teleport to the opposite edge when leaving the `width × height` arena.
    pub fn wrap_within(&mut self, width: f32, height: f32) {
        if self.pos.x < 0.0 {
            self.pos.x = width;
        } else if self.pos.x > width {
            self.pos.x = 0.0;
        }
        if self.pos.y < 0.0 {
            self.pos.y = height;
        } else if self.pos.y > height {
            self.pos.y = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn heading_zero_points_up_and_ninety_points_left() {
        assert!(approx(heading(0.0), Vec2::new(0.0, -1.0)));
        assert!(approx(heading(90.0), Vec2::new(-1.0, 0.0)));
        assert!(approx(heading(180.0), Vec2::new(0.0, 1.0)));
        assert!(approx(heading(270.0), Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn direction_of_travel_inverts_heading() {
        for rot in [0.0_f32, 45.0, 90.0, 135.0, 200.0, 315.0] {
            let dir = direction_of_travel(heading(rot) * 7.0).unwrap();
            let diff = (dir - rot).rem_euclid(360.0);
            assert!(diff < 1e-3 || diff > 360.0 - 1e-3, "rot {rot} -> {dir}");
        }
        assert!(direction_of_travel(Vec2::ZERO).is_none());
    }

    #[test]
    fn integration_clamps_linear_and_angular_speed() {
        let mut body = KinematicBody::new(Vec2::ZERO, 5.0, 4.0, 2.0)
            .with_acceleration(Vec2::new(3.0, 3.0));
        body.angacc = 1.5;
        for _ in 0..20 {
            body.integrate();
            assert!(body.vel.length() <= body.max_speed + 1e-4);
            assert!(body.angvel.abs() <= body.max_angvel);
            assert!((0.0..360.0).contains(&body.rot));
        }
        // Direction is preserved by the clamp.
        assert!(approx(body.vel.normalize(), Vec2::new(1.0, 1.0).normalize()));
    }

    #[test]
    fn negative_angular_velocity_is_clamped_symmetrically() {
        let mut body = KinematicBody::new(Vec2::ZERO, 1.0, 1.0, 3.0);
        body.angacc = -10.0;
        body.integrate();
        assert_eq!(body.angvel, -3.0);
        assert_eq!(body.rot, 357.0);
    }

    #[test]
    fn face_travel_tracks_velocity_and_keeps_rotation_when_stopped() {
        let mut body = KinematicBody::new(Vec2::ZERO, 1.0, 10.0, 3.0)
            .with_velocity(Vec2::new(-2.0, 0.0))
            .facing_travel();
        body.integrate();
        assert!((body.rot - 90.0).abs() < 1e-3);

        body.vel = Vec2::ZERO;
        body.integrate();
        assert!((body.rot - 90.0).abs() < 1e-3);
    }

    #[test]
    fn wrap_moves_body_to_opposite_edge() {
        let mut body = KinematicBody::new(Vec2::new(-1.0, 601.0), 1.0, 1.0, 1.0);
        body.wrap_within(800.0, 600.0);
        assert_eq!(body.pos, Vec2::new(800.0, 0.0));
    }

    #[test]
    fn overlap_is_strict() {
        let body = KinematicBody::new(Vec2::ZERO, 5.0, 1.0, 1.0);
        assert!(body.overlaps(Vec2::new(9.9, 0.0), 5.0));
        assert!(!body.overlaps(Vec2::new(10.0, 0.0), 5.0));
    }
}
