//! Weapon registry, weapon-bay payloads and projectile launch kinematics.
//!
//! ## Registry
//!
//! Every weapon class is a [`WeaponKind`] variant with a static
//! [`WeaponClass`] row:
//!
//! | Kind       | Cost  | Ammo cost | Damage | Capacity | Replenish | RoF  | Max temp |
//! |------------|-------|-----------|--------|----------|-----------|------|----------|
//! | Empty      | 0     | 0         | 0      | 100      | 0         | 0    | 0        |
//! | Laser      | 1000  | 30        | 10     | 100      | 5         | 600  | 30       |
//! | UltraLaser | 4000  | 60        | 20     | 100      | 4         | 600  | 40       |
//! | Gatling    | 5000  | 50        | 30     | 300      | 0         | 1500 | 50       |
//! | Missile    | 10000 | 1500      | 100    | 80       | 2         | 1    | 0        |
//! | Sidewinder | 5000  | 50        | 100    | 100      | 0         | 1    | 0        |
//! | Mine       | 15000 | 2000      | 100    | 5        | 0         | 1    | 0        |
//!
//! `rate_of_fire` is rounds per minute; a value ≤ 1 means single shot only.
//! `max_temp == 0` means the weapon never overheats.
//!
//! ## Heat
//!
//! Each successful shot adds one unit of heat to weapons that can overheat;
//! every cool-off interval removes `rate` units from **every** slot, floored
//! at zero.  A slot refuses to fire once `heat >= max_temp`, so heat never
//! leaves `[0, max_temp]`.

use crate::constants::*;
use crate::kinematics::{rotate_deg, KinematicBody};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ── Registry ──────────────────────────────────────────────────────────────────

/// Static characteristics of a weapon class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponClass {
    pub name: &'static str,
    /// Score cost of loading this class into a slot.
    pub wpn_cost: u32,
    /// Score cost per round when reloading the same class.
    pub ammo_cost: u32,
    pub damage: i32,
    pub capacity: u32,
    /// Rounds restored per replenish interval (0 = none).
    pub auto_replenish: u32,
    /// Rounds per minute; ≤ 1 is single shot only.
    pub rate_of_fire: u32,
    /// Overheat threshold; 0 = never overheats.
    pub max_temp: u32,
    pub notes: &'static str,
    pub sprite: &'static str,
}

const EMPTY: WeaponClass = WeaponClass {
    name: "Empty",
    wpn_cost: 0,
    ammo_cost: 0,
    damage: 0,
    capacity: 100,
    auto_replenish: 0,
    rate_of_fire: 0,
    max_temp: 0,
    notes: "",
    sprite: "cold",
};

const LASER: WeaponClass = WeaponClass {
    name: "Laser",
    wpn_cost: 1000,
    ammo_cost: 30,
    damage: 10,
    capacity: 100,
    auto_replenish: 5,
    rate_of_fire: 600,
    max_temp: 30,
    notes: "Very high velocity. High rate of fire, but can over-heat on long bursts. \
            Automatically recharges in background.",
    sprite: "laser_red",
};

const ULTRA_LASER: WeaponClass = WeaponClass {
    name: "UltraLaser",
    wpn_cost: 4000,
    ammo_cost: 60,
    damage: 20,
    capacity: 100,
    auto_replenish: 4,
    rate_of_fire: 600,
    max_temp: 40,
    notes: "Double the damage of a normal laser. Takes slightly longer to recharge.",
    sprite: "laser_green",
};

const GATLING: WeaponClass = WeaponClass {
    name: "Gatling",
    wpn_cost: 5000,
    ammo_cost: 50,
    damage: 30,
    capacity: 300,
    auto_replenish: 0,
    rate_of_fire: 1500,
    max_temp: 50,
    notes: "Very high rate of fire, but will over-heat on long bursts. Watch your ammo level!",
    sprite: "gatling",
};

const MISSILE: WeaponClass = WeaponClass {
    name: "Missile",
    wpn_cost: 10000,
    ammo_cost: 1500,
    damage: 100,
    capacity: 80,
    auto_replenish: 2,
    rate_of_fire: 1,
    max_temp: 0,
    notes: "Not guided - line of sight only.",
    sprite: "missile",
};

const SIDEWINDER: WeaponClass = WeaponClass {
    name: "Sidewinder",
    wpn_cost: 5000,
    ammo_cost: 50,
    damage: 100,
    capacity: 100,
    auto_replenish: 0,
    rate_of_fire: 1,
    max_temp: 0,
    notes: "Will automatically find and track the closest enemy targets.",
    sprite: "sidewinder",
};

const MINE: WeaponClass = WeaponClass {
    name: "Mine",
    wpn_cost: 15000,
    ammo_cost: 2000,
    damage: 100,
    capacity: 5,
    auto_replenish: 0,
    rate_of_fire: 1,
    max_temp: 0,
    notes: "Kill your velocity before laying to avoid drift.",
    sprite: "mine",
};

/// Weapon class identifier; serialised by name in save files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Empty,
    Laser,
    UltraLaser,
    Gatling,
    Missile,
    Sidewinder,
    Mine,
}

impl WeaponKind {
    /// Every tradeable class, in armoury display order.
    pub const ALL: [WeaponKind; 7] = [
        WeaponKind::Empty,
        WeaponKind::Laser,
        WeaponKind::UltraLaser,
        WeaponKind::Gatling,
        WeaponKind::Missile,
        WeaponKind::Sidewinder,
        WeaponKind::Mine,
    ];

    pub fn class(self) -> &'static WeaponClass {
        match self {
            WeaponKind::Empty => &EMPTY,
            WeaponKind::Laser => &LASER,
            WeaponKind::UltraLaser => &ULTRA_LASER,
            WeaponKind::Gatling => &GATLING,
            WeaponKind::Missile => &MISSILE,
            WeaponKind::Sidewinder => &SIDEWINDER,
            WeaponKind::Mine => &MINE,
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.class().name
    }

    /// Whether the class supports held-trigger automatic fire.
    #[inline]
    pub fn is_automatic(self) -> bool {
        self.class().rate_of_fire > 1
    }

    /// Minimum milliseconds between automatic shots.
    pub fn auto_fire_interval_ms(self) -> Option<u64> {
        let rof = self.class().rate_of_fire;
        (rof > 1).then(|| 60_000 / u64::from(rof))
    }

    /// Launch kinematics of a round fired from `origin` facing `rot`.
    ///
    /// `firer_vel` only matters for mines, which drift with the layer.
    pub fn launch(self, origin: Vec2, rot: f32, firer_vel: Vec2) -> Option<Launch> {
        let along = |speed: f32| rotate_deg(Vec2::new(0.0, -speed), -rot);
        let launch = match self {
            WeaponKind::Empty => return None,
            WeaponKind::Laser | WeaponKind::UltraLaser => Launch {
                body: KinematicBody::new(origin, 3.0, 30.0, AUTOMATON_MAX_ANGVEL)
                    .with_velocity(along(30.0)),
                health: 1,
                guided: false,
            },
            WeaponKind::Gatling => Launch {
                body: KinematicBody::new(origin, 3.0, 15.0, AUTOMATON_MAX_ANGVEL)
                    .with_velocity(along(15.0)),
                health: 3,
                guided: false,
            },
            WeaponKind::Missile => Launch {
                body: KinematicBody::new(origin, 6.0, 20.0, AUTOMATON_MAX_ANGVEL)
                    .with_velocity(along(3.0))
                    .with_acceleration(along(0.1)),
                health: AUTOMATON_MAX_HEALTH,
                guided: false,
            },
            WeaponKind::Sidewinder => Launch {
                body: KinematicBody::new(origin, 10.0, 30.0, AUTOMATON_MAX_ANGVEL)
                    .with_velocity(along(3.0))
                    .with_acceleration(along(0.1)),
                health: AUTOMATON_MAX_HEALTH,
                guided: true,
            },
            WeaponKind::Mine => Launch {
                body: KinematicBody::new(origin, 6.0, 99.0, AUTOMATON_MAX_ANGVEL)
                    .with_velocity(firer_vel),
                health: AUTOMATON_MAX_HEALTH,
                guided: false,
            },
        };
        Some(Launch {
            body: launch.body.with_rotation(rot).facing_travel(),
            ..launch
        })
    }
}

/// Initial state of a freshly fired round.
#[derive(Debug, Clone, PartialEq)]
pub struct Launch {
    pub body: KinematicBody,
    pub health: i32,
    /// Switches to seeking the opposing group after the acquisition delay.
    pub guided: bool,
}

/// Which side fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

/// Per-round state carried by a projectile actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileState {
    pub weapon: WeaponKind,
    pub source: Faction,
    pub damage: i32,
    pub launched_ms: u64,
    /// Still waiting for target acquisition.
    pub guided: bool,
    pub tracer: bool,
}

// ── Weapon bays ───────────────────────────────────────────────────────────────

/// One slot of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponBayEntry {
    #[serde(rename = "wpn_class")]
    pub class: WeaponKind,
    pub ammo: u32,
    #[serde(rename = "temp")]
    pub heat: u32,
}

impl WeaponBayEntry {
    pub fn new(class: WeaponKind, ammo: u32, heat: u32) -> Self {
        Self { class, ammo, heat }
    }

    /// A slot of `class` loaded to capacity and cold.
    pub fn full(class: WeaponKind) -> Self {
        Self::new(class, class.class().capacity, 0)
    }

    #[inline]
    pub fn is_overheated(&self) -> bool {
        let max_temp = self.class.class().max_temp;
        max_temp != 0 && self.heat >= max_temp
    }
}

/// Result of a trigger pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A round of this class left the bay; the caller spawns the projectile.
    Fired(WeaponKind),
    /// Selected slot is Empty (weapons cold).
    EmptySlot,
    Overheated,
    OutOfAmmo {
        /// The class replenishes on its own, so waiting helps.
        recharges: bool,
    },
    /// Automatic fire not possible (single-shot class) or rate-limited.
    NotReady,
}

/// An ordered list of weapon bays plus the selected slot and its timers.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    slots: Vec<WeaponBayEntry>,
    selected: usize,
    last_auto_fire_ms: u64,
    last_cooloff_ms: u64,
    last_replenish_ms: u64,
}

impl Default for Payload {
    fn default() -> Self {
        Self::from_entries(Vec::new())
    }
}

impl Payload {
    /// Build a payload, dropping anything past [`MAX_WEAPONS`] slots.
    pub fn from_entries(mut slots: Vec<WeaponBayEntry>) -> Self {
        slots.truncate(MAX_WEAPONS);
        Self {
            slots,
            selected: 0,
            last_auto_fire_ms: 0,
            last_cooloff_ms: 0,
            last_replenish_ms: 0,
        }
    }

    /// The starting loadout: one full bay of every armed class.
    pub fn starter() -> Self {
        Self::from_entries(vec![
            WeaponBayEntry::full(WeaponKind::Laser),
            WeaponBayEntry::full(WeaponKind::Gatling),
            WeaponBayEntry::full(WeaponKind::Missile),
            WeaponBayEntry::full(WeaponKind::Sidewinder),
            WeaponBayEntry::full(WeaponKind::Mine),
        ])
    }

    /// Append a slot; refused once the payload holds [`MAX_WEAPONS`] slots.
    pub fn push(&mut self, entry: WeaponBayEntry) -> bool {
        if self.slots.len() >= MAX_WEAPONS {
            return false;
        }
        self.slots.push(entry);
        true
    }

    #[inline]
    pub fn slots(&self) -> &[WeaponBayEntry] {
        &self.slots
    }

    #[inline]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&WeaponBayEntry> {
        self.slots.get(self.selected)
    }

    /// Select a slot by index; out-of-range indices are clamped.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.slots.len().saturating_sub(1));
    }

    /// Replace every slot, keeping the selection in range.
    pub fn replace_slots(&mut self, slots: Vec<WeaponBayEntry>) {
        self.slots = slots;
        self.slots.truncate(MAX_WEAPONS);
        self.select(self.selected);
    }

    /// Advance the selection, wrapping.  Returns the newly selected class.
    pub fn cycle(&mut self) -> Option<WeaponKind> {
        if self.slots.is_empty() {
            return None;
        }
        self.selected = (self.selected + 1) % self.slots.len();
        Some(self.slots[self.selected].class)
    }

    /// Pull the trigger once on the selected slot.
    pub fn fire(&mut self) -> FireOutcome {
        let Some(slot) = self.slots.get_mut(self.selected) else {
            return FireOutcome::EmptySlot;
        };
        let class = slot.class.class();
        if slot.class == WeaponKind::Empty {
            return FireOutcome::EmptySlot;
        }
        if slot.is_overheated() {
            return FireOutcome::Overheated;
        }
        if slot.ammo == 0 {
            return FireOutcome::OutOfAmmo {
                recharges: class.auto_replenish > 0,
            };
        }
        slot.ammo -= 1;
        if class.max_temp != 0 {
            slot.heat += 1;
        }
        FireOutcome::Fired(slot.class)
    }

    /// Held-trigger fire, limited to `60000 / rate_of_fire` ms between
    /// attempts.  Single-shot classes never auto-fire.
    pub fn auto_fire(&mut self, now_ms: u64) -> FireOutcome {
        let Some(interval) = self.selected().and_then(|s| s.class.auto_fire_interval_ms()) else {
            return FireOutcome::NotReady;
        };
        if now_ms.saturating_sub(self.last_auto_fire_ms) <= interval {
            return FireOutcome::NotReady;
        }
        self.last_auto_fire_ms = now_ms;
        self.fire()
    }

    /// Cool every slot by `rate` once per `interval_ms`.  Returns whether a
    /// cool-off step ran.
    pub fn cool_off(&mut self, now_ms: u64, interval_ms: u64, rate: u32) -> bool {
        if now_ms.saturating_sub(self.last_cooloff_ms) <= interval_ms {
            return false;
        }
        self.last_cooloff_ms = now_ms;
        for slot in &mut self.slots {
            slot.heat = slot.heat.saturating_sub(rate);
        }
        true
    }

    /// Top up every auto-replenishing slot once per `interval_ms`
    /// (`0` disables replenishment).
    pub fn replenish(&mut self, now_ms: u64, interval_ms: u64) -> bool {
        if interval_ms == 0 || now_ms.saturating_sub(self.last_replenish_ms) <= interval_ms {
            return false;
        }
        self.last_replenish_ms = now_ms;
        for slot in &mut self.slots {
            let class = slot.class.class();
            if class.auto_replenish > 0 {
                slot.ammo = (slot.ammo + class.auto_replenish).min(class.capacity);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn fire_with_no_ammo_never_spawns_or_underflows() {
        let mut payload = Payload::from_entries(vec![WeaponBayEntry::new(WeaponKind::Laser, 0, 0)]);
        for _ in 0..3 {
            assert_eq!(payload.fire(), FireOutcome::OutOfAmmo { recharges: true });
        }
        assert_eq!(payload.slots()[0].ammo, 0);
        assert_eq!(payload.slots()[0].heat, 0);

        let mut gatling =
            Payload::from_entries(vec![WeaponBayEntry::new(WeaponKind::Gatling, 0, 0)]);
        assert_eq!(gatling.fire(), FireOutcome::OutOfAmmo { recharges: false });
    }

    #[test]
    fn empty_slot_does_nothing() {
        let mut payload = Payload::from_entries(vec![WeaponBayEntry::full(WeaponKind::Empty)]);
        assert_eq!(payload.fire(), FireOutcome::EmptySlot);
        assert_eq!(payload.slots()[0].ammo, 100);
    }

    #[test]
    fn heat_saturates_at_max_temp_and_cools_to_zero() {
        let mut payload = Payload::from_entries(vec![WeaponBayEntry::full(WeaponKind::Laser)]);
        let mut fired = 0;
        for _ in 0..50 {
            if let FireOutcome::Fired(_) = payload.fire() {
                fired += 1;
            }
            assert!(payload.slots()[0].heat <= 30);
        }
        assert_eq!(fired, 30);
        assert_eq!(payload.fire(), FireOutcome::Overheated);
        assert_eq!(payload.slots()[0].ammo, 70);

        assert!(payload.cool_off(3001, 3000, 10));
        assert_eq!(payload.slots()[0].heat, 20);
        // Same interval: no further cooling.
        assert!(!payload.cool_off(4000, 3000, 10));
        payload.cool_off(6002, 3000, 10);
        payload.cool_off(9003, 3000, 10);
        payload.cool_off(12004, 3000, 10);
        assert_eq!(payload.slots()[0].heat, 0);
    }

    #[test]
    fn cool_off_applies_to_unselected_slots() {
        let mut payload = Payload::from_entries(vec![
            WeaponBayEntry::new(WeaponKind::Laser, 10, 25),
            WeaponBayEntry::new(WeaponKind::Gatling, 10, 7),
        ]);
        payload.cool_off(5000, 3000, 10);
        assert_eq!(payload.slots()[0].heat, 15);
        assert_eq!(payload.slots()[1].heat, 0);
    }

    #[test]
    fn non_overheating_weapons_stay_cold() {
        let mut payload = Payload::from_entries(vec![WeaponBayEntry::full(WeaponKind::Mine)]);
        for _ in 0..5 {
            assert_eq!(payload.fire(), FireOutcome::Fired(WeaponKind::Mine));
        }
        assert_eq!(payload.slots()[0].heat, 0);
        assert_eq!(payload.fire(), FireOutcome::OutOfAmmo { recharges: false });
    }

    #[test]
    fn auto_fire_is_rate_limited_and_single_shot_classes_refuse() {
        let mut payload = Payload::from_entries(vec![
            WeaponBayEntry::full(WeaponKind::Laser),
            WeaponBayEntry::full(WeaponKind::Missile),
        ]);
        // Laser: 600 rpm => 100 ms between rounds.
        assert_eq!(payload.auto_fire(101), FireOutcome::Fired(WeaponKind::Laser));
        assert_eq!(payload.auto_fire(150), FireOutcome::NotReady);
        assert_eq!(payload.auto_fire(202), FireOutcome::Fired(WeaponKind::Laser));

        payload.select(1);
        assert_eq!(payload.auto_fire(10_000), FireOutcome::NotReady);
        assert_eq!(payload.slots()[1].ammo, 80);
    }

    #[test]
    fn replenish_tops_up_only_recharging_classes() {
        let mut payload = Payload::from_entries(vec![
            WeaponBayEntry::new(WeaponKind::Laser, 97, 0),
            WeaponBayEntry::new(WeaponKind::Gatling, 10, 0),
            WeaponBayEntry::new(WeaponKind::Missile, 10, 0),
        ]);
        assert!(payload.replenish(5001, 5000));
        assert_eq!(payload.slots()[0].ammo, 100);
        assert_eq!(payload.slots()[1].ammo, 10);
        assert_eq!(payload.slots()[2].ammo, 12);
        assert!(!payload.replenish(9000, 5000));
        assert!(!payload.replenish(99_999, 0));
    }

    #[test]
    fn payload_is_capped_at_five_slots() {
        let mut payload = Payload::starter();
        assert_eq!(payload.slots().len(), MAX_WEAPONS);
        assert!(!payload.push(WeaponBayEntry::full(WeaponKind::Laser)));
    }

    #[test]
    fn cycle_wraps_around() {
        let mut payload = Payload::from_entries(vec![
            WeaponBayEntry::full(WeaponKind::Empty),
            WeaponBayEntry::full(WeaponKind::Laser),
        ]);
        assert_eq!(payload.cycle(), Some(WeaponKind::Laser));
        assert_eq!(payload.cycle(), Some(WeaponKind::Empty));
        assert_eq!(Payload::default().cycle(), None);
    }

    #[test]
    fn launch_kinematics_follow_firer_orientation() {
        let laser = WeaponKind::Laser.launch(Vec2::ZERO, 0.0, Vec2::ZERO).unwrap();
        assert!(approx(laser.body.vel, Vec2::new(0.0, -30.0)));
        assert_eq!(laser.health, 1);

        let gatling = WeaponKind::Gatling.launch(Vec2::ZERO, 90.0, Vec2::ZERO).unwrap();
        assert!(approx(gatling.body.vel, Vec2::new(-15.0, 0.0)));
        assert_eq!(gatling.health, 3);

        let missile = WeaponKind::Missile.launch(Vec2::ZERO, 0.0, Vec2::ZERO).unwrap();
        assert!(approx(missile.body.acc, Vec2::new(0.0, -0.1)));
        assert_eq!(missile.body.max_speed, 20.0);

        let mine = WeaponKind::Mine
            .launch(Vec2::ZERO, 45.0, Vec2::new(1.5, -2.0))
            .unwrap();
        assert_eq!(mine.body.vel, Vec2::new(1.5, -2.0));

        assert!(WeaponKind::Sidewinder
            .launch(Vec2::ZERO, 0.0, Vec2::ZERO)
            .unwrap()
            .guided);
        assert!(WeaponKind::Empty.launch(Vec2::ZERO, 0.0, Vec2::ZERO).is_none());
    }

    #[test]
    fn bay_entries_serialise_with_class_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            bay: WeaponBayEntry,
        }
        let text = toml::to_string(&Wrapper {
            bay: WeaponBayEntry::new(WeaponKind::UltraLaser, 12, 3),
        })
        .unwrap();
        assert!(text.contains("wpn_class = \"UltraLaser\""));
        assert!(text.contains("temp = 3"));
    }
}
