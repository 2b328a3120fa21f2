//! Armoury trading session, opened while docked with the supply ship.
//!
//! A session starts from a copy of the player's payload.  Substitutions are
//! provisional until committed:
//!
//! * loading a different class into a slot costs that class's `wpn_cost`;
//! * reloading the same class costs `ammo_cost × (capacity − original ammo)`.
//!
//! The total is summed over every edited slot.  There are no refunds, and a
//! commit the player cannot afford is rejected while the edit stays staged.

use crate::constants::MAX_WEAPONS;
use crate::error::{SimError, SimResult};
use crate::weapon::{WeaponBayEntry, WeaponKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Armoury {
    original: Vec<WeaponBayEntry>,
    candidate: Vec<WeaponBayEntry>,
    edited: Vec<bool>,
}

impl Armoury {
    /// Open a session on a copy of `payload`.
    pub fn open(payload: &[WeaponBayEntry]) -> Self {
        Self {
            original: payload.to_vec(),
            candidate: payload.to_vec(),
            edited: vec![false; payload.len()],
        }
    }

    #[inline]
    pub fn candidate(&self) -> &[WeaponBayEntry] {
        &self.candidate
    }

    #[inline]
    pub fn original(&self) -> &[WeaponBayEntry] {
        &self.original
    }

    /// Stage `class`, loaded to capacity, into `slot`.  A slot one past the
    /// end appends a new bay while the payload has room.  Returns the new
    /// total cost.
    pub fn substitute(&mut self, slot: usize, class: WeaponKind) -> SimResult<u32> {
        let len = self.candidate.len();
        if slot > len || (slot == len && len >= MAX_WEAPONS) {
            return Err(SimError::InvalidSlot { index: slot, len });
        }
        let entry = WeaponBayEntry::full(class);
        if slot == len {
            self.candidate.push(entry);
            self.edited.push(true);
        } else {
            // Heat stays with the bay.
            self.candidate[slot] = WeaponBayEntry {
                heat: self.candidate[slot].heat,
                ..entry
            };
            self.edited[slot] = true;
        }
        Ok(self.cost())
    }

    /// Total cost of every staged edit.
    pub fn cost(&self) -> u32 {
        (0..self.candidate.len())
            .filter(|&i| self.edited[i])
            .map(|i| self.slot_cost(i))
            .sum()
    }

    fn slot_cost(&self, slot: usize) -> u32 {
        let entry = self.candidate[slot];
        let class = entry.class.class();
        match self.original.get(slot) {
            Some(orig) if orig.class == entry.class => {
                class.ammo_cost * class.capacity.saturating_sub(orig.ammo)
            }
            _ => class.wpn_cost,
        }
    }

    /// Discard every staged edit.
    pub fn reset(&mut self) {
        self.candidate = self.original.clone();
        self.edited = vec![false; self.original.len()];
    }

    /// Finalise against `score`.  On success returns the new payload and the
    /// points to deduct; on failure the staged edit is left untouched.
    pub fn commit(&self, score: u32) -> SimResult<(Vec<WeaponBayEntry>, u32)> {
        let cost = self.cost();
        if cost > score {
            return Err(SimError::InsufficientFunds { cost, score });
        }
        Ok((self.candidate.clone(), cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laser_and_gatling() -> Vec<WeaponBayEntry> {
        vec![
            WeaponBayEntry::new(WeaponKind::Laser, 40, 12),
            WeaponBayEntry::new(WeaponKind::Gatling, 300, 0),
        ]
    }

    #[test]
    fn reloading_same_class_charges_for_missing_rounds() {
        let mut armoury = Armoury::open(&laser_and_gatling());
        assert_eq!(armoury.substitute(0, WeaponKind::Laser), Ok(1800));
        assert_eq!(armoury.candidate()[0].ammo, 100);
        assert_eq!(armoury.candidate()[0].heat, 12);
    }

    #[test]
    fn swapping_class_charges_weapon_cost() {
        let mut armoury = Armoury::open(&laser_and_gatling());
        assert_eq!(armoury.substitute(0, WeaponKind::Missile), Ok(10_000));
        assert_eq!(armoury.candidate()[0].class, WeaponKind::Missile);
        assert_eq!(armoury.candidate()[0].ammo, 80);
    }

    #[test]
    fn cost_sums_over_edited_slots_and_reset_clears() {
        let mut armoury = Armoury::open(&laser_and_gatling());
        armoury.substitute(0, WeaponKind::Laser).unwrap();
        // Full Gatling reload costs nothing.
        assert_eq!(armoury.substitute(1, WeaponKind::Gatling), Ok(1800));
        assert_eq!(armoury.substitute(1, WeaponKind::Mine), Ok(1800 + 15_000));
        armoury.reset();
        assert_eq!(armoury.cost(), 0);
        assert_eq!(armoury.candidate(), armoury.original());
    }

    #[test]
    fn appending_respects_the_slot_cap() {
        let mut armoury = Armoury::open(&laser_and_gatling());
        assert_eq!(armoury.substitute(2, WeaponKind::Sidewinder), Ok(5000));
        assert_eq!(
            armoury.substitute(7, WeaponKind::Laser),
            Err(SimError::InvalidSlot { index: 7, len: 3 })
        );
        let full = vec![WeaponBayEntry::full(WeaponKind::Laser); MAX_WEAPONS];
        let mut armoury = Armoury::open(&full);
        assert!(armoury.substitute(MAX_WEAPONS, WeaponKind::Laser).is_err());
    }

    #[test]
    fn unaffordable_commit_is_rejected_and_stays_staged() {
        let mut armoury = Armoury::open(&laser_and_gatling());
        armoury.substitute(0, WeaponKind::Missile).unwrap();
        let err = armoury.commit(9_999).unwrap_err();
        assert_eq!(err.to_string(), "INSUFFICIENT POINTS - NEED 10000");
        assert_eq!(armoury.candidate()[0].class, WeaponKind::Missile);

        let (payload, cost) = armoury.commit(10_000).unwrap();
        assert_eq!(cost, 10_000);
        assert_eq!(payload[0].class, WeaponKind::Missile);
    }
}
