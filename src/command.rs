//! Commands queued by input and UI collaborators.
//!
//! Commands are pushed onto the simulation's queue at any time and drained
//! synchronously at the start of the next tick.  A command that makes no sense
//! in the current state (docking with no supply ship, pausing after game over)
//! is dropped without a warning.

use crate::weapon::WeaponKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Directional signal, each axis in `{-1, 0, 1}`.  `y = -1` thrusts
    /// forward, `x` strafes.
    Steer { x: f32, y: f32 },
    /// Yaw signal in `[-1, 1]`; positive turns counter-clockwise.
    Yaw(f32),
    Fire,
    /// Hold (`true`) or release the trigger for automatic fire.
    AutoFire(bool),
    CycleWeapon,
    ToggleRadar,
    /// Toggle between playing and paused.
    Pause,
    /// Leave the title screen.
    Start,
    /// Restore the saved snapshot, or begin a new game without one.
    Restart,
    /// Begin a fresh game after game over.
    NewGame,
    SummonSupplyShip,
    Dock,
    Undock,
    /// Open an armoury session while docked.
    GetSupplies,
    /// Stage a class into a payload slot in the open armoury session.
    Substitute { slot: usize, class: WeaponKind },
    ResetArmoury,
    CommitArmoury,
    /// Close the armoury session without trading.
    Cancel,
    /// Stage `classes` slot by slot from the start and commit in one step.
    ApplyPayload(Vec<WeaponKind>),
    Save,
}
