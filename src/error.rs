//! Simulation-specific error types.
//!
//! Gameplay rejections inside a tick (fire with no ammo, docking out of
//! range) are modelled as outcome enums by the owning module.  `SimError`
//! covers the fallible edges: persistence, configuration and armoury
//! transactions, which the caller reports as a warning and recovers from.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::error::{SimError, SimResult};
//!
//! fn commit(cost: u32, score: u32) -> SimResult<()> {
//!     if cost > score {
//!         return Err(SimError::InsufficientFunds { cost, score });
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Top-level error enum for the spacehunter simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A save file could not be read or written.
    SaveIo {
        /// Path of the save file.
        path: String,
        /// Underlying I/O failure, rendered to text.
        reason: String,
    },

    /// A save file was read but its contents could not be decoded.
    SaveFormat(String),

    /// A save file was written by an incompatible version of the game.
    UnsupportedSaveVersion {
        /// Version recorded in the file.
        found: i64,
        /// Version this build understands.
        expected: u32,
    },

    /// An armoury transaction costs more than the player's score.
    InsufficientFunds {
        /// Total cost of the provisional payload edit.
        cost: u32,
        /// Player score at the time of the request.
        score: u32,
    },

    /// A trading command arrived while the player was not docked.
    NotDocked,

    /// A payload edit named a slot that does not exist.
    InvalidSlot {
        /// Requested slot index.
        index: usize,
        /// Number of slots in the payload.
        len: usize,
    },

    /// Configuration constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::SaveIo { path, reason } => {
                write!(f, "save file '{}' unavailable: {}", path, reason)
            }
            SimError::SaveFormat(reason) => write!(f, "malformed save data: {}", reason),
            SimError::UnsupportedSaveVersion { found, expected } => write!(
                f,
                "unsupported save version {} (expected {})",
                found, expected
            ),
            SimError::InsufficientFunds { cost, .. } => {
                write!(f, "INSUFFICIENT POINTS - NEED {}", cost)
            }
            SimError::NotDocked => write!(f, "DOCK WITH SUPPLY SHIP FIRST"),
            SimError::InvalidSlot { index, len } => write!(
                f,
                "payload slot {} out of range (payload has {} slots)",
                index, len
            ),
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if a `[min, max]` interval pair is empty or inverted.
///
/// Storm intervals are sampled uniformly in `[min, max]`; `max == 0` would
/// trigger a storm every tick.
pub fn validate_interval_range(name: &'static str, min: u64, max: u64) -> SimResult<()> {
    if max == 0 || min > max {
        Err(SimError::UnsafeConstant {
            name,
            value: min as f32,
            safe_range: "0 ≤ min ≤ max, max > 0",
        })
    } else {
        Ok(())
    }
}
