//! Spacehunter simulation library.
//!
//! An arcade space shooter core: a player ship, instinct-driven enemies, a
//! supply ship, projectiles and drifting hazards resolved once per frame.
//! The [`simulation::SimulationPlugin`] runs the game inside a Bevy app;
//! rendering and input are thin adapters in [`rendering`] and [`controls`].

pub mod actor;
pub mod armoury;
pub mod combat;
pub mod command;
pub mod config;
pub mod constants;
pub mod controls;
pub mod enemy;
pub mod error;
pub mod hazards;
pub mod instinct;
pub mod kinematics;
pub mod player;
pub mod rendering;
pub mod save;
pub mod simulation;
pub mod spacejunk;
pub mod supply;
pub mod weapon;
