//! Civsim - rise and fall of civilizations on a grid world
//!
//! Civilizations grow, expand, meet, trade, unify, fight and collapse. The
//! `Simulation` drives one tick per year over a `WorldMap`.

pub mod civilization;
pub mod core;
pub mod diplomacy;
pub mod events;
pub mod simulation;
pub mod world;

pub use crate::core::{CivId, Position, Result, SimError, SimulationConfig};
pub use crate::simulation::Simulation;
