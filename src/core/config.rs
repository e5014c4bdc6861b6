//! Simulation configuration with documented constants
//!
//! The tunables that shape pacing live here. Formula coefficients that are
//! part of the population and battle models stay next to those models.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for a simulation run
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === RUN ===
    /// Seed for the simulation's random source
    ///
    /// Two runs with the same seed, world and configuration produce the same
    /// history.
    pub seed: u64,

    /// Human-readable name used for saves and exports
    pub name: String,

    // === WORLD ===
    /// Grid width in tiles
    pub world_width: i32,

    /// Grid height in tiles
    pub world_height: i32,

    // === CIVILIZATIONS ===
    /// Civilizations founded by `initialize` when no count is given
    pub initial_civilizations: usize,

    /// Hard cap on simultaneously active civilizations
    ///
    /// `add_civilization` fails with `CapacityReached` at this count.
    pub max_civilizations: usize,

    /// Grace period granted to civilizations added by intervention (ticks)
    ///
    /// Protected civilizations skip the collapse sweep, get food and
    /// population floors, and grow 20% faster.
    pub protection_ticks: u64,

    // === SCHEDULING ===
    /// Number of rotating update chunks
    ///
    /// Each tick one chunk gets a full update (expansion and diplomacy);
    /// the rest only do population and resource bookkeeping.
    pub update_chunks: u32,

    /// Interval between global checks (disasters, collapse sweep)
    pub global_check_interval: u64,

    /// Interval between history snapshots
    pub snapshot_interval: u64,

    /// Pause after any tick that produced a major event
    pub auto_pause_on_events: bool,

    // === WORLD EVENTS ===
    /// Probability of a natural disaster at each global check
    pub disaster_chance: f64,

    /// Per-tick probability that an ongoing war ends in a treaty
    pub peace_chance: f64,

    // === LIMITS ===
    /// Technology ceiling
    pub technology_cap: f64,

    /// Population one territory tile supports before technology scaling
    pub base_capacity_per_tile: f64,

    /// Maximum tiles a single battle can transfer
    pub max_tiles_per_battle: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            name: "Unnamed Simulation".to_string(),

            world_width: 100,
            world_height: 100,

            initial_civilizations: 5,
            max_civilizations: 7,
            protection_ticks: 20,

            update_chunks: 3,
            global_check_interval: 10,
            snapshot_interval: 25,
            auto_pause_on_events: true,

            disaster_chance: 0.1,
            peace_chance: 0.05,

            technology_cap: 50_000.0,
            base_capacity_per_tile: 1000.0,
            max_tiles_per_battle: 10,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.world_width < 10 || self.world_height < 10 {
            return Err(SimError::InvalidConfig(format!(
                "world must be at least 10x10, got {}x{}",
                self.world_width, self.world_height
            )));
        }

        if self.max_civilizations == 0 {
            return Err(SimError::InvalidConfig("max_civilizations must be positive".into()));
        }

        if self.update_chunks == 0 {
            return Err(SimError::InvalidConfig("update_chunks must be positive".into()));
        }

        if self.global_check_interval == 0 || self.snapshot_interval == 0 {
            return Err(SimError::InvalidConfig("intervals must be positive".into()));
        }

        for (name, p) in [("disaster_chance", self.disaster_chance), ("peace_chance", self.peace_chance)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidConfig(format!("{name} ({p}) must be within [0, 1]")));
            }
        }

        if self.technology_cap <= 0.0 || self.base_capacity_per_tile <= 0.0 {
            return Err(SimError::InvalidConfig(
                "technology_cap and base_capacity_per_tile must be positive".into(),
            ));
        }

        Ok(())
    }
}
