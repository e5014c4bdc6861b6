//! Save and load
//!
//! A save holds everything needed to continue a run bit-for-bit: every
//! civilization, the relation ledger, the clock, the event log, history
//! snapshots and the random source. Terrain is not saved; a save only loads
//! into a simulation whose world has the same dimensions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::civilization::Civilization;
use crate::core::error::{Result, SimError};
use crate::core::types::{CivId, SimRng, Tick};
use crate::diplomacy::RelationLedger;
use crate::events::LoggedEvent;
use crate::simulation::roster::Roster;
use crate::simulation::snapshot::HistorySnapshot;
use crate::simulation::Simulation;
use crate::world::WorldMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveState {
    pub simulation_name: String,
    pub world_width: i32,
    pub world_height: i32,
    pub tick: Tick,
    pub year: u64,
    pub next_id: u32,
    pub auto_pause_on_events: bool,
    pub civilizations: Vec<Civilization>,
    pub relations: RelationLedger,
    pub event_log: Vec<LoggedEvent>,
    pub history: Vec<HistorySnapshot>,
    pub rng: SimRng,
}

impl SaveState {
    /// Check internal consistency before anything is applied
    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::BTreeSet::new();
        for civ in &self.civilizations {
            if !seen.insert(civ.id) {
                return Err(SimError::CorruptState {
                    civ: civ.id,
                    reason: "duplicate civilization id in save".into(),
                });
            }
            if civ.id.0 >= self.next_id {
                return Err(SimError::CorruptState {
                    civ: civ.id,
                    reason: format!("id not below next id {}", self.next_id),
                });
            }
            if !civ.resources.all_finite() || !civ.technology.is_finite() {
                return Err(SimError::CorruptState {
                    civ: civ.id,
                    reason: "non-finite stock or technology in save".into(),
                });
            }
            if let Some(enemy) = civ.at_war_with.iter().find(|e| **e == civ.id) {
                return Err(SimError::CorruptState {
                    civ: *enemy,
                    reason: "at war with itself".into(),
                });
            }
        }
        Ok(())
    }
}

impl<W: WorldMap> Simulation<W> {
    /// Capture the full simulation state
    pub fn save_data(&self) -> SaveState {
        let (world_width, world_height) = self.world.dimensions();
        SaveState {
            simulation_name: self.name.clone(),
            world_width,
            world_height,
            tick: self.tick,
            year: self.year,
            next_id: self.next_id,
            auto_pause_on_events: self.auto_pause,
            civilizations: self.roster.as_slice().to_vec(),
            relations: self.relations.clone(),
            event_log: self.event_log.all().to_vec(),
            history: self.history.clone(),
            rng: self.rng.clone(),
        }
    }

    /// Replace the current state with `state`
    ///
    /// Nothing changes when the save was made on a world of different
    /// dimensions or fails its consistency checks.
    pub fn restore(&mut self, state: SaveState) -> Result<()> {
        let expected = self.world.dimensions();
        let found = (state.world_width, state.world_height);
        if expected != found {
            return Err(SimError::DimensionMismatch { expected, found });
        }
        state.validate()?;

        self.name = state.simulation_name;
        self.tick = state.tick;
        self.year = state.year;
        self.next_id = state.next_id;
        self.auto_pause = state.auto_pause_on_events;
        self.roster = Roster::from_vec(state.civilizations);
        self.relations = state.relations;
        self.event_log.set_events(state.event_log);
        self.history = state.history;
        self.rng = state.rng;
        self.major_events.clear();
        self.paused = false;

        tracing::info!(
            "Restored {} at year {} with {} civilizations",
            self.name,
            self.year,
            self.roster.len()
        );
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.save_data())?)
    }

    pub fn restore_json(&mut self, json: &str) -> Result<()> {
        let state: SaveState = serde_json::from_str(json)?;
        self.restore(state)
    }

    /// Write the state as JSON to `path`
    pub fn save_state(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        tracing::info!("Saved {} to {}", self.name, path.display());
        Ok(())
    }

    /// Load a state written by `save_state`; on any error the current state is kept
    pub fn load_state(&mut self, path: &Path) -> Result<()> {
        let json = std::fs::read_to_string(path)?;
        self.restore_json(&json)?;
        tracing::info!("Loaded {} from {}", self.name, path.display());
        Ok(())
    }

    /// Ids currently in the roster, including collapsed ones awaiting removal
    pub fn roster_ids(&self) -> Vec<CivId> {
        self.roster.ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::world::{GridWorld, TerrainKind};

    fn sim(size: i32) -> Simulation<GridWorld> {
        let config = SimulationConfig {
            world_width: size,
            world_height: size,
            auto_pause_on_events: false,
            ..SimulationConfig::default()
        };
        Simulation::with_world(config, GridWorld::filled(size, size, TerrainKind::Plains)).unwrap()
    }

    #[test]
    fn test_restore_continues_identically() {
        let mut original = sim(60);
        original.initialize(4);
        original.run(15);
        let json = original.to_json().unwrap();

        let mut copy = sim(60);
        copy.restore_json(&json).unwrap();
        original.run(20);
        copy.run(20);

        assert_eq!(original.roster.as_slice(), copy.roster.as_slice());
        assert_eq!(original.relations, copy.relations);
        assert_eq!(original.year(), copy.year());
    }

    #[test]
    fn test_dimension_mismatch_leaves_state_untouched() {
        let mut small = sim(40);
        small.initialize(2);
        let json = small.to_json().unwrap();

        let mut big = sim(60);
        big.initialize(3);
        big.run(5);
        let before = big.to_json().unwrap();

        let result = big.restore_json(&json);
        assert!(matches!(
            result,
            Err(SimError::DimensionMismatch { expected: (60, 60), found: (40, 40) })
        ));
        assert_eq!(big.to_json().unwrap(), before);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let mut s = sim(40);
        s.initialize(2);
        let before = s.roster_ids();
        assert!(matches!(s.restore_json("{\"tick\": 3"), Err(SimError::Serde(_))));
        assert_eq!(s.roster_ids(), before);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut s = sim(40);
        s.initialize(2);
        let mut state = s.save_data();
        let dup = state.civilizations[0].clone();
        state.civilizations.push(dup);
        assert!(matches!(s.restore(state), Err(SimError::CorruptState { .. })));
        assert_eq!(s.roster_ids().len(), 2);
    }
}
