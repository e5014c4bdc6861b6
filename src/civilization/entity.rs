//! The civilization record and its bookkeeping helpers

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::civilization::belief::BeliefSystem;
use crate::civilization::naming;
use crate::civilization::traits::{Trait, TraitSet};
use crate::core::types::{as_pairs, CivId, Position, SimRng, Tick};
use crate::events::EventKind;
use crate::simulation::snapshot::CivilizationStatus;
use crate::world::{ResourceKind, ResourceTable, WorldMap};

/// Stock every civilization starts with
pub const STARTING_RESOURCES: ResourceTable = ResourceTable::new(100.0, 50.0, 20.0, 50.0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub population: u64,
}

/// One line of a civilization's own history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CivEvent {
    pub tick: Tick,
    pub kind: EventKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Civilization {
    pub id: CivId,
    pub name: String,
    /// Founding tile
    pub position: Position,
    pub age: u32,
    pub population: u64,

    pub territory: BTreeSet<Position>,
    /// Territory at the start of the last tick, for change highlighting
    pub territory_last_tick: BTreeSet<Position>,
    #[serde(with = "as_pairs")]
    pub cities: BTreeMap<Position, City>,

    pub traits: TraitSet,
    pub belief: BeliefSystem,
    pub technology: f64,
    pub resources: ResourceTable,

    pub event_log: Vec<CivEvent>,

    pub has_collapsed: bool,
    /// Simulation tick until which this civilization is shielded
    pub protected_until: Option<Tick>,
    pub at_war_with: BTreeSet<CivId>,
    /// Set by divine intervention; relations never rise above -0.9
    pub permanently_hostile: bool,
    pub battle_victories: u32,
}

impl Civilization {
    /// Found a civilization at `position` with starting territory and a capital
    pub fn found(
        id: CivId,
        position: Position,
        world: &dyn WorldMap,
        now: Tick,
        rng: &mut SimRng,
    ) -> Self {
        let name = naming::civilization_name(rng);
        let population = rng.gen_range(50..=200);

        let mut civ = Self {
            id,
            name,
            position,
            age: 0,
            population,
            territory: BTreeSet::new(),
            territory_last_tick: BTreeSet::new(),
            cities: BTreeMap::new(),
            traits: TraitSet::new(),
            belief: BeliefSystem::generate(rng),
            technology: 0.0,
            resources: STARTING_RESOURCES,
            event_log: Vec::new(),
            has_collapsed: false,
            protected_until: None,
            at_war_with: BTreeSet::new(),
            permanently_hostile: false,
            battle_victories: 0,
        };

        civ.seed_starting_territory(world, rng);
        civ.cities.insert(
            position,
            City { name: civ.name.clone(), population },
        );
        civ.traits = TraitSet::random(rng, 3);
        civ.technology = rng.gen_range(10..=30) as f64;

        civ.log_event(now, EventKind::Founding, format!("Founded at {}", position));
        tracing::debug!("Founded {} ({}) at {}", civ.name, civ.id, position);
        civ
    }

    /// Claim the founding tile plus a rough blob of land around it
    ///
    /// Radius 3 to 5; tiles within 2 are always taken, farther ones with
    /// falling probability. Water and mountains are never part of the blob.
    pub fn seed_starting_territory(&mut self, world: &dyn WorldMap, rng: &mut SimRng) {
        self.territory.insert(self.position);

        let radius: i32 = rng.gen_range(3..=5);
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                let pos = self.position.offset(dx, dy);
                let settleable = world.terrain(pos).is_some_and(|t| t.is_settleable());
                if !settleable {
                    continue;
                }

                let distance = self.position.distance(&pos);
                if distance <= 2.0 || rng.gen::<f64>() < 2.0 - distance / radius as f64 {
                    self.territory.insert(pos);
                }
            }
        }
    }

    /// Restore territory on a live civilization that lost all of it
    pub fn heal_territory(&mut self, world: &dyn WorldMap, now: Tick, rng: &mut SimRng) -> bool {
        if !self.territory.is_empty() || self.has_collapsed {
            return false;
        }

        tracing::warn!("{} ({}) has no territory, re-seeding around {}", self.name, self.id, self.position);
        self.seed_starting_territory(world, rng);

        let territory = &self.territory;
        self.cities.retain(|pos, _| territory.contains(pos));
        if self.cities.is_empty() {
            self.cities.insert(
                self.position,
                City { name: self.name.clone(), population: self.population },
            );
        }

        self.log_event(now, EventKind::TerritoryRestored, "Territory restored around the founding site");
        true
    }

    pub fn log_event(&mut self, tick: Tick, kind: EventKind, description: impl Into<String>) {
        self.event_log.push(CivEvent {
            tick,
            kind,
            description: description.into(),
        });
    }

    pub fn has_trait(&self, t: Trait) -> bool {
        self.traits.contains(t)
    }

    pub fn is_protected(&self, now: Tick) -> bool {
        self.protected_until.is_some_and(|until| now < until)
    }

    pub fn is_alive(&self) -> bool {
        !self.has_collapsed
    }

    pub fn is_at_war_with(&self, other: CivId) -> bool {
        self.at_war_with.contains(&other)
    }

    pub fn food(&self) -> f64 {
        self.resources[ResourceKind::Food]
    }

    /// Sum of all city populations
    pub fn city_population(&self) -> u64 {
        self.cities.values().map(|c| c.population).sum()
    }

    /// Whether any tile of ours touches or overlaps `other`'s territory
    pub fn is_adjacent_to(&self, other: &Civilization) -> bool {
        if self.territory.is_empty() || other.territory.is_empty() {
            return false;
        }
        self.territory.iter().any(|pos| {
            other.territory.contains(pos) || pos.neighbors().any(|n| other.territory.contains(&n))
        })
    }

    /// Our tiles with at least one neighbour in `other`'s territory
    pub fn border_tiles_facing(&self, other: &Civilization) -> Vec<Position> {
        self.territory
            .iter()
            .copied()
            .filter(|pos| pos.neighbors().any(|n| other.territory.contains(&n)))
            .collect()
    }

    /// Terminal state: no people, land or cities left
    pub fn mark_collapsed(&mut self) {
        self.has_collapsed = true;
        self.population = 0;
        self.territory.clear();
        self.cities.clear();
        self.at_war_with.clear();
    }

    pub fn status(&self) -> CivilizationStatus {
        CivilizationStatus::from(self)
    }
}
