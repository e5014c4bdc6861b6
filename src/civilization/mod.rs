//! Civilizations and their per-tick lifecycle

pub mod belief;
pub mod contact;
pub mod entity;
pub mod expansion;
pub mod naming;
pub mod population;
pub mod resources;
pub mod traits;

pub use belief::{BeliefSystem, BeliefValue, ForeignStance};
pub use contact::DiplomaticIntent;
pub use entity::{City, CivEvent, Civilization};
pub use traits::{Trait, TraitSet};

use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{CivId, Position, SimRng, Tick};
use crate::diplomacy::RelationLedger;
use crate::events::EventKind;
use crate::world::WorldMap;

/// Territory gained in one tick beyond this is celebrated with a population boost
const SIGNIFICANT_TERRITORY_GAIN: usize = 5;

/// Read-only view of every civilization except the one being ticked
#[derive(Clone, Copy)]
pub struct Others<'a> {
    before: &'a [Civilization],
    after: &'a [Civilization],
}

impl<'a> Others<'a> {
    pub fn new(before: &'a [Civilization], after: &'a [Civilization]) -> Self {
        Self { before, after }
    }

    pub fn empty() -> Self {
        Self { before: &[], after: &[] }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Civilization> + 'a {
        let (before, after) = (self.before, self.after);
        before.iter().chain(after.iter())
    }

    pub fn get(&self, id: CivId) -> Option<&'a Civilization> {
        self.iter().find(|c| c.id == id)
    }

    /// Whether a live civilization holds `pos`
    pub fn owns(&self, pos: Position) -> bool {
        self.iter().any(|c| !c.has_collapsed && c.territory.contains(&pos))
    }
}

/// Everything a civilization may read or touch during its tick
pub struct TickContext<'a> {
    pub world: &'a dyn WorldMap,
    pub others: Others<'a>,
    pub relations: &'a mut RelationLedger,
    pub rng: &'a mut SimRng,
    pub config: &'a SimulationConfig,
    pub now: Tick,
}

impl Civilization {
    /// Advance one tick
    ///
    /// Population and resources update every tick. Expansion and contact
    /// checks only run on a full update. Returns what this civilization wants
    /// to do to its neighbours.
    pub fn tick(&mut self, full_update: bool, ctx: &mut TickContext<'_>) -> Result<Vec<DiplomaticIntent>> {
        if !self.resources.all_finite() || !self.technology.is_finite() {
            return Err(SimError::CorruptState {
                civ: self.id,
                reason: format!("non-finite stock {:?} or technology {}", self.resources, self.technology),
            });
        }

        self.age = self.age.saturating_add(1);
        let old_size = self.territory.len();
        self.territory_last_tick = self.territory.clone();

        population::update_population(self, ctx.config, ctx.now, ctx.rng);
        resources::gather_resources(self, ctx.world);

        let mut intents = Vec::new();
        if full_update {
            expansion::consider_expansion(self, ctx.world, ctx.others, ctx.rng, ctx.now);
            intents = contact::check_contacts(self, ctx.others, ctx.relations, ctx.rng);
        }

        let tech_gain = if self.has_trait(Trait::TechSavvy) {
            ctx.rng.gen_range(0.05..0.15)
        } else {
            ctx.rng.gen_range(0.01..0.05)
        };
        self.technology = (self.technology + tech_gain).min(ctx.config.technology_cap);

        let new_size = self.territory.len();
        let gained = new_size.saturating_sub(old_size);
        if gained > SIGNIFICANT_TERRITORY_GAIN {
            self.log_event(
                ctx.now,
                EventKind::Expansion,
                format!("Expanded territory significantly, gaining {} tiles", gained),
            );
            self.population += (gained as f64 * ctx.rng.gen_range(2.0..5.0)) as u64;
        }
        if new_size < old_size {
            tracing::debug!("{} lost territory: {} -> {}", self.name, old_size, new_size);
        }

        self.heal_territory(ctx.world, ctx.now, ctx.rng);

        Ok(intents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{GridWorld, ResourceKind, TerrainKind};
    use rand::SeedableRng;

    #[test]
    fn test_tick_ages_and_advances_technology() {
        let world = GridWorld::filled(40, 40, TerrainKind::Plains);
        let config = SimulationConfig::default();
        let mut rng = SimRng::seed_from_u64(1);
        let mut relations = RelationLedger::new();
        let mut civ = Civilization::found(CivId(1), Position::new(20, 20), &world, 0, &mut rng);
        let tech = civ.technology;

        let mut ctx = TickContext {
            world: &world,
            others: Others::empty(),
            relations: &mut relations,
            rng: &mut rng,
            config: &config,
            now: 1,
        };
        let intents = civ.tick(true, &mut ctx).unwrap();

        assert!(intents.is_empty());
        assert_eq!(civ.age, 1);
        assert!(civ.technology > tech);
        assert!(civ.population >= 1);
    }

    #[test]
    fn test_corrupt_stock_is_rejected() {
        let world = GridWorld::filled(40, 40, TerrainKind::Plains);
        let config = SimulationConfig::default();
        let mut rng = SimRng::seed_from_u64(2);
        let mut relations = RelationLedger::new();
        let mut civ = Civilization::found(CivId(1), Position::new(20, 20), &world, 0, &mut rng);
        civ.resources[ResourceKind::Gold] = f64::NAN;

        let mut ctx = TickContext {
            world: &world,
            others: Others::empty(),
            relations: &mut relations,
            rng: &mut rng,
            config: &config,
            now: 1,
        };
        let result = civ.tick(false, &mut ctx);
        assert!(matches!(result, Err(SimError::CorruptState { civ: CivId(1), .. })));
        assert_eq!(civ.age, 0);
    }

    #[test]
    fn test_technology_respects_cap() {
        let world = GridWorld::filled(40, 40, TerrainKind::Plains);
        let config = SimulationConfig::default();
        let mut rng = SimRng::seed_from_u64(3);
        let mut relations = RelationLedger::new();
        let mut civ = Civilization::found(CivId(1), Position::new(20, 20), &world, 0, &mut rng);
        civ.technology = config.technology_cap;

        let mut ctx = TickContext {
            world: &world,
            others: Others::empty(),
            relations: &mut relations,
            rng: &mut rng,
            config: &config,
            now: 1,
        };
        civ.tick(false, &mut ctx).unwrap();
        assert_eq!(civ.technology, config.technology_cap);
    }
}
