//! Divine interventions
//!
//! Player-facing actions that bend the simulation. Every action names its
//! target by id and fails with `UnknownCivilization` when it is gone.

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::civilization::contact::HOSTILE_RELATION_CAP;
use crate::civilization::{BeliefSystem, TraitSet};
use crate::core::error::{Result, SimError};
use crate::core::types::{CivId, Position};
use crate::events::{Chronicle, EventKind, MajorEvent};
use crate::simulation::disasters::{self, DisasterReport};
use crate::simulation::Simulation;
use crate::world::WorldMap;

/// Where a divine disaster lands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisasterTarget {
    Position(Position),
    /// A random tile of this civilization's territory
    Civilization(CivId),
    Random,
}

fn check_magnitude(magnitude: f64) -> Result<f64> {
    if magnitude.is_finite() && magnitude >= 0.0 {
        Ok(magnitude)
    } else {
        Err(SimError::InvalidConfig(format!(
            "intervention magnitude must be a non-negative number, got {magnitude}"
        )))
    }
}

impl<W: WorldMap> Simulation<W> {
    fn chronicle(&mut self) -> Chronicle<'_> {
        Chronicle::new(&mut self.event_log, &mut self.major_events, self.year)
    }

    fn live_civilization_name(&self, id: CivId) -> Result<String> {
        self.civilization(id)
            .map(|c| c.name.clone())
            .ok_or(SimError::UnknownCivilization(id))
    }

    /// Found a new civilization by intervention
    ///
    /// The newcomer is protected for `protection_ticks`. Fails once the
    /// configured maximum is active, or when `position` is not free land.
    pub fn add_civilization(&mut self, position: Option<Position>) -> Result<CivId> {
        let max = self.config.max_civilizations;
        if self.civilization_count() >= max {
            tracing::warn!("Cannot add new civilization: maximum count of {} reached", max);
            return Err(SimError::CapacityReached { max });
        }
        if let Some(pos) = position {
            let settleable = self.world.terrain(pos).is_some_and(|t| t.is_settleable());
            if !settleable || !self.roster.civilizations_at(pos).is_empty() {
                return Err(SimError::InvalidPosition(pos));
            }
        }

        let id = self.found_civilization(position);
        let protected_until = self.tick + self.config.protection_ticks;
        let name = match self.roster.get_mut(id) {
            Some(civ) => {
                civ.protected_until = Some(protected_until);
                civ.name.clone()
            }
            None => return Err(SimError::UnknownCivilization(id)),
        };

        tracing::info!(
            "{} added by intervention, protected until tick {}",
            name,
            protected_until
        );
        let mut chronicle = self.chronicle();
        chronicle.record(
            EventKind::Intervention,
            format!("Civilization {} founded by intervention.", name),
        );
        chronicle.announce(
            MajorEvent::new(
                "New Civilization Founded!",
                format!("{} has been established by divine intervention.", name),
            )
            .about(id, name),
        );
        Ok(id)
    }

    /// Call down a disaster of the given magnitude
    pub fn trigger_disaster(&mut self, target: DisasterTarget, magnitude: f64) -> Result<DisasterReport> {
        let magnitude = check_magnitude(magnitude)?;

        let center = match target {
            DisasterTarget::Position(pos) => pos,
            DisasterTarget::Civilization(id) => {
                let civ = self
                    .roster
                    .get(id)
                    .filter(|c| c.is_alive())
                    .ok_or(SimError::UnknownCivilization(id))?;
                let fallback = civ.position;
                civ.territory
                    .iter()
                    .copied()
                    .choose(&mut self.rng)
                    .unwrap_or(fallback)
            }
            DisasterTarget::Random => Position::new(
                self.rng.gen_range(0..self.world.width().max(1)),
                self.rng.gen_range(0..self.world.height().max(1)),
            ),
        };

        let mut chronicle = Chronicle::new(&mut self.event_log, &mut self.major_events, self.year);
        Ok(disasters::divine_disaster(
            &mut self.roster,
            center,
            magnitude,
            &mut self.rng,
            &mut chronicle,
        ))
    }

    /// Raise technology by `tech × 0.2 × m + 10 × m`, capped; returns the new level
    pub fn boost_technology(&mut self, id: CivId, magnitude: f64) -> Result<f64> {
        let magnitude = check_magnitude(magnitude)?;
        let cap = self.config.technology_cap;
        let now = self.tick;

        let civ = self
            .roster
            .get_mut(id)
            .filter(|c| c.is_alive())
            .ok_or(SimError::UnknownCivilization(id))?;
        let before = civ.technology;
        civ.technology = (before + before * 0.2 * magnitude + 10.0 * magnitude).min(cap);
        let after = civ.technology;

        let message = format!(
            "GOD EVENT: Technology boost for {}, tech level increased from {:.1} to {:.1}",
            civ.name, before, after
        );
        civ.log_event(now, EventKind::Intervention, message.clone());
        self.chronicle().record(EventKind::Intervention, message);
        Ok(after)
    }

    /// Replace belief system and traits; every relation drops back to near neutral
    pub fn shift_ideology(&mut self, id: CivId) -> Result<()> {
        self.live_civilization_name(id)?;
        let now = self.tick;

        let belief = BeliefSystem::generate(&mut self.rng);
        let traits = TraitSet::random(&mut self.rng, 3);

        let met: Vec<CivId> = self.relations.relations_of(id).map(|(other, _)| other).collect();
        for other in met {
            let reset = self.rng.gen_range(-0.1..0.1);
            self.relations.set(id, other, reset);
        }

        let Some(civ) = self.roster.get_mut(id) else {
            return Err(SimError::UnknownCivilization(id));
        };
        let old_belief = std::mem::replace(&mut civ.belief, belief);
        let old_traits = std::mem::replace(&mut civ.traits, traits);

        let message = format!(
            "GOD EVENT: {} underwent a profound ideological and cultural transformation from '{}' (Traits: {}) to '{}' (New Traits: {}). Relations reset.",
            civ.name, old_belief.name, old_traits, civ.belief.name, civ.traits
        );
        civ.log_event(now, EventKind::Intervention, message.clone());
        let (name, summary) = (
            civ.name.clone(),
            format!(
                "{} has been entirely reshaped: New Belief is '{}', new traits: {}. All diplomatic ties reset.",
                civ.name, civ.belief.name, civ.traits
            ),
        );

        let mut chronicle = self.chronicle();
        chronicle.record(EventKind::Intervention, message);
        chronicle.announce(
            MajorEvent::new(format!("Total Metamorphosis in {}", name), summary).about(id, name),
        );
        Ok(())
    }

    /// Make a civilization permanently hostile to everyone it has met
    pub fn force_war_stance(&mut self, id: CivId) -> Result<()> {
        let name = self.live_civilization_name(id)?;
        let now = self.tick;

        let met: Vec<CivId> = self.relations.relations_of(id).map(|(other, _)| other).collect();
        for other in met {
            self.relations.set(id, other, HOSTILE_RELATION_CAP);
        }

        let message = format!(
            "GOD EVENT: {} has been divinely influenced to be permanently hostile and seek war with all other civilizations!",
            name
        );
        if let Some(civ) = self.roster.get_mut(id) {
            civ.permanently_hostile = true;
            civ.log_event(now, EventKind::Intervention, message.clone());
        }

        let mut chronicle = self.chronicle();
        chronicle.record(EventKind::Intervention, message);
        chronicle.announce(
            MajorEvent::new(
                format!("{} Doomed to Eternal War!", name),
                format!(
                    "{} is now compelled by divine will to wage war on any civilization it encounters.",
                    name
                ),
            )
            .about(id, name),
        );
        Ok(())
    }

    /// Grow population and every stock by `m × U(0.2, 0.5)`; returns the population gained
    pub fn bless(&mut self, id: CivId, magnitude: f64) -> Result<u64> {
        let magnitude = check_magnitude(magnitude)?;
        let now = self.tick;
        let boost = magnitude * self.rng.gen_range(0.2..0.5);

        let civ = self
            .roster
            .get_mut(id)
            .filter(|c| c.is_alive())
            .ok_or(SimError::UnknownCivilization(id))?;
        let gained = (civ.population as f64 * boost) as u64;
        civ.population += gained;
        civ.resources.scale(1.0 + boost);

        let message = format!(
            "GOD EVENT: Blessing upon {}, population increased by {}",
            civ.name, gained
        );
        civ.log_event(now, EventKind::Intervention, message.clone());
        self.chronicle().record(EventKind::Intervention, message);
        Ok(gained)
    }
}
