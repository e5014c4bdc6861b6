//! Status summaries, history snapshots and run output

use serde::{Deserialize, Serialize};

use crate::civilization::{Civilization, ForeignStance};
use crate::core::types::CivId;
use crate::events::{EventKind, EventLogger};
use crate::simulation::Roster;
use crate::world::ResourceTable;

/// Public summary of one civilization
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CivilizationStatus {
    pub id: CivId,
    pub name: String,
    pub population: u64,
    pub age: u32,
    pub territory_size: usize,
    pub city_count: usize,
    pub traits: Vec<String>,
    pub belief_name: String,
    pub belief_values: [f64; 6],
    pub foreign_stance: ForeignStance,
    pub technology: f64,
    pub resources: ResourceTable,
    pub at_war_with: Vec<CivId>,
    pub battle_victories: u32,
}

impl From<&Civilization> for CivilizationStatus {
    fn from(civ: &Civilization) -> Self {
        Self {
            id: civ.id,
            name: civ.name.clone(),
            population: civ.population,
            age: civ.age,
            territory_size: civ.territory.len(),
            city_count: civ.cities.len(),
            traits: civ.traits.iter().map(|t| t.name().to_string()).collect(),
            belief_name: civ.belief.name.clone(),
            belief_values: civ.belief.values,
            foreign_stance: civ.belief.foreign_stance,
            technology: civ.technology,
            resources: civ.resources,
            at_war_with: civ.at_war_with.iter().copied().collect(),
            battle_victories: civ.battle_victories,
        }
    }
}

/// State of every active civilization at one point in time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub year: u64,
    pub civilizations: Vec<CivilizationStatus>,
}

impl HistorySnapshot {
    pub fn capture(year: u64, roster: &Roster) -> Self {
        Self {
            year,
            civilizations: roster
                .iter()
                .filter(|c| c.is_alive())
                .map(CivilizationStatus::from)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunStatistics {
    pub years_simulated: u64,
    pub simulation_time_ms: u64,
    pub total_events: usize,
    pub wars_declared: usize,
    pub battles: usize,
    pub unifications: usize,
    pub collapses: usize,
    pub disasters: usize,
    pub civilizations_at_end: usize,
    pub total_population: u64,
}

/// What a headless run produced
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    pub civilizations: Vec<CivilizationStatus>,
    pub statistics: RunStatistics,
}

impl RunSummary {
    pub fn new(name: &str, year: u64, roster: &Roster, log: &EventLogger, elapsed_ms: u64) -> Self {
        let count = |kind: EventKind| log.by_kind(kind).count();
        let civilizations: Vec<CivilizationStatus> = roster
            .iter()
            .filter(|c| c.is_alive())
            .map(CivilizationStatus::from)
            .collect();

        Self {
            name: name.to_string(),
            statistics: RunStatistics {
                years_simulated: year,
                simulation_time_ms: elapsed_ms,
                total_events: log.len(),
                wars_declared: count(EventKind::WarDeclared),
                battles: count(EventKind::Battle),
                unifications: count(EventKind::Unification),
                collapses: count(EventKind::Collapse),
                disasters: count(EventKind::Disaster),
                civilizations_at_end: civilizations.len(),
                total_population: civilizations.iter().map(|c| c.population).sum(),
            },
            civilizations,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let mut out = format!(
            "{}: simulated {} years in {}ms\n{} events, {} wars, {} battles, {} unifications, {} collapses\n{} civilizations remain with {} people",
            self.name,
            self.statistics.years_simulated,
            self.statistics.simulation_time_ms,
            self.statistics.total_events,
            self.statistics.wars_declared,
            self.statistics.battles,
            self.statistics.unifications,
            self.statistics.collapses,
            self.statistics.civilizations_at_end,
            self.statistics.total_population,
        );
        for civ in &self.civilizations {
            out.push_str(&format!(
                "\n  - {} ({}): pop={}, territory={}, cities={}, tech={:.1}",
                civ.name, civ.id, civ.population, civ.territory_size, civ.city_count, civ.technology
            ));
        }
        out
    }
}
