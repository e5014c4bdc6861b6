//! Natural and divine disasters
//!
//! A disaster strikes a disc of tiles. Each civilization is hit in proportion
//! to the share of its territory inside the disc.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::civilization::Civilization;
use crate::core::types::{CivId, Position, SimRng};
use crate::events::{Chronicle, EventKind, MajorEvent};
use crate::simulation::Roster;
use crate::world::{ResourceKind, WorldMap};

/// Population and food never drop below this after a natural disaster
const NATURAL_FLOOR: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisasterKind {
    Earthquake,
    Flood,
    Drought,
    VolcanicEruption,
    Disease,
}

impl DisasterKind {
    pub const ALL: [DisasterKind; 5] = [
        DisasterKind::Earthquake,
        DisasterKind::Flood,
        DisasterKind::Drought,
        DisasterKind::VolcanicEruption,
        DisasterKind::Disease,
    ];

    pub fn random(rng: &mut SimRng) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&DisasterKind::Earthquake)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DisasterKind::Earthquake => "Earthquake",
            DisasterKind::Flood => "Flood",
            DisasterKind::Drought => "Drought",
            DisasterKind::VolcanicEruption => "Volcanic Eruption",
            DisasterKind::Disease => "Disease",
        }
    }
}

/// Damage dealt to one civilization
#[derive(Clone, Debug, PartialEq)]
pub struct DisasterDamage {
    pub civ: CivId,
    pub population_lost: u64,
    pub food_lost: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisasterReport {
    pub kind: DisasterKind,
    pub center: Position,
    pub radius: i32,
    pub damage: Vec<DisasterDamage>,
}

impl DisasterReport {
    pub fn population_lost(&self) -> u64 {
        self.damage.iter().map(|d| d.population_lost).sum()
    }
}

/// Tiles of `civ` inside the disc, and the cities among them
fn footprint(civ: &Civilization, center: Position, radius: i32) -> (usize, Vec<Position>) {
    let r2 = i64::from(radius) * i64::from(radius);
    let tiles: Vec<Position> = civ
        .territory
        .iter()
        .copied()
        .filter(|p| p.distance_squared(&center) <= r2)
        .collect();
    let cities = tiles.iter().copied().filter(|p| civ.cities.contains_key(p)).collect();
    (tiles.len(), cities)
}

fn impact_ratio(civ: &Civilization, tiles: usize) -> f64 {
    tiles as f64 / civ.territory.len().max(1) as f64
}

fn strike(
    civ: &mut Civilization,
    kind: DisasterKind,
    impact: f64,
    cities_hit: &[Position],
    rng: &mut SimRng,
) -> DisasterDamage {
    let mut damage = DisasterDamage { civ: civ.id, population_lost: 0, food_lost: 0.0 };

    match kind {
        DisasterKind::Earthquake | DisasterKind::VolcanicEruption => {
            let mut city_loss = 0;
            for pos in cities_hit {
                if let Some(city) = civ.cities.get_mut(pos) {
                    let loss = (city.population as f64 * 0.05) as u64;
                    city.population -= loss;
                    city_loss += loss;
                }
            }
            let outside = civ.population.saturating_sub(civ.city_population());
            let general = (outside as f64 * impact * rng.gen_range(0.01..0.05)) as u64;

            damage.population_lost = city_loss + general;
            civ.population = civ.population.saturating_sub(damage.population_lost).max(NATURAL_FLOOR);

            for kind in ResourceKind::ALL {
                civ.resources[kind] *= 1.0 - impact * rng.gen_range(0.1..0.3);
            }
        }
        DisasterKind::Disease => {
            let tech_factor = (1.0 - civ.technology / 150.0).max(0.1);
            let severity = rng.gen_range(0.15..0.45) * tech_factor;
            damage.population_lost = (civ.population as f64 * severity * impact) as u64;
            civ.population = civ.population.saturating_sub(damage.population_lost).max(NATURAL_FLOOR);
        }
        DisasterKind::Drought | DisasterKind::Flood => {
            let share = if kind == DisasterKind::Drought {
                rng.gen_range(0.3..0.6)
            } else {
                rng.gen_range(0.1..0.25)
            };
            let food = civ.food();
            damage.food_lost = food * impact * share;
            civ.resources[ResourceKind::Food] = (food - damage.food_lost).max(NATURAL_FLOOR as f64);
        }
    }

    damage
}

fn damage_line(civ: &Civilization, kind: DisasterKind, damage: &DisasterDamage) -> String {
    match kind {
        DisasterKind::Drought | DisasterKind::Flood => {
            format!("{} lost {:.1} food to {}", civ.name, damage.food_lost, kind.name())
        }
        DisasterKind::Disease => format!(
            "{} lost {} population to {}. Tech level {:.1} influenced severity.",
            civ.name,
            damage.population_lost,
            kind.name(),
            civ.technology
        ),
        _ => format!(
            "{} lost {} population to {}. Cities heavily affected.",
            civ.name,
            damage.population_lost,
            kind.name()
        ),
    }
}

/// Roll a natural disaster somewhere on the map
///
/// Returns `None` when the disc misses every civilization; nothing is logged
/// in that case.
pub fn natural_disaster(
    roster: &mut Roster,
    world: &dyn WorldMap,
    rng: &mut SimRng,
    chronicle: &mut Chronicle<'_>,
) -> Option<DisasterReport> {
    let kind = DisasterKind::random(rng);
    let center = Position::new(
        rng.gen_range(0..world.width().max(1)),
        rng.gen_range(0..world.height().max(1)),
    );
    let radius = rng.gen_range(3..=8);

    let targets: Vec<CivId> = roster
        .iter()
        .filter(|c| !c.has_collapsed && footprint(c, center, radius).0 > 0)
        .map(|c| c.id)
        .collect();
    if targets.is_empty() {
        return None;
    }

    chronicle.record(
        EventKind::Disaster,
        format!("Natural Disaster: {} in region around ({}, {})", kind.name(), center.x, center.y),
    );

    let mut report = DisasterReport { kind, center, radius, damage: Vec::new() };
    let mut first_name = String::new();
    for id in &targets {
        let Some(civ) = roster.get_mut(*id) else {
            continue;
        };
        let (tiles, cities_hit) = footprint(civ, center, radius);
        let impact = impact_ratio(civ, tiles);
        let damage = strike(civ, kind, impact, &cities_hit, rng);
        chronicle.record(EventKind::Disaster, damage_line(civ, kind, &damage));
        if first_name.is_empty() {
            first_name = civ.name.clone();
        }
        report.damage.push(damage);
    }

    let lost = report.population_lost();
    let message = if targets.len() == 1 && lost > 0 {
        format!(
            "A {} has struck near ({}, {}), killing {} people in {}.",
            kind.name().to_lowercase(),
            center.x,
            center.y,
            lost,
            first_name
        )
    } else {
        format!(
            "A {} has struck near ({}, {}), affecting {} civilizations.",
            kind.name().to_lowercase(),
            center.x,
            center.y,
            targets.len()
        )
    };
    chronicle.announce(
        MajorEvent::new(format!("Natural Disaster: {}", kind.name()), message)
            .about(targets[0], first_name),
    );

    Some(report)
}

/// A disaster called down at `center`; always announced, even when it hits no one
pub fn divine_disaster(
    roster: &mut Roster,
    center: Position,
    magnitude: f64,
    rng: &mut SimRng,
    chronicle: &mut Chronicle<'_>,
) -> DisasterReport {
    let kind = DisasterKind::random(rng);
    let radius = ((3.0 * magnitude) as i32).max(1);

    chronicle.record(
        EventKind::Intervention,
        format!(
            "GOD EVENT: {} at ({}, {}) by divine intervention!",
            kind.name(),
            center.x,
            center.y
        ),
    );

    let mut report = DisasterReport { kind, center, radius, damage: Vec::new() };
    let mut names = Vec::new();
    for civ in roster.iter_mut().filter(|c| !c.has_collapsed) {
        let (tiles, _) = footprint(civ, center, radius);
        if tiles == 0 {
            continue;
        }

        let rate = (rng.gen_range(0.1..0.3) * magnitude * impact_ratio(civ, tiles)).min(0.9);
        let lost = (civ.population as f64 * rate) as u64;
        civ.population = civ.population.saturating_sub(lost).max(1);

        let resource_damage = rate * rng.gen_range(0.3..0.7);
        for kind in ResourceKind::ALL {
            civ.resources[kind] = (civ.resources[kind] * (1.0 - resource_damage)).max(0.0);
        }

        chronicle.record(
            EventKind::Disaster,
            format!(
                "{} lost {} people and resources to divine {}.",
                civ.name,
                lost,
                kind.name().to_lowercase()
            ),
        );
        names.push((civ.id, civ.name.clone()));
        report.damage.push(DisasterDamage { civ: civ.id, population_lost: lost, food_lost: 0.0 });
    }

    let affected = if names.is_empty() {
        "No civilizations".to_string()
    } else {
        names.iter().map(|(_, n)| n.as_str()).collect::<Vec<_>>().join(", ")
    };
    let mut event = MajorEvent::new(
        format!("Divine Disaster: {}", kind.name()),
        format!(
            "A divinely invoked {} struck near ({},{}). {} affected. Total population lost: {}.",
            kind.name().to_lowercase(),
            center.x,
            center.y,
            affected,
            report.population_lost()
        ),
    );
    if let Some((id, name)) = names.into_iter().next() {
        event = event.about(id, name);
    }
    chronicle.announce(event);

    report
}
