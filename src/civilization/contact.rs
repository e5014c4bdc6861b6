//! Diplomatic contact checks
//!
//! A civilization looks at every neighbour it touches, updates the shared
//! relation value and decides what it wants to do about it. The decisions come
//! back as intents; applying them to both parties is the resolver's job.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::civilization::entity::Civilization;
use crate::civilization::traits::Trait;
use crate::civilization::Others;
use crate::core::types::{CivId, SimRng};
use crate::diplomacy::RelationLedger;

/// Relation ceiling while either side is divinely hostile
pub const HOSTILE_RELATION_CAP: f64 = -0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiplomaticIntent {
    FirstContact { other: CivId },
    DeclareWar { other: CivId },
    ProposeUnification { other: CivId },
    Trade { other: CivId },
}

impl DiplomaticIntent {
    pub fn other(&self) -> CivId {
        match *self {
            DiplomaticIntent::FirstContact { other }
            | DiplomaticIntent::DeclareWar { other }
            | DiplomaticIntent::ProposeUnification { other }
            | DiplomaticIntent::Trade { other } => other,
        }
    }
}

fn both(a: &Civilization, b: &Civilization, t: Trait) -> bool {
    a.has_trait(t) && b.has_trait(t)
}

fn either(a: &Civilization, b: &Civilization, t: Trait) -> bool {
    a.has_trait(t) || b.has_trait(t)
}

fn pin_if_hostile(civ: &Civilization, other: &Civilization, relation: f64) -> f64 {
    if civ.permanently_hostile || other.permanently_hostile {
        relation.min(HOSTILE_RELATION_CAP)
    } else {
        relation
    }
}

/// Opening relation between two civilizations meeting for the first time
pub fn first_contact_relation(civ: &Civilization, other: &Civilization, rng: &mut SimRng) -> f64 {
    let base = rng.gen_range(-0.3..0.3);

    let mut trait_factor = 0.0;
    if both(civ, other, Trait::Aggressive) {
        trait_factor -= 0.2;
    }
    if both(civ, other, Trait::Peaceful) {
        trait_factor += 0.3;
    }
    if civ.has_trait(Trait::Isolationist) {
        trait_factor -= 0.2;
    }
    if both(civ, other, Trait::Trading) {
        trait_factor += 0.3;
    }

    let belief_factor = (civ.belief.similarity(&other.belief) - 0.5) * 0.4;
    let stance_factor =
        crate::civilization::belief::stance_affinity(civ.belief.foreign_stance, other.belief.foreign_stance) * 0.5;

    let relation = (base + trait_factor + belief_factor + stance_factor).clamp(-1.0, 1.0);
    pin_if_hostile(civ, other, relation)
}

/// One tick of drift for an existing relation
pub fn drifted_relation(civ: &Civilization, other: &Civilization, current: f64, rng: &mut SimRng) -> f64 {
    let drift = rng.gen_range(-0.05..0.05);

    let territory_ratio = other.territory.len() as f64 / civ.territory.len().max(1) as f64;
    let pressure = if territory_ratio > 2.0 {
        -0.1
    } else if territory_ratio < 0.5 {
        0.05
    } else {
        0.0
    };

    let tech_gap = other.technology - civ.technology;
    let tech_factor = if tech_gap > 100.0 {
        -0.05
    } else if tech_gap < -100.0 {
        0.05
    } else {
        0.0
    };

    let mut stance_bias = 0.0;
    if civ.belief.is_hostile() {
        stance_bias -= 0.02;
    }
    if other.belief.is_hostile() {
        stance_bias -= 0.02;
    }
    if civ.belief.is_open() && other.belief.is_open() {
        stance_bias += 0.01;
    }

    let relation = (current + drift + pressure + tech_factor + stance_bias).clamp(-1.0, 1.0);
    pin_if_hostile(civ, other, relation)
}

fn war_chance(civ: &Civilization) -> f64 {
    let mut chance = if civ.has_trait(Trait::Aggressive) {
        0.5
    } else if civ.has_trait(Trait::Peaceful) {
        0.1
    } else {
        0.3
    };
    if civ.belief.is_hostile() {
        chance += 0.1;
    }
    chance
}

fn unification_chance(civ: &Civilization, other: &Civilization) -> f64 {
    let mut chance = if both(civ, other, Trait::Peaceful) { 0.1 } else { 0.05 };
    if either(civ, other, Trait::Isolationist) {
        chance = 0.01;
    }
    let size_ratio = civ.population as f64 / other.population.max(1) as f64;
    if (0.5..=2.0).contains(&size_ratio) {
        chance *= 2.0;
    }
    chance
}

fn trade_chance(civ: &Civilization, other: &Civilization) -> f64 {
    if either(civ, other, Trait::Trading) {
        0.6
    } else {
        0.3
    }
}

/// Update relations with every touching neighbour and collect intents
pub fn check_contacts(
    civ: &Civilization,
    others: Others<'_>,
    relations: &mut RelationLedger,
    rng: &mut SimRng,
) -> Vec<DiplomaticIntent> {
    let mut intents = Vec::new();

    for other in others.iter() {
        if other.has_collapsed || other.territory.is_empty() || !civ.is_adjacent_to(other) {
            continue;
        }

        let Some(current) = relations.get(civ.id, other.id) else {
            let opening = first_contact_relation(civ, other, rng);
            relations.set(civ.id, other.id, opening);
            intents.push(DiplomaticIntent::FirstContact { other: other.id });
            continue;
        };

        let relation = relations.set(civ.id, other.id, drifted_relation(civ, other, current, rng));
        let at_war = civ.is_at_war_with(other.id);

        if relation < -0.7 {
            if !at_war && rng.gen::<f64>() < war_chance(civ) {
                intents.push(DiplomaticIntent::DeclareWar { other: other.id });
            }
        } else if at_war {
            continue;
        } else if relation > 0.7 {
            if rng.gen::<f64>() < unification_chance(civ, other) {
                intents.push(DiplomaticIntent::ProposeUnification { other: other.id });
            }
        } else if relation >= 0.3 && rng.gen::<f64>() < trade_chance(civ, other) {
            intents.push(DiplomaticIntent::Trade { other: other.id });
        }
    }

    intents
}
