//! Diplomacy and war resolution
//!
//! Civilizations decide; this module applies. It is the only writer of war
//! sets and, outside contact checks, of the relation ledger.

pub mod relations;
pub mod trade;
pub mod unification;
pub mod war;

pub use relations::RelationLedger;
pub use war::{process_wars, BattleOutcome};

use rand::Rng;

use crate::civilization::traits::Trait;
use crate::civilization::{Civilization, DiplomaticIntent};
use crate::core::types::{CivId, SimRng, Tick};
use crate::events::{Chronicle, EventKind, MajorEvent};
use crate::simulation::Roster;

/// Apply the intents one civilization produced during its tick, in order
///
/// Intents naming a civilization that has since collapsed or vanished are
/// dropped.
pub fn resolve_intents(
    initiator: CivId,
    intents: Vec<DiplomaticIntent>,
    roster: &mut Roster,
    relations: &mut RelationLedger,
    rng: &mut SimRng,
    chronicle: &mut Chronicle<'_>,
    now: Tick,
) {
    for intent in intents {
        let Some((civ, other)) = roster.pair_mut(initiator, intent.other()) else {
            continue;
        };
        if civ.has_collapsed || other.has_collapsed {
            continue;
        }

        match intent {
            DiplomaticIntent::FirstContact { .. } => {
                first_contact(civ, other, relations, rng, chronicle, now);
            }
            DiplomaticIntent::DeclareWar { .. } => {
                war::declare_war(civ, other, relations, chronicle, now);
            }
            DiplomaticIntent::ProposeUnification { .. } => {
                unification::unify(civ, other, rng, chronicle, now);
            }
            DiplomaticIntent::Trade { .. } => {
                trade::engage_trade(civ, other, relations, rng, now);
            }
        }

        // Unification collapses one side; clear it from every war set
        let fallen: Vec<CivId> = [&*civ, &*other]
            .into_iter()
            .filter(|c| c.has_collapsed)
            .map(|c| c.id)
            .collect();
        for id in fallen {
            roster.end_wars_with(id);
        }
    }
}

fn first_contact(
    civ: &mut Civilization,
    other: &mut Civilization,
    relations: &mut RelationLedger,
    rng: &mut SimRng,
    chronicle: &mut Chronicle<'_>,
    now: Tick,
) {
    let relation = relations.get(civ.id, other.id).unwrap_or(0.0);

    civ.log_event(
        now,
        EventKind::FirstContact,
        format!("First contact with {} - initial relations: {:.2}", other.name, relation),
    );
    other.log_event(now, EventKind::FirstContact, format!("First contact with {}", civ.name));

    let message = format!("{} made first contact with {}", civ.name, other.name);
    chronicle.record(EventKind::FirstContact, message.clone());
    chronicle.announce(MajorEvent::new("First Contact", message).about(civ.id, civ.name.clone()));

    evaluate_first_contact(civ, other, relation, relations, rng, chronicle, now);
}

/// Probability that a first meeting turns straight into war
pub fn first_contact_war_chance(civ: &Civilization, other: &Civilization) -> f64 {
    let aggressive = (civ.has_trait(Trait::Aggressive), other.has_trait(Trait::Aggressive));
    let peaceful = (civ.has_trait(Trait::Peaceful), other.has_trait(Trait::Peaceful));

    let mut chance = match aggressive {
        (true, true) => 0.6,
        (true, false) | (false, true) => 0.3,
        (false, false) => 0.1,
    };
    if peaceful.0 || peaceful.1 {
        chance *= 0.5;
    }
    if peaceful.0 && peaceful.1 {
        chance *= 0.2;
    }
    if civ.belief.is_hostile() || other.belief.is_hostile() {
        chance += 0.2;
    }
    chance
}

/// Probability that a first meeting ends in a merger
pub fn first_contact_unification_chance(civ: &Civilization, other: &Civilization) -> f64 {
    let mut chance = if civ.has_trait(Trait::Peaceful) && other.has_trait(Trait::Peaceful) {
        0.15
    } else {
        0.05
    };
    let size_ratio = civ.population as f64 / other.population.max(1) as f64;
    if !(0.3..=3.0).contains(&size_ratio) {
        chance *= 0.2;
    }
    if civ.belief.similarity(&other.belief) > 0.7 {
        chance *= 2.0;
    }
    chance
}

fn evaluate_first_contact(
    civ: &mut Civilization,
    other: &mut Civilization,
    relation: f64,
    relations: &mut RelationLedger,
    rng: &mut SimRng,
    chronicle: &mut Chronicle<'_>,
    now: Tick,
) {
    if relation < -0.4 && rng.gen::<f64>() < first_contact_war_chance(civ, other) {
        war::declare_war(civ, other, relations, chronicle, now);
        return;
    }

    if relation > 0.5 && rng.gen::<f64>() < first_contact_unification_chance(civ, other) {
        unification::unify(civ, other, rng, chronicle, now);
        return;
    }

    let reaction = if relation > 0.3 {
        "positive"
    } else if relation < -0.3 {
        "tense"
    } else {
        "neutral"
    };
    civ.log_event(
        now,
        EventKind::FirstContact,
        format!("First contact with {} established - {} relations", other.name, reaction),
    );
}
