//! Peaceful merging of two civilizations

use std::collections::btree_map::Entry;

use crate::civilization::entity::Civilization;
use crate::core::types::{CivId, SimRng, Tick};
use crate::events::{Chronicle, EventKind, MajorEvent};
use crate::world::ResourceKind;

/// Share of the absorbed population and stockpile that survives integration
const INTEGRATION_RATE: f64 = 0.8;

/// Chance that each absorbed trait is adopted
const TRAIT_ADOPTION_CHANCE: f64 = 0.5;

const UNITED_PREFIX: &str = "United ";

fn unification_score(civ: &Civilization) -> f64 {
    civ.population as f64 * (1.0 + civ.technology / 1000.0)
}

/// Merge `a` and `b`; the stronger absorbs the weaker. Returns the survivor's id.
pub fn unify(
    a: &mut Civilization,
    b: &mut Civilization,
    rng: &mut SimRng,
    chronicle: &mut Chronicle<'_>,
    now: Tick,
) -> CivId {
    let (dominant, absorbed) = if unification_score(a) >= unification_score(b) {
        (a, b)
    } else {
        (b, a)
    };

    let old_name = dominant.name.clone();
    if !dominant.name.starts_with(UNITED_PREFIX) {
        dominant.name = format!("{}{}", UNITED_PREFIX, dominant.name);
    }

    let message = format!(
        "{} and {} have unified to form {}",
        old_name, absorbed.name, dominant.name
    );
    dominant.log_event(now, EventKind::Unification, message.clone());
    absorbed.log_event(now, EventKind::Unification, message.clone());

    dominant.territory.append(&mut absorbed.territory);

    for (pos, city) in std::mem::take(&mut absorbed.cities) {
        match dominant.cities.entry(pos) {
            Entry::Occupied(mut existing) => existing.get_mut().population += city.population,
            Entry::Vacant(slot) => {
                slot.insert(city);
            }
        }
    }

    dominant.population += (absorbed.population as f64 * INTEGRATION_RATE) as u64;
    for kind in ResourceKind::ALL {
        dominant.resources[kind] += absorbed.resources[kind].max(0.0) * INTEGRATION_RATE;
    }

    let adopted = dominant.traits.blend_from(&absorbed.traits, TRAIT_ADOPTION_CHANCE, rng);
    if !adopted.is_empty() {
        tracing::debug!("{} adopted traits {:?} from {}", dominant.name, adopted, absorbed.name);
    }

    dominant.technology = (dominant.technology * 2.0 + absorbed.technology) / 3.0;

    dominant.at_war_with.remove(&absorbed.id);
    absorbed.mark_collapsed();

    tracing::info!("{}", message);
    chronicle.record(EventKind::Unification, message.clone());
    chronicle.announce(
        MajorEvent::new("Civilizations United", message).about(dominant.id, dominant.name.clone()),
    );

    dominant.id
}
