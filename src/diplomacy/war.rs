//! War declaration, battles, conquest and peace

use rand::seq::SliceRandom;
use rand::Rng;

use crate::civilization::entity::{City, Civilization};
use crate::civilization::traits::Trait;
use crate::core::config::SimulationConfig;
use crate::core::types::{CivId, SimRng, Tick};
use crate::diplomacy::RelationLedger;
use crate::events::{Chronicle, EventKind, MajorEvent};
use crate::simulation::Roster;

/// Casualties never push a combatant below this
const BATTLE_POPULATION_FLOOR: u64 = 50;

/// Share of a captured city's population that stays
const CAPTURED_CITY_SURVIVAL: f64 = 0.6;

pub fn declare_war(
    a: &mut Civilization,
    b: &mut Civilization,
    relations: &mut RelationLedger,
    chronicle: &mut Chronicle<'_>,
    now: Tick,
) {
    if a.is_at_war_with(b.id) {
        return;
    }

    a.at_war_with.insert(b.id);
    b.at_war_with.insert(a.id);
    relations.set(a.id, b.id, -1.0);

    let message = format!("War declared between {} and {}", a.name, b.name);
    a.log_event(now, EventKind::WarDeclared, message.clone());
    b.log_event(now, EventKind::WarDeclared, message.clone());
    chronicle.record(EventKind::WarDeclared, message.clone());
    chronicle.announce(MajorEvent::new("War Declared", message).about(a.id, a.name.clone()));
}

pub fn make_peace(
    a: &mut Civilization,
    b: &mut Civilization,
    relations: &mut RelationLedger,
    rng: &mut SimRng,
    chronicle: &mut Chronicle<'_>,
    now: Tick,
) {
    a.at_war_with.remove(&b.id);
    b.at_war_with.remove(&a.id);
    relations.set(a.id, b.id, rng.gen_range(-0.5..-0.2));

    let message = format!("Peace treaty signed between {} and {}", a.name, b.name);
    a.log_event(now, EventKind::Peace, message.clone());
    b.log_event(now, EventKind::Peace, message.clone());
    chronicle.record(EventKind::Peace, message.clone());
    chronicle.announce(MajorEvent::new("Peace Treaty", message).about(a.id, a.name.clone()));
}

/// Fighting strength before the random swing
pub fn military_strength(civ: &Civilization) -> f64 {
    let mut strength = civ.population as f64 * (1.0 + civ.technology / 500.0);
    if civ.has_trait(Trait::Aggressive) {
        strength *= 1.3;
    }
    if civ.has_trait(Trait::Peaceful) {
        strength *= 0.7;
    }
    strength
}

#[derive(Clone, Debug, PartialEq)]
pub struct BattleOutcome {
    pub winner: CivId,
    pub loser: CivId,
    pub winner_casualties: u64,
    pub loser_casualties: u64,
    pub tiles_taken: usize,
    pub conquered: bool,
}

/// Fight one border battle between `a` and `b`
///
/// Returns `None` when either side has no land to fight over.
pub fn resolve_battle(
    a: &mut Civilization,
    b: &mut Civilization,
    rng: &mut SimRng,
    config: &SimulationConfig,
    chronicle: &mut Chronicle<'_>,
    now: Tick,
) -> Option<BattleOutcome> {
    if a.territory.is_empty() || b.territory.is_empty() {
        return None;
    }

    let strength_a = military_strength(a) * rng.gen_range(0.8..1.2);
    let strength_b = military_strength(b) * rng.gen_range(0.8..1.2);

    let (winner, loser, ratio) = if strength_a > strength_b {
        (a, b, strength_a / strength_b.max(f64::EPSILON))
    } else {
        (b, a, strength_b / strength_a.max(f64::EPSILON))
    };

    let winner_casualties = (winner.population as f64 * rng.gen_range(0.03..0.07)) as u64;
    let loser_casualties = (loser.population as f64 * rng.gen_range(0.08..0.15)) as u64;
    winner.population = winner.population.saturating_sub(winner_casualties).max(BATTLE_POPULATION_FLOOR);
    loser.population = loser.population.saturating_sub(loser_casualties).max(BATTLE_POPULATION_FLOOR);
    winner.battle_victories += 1;

    let seizable = (loser.territory.len() as f64 * 0.1 * (ratio - 1.0)).max(0.0) as usize;
    let seizable = seizable.min(config.max_tiles_per_battle);

    let mut outcome = BattleOutcome {
        winner: winner.id,
        loser: loser.id,
        winner_casualties,
        loser_casualties,
        tiles_taken: 0,
        conquered: false,
    };

    if seizable == 0 {
        return Some(outcome);
    }

    let mut border = loser.border_tiles_facing(winner);
    border.shuffle(rng);
    for pos in border.into_iter().take(seizable) {
        loser.territory.remove(&pos);
        winner.territory.insert(pos);
        if let Some(city) = loser.cities.remove(&pos) {
            let survivors = (city.population as f64 * CAPTURED_CITY_SURVIVAL) as u64;
            winner.cities.insert(pos, City { name: city.name, population: survivors });
        }
        outcome.tiles_taken += 1;
    }

    if outcome.tiles_taken == 0 {
        return Some(outcome);
    }

    winner.log_event(
        now,
        EventKind::Battle,
        format!("Won battle against {}, gained {} territories", loser.name, outcome.tiles_taken),
    );
    loser.log_event(
        now,
        EventKind::Battle,
        format!("Lost battle to {}, lost {} territories", winner.name, outcome.tiles_taken),
    );

    let report = format!(
        "{} defeated {} in battle, gaining {} territories. {} lost {} population, {} lost {} population.",
        winner.name,
        loser.name,
        outcome.tiles_taken,
        winner.name,
        winner_casualties,
        loser.name,
        loser_casualties
    );
    chronicle.record(EventKind::Battle, report.clone());
    chronicle.announce(MajorEvent::new("Major Battle", report).about(winner.id, winner.name.clone()));

    if loser.cities.is_empty() {
        conquer(winner, loser, chronicle, now);
        outcome.conquered = true;
    }

    Some(outcome)
}

/// Absorb a civilization that has lost its last city
fn conquer(winner: &mut Civilization, loser: &mut Civilization, chronicle: &mut Chronicle<'_>, now: Tick) {
    let message = format!("{} has been conquered by {}", loser.name, winner.name);
    loser.log_event(now, EventKind::Conquest, format!("Our civilization has been conquered by {}", winner.name));
    winner.log_event(now, EventKind::Conquest, format!("We have conquered {}", loser.name));

    winner.territory.append(&mut loser.territory);
    let refugees = ((loser.population as f64 * 0.5) as u64).max(10);
    winner.population += refugees;
    winner.at_war_with.remove(&loser.id);
    loser.mark_collapsed();

    tracing::info!("{}", message);
    chronicle.record(EventKind::Conquest, message.clone());
    chronicle.announce(MajorEvent::new("Civilization Conquered", message).about(winner.id, winner.name.clone()));
}

/// One round of every ongoing war
///
/// Each at-war pair is handled once, from the lower id: a battle if the two
/// share a border, then a chance of peace. Wars against missing or collapsed
/// enemies are dropped.
pub fn process_wars(
    roster: &mut Roster,
    relations: &mut RelationLedger,
    rng: &mut SimRng,
    config: &SimulationConfig,
    chronicle: &mut Chronicle<'_>,
    now: Tick,
) -> Vec<BattleOutcome> {
    let mut pairs = Vec::new();
    let mut stale = Vec::new();

    for civ in roster.iter().filter(|c| c.is_alive()) {
        for &enemy in &civ.at_war_with {
            match roster.get(enemy) {
                Some(e) if !e.has_collapsed => {
                    if civ.id < enemy {
                        pairs.push((civ.id, enemy));
                    }
                }
                _ => stale.push((civ.id, enemy)),
            }
        }
    }

    for (id, enemy) in stale {
        if let Some(civ) = roster.get_mut(id) {
            civ.at_war_with.remove(&enemy);
        }
    }

    let mut outcomes = Vec::new();
    for (a, b) in pairs {
        let Some((civ_a, civ_b)) = roster.pair_mut(a, b) else {
            continue;
        };
        if civ_a.has_collapsed || civ_b.has_collapsed {
            continue;
        }

        if civ_a.is_adjacent_to(civ_b) {
            if let Some(outcome) = resolve_battle(civ_a, civ_b, rng, config, chronicle, now) {
                let (conquered, loser) = (outcome.conquered, outcome.loser);
                outcomes.push(outcome);
                if conquered {
                    roster.end_wars_with(loser);
                    continue;
                }
            }
        }

        if civ_a.is_at_war_with(b) && rng.gen::<f64>() < config.peace_chance {
            make_peace(civ_a, civ_b, relations, rng, chronicle, now);
        }
    }

    outcomes
}
