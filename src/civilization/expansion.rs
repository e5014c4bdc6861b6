//! Territorial expansion, city founding and city consolidation

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::civilization::entity::{City, Civilization};
use crate::civilization::naming;
use crate::civilization::traits::Trait;
use crate::civilization::Others;
use crate::core::types::{Position, SimRng, Tick};
use crate::events::EventKind;
use crate::world::{TerrainKind, WorldMap};

/// Population needed to expand, before scaling by territory size
fn base_expansion_threshold(civ: &Civilization) -> f64 {
    if civ.has_trait(Trait::Expansionist) {
        30.0
    } else if civ.has_trait(Trait::Isolationist) {
        150.0
    } else {
        80.0
    }
}

pub fn wants_to_expand(civ: &Civilization, rng: &mut SimRng) -> bool {
    let tiles = civ.territory.len();
    let threshold = base_expansion_threshold(civ) * ((tiles + 1) as f64).sqrt() / 2.0;
    let density = civ.population as f64 / tiles.max(1) as f64;
    let age_factor = (f64::from(civ.age) / 100.0).min(1.0);

    civ.population as f64 >= threshold
        || density > 30.0
        || rng.gen::<f64>() < age_factor * 0.2
}

/// Unowned, in-bounds land tiles touching our territory, in position order
pub fn expansion_candidates(civ: &Civilization, world: &dyn WorldMap, others: Others<'_>) -> Vec<Position> {
    let mut candidates = BTreeSet::new();
    for pos in &civ.territory {
        for neighbor in pos.neighbors() {
            if civ.territory.contains(&neighbor) || candidates.contains(&neighbor) {
                continue;
            }
            if !world.terrain(neighbor).is_some_and(|t| t.is_claimable()) {
                continue;
            }
            if others.owns(neighbor) {
                continue;
            }
            candidates.insert(neighbor);
        }
    }
    candidates.into_iter().collect()
}

/// Maybe claim one adjacent tile, possibly founding a city on it
pub fn consider_expansion(
    civ: &mut Civilization,
    world: &dyn WorldMap,
    others: Others<'_>,
    rng: &mut SimRng,
    now: Tick,
) {
    if wants_to_expand(civ, rng) {
        let candidates = expansion_candidates(civ, world, others);
        if let Some(&tile) = candidates.choose(rng) {
            civ.territory.insert(tile);
            if !try_found_city(civ, tile, world, rng, now) && civ.territory.len() % 10 == 0 {
                let message = format!("Expanded territory to {} tiles", civ.territory.len());
                civ.log_event(now, EventKind::Expansion, message);
            }
        }
    }

    optimize_cities(civ, rng, now);
}

fn city_founding_chance(civ: &Civilization) -> f64 {
    let mut chance = 0.05;
    if civ.has_trait(Trait::Expansionist) {
        chance += 0.05;
    }
    if civ.has_trait(Trait::Isolationist) {
        chance -= 0.03;
    }
    chance
}

/// Water nearby is best, then open plains; mountains count against
fn site_score(tile: Position, world: &dyn WorldMap) -> f64 {
    let mut score = 0.0;
    if tile.neighbors().any(|n| world.terrain(n) == Some(TerrainKind::Water)) {
        score += 2.0;
    }
    match world.terrain(tile) {
        Some(TerrainKind::Plains) => score += 1.0,
        Some(TerrainKind::Forest) => score += 0.5,
        Some(TerrainKind::Mountain) => score -= 1.0,
        _ => {}
    }
    score
}

fn try_found_city(
    civ: &mut Civilization,
    tile: Position,
    world: &dyn WorldMap,
    rng: &mut SimRng,
    now: Tick,
) -> bool {
    let max_cities = 3.max((civ.territory.len() as f64).sqrt() as usize);
    let roll = rng.gen::<f64>() < city_founding_chance(civ);
    if !roll || civ.cities.len() >= max_cities || civ.population <= civ.cities.len() as u64 * 100 {
        return false;
    }

    if site_score(tile, world) <= 0.0 && rng.gen::<f64>() >= 0.2 {
        return false;
    }

    let settlers = (civ.population as f64 * 0.2) as u64;
    civ.population = civ.population.saturating_sub(settlers).max(1);

    let name = naming::city_name(rng, &civ.traits, world.terrain(tile), &civ.name, civ.cities.len());
    civ.log_event(now, EventKind::CityFounded, format!("Established new city {} at {}", name, tile));
    civ.cities.insert(tile, City { name, population: settlers });
    true
}

/// Occasionally fold tiny cities into the largest one, at most two per tick
pub fn optimize_cities(civ: &mut Civilization, rng: &mut SimRng, now: Tick) {
    if rng.gen::<f64>() >= 0.05 || civ.cities.len() <= 1 {
        return;
    }

    let Some(largest) = civ
        .cities
        .iter()
        .max_by_key(|(_, city)| city.population)
        .map(|(pos, _)| *pos)
    else {
        return;
    };

    let small: Vec<Position> = civ
        .cities
        .iter()
        .filter(|(pos, city)| **pos != largest && city.population < 50)
        .map(|(pos, _)| *pos)
        .take(2)
        .collect();

    for pos in small {
        if let Some(city) = civ.cities.remove(&pos) {
            if let Some(capital) = civ.cities.get_mut(&largest) {
                capital.population += city.population;
            }
            civ.log_event(now, EventKind::CityAbandoned, format!("Abandoned small settlement {}", city.name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CivId;
    use crate::world::GridWorld;
    use rand::SeedableRng;

    fn civ_on(world: &GridWorld, id: u32, at: Position, seed: u64) -> Civilization {
        let mut rng = SimRng::seed_from_u64(seed);
        Civilization::found(CivId(id), at, world, 0, &mut rng)
    }

    #[test]
    fn test_candidates_exclude_owned_and_water() {
        let mut terrain = vec![TerrainKind::Plains; 10 * 10];
        terrain[5 * 10 + 6] = TerrainKind::Water;
        let world = GridWorld::from_terrain(10, 10, terrain, 0);

        let mut a = civ_on(&world, 1, Position::new(5, 5), 1);
        a.territory = [Position::new(5, 5)].into_iter().collect();
        let mut b = civ_on(&world, 2, Position::new(4, 5), 2);
        b.territory = [Position::new(4, 5)].into_iter().collect();

        let others = [b];
        let candidates = expansion_candidates(&a, &world, Others::new(&others, &[]));
        assert_eq!(candidates.len(), 6);
        assert!(!candidates.contains(&Position::new(6, 5)));
        assert!(!candidates.contains(&Position::new(4, 5)));
    }

    #[test]
    fn test_large_population_expands() {
        let world = GridWorld::filled(40, 40, TerrainKind::Plains);
        let mut civ = civ_on(&world, 1, Position::new(20, 20), 3);
        civ.population = 5_000;
        let before = civ.territory.len();
        let mut rng = SimRng::seed_from_u64(4);
        consider_expansion(&mut civ, &world, Others::empty(), &mut rng, 1);
        assert_eq!(civ.territory.len(), before + 1);
    }

    #[test]
    fn test_cities_stay_inside_territory() {
        let world = GridWorld::filled(60, 60, TerrainKind::Plains);
        let mut civ = civ_on(&world, 1, Position::new(30, 30), 5);
        civ.traits = vec![Trait::Expansionist].into();
        let mut rng = SimRng::seed_from_u64(6);
        for tick in 0..300 {
            civ.population = 20_000;
            consider_expansion(&mut civ, &world, Others::empty(), &mut rng, tick);
        }
        assert!(civ.cities.len() > 1);
        assert!(civ.cities.keys().all(|p| civ.territory.contains(p)));
    }

    #[test]
    fn test_optimize_merges_small_cities() {
        let world = GridWorld::filled(30, 30, TerrainKind::Plains);
        let mut civ = civ_on(&world, 1, Position::new(15, 15), 7);
        civ.cities.clear();
        civ.cities.insert(Position::new(15, 15), City { name: "Capital".into(), population: 500 });
        civ.cities.insert(Position::new(16, 15), City { name: "Hamlet".into(), population: 10 });
        civ.cities.insert(Position::new(14, 15), City { name: "Camp".into(), population: 20 });
        civ.cities.insert(Position::new(15, 16), City { name: "Post".into(), population: 30 });

        let mut rng = SimRng::seed_from_u64(8);
        let mut merged = false;
        for tick in 0..500 {
            optimize_cities(&mut civ, &mut rng, tick);
            if civ.cities.len() < 4 {
                merged = true;
                break;
            }
        }
        assert!(merged);
        assert_eq!(civ.cities.len(), 2);
        assert_eq!(civ.city_population(), 560);
    }
}
