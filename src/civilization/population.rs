//! Population growth, carrying capacity and food consumption

use rand::Rng;

use crate::civilization::entity::Civilization;
use crate::civilization::traits::Trait;
use crate::core::config::SimulationConfig;
use crate::core::types::{SimRng, Tick};
use crate::events::EventKind;
use crate::world::ResourceKind;

/// Population changes beyond this size get an event log entry
const NOTABLE_POPULATION_CHANGE: i64 = 2000;

/// Population the civilization's land supports at its technology level
pub fn carrying_capacity(civ: &Civilization, config: &SimulationConfig) -> f64 {
    let tech_modifier = civ.technology.min(100.0).max(0.0).sqrt() / 5.0;
    civ.territory.len() as f64 * config.base_capacity_per_tile * tech_modifier
}

/// Base growth rate from food per head
fn food_growth_rate(food_per_capita: f64, rng: &mut SimRng) -> f64 {
    if food_per_capita >= 1.5 {
        rng.gen_range(0.01..0.015)
    } else if food_per_capita >= 1.0 {
        rng.gen_range(0.005..0.01)
    } else if food_per_capita >= 0.75 {
        rng.gen_range(0.002..0.005)
    } else if food_per_capita >= 0.5 {
        rng.gen_range(-0.002..0.002)
    } else {
        rng.gen_range(-0.02..-0.01)
    }
}

/// Demographic slowdown for large populations
fn size_factor(population: u64) -> f64 {
    match population {
        p if p > 500_000 => 0.2,
        p if p > 100_000 => 0.4,
        p if p > 50_000 => 0.6,
        p if p > 10_000 => 0.8,
        _ => 1.0,
    }
}

fn damping(population: u64) -> f64 {
    if population < 1_000 {
        1.0
    } else if population < 10_000 {
        0.8
    } else {
        0.6
    }
}

/// Grow or shrink the population, then eat
pub fn update_population(civ: &mut Civilization, config: &SimulationConfig, now: Tick, rng: &mut SimRng) {
    let population = civ.population;
    let protected = civ.is_protected(now);

    let food_per_capita = civ.food() / population.max(1) as f64;
    let capacity = carrying_capacity(civ, config);
    let capacity_ratio = population as f64 / capacity.max(1.0);

    let mut rate = if capacity_ratio > 1.1 {
        -0.05
    } else {
        food_growth_rate(food_per_capita, rng)
    };

    if capacity_ratio > 0.9 {
        rate *= 1.0 - capacity_ratio;
    }

    rate *= size_factor(population);
    rate *= 1.0 + (civ.technology + 1.0).ln() / 20.0;

    if civ.has_trait(Trait::Aggressive) {
        rate *= 0.8;
    }
    if civ.has_trait(Trait::Peaceful) {
        rate *= 1.1;
    }
    if civ.has_trait(Trait::Expansionist) && civ.territory.len() > 50 {
        rate *= 1.05;
    }
    if protected {
        rate *= 1.2;
    }

    let delta = (population as f64 * rate * damping(population)) as i64;
    let ceiling = ((capacity * 1.1) as i64).max(1);
    civ.population = (population as i64 + delta).clamp(1, ceiling) as u64;

    if delta < -NOTABLE_POPULATION_CHANGE {
        civ.log_event(now, EventKind::Population, format!("Population decreased significantly: {} lost", -delta));
    } else if delta > NOTABLE_POPULATION_CHANGE {
        civ.log_event(now, EventKind::Population, format!("Population increased significantly: +{}", delta));
    }

    consume_food(civ, protected);
}

fn consume_food(civ: &mut Civilization, protected: bool) {
    let mut efficiency = 1.0 - (civ.technology + 1.0).ln() / 20.0;
    if civ.age < 20 {
        efficiency *= 0.8;
    }
    if protected {
        efficiency *= 0.7;
    }

    let mut per_head = 0.5;
    if civ.population <= 10 {
        per_head *= 0.7;
    }

    let food = &mut civ.resources[ResourceKind::Food];
    let eaten = (civ.population as f64 * per_head * efficiency).min(*food).max(0.0);
    *food -= eaten;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CivId, Position};
    use crate::world::{GridWorld, TerrainKind};
    use rand::SeedableRng;

    fn civ_with(population: u64, food: f64, seed: u64) -> Civilization {
        let world = GridWorld::filled(40, 40, TerrainKind::Plains);
        let mut rng = SimRng::seed_from_u64(seed);
        let mut civ = Civilization::found(CivId(1), Position::new(20, 20), &world, 0, &mut rng);
        civ.population = population;
        civ.resources[ResourceKind::Food] = food;
        civ.technology = 20.0;
        civ.traits = Default::default();
        civ
    }

    #[test]
    fn test_size_factor_thresholds_descend() {
        assert_eq!(size_factor(600_000), 0.2);
        assert_eq!(size_factor(200_000), 0.4);
        assert_eq!(size_factor(60_000), 0.6);
        assert_eq!(size_factor(20_000), 0.8);
        assert_eq!(size_factor(5_000), 1.0);
    }

    #[test]
    fn test_abundant_food_grows_population() {
        let config = SimulationConfig::default();
        let mut rng = SimRng::seed_from_u64(1);
        let mut civ = civ_with(500, 10_000.0, 1);
        update_population(&mut civ, &config, 100, &mut rng);
        assert!(civ.population > 500);
    }

    #[test]
    fn test_starvation_shrinks_population() {
        let config = SimulationConfig::default();
        let mut rng = SimRng::seed_from_u64(2);
        let mut civ = civ_with(500, 0.0, 2);
        update_population(&mut civ, &config, 100, &mut rng);
        assert!(civ.population < 500);
        assert!(civ.population >= 1);
    }

    #[test]
    fn test_overcapacity_forces_decline() {
        let config = SimulationConfig::default();
        let mut rng = SimRng::seed_from_u64(3);
        let mut civ = civ_with(10_000, 1_000_000.0, 3);
        civ.territory = [civ.position].into_iter().collect();
        let capacity = carrying_capacity(&civ, &config);
        update_population(&mut civ, &config, 100, &mut rng);
        assert!(civ.population as f64 <= capacity * 1.1);
    }

    #[test]
    fn test_food_never_goes_negative() {
        let config = SimulationConfig::default();
        let mut rng = SimRng::seed_from_u64(4);
        let mut civ = civ_with(5_000, 3.0, 4);
        update_population(&mut civ, &config, 100, &mut rng);
        assert!(civ.food() >= 0.0);
    }
}
