//! Resource gathering from owned tiles

use crate::civilization::entity::Civilization;
use crate::civilization::traits::Trait;
use crate::world::{ResourceKind, ResourceTable, WorldMap};

/// Civilizations younger than this get a gathering bonus and a food floor
const YOUNG_AGE: u32 = 10;

/// Collect one tick of resources from every owned tile; returns what was gathered
pub fn gather_resources(civ: &mut Civilization, world: &dyn WorldMap) -> ResourceTable {
    let young_bonus = if civ.age < YOUNG_AGE {
        f64::from(YOUNG_AGE - civ.age) / f64::from(YOUNG_AGE)
    } else {
        0.0
    };

    let base_rate = (civ.population as f64 / 100.0)
        * (civ.technology / 50.0)
        * (1.0 + young_bonus * 2.0);
    let tech_savvy = civ.has_trait(Trait::TechSavvy);

    let mut gathered = ResourceTable::default();
    for pos in &civ.territory {
        let Some(abundance) = world.resource_abundance(*pos) else {
            continue;
        };
        for (kind, amount) in abundance.iter() {
            let modifier = match kind {
                ResourceKind::Metal | ResourceKind::Stone if tech_savvy => 1.2,
                _ => 1.0,
            };
            gathered[kind] += base_rate * amount * modifier;
        }
    }

    if civ.age < YOUNG_AGE {
        let floor = civ.population as f64 * 0.6;
        if gathered[ResourceKind::Food] < floor {
            gathered[ResourceKind::Food] = floor;
        }
    }

    for (kind, amount) in gathered.iter() {
        civ.resources[kind] += amount;
    }
    gathered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CivId, Position, SimRng};
    use crate::world::{GridWorld, TerrainKind};
    use rand::SeedableRng;

    fn setup(terrain: TerrainKind) -> (Civilization, GridWorld) {
        let world = GridWorld::filled(30, 30, terrain);
        let plains = GridWorld::filled(30, 30, TerrainKind::Plains);
        let mut rng = SimRng::seed_from_u64(1);
        let mut civ = Civilization::found(CivId(1), Position::new(15, 15), &plains, 0, &mut rng);
        civ.traits = Default::default();
        civ.population = 1000;
        civ.technology = 50.0;
        (civ, world)
    }

    #[test]
    fn test_young_civ_gets_food_floor() {
        let (mut civ, world) = setup(TerrainKind::Water);
        civ.age = 1;
        let before = civ.food();
        let gathered = gather_resources(&mut civ, &world);
        assert!((gathered[ResourceKind::Food] - 600.0).abs() < 1e-9);
        assert!((civ.food() - before - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_mature_civ_gathers_only_from_land() {
        let (mut civ, world) = setup(TerrainKind::Water);
        civ.age = 50;
        let gathered = gather_resources(&mut civ, &world);
        assert_eq!(gathered.total(), 0.0);
    }

    #[test]
    fn test_tech_savvy_mines_more() {
        let (mut plain, world) = setup(TerrainKind::Mountain);
        plain.age = 50;
        let mut savvy = plain.clone();
        savvy.traits.insert(Trait::TechSavvy);

        let a = gather_resources(&mut plain, &world);
        let b = gather_resources(&mut savvy, &world);
        assert!((b[ResourceKind::Metal] - a[ResourceKind::Metal] * 1.2).abs() < 1e-6);
        assert!((b[ResourceKind::Food] - a[ResourceKind::Food]).abs() < 1e-9);
    }
}
