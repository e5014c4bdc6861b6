//! Rectangular tile grid
//!
//! A small seeded terrain painter: scattered water, then mountain, forest and
//! desert clusters stamped onto plains. Each land tile gets a resource
//! abundance profile keyed to its terrain.

use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::types::{Position, SimRng};
use crate::world::terrain::{ResourceTable, TerrainKind};
use crate::world::WorldMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridWorld {
    width: i32,
    height: i32,
    terrain: Vec<TerrainKind>,
    resources: Vec<Option<ResourceTable>>,
}

impl GridWorld {
    /// Generate a world from a seed
    pub fn generate(width: i32, height: i32, seed: u64) -> Self {
        let mut rng = SimRng::seed_from_u64(seed);
        let cells = (width * height).max(0) as usize;

        let terrain: Vec<TerrainKind> = (0..cells)
            .map(|_| if rng.gen::<f64>() < 0.3 { TerrainKind::Water } else { TerrainKind::Plains })
            .collect();

        let mut world = Self { width, height, terrain, resources: Vec::new() };
        let area = (width * height) as f64;

        world.stamp_clusters(&mut rng, (area * 0.01) as usize, 2, 0.7, TerrainKind::Mountain);
        world.stamp_clusters(&mut rng, (area * 0.03) as usize, 3, 0.6, TerrainKind::Forest);
        world.stamp_clusters(&mut rng, (area * 0.02) as usize, 5, 0.7, TerrainKind::Desert);

        world.place_resources(&mut rng);
        tracing::debug!("Generated {}x{} world from seed {}", width, height, seed);
        world
    }

    /// Build a world from an explicit terrain layout (row-major, `y * width + x`)
    pub fn from_terrain(width: i32, height: i32, terrain: Vec<TerrainKind>, seed: u64) -> Self {
        assert_eq!(terrain.len(), (width * height) as usize, "terrain layout size mismatch");
        let mut world = Self { width, height, terrain, resources: Vec::new() };
        world.place_resources(&mut SimRng::seed_from_u64(seed));
        world
    }

    /// A world made of a single terrain kind
    pub fn filled(width: i32, height: i32, kind: TerrainKind) -> Self {
        Self::from_terrain(width, height, vec![kind; (width * height) as usize], 0)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.is_valid_position(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    fn stamp_clusters(&mut self, rng: &mut SimRng, count: usize, radius: i32, density: f64, kind: TerrainKind) {
        if self.width <= 10 || self.height <= 10 {
            return;
        }

        for _ in 0..count {
            let centre = Position::new(rng.gen_range(5..=self.width - 5), rng.gen_range(5..=self.height - 5));
            if self.terrain(centre) != Some(TerrainKind::Plains) {
                continue;
            }
            if let Some(i) = self.index(centre) {
                self.terrain[i] = kind;
            }

            for dx in -radius..=radius {
                for dy in -radius..=radius {
                    let pos = centre.offset(dx, dy);
                    if let Some(i) = self.index(pos) {
                        if rng.gen::<f64>() < density && self.terrain[i] == TerrainKind::Plains {
                            self.terrain[i] = kind;
                        }
                    }
                }
            }
        }
    }

    fn place_resources(&mut self, rng: &mut SimRng) {
        self.resources = self
            .terrain
            .iter()
            .map(|kind| abundance_for(*kind, rng))
            .collect();
    }
}

fn abundance_for(kind: TerrainKind, rng: &mut SimRng) -> Option<ResourceTable> {
    let table = match kind {
        TerrainKind::Water => return None,
        TerrainKind::Mountain => ResourceTable::new(
            rng.gen_range(0.0..0.2),
            rng.gen_range(0.5..1.0),
            rng.gen_range(0.0..0.2),
            rng.gen_range(0.5..1.0),
        ),
        TerrainKind::Forest => ResourceTable::new(
            rng.gen_range(0.7..1.0),
            rng.gen_range(0.2..0.5),
            rng.gen_range(0.2..0.5),
            rng.gen_range(0.2..0.5),
        ),
        TerrainKind::Desert => ResourceTable::new(
            rng.gen_range(0.0..0.1),
            rng.gen_range(0.2..0.4),
            rng.gen_range(0.5..0.9),
            rng.gen_range(0.2..0.4),
        ),
        TerrainKind::Plains => ResourceTable::new(
            rng.gen_range(0.3..0.6),
            rng.gen_range(0.3..0.6),
            rng.gen_range(0.3..0.6),
            rng.gen_range(0.3..0.6),
        ),
    };
    Some(table)
}

impl WorldMap for GridWorld {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn terrain(&self, pos: Position) -> Option<TerrainKind> {
        self.index(pos).map(|i| self.terrain[i])
    }

    fn resource_abundance(&self, pos: Position) -> Option<ResourceTable> {
        self.index(pos).and_then(|i| self.resources[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::terrain::ResourceKind;

    #[test]
    fn test_generation_is_deterministic() {
        let a = GridWorld::generate(40, 30, 99);
        let b = GridWorld::generate(40, 30, 99);
        assert_eq!(a.terrain, b.terrain);
    }

    #[test]
    fn test_generated_world_has_mixed_terrain() {
        let world = GridWorld::generate(60, 60, 1);
        let water = world.terrain.iter().filter(|t| **t == TerrainKind::Water).count();
        let land = world.terrain.len() - water;
        assert!(water > 0);
        assert!(land > water);
    }

    #[test]
    fn test_water_has_no_resources() {
        let world = GridWorld::filled(12, 12, TerrainKind::Water);
        assert!(world.resource_abundance(Position::new(3, 3)).is_none());
    }

    #[test]
    fn test_mountains_rich_in_metal() {
        let world = GridWorld::filled(12, 12, TerrainKind::Mountain);
        let table = world.resource_abundance(Position::new(3, 3)).unwrap();
        assert!(table[ResourceKind::Metal] >= 0.5);
        assert!(table[ResourceKind::Food] < 0.2);
    }

    #[test]
    fn test_out_of_bounds_lookups() {
        let world = GridWorld::filled(12, 12, TerrainKind::Plains);
        assert!(world.terrain(Position::new(-1, 0)).is_none());
        assert!(world.terrain(Position::new(12, 0)).is_none());
        assert!(!world.is_valid_position(Position::new(0, 12)));
    }
}
