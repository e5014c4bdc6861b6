//! Terrain and resource kinds

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Water,
    Plains,
    Mountain,
    Forest,
    Desert,
}

impl TerrainKind {
    /// Tiles a civilization may start on (no water, no mountains)
    pub fn is_settleable(&self) -> bool {
        matches!(self, TerrainKind::Plains | TerrainKind::Forest | TerrainKind::Desert)
    }

    /// Tiles a civilization may claim by expansion
    pub fn is_claimable(&self) -> bool {
        !matches!(self, TerrainKind::Water)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Food,
    Metal,
    Gold,
    Stone,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Food,
        ResourceKind::Metal,
        ResourceKind::Gold,
        ResourceKind::Stone,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Food => "food",
            ResourceKind::Metal => "metal",
            ResourceKind::Gold => "gold",
            ResourceKind::Stone => "stone",
        }
    }
}

/// One float per resource kind
///
/// Used both for tile abundance (0..1) and for civilization stockpiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTable([f64; 4]);

impl ResourceTable {
    pub const fn new(food: f64, metal: f64, gold: f64, stone: f64) -> Self {
        Self([food, metal, gold, stone])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        ResourceKind::ALL.iter().map(move |&kind| (kind, self.0[kind.index()]))
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Multiply every entry by `factor`, never going below zero
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.0 {
            *value = (*value * factor).max(0.0);
        }
    }

    pub fn all_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl Index<ResourceKind> for ResourceTable {
    type Output = f64;

    fn index(&self, kind: ResourceKind) -> &f64 {
        &self.0[kind.index()]
    }
}

impl IndexMut<ResourceKind> for ResourceTable {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        &mut self.0[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settleable_terrain() {
        assert!(TerrainKind::Plains.is_settleable());
        assert!(TerrainKind::Desert.is_settleable());
        assert!(!TerrainKind::Mountain.is_settleable());
        assert!(!TerrainKind::Water.is_settleable());
        assert!(TerrainKind::Mountain.is_claimable());
    }

    #[test]
    fn test_table_indexing_and_scale() {
        let mut table = ResourceTable::new(100.0, 50.0, 20.0, 50.0);
        table[ResourceKind::Gold] += 5.0;
        assert_eq!(table[ResourceKind::Gold], 25.0);
        table.scale(0.5);
        assert_eq!(table[ResourceKind::Food], 50.0);
        assert_eq!(table.total(), 112.5);
    }
}
