//! World query surface
//!
//! The simulation only reads the world. Terrain generation lives behind
//! `GridWorld::generate`; anything implementing `WorldMap` can host a run.

pub mod grid;
pub mod terrain;

pub use grid::GridWorld;
pub use terrain::{ResourceKind, ResourceTable, TerrainKind};

use rand::Rng;

use crate::core::types::{Position, SimRng};

/// Minimum distance between a new settlement and an existing city
const SETTLEMENT_CITY_SPACING: f64 = 12.0;

/// Read-only terrain and resource lookups over a fixed grid
pub trait WorldMap {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    /// Terrain at `pos`, or `None` outside the grid
    fn terrain(&self, pos: Position) -> Option<TerrainKind>;

    /// Resource abundance at `pos`; `None` for water and out-of-bounds tiles
    fn resource_abundance(&self, pos: Position) -> Option<ResourceTable>;

    fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }

    fn dimensions(&self) -> (i32, i32) {
        (self.width(), self.height())
    }

    /// Pick a founding tile away from existing settlements
    ///
    /// Tries for open plains with plenty of land nearby and well clear of
    /// other cities, then relaxes the spacing, then accepts any plains tile,
    /// and finally falls back to the centre of the map.
    fn find_settlement_location(
        &self,
        cities: &[Position],
        territory: &[Position],
        rng: &mut SimRng,
    ) -> Position {
        let (w, h) = self.dimensions();
        let is_plains = |p: Position| self.terrain(p) == Some(TerrainKind::Plains);

        let too_close = |p: Position, city_spacing: f64, territory_spacing: Option<f64>| {
            cities.iter().any(|c| c.distance(&p) < city_spacing)
                || territory_spacing
                    .is_some_and(|spacing| territory.iter().any(|t| t.distance(&p) < spacing))
        };

        let margin_range = |margin: i32, extent: i32| {
            let lo = margin.min(extent / 2);
            let hi = (extent - margin).max(lo);
            (lo, hi.min(extent - 1))
        };

        let (x_lo, x_hi) = margin_range(5, w);
        let (y_lo, y_hi) = margin_range(5, h);
        for _ in 0..500 {
            let candidate = Position::new(rng.gen_range(x_lo..=x_hi), rng.gen_range(y_lo..=y_hi));
            if !is_plains(candidate) {
                continue;
            }

            let land_nearby = (-3..=3)
                .flat_map(|dx| (-3..=3).map(move |dy| (dx, dy)))
                .filter(|&(dx, dy)| is_plains(candidate.offset(dx, dy)))
                .count();

            if land_nearby >= 30
                && !too_close(candidate, SETTLEMENT_CITY_SPACING, Some(SETTLEMENT_CITY_SPACING * 0.5))
            {
                return candidate;
            }
        }

        let (x_lo, x_hi) = margin_range(2, w);
        let (y_lo, y_hi) = margin_range(2, h);
        for _ in 0..500 {
            let candidate = Position::new(rng.gen_range(x_lo..=x_hi), rng.gen_range(y_lo..=y_hi));
            if is_plains(candidate) && !too_close(candidate, SETTLEMENT_CITY_SPACING * 0.5, None) {
                return candidate;
            }
        }

        for _ in 0..100 {
            let candidate = Position::new(rng.gen_range(0..w), rng.gen_range(0..h));
            if is_plains(candidate) {
                return candidate;
            }
        }

        Position::new(w / 2, h / 2)
    }
}
