//! Core type definitions used throughout the codebase

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Simulation tick counter (one tick is one simulated year)
pub type Tick = u64;

/// The single random source threaded through a simulation run
pub type SimRng = ChaCha8Rng;

/// Unique identifier for civilizations
///
/// Assigned from a monotonically increasing counter, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CivId(pub u32);

impl std::fmt::Display for CivId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Offsets of the 8-connected neighbourhood
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// The 8 surrounding positions (may fall outside the grid)
    pub fn neighbors(&self) -> impl Iterator<Item = Position> + '_ {
        NEIGHBOR_OFFSETS.iter().map(move |&(dx, dy)| self.offset(dx, dy))
    }

    pub fn chebyshev(&self, other: &Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn distance_squared(&self, other: &Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Serialize an ordered map as a list of `(key, value)` pairs.
///
/// JSON object keys must be strings, so maps keyed by positions or id pairs
/// go through this adapter.
pub mod as_pairs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S, K, V>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        K: Serialize,
        V: Serialize,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D, K, V>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        D: Deserializer<'de>,
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
    {
        let pairs: Vec<(K, V)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civ_id_ordering() {
        assert!(CivId(1) < CivId(2));
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let origin = Position::new(5, 5);
        let neighbors: Vec<_> = origin.neighbors().collect();
        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.iter().all(|n| n.chebyshev(&origin) == 1));
    }

    #[test]
    fn test_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert_eq!(a.distance_squared(&b), 25);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
        assert_eq!(a.chebyshev(&b), 4);
    }

    #[test]
    fn test_pairs_roundtrip_through_json() {
        use std::collections::BTreeMap;

        #[derive(Serialize, Deserialize)]
        struct Holder {
            #[serde(with = "as_pairs")]
            map: BTreeMap<Position, u32>,
        }

        let mut map = BTreeMap::new();
        map.insert(Position::new(1, 2), 7);
        let json = serde_json::to_string(&Holder { map }).unwrap();
        let back: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(back.map.get(&Position::new(1, 2)), Some(&7));
    }
}
