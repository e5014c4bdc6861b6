//! Symmetric relation ledger
//!
//! One value per contacted pair, keyed by `(lower id, higher id)`. A missing
//! entry means the two civilizations have never met.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{as_pairs, CivId};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationLedger {
    #[serde(with = "as_pairs")]
    pairs: BTreeMap<(CivId, CivId), f64>,
}

fn key(a: CivId, b: CivId) -> (CivId, CivId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl RelationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, a: CivId, b: CivId) -> Option<f64> {
        self.pairs.get(&key(a, b)).copied()
    }

    /// Store a relation, clamped to [-1, 1]; returns the stored value
    pub fn set(&mut self, a: CivId, b: CivId, value: f64) -> f64 {
        let value = if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 };
        self.pairs.insert(key(a, b), value);
        value
    }

    /// Shift an existing relation; pairs that never met are left alone
    pub fn adjust(&mut self, a: CivId, b: CivId, delta: f64) -> Option<f64> {
        let current = self.get(a, b)?;
        Some(self.set(a, b, current + delta))
    }

    /// Every civilization `id` has met, with the current relation
    pub fn relations_of(&self, id: CivId) -> impl Iterator<Item = (CivId, f64)> + '_ {
        self.pairs.iter().filter_map(move |(&(a, b), &v)| {
            if a == id {
                Some((b, v))
            } else if b == id {
                Some((a, v))
            } else {
                None
            }
        })
    }

    /// Drop every pair involving `id`
    pub fn forget(&mut self, id: CivId) {
        self.pairs.retain(|&(a, b), _| a != id && b != id);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
