//! Civilization traits and the rules for combining them

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::SimRng;

/// Most traits a civilization can hold after absorbing others
pub const MAX_TRAITS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Trait {
    Aggressive,
    TechSavvy,
    Religious,
    Weird,
    Peaceful,
    Expansionist,
    Isolationist,
    Trading,
}

impl Trait {
    pub const ALL: [Trait; 8] = [
        Trait::Aggressive,
        Trait::TechSavvy,
        Trait::Religious,
        Trait::Weird,
        Trait::Peaceful,
        Trait::Expansionist,
        Trait::Isolationist,
        Trait::Trading,
    ];

    /// The trait this one can never be held alongside
    pub fn opposite(&self) -> Option<Trait> {
        match self {
            Trait::Aggressive => Some(Trait::Peaceful),
            Trait::Peaceful => Some(Trait::Aggressive),
            Trait::Expansionist => Some(Trait::Isolationist),
            Trait::Isolationist => Some(Trait::Expansionist),
            _ => None,
        }
    }

    pub fn opposes(&self, other: Trait) -> bool {
        self.opposite() == Some(other)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Trait::Aggressive => "aggressive",
            Trait::TechSavvy => "tech-savvy",
            Trait::Religious => "religious",
            Trait::Weird => "weird",
            Trait::Peaceful => "peaceful",
            Trait::Expansionist => "expansionist",
            Trait::Isolationist => "isolationist",
            Trait::Trading => "trading",
        }
    }
}

impl std::fmt::Display for Trait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of traits, oldest first
///
/// Never holds duplicates or both members of an opposed pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitSet(Vec<Trait>);

impl TraitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw up to `count` compatible traits
    pub fn random(rng: &mut SimRng, count: usize) -> Self {
        let mut set = Self::new();
        for _ in 0..count {
            let candidates: Vec<Trait> = Trait::ALL
                .iter()
                .copied()
                .filter(|t| set.accepts(*t))
                .collect();
            match candidates.choose(rng) {
                Some(t) => {
                    set.0.push(*t);
                }
                None => break,
            }
        }
        set
    }

    pub fn contains(&self, t: Trait) -> bool {
        self.0.contains(&t)
    }

    /// Whether `t` could be added without breaking the set's rules
    pub fn accepts(&self, t: Trait) -> bool {
        !self.contains(t) && !self.0.iter().any(|held| held.opposes(t))
    }

    /// Add a trait; refuses duplicates and opposed traits
    pub fn insert(&mut self, t: Trait) -> bool {
        if !self.accepts(t) {
            return false;
        }
        self.0.push(t);
        true
    }

    /// Add a trait, dropping the oldest when over `MAX_TRAITS`
    pub fn adopt(&mut self, t: Trait) -> bool {
        if !self.insert(t) {
            return false;
        }
        while self.0.len() > MAX_TRAITS {
            self.0.remove(0);
        }
        true
    }

    /// Each of `other`'s traits is taken with probability `chance`
    pub fn blend_from(&mut self, other: &TraitSet, chance: f64, rng: &mut SimRng) -> Vec<Trait> {
        let mut adopted = Vec::new();
        for t in other.iter() {
            if self.accepts(t) && rng.gen::<f64>() < chance && self.adopt(t) {
                adopted.push(t);
            }
        }
        adopted
    }

    pub fn iter(&self) -> impl Iterator<Item = Trait> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if no opposed pair or duplicate is present
    pub fn is_consistent(&self) -> bool {
        self.0.iter().enumerate().all(|(i, a)| {
            self.0[i + 1..].iter().all(|b| a != b && !a.opposes(*b))
        })
    }
}

impl From<Vec<Trait>> for TraitSet {
    /// Builds a set from a list, silently skipping anything it would refuse
    fn from(traits: Vec<Trait>) -> Self {
        let mut set = Self::new();
        for t in traits {
            set.insert(t);
        }
        set
    }
}

impl std::fmt::Display for TraitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|t| t.name()).collect();
        write!(f, "{}", names.join(", "))
    }
}
