//! Belief systems: six weighted values and a stance toward foreigners

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::civilization::naming;
use crate::core::types::SimRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeliefValue {
    Peace,
    War,
    Knowledge,
    Tradition,
    Wealth,
    Spirituality,
}

impl BeliefValue {
    pub const ALL: [BeliefValue; 6] = [
        BeliefValue::Peace,
        BeliefValue::War,
        BeliefValue::Knowledge,
        BeliefValue::Tradition,
        BeliefValue::Wealth,
        BeliefValue::Spirituality,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            BeliefValue::Peace => "peace",
            BeliefValue::War => "war",
            BeliefValue::Knowledge => "knowledge",
            BeliefValue::Tradition => "tradition",
            BeliefValue::Wealth => "wealth",
            BeliefValue::Spirituality => "spirituality",
        }
    }
}

/// How a belief system treats foreign beliefs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForeignStance {
    Open,
    Neutral,
    Hostile,
    Convert,
}

impl ForeignStance {
    const CHOICES: [ForeignStance; 4] = [
        ForeignStance::Open,
        ForeignStance::Neutral,
        ForeignStance::Hostile,
        ForeignStance::Convert,
    ];
    const WEIGHTS: [f64; 4] = [0.25, 0.35, 0.25, 0.15];

    pub fn random(rng: &mut SimRng) -> Self {
        match WeightedIndex::new(Self::WEIGHTS) {
            Ok(dist) => Self::CHOICES[dist.sample(rng)],
            Err(_) => ForeignStance::Neutral,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ForeignStance::Open => "open",
            ForeignStance::Neutral => "neutral",
            ForeignStance::Hostile => "hostile",
            ForeignStance::Convert => "convert",
        }
    }
}

/// Affinity between two stances in [-0.6, 0.6]
///
/// Hostility counts against, openness counts for.
pub fn stance_affinity(a: ForeignStance, b: ForeignStance) -> f64 {
    use ForeignStance::*;

    let mut affinity = 0.0;
    match (a, b) {
        (Hostile, Hostile) => affinity -= 0.6,
        (Hostile, _) | (_, Hostile) => affinity -= 0.4,
        _ => {}
    }
    match (a, b) {
        (Open, Open) => affinity += 0.6,
        (Open, _) | (_, Open) => affinity += 0.3,
        _ => {}
    }
    affinity
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeliefSystem {
    pub name: String,
    /// Indexed by `BeliefValue`; always sums to 1
    pub values: [f64; 6],
    pub foreign_stance: ForeignStance,
}

impl BeliefSystem {
    pub fn generate(rng: &mut SimRng) -> Self {
        let name = naming::belief_name(rng);
        let mut values = [0.0; 6];
        for v in &mut values {
            *v = rng.gen_range(0.0..1.0);
        }
        let mut belief = Self {
            name,
            values,
            foreign_stance: ForeignStance::random(rng),
        };
        belief.normalize();
        belief
    }

    pub fn value(&self, v: BeliefValue) -> f64 {
        self.values[v.index()]
    }

    /// Rescale values to sum to 1; a degenerate set becomes uniform
    pub fn normalize(&mut self) {
        let total: f64 = self.values.iter().sum();
        if total.is_finite() && total > f64::EPSILON {
            for v in &mut self.values {
                *v /= total;
            }
        } else {
            self.values = [1.0 / 6.0; 6];
        }
    }

    /// `1 - mean |a_i - b_i|`, symmetric, in [0, 1]
    pub fn similarity(&self, other: &BeliefSystem) -> f64 {
        let diff: f64 = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
        1.0 - diff / self.values.len() as f64
    }

    /// Stance-aware compatibility in [-1, 1]
    ///
    /// Starts from the stance affinity, then subtracts for value differences.
    /// Peace and war weigh double, and a stark split on either (one side above
    /// 0.7, the other below 0.3) costs a flat 0.4.
    pub fn compatibility(&self, other: &BeliefSystem) -> f64 {
        let mut compat = stance_affinity(self.foreign_stance, other.foreign_stance);

        for v in BeliefValue::ALL {
            let (a, b) = (self.value(v), other.value(v));
            let diff = (a - b).abs();
            match v {
                BeliefValue::Peace | BeliefValue::War => {
                    if (a > 0.7 && b < 0.3) || (a < 0.3 && b > 0.7) {
                        compat -= 0.4;
                    } else {
                        compat -= diff * 0.2;
                    }
                }
                _ => compat -= diff * 0.1,
            }
        }

        compat.clamp(-1.0, 1.0)
    }

    pub fn is_hostile(&self) -> bool {
        self.foreign_stance == ForeignStance::Hostile
    }

    pub fn is_open(&self) -> bool {
        self.foreign_stance == ForeignStance::Open
    }
}
