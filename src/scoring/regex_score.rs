//! Deterministic regex confidence score

use crate::detection::{Signal, SignalSet};
use serde::{Deserialize, Serialize};

/// Additive weight per signal
///
/// Each weight contributes independently when its flag is set; the sum
/// saturates at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    #[serde(default = "default_cpf")]
    pub cpf: f64,
    #[serde(default = "default_email")]
    pub email: f64,
    #[serde(default = "default_phone")]
    pub phone: f64,
    #[serde(default = "default_rg")]
    pub rg: f64,
    #[serde(default = "default_zip")]
    pub zip: f64,
    #[serde(default = "default_name_like")]
    pub name_like: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            cpf: default_cpf(),
            email: default_email(),
            phone: default_phone(),
            rg: default_rg(),
            zip: default_zip(),
            name_like: default_name_like(),
        }
    }
}

impl SignalWeights {
    /// Weight for one signal
    pub fn weight(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Cpf => self.cpf,
            Signal::Email => self.email,
            Signal::Phone => self.phone,
            Signal::Rg => self.rg,
            Signal::Zip => self.zip,
            Signal::NameLike => self.name_like,
        }
    }

    /// Every weight must be finite and within [0, 1] so the score stays monotonic
    pub fn validate(&self) -> Result<(), String> {
        for signal in SCORING_ORDER {
            let w = self.weight(signal);
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(format!(
                    "scoring.weights.{} must be within [0, 1], got {w}",
                    signal.name()
                ));
            }
        }
        Ok(())
    }
}

// Summation order; keeps single-signal scores bit-identical to their weight.
const SCORING_ORDER: [Signal; 6] = [
    Signal::Cpf,
    Signal::Email,
    Signal::Phone,
    Signal::Rg,
    Signal::Zip,
    Signal::NameLike,
];

/// Maps a signal set to a confidence score in [0, 1]
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexScorer {
    weights: SignalWeights,
}

impl RegexScorer {
    /// Create a scorer with the given weights
    pub fn new(weights: SignalWeights) -> Self {
        Self { weights }
    }

    /// Saturating additive score
    pub fn score(&self, signals: &SignalSet) -> f64 {
        let sum = SCORING_ORDER
            .iter()
            .filter(|s| signals.has(**s))
            .fold(0.0_f64, |acc, s| acc + self.weights.weight(*s));
        sum.min(1.0)
    }

    /// Per-signal contributions of the active flags, in summation order
    pub fn contributions(&self, signals: &SignalSet) -> Vec<(Signal, f64)> {
        SCORING_ORDER
            .iter()
            .filter(|s| signals.has(**s))
            .map(|s| (*s, self.weights.weight(*s)))
            .collect()
    }

    /// Weights in use
    pub fn weights(&self) -> &SignalWeights {
        &self.weights
    }
}

fn default_cpf() -> f64 {
    0.45
}

fn default_email() -> f64 {
    0.35
}

fn default_phone() -> f64 {
    0.25
}

fn default_rg() -> f64 {
    0.20
}

fn default_zip() -> f64 {
    0.10
}

fn default_name_like() -> f64 {
    0.05
}
