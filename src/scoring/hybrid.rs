//! Hybrid decision engine
//!
//! Fuses the classifier probability and the regex score into one final
//! score and label:
//!
//! 1. `final = alpha * ml_score + (1 - alpha) * regex_score`
//! 2. `label = final >= threshold`
//! 3. if `regex_score >= force_threshold` the label is forced to 1,
//!    regardless of step 2
//!
//! The override protects recall on obvious regex hits (a bare CPF or
//! email) that the classifier may under-score. Inputs are not range-checked
//! here; configuration validation keeps them within [0, 1].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Blend and cutoff parameters for hybrid scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridPolicy {
    /// Weight of the classifier score in the blend
    pub alpha: f64,
    /// Decision cutoff on the blended score
    pub threshold: f64,
    /// Regex score at or above which the label is forced to 1
    pub force_threshold: f64,
}

impl HybridPolicy {
    /// Override trigger of the reference design
    pub const DEFAULT_FORCE_THRESHOLD: f64 = 0.35;

    /// Policy with the default override trigger
    pub fn new(alpha: f64, threshold: f64) -> Self {
        Self {
            alpha,
            threshold,
            force_threshold: Self::DEFAULT_FORCE_THRESHOLD,
        }
    }
}

/// Which rule determined the final label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    /// Blended score compared against the threshold
    Threshold,
    /// Regex override turned a negative blended decision positive
    RegexOverride,
    /// Regex score compared against the regex-only threshold
    RegexOnly,
}

impl fmt::Display for DecisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionRule::Threshold => "threshold",
            DecisionRule::RegexOverride => "regex_override",
            DecisionRule::RegexOnly => "regex_only",
        };
        f.write_str(s)
    }
}

/// Outcome of one scoring decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Final label (0 or 1)
    pub pred_label: u8,
    /// Final score
    pub pred_score: f64,
    /// `regex_score >= force_threshold`, whether or not it changed the label
    pub forced_by_regex: bool,
    /// Rule that determined the label
    pub rule: DecisionRule,
}

/// Blend, threshold, then apply the regex override
///
/// `rule` is [`DecisionRule::RegexOverride`] only when the override changed
/// the outcome; `forced_by_regex` reports the override condition itself.
pub fn decide(
    ml_score: f64,
    regex_score: f64,
    alpha: f64,
    threshold: f64,
    force_threshold: f64,
) -> Decision {
    let final_score = alpha * ml_score + (1.0 - alpha) * regex_score;
    let base_label = u8::from(final_score >= threshold);
    let forced_by_regex = regex_score >= force_threshold;

    let (pred_label, rule) = if forced_by_regex && base_label == 0 {
        (1, DecisionRule::RegexOverride)
    } else if forced_by_regex {
        (1, DecisionRule::Threshold)
    } else {
        (base_label, DecisionRule::Threshold)
    };

    Decision {
        pred_label,
        pred_score: final_score,
        forced_by_regex,
        rule,
    }
}

/// Hybrid decision engine bound to one policy
#[derive(Debug, Clone, Copy)]
pub struct HybridDecisionEngine {
    policy: HybridPolicy,
}

impl HybridDecisionEngine {
    /// Create an engine for a policy
    pub fn new(policy: HybridPolicy) -> Self {
        Self { policy }
    }

    /// Decide for one record's sub-scores
    pub fn decide(&self, ml_score: f64, regex_score: f64) -> Decision {
        decide(
            ml_score,
            regex_score,
            self.policy.alpha,
            self.policy.threshold,
            self.policy.force_threshold,
        )
    }

    /// Policy in use
    pub fn policy(&self) -> &HybridPolicy {
        &self.policy
    }
}
