//! Scoring mode selection
//!
//! Decides which engine scores a run. Regex-only never touches the model.
//! Hybrid requires a loadable classifier. Auto uses the classifier when it
//! loads and otherwise degrades to regex-only with a warning.

use super::hybrid::{Decision, DecisionRule, HybridDecisionEngine, HybridPolicy};
use crate::classifier::{load_classifier, TextClassifier};
use crate::config::ScoringConfig;
use crate::domain::{ModelError, Result};
use crate::log_mode_fallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Requested scoring mode
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Hybrid when a classifier artifact loads, regex-only otherwise
    #[default]
    Auto,
    /// Regex signals only
    Regex,
    /// Classifier blended with regex signals; the artifact must load
    Hybrid,
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringMode::Auto => "auto",
            ScoringMode::Regex => "regex",
            ScoringMode::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

/// Cutoff for regex-only scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegexOnlyPolicy {
    pub threshold: f64,
}

impl RegexOnlyPolicy {
    /// Label by comparing the regex score to the threshold
    pub fn decide(&self, regex_score: f64) -> Decision {
        Decision {
            pred_label: u8::from(regex_score >= self.threshold),
            pred_score: regex_score,
            forced_by_regex: false,
            rule: DecisionRule::RegexOnly,
        }
    }
}

/// Resolved scoring engine for a run
#[derive(Clone)]
pub enum ScoringEngine {
    RegexOnly {
        policy: RegexOnlyPolicy,
    },
    Hybrid {
        classifier: Arc<dyn TextClassifier>,
        engine: HybridDecisionEngine,
    },
}

impl ScoringEngine {
    /// `"regex"` or `"hybrid"`
    pub fn mode_name(&self) -> &'static str {
        match self {
            ScoringEngine::RegexOnly { .. } => "regex",
            ScoringEngine::Hybrid { .. } => "hybrid",
        }
    }

    /// Whether a classifier participates
    pub fn is_hybrid(&self) -> bool {
        matches!(self, ScoringEngine::Hybrid { .. })
    }

    /// Replace the resolved alpha and/or threshold
    ///
    /// Alpha has no meaning for regex-only scoring and is ignored there.
    pub fn with_overrides(self, alpha: Option<f64>, threshold: Option<f64>) -> Self {
        match self {
            ScoringEngine::RegexOnly { mut policy } => {
                if let Some(t) = threshold {
                    policy.threshold = t;
                }
                ScoringEngine::RegexOnly { policy }
            }
            ScoringEngine::Hybrid { classifier, engine } => {
                let mut policy = *engine.policy();
                if let Some(a) = alpha {
                    policy.alpha = a;
                }
                if let Some(t) = threshold {
                    policy.threshold = t;
                }
                ScoringEngine::Hybrid {
                    classifier,
                    engine: HybridDecisionEngine::new(policy),
                }
            }
        }
    }
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringEngine::RegexOnly { policy } => f
                .debug_struct("RegexOnly")
                .field("policy", policy)
                .finish(),
            ScoringEngine::Hybrid { classifier, engine } => f
                .debug_struct("Hybrid")
                .field("classifier", &classifier.name())
                .field("policy", engine.policy())
                .finish(),
        }
    }
}

/// Resolves a [`ScoringMode`] into a [`ScoringEngine`]
#[derive(Debug, Clone)]
pub struct ModeSelector {
    regex: RegexOnlyPolicy,
    hybrid: HybridPolicy,
    auto: HybridPolicy,
    model_path: PathBuf,
}

impl ModeSelector {
    /// Create a selector from the scoring section and an artifact path
    pub fn new(scoring: &ScoringConfig, model_path: impl Into<PathBuf>) -> Self {
        Self {
            regex: scoring.regex.policy(),
            hybrid: scoring.hybrid.policy(),
            auto: scoring.auto.policy(),
            model_path: model_path.into(),
        }
    }

    /// Artifact path the selector loads from
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Resolve using the reference artifact loader
    pub fn resolve(&self, mode: ScoringMode) -> Result<ScoringEngine> {
        self.resolve_with(mode, load_classifier)
    }

    /// Resolve with a custom classifier loader
    ///
    /// # Errors
    ///
    /// - explicit hybrid: any loader error
    /// - auto: loader errors that are not recoverable (schema problems)
    pub fn resolve_with<F>(&self, mode: ScoringMode, loader: F) -> Result<ScoringEngine>
    where
        F: FnOnce(&Path) -> std::result::Result<Arc<dyn TextClassifier>, ModelError>,
    {
        match mode {
            ScoringMode::Regex => Ok(self.regex_only()),
            ScoringMode::Hybrid => {
                let classifier = loader(&self.model_path)?;
                Ok(ScoringEngine::Hybrid {
                    classifier,
                    engine: HybridDecisionEngine::new(self.hybrid),
                })
            }
            ScoringMode::Auto => match loader(&self.model_path) {
                Ok(classifier) => Ok(ScoringEngine::Hybrid {
                    classifier,
                    engine: HybridDecisionEngine::new(self.auto),
                }),
                Err(e) if e.is_recoverable() => {
                    log_mode_fallback!(self.model_path.display(), e);
                    Ok(self.regex_only())
                }
                Err(e) => Err(e.into()),
            },
        }
    }

    fn regex_only(&self) -> ScoringEngine {
        ScoringEngine::RegexOnly { policy: self.regex }
    }
}
