//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod explain;
pub mod init;
pub mod report;
pub mod score;
pub mod validate;

use crate::config::PiiFlagConfig;
use crate::detection::SignalExtractor;
use crate::domain::{PiiFlagError, Result};
use crate::scoring::{ModeSelector, RegexScorer, Scorer, ScoringMode};
use clap::Args;
use std::path::PathBuf;

/// Scoring options shared by `score` and `explain`
#[derive(Args, Debug, Clone)]
pub struct ScoringOptions {
    /// Scoring mode
    #[arg(long, value_enum, default_value_t = ScoringMode::Auto)]
    pub mode: ScoringMode,

    /// Classifier artifact (overrides model.path)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Classifier weight in the hybrid blend (overrides the mode's policy)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Decision threshold (overrides the mode's policy)
    #[arg(long)]
    pub threshold: Option<f64>,
}

impl ScoringOptions {
    /// Resolve the engine and build a scorer
    ///
    /// The classifier artifact, if any, is loaded here, before any record
    /// is scored.
    pub fn build_scorer(&self, config: &PiiFlagConfig) -> Result<Scorer> {
        for (name, value) in [("--alpha", self.alpha), ("--threshold", self.threshold)] {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                    return Err(PiiFlagError::Configuration(format!(
                        "{name} must be within [0, 1], got {v}"
                    )));
                }
            }
        }

        let model_path = self
            .model
            .clone()
            .unwrap_or_else(|| config.model.path.clone());

        let engine = ModeSelector::new(&config.scoring, model_path)
            .resolve(self.mode)?
            .with_overrides(self.alpha, self.threshold);

        let extractor = SignalExtractor::from_config(&config.detection)?;
        let scorer = Scorer::new(extractor, RegexScorer::new(config.scoring.weights), engine)?;

        tracing::info!(
            requested_mode = %self.mode,
            engine = ?scorer.engine(),
            "Scoring engine resolved"
        );

        Ok(scorer)
    }
}
