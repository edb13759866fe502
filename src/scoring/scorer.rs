//! Per-record and batch scoring

use super::hybrid::{Decision, DecisionRule};
use super::mode::ScoringEngine;
use super::regex_score::RegexScorer;
use crate::classifier::{build_features, validate_columns};
use crate::detection::{Signal, SignalExtractor, SignalSet};
use crate::domain::{PiiFlagError, Record, RecordId, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Scored output for one record
///
/// Flat so that it maps one-to-one onto a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridResult {
    pub id: RecordId,
    pub pred_label: u8,
    pub pred_score: f64,
    /// Absent when scored regex-only
    #[serde(default)]
    pub ml_score: Option<f64>,
    pub regex_score: f64,
    pub forced_by_regex: bool,
    pub decided_by: DecisionRule,
    pub has_cpf: bool,
    pub has_email: bool,
    pub has_phone: bool,
    pub has_rg: bool,
    pub has_zip: bool,
    pub has_name_like: bool,
}

impl HybridResult {
    fn new(
        id: RecordId,
        decision: Decision,
        ml_score: Option<f64>,
        regex_score: f64,
        signals: &SignalSet,
    ) -> Self {
        Self {
            id,
            pred_label: decision.pred_label,
            pred_score: decision.pred_score,
            ml_score,
            regex_score,
            forced_by_regex: decision.forced_by_regex,
            decided_by: decision.rule,
            has_cpf: signals.has_cpf,
            has_email: signals.has_email,
            has_phone: signals.has_phone,
            has_rg: signals.has_rg,
            has_zip: signals.has_zip,
            has_name_like: signals.has_name_like,
        }
    }

    /// Presence flags as a signal set (counts are not persisted)
    pub fn signals(&self) -> SignalSet {
        SignalSet {
            has_email: self.has_email,
            has_cpf: self.has_cpf,
            has_phone: self.has_phone,
            has_rg: self.has_rg,
            has_zip: self.has_zip,
            has_name_like: self.has_name_like,
            ..SignalSet::default()
        }
    }

    /// Whether the record was labelled positive
    pub fn is_positive(&self) -> bool {
        self.pred_label == 1
    }
}

/// Full breakdown of one text's score
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub signals: SignalSet,
    pub contributions: Vec<(Signal, f64)>,
    pub regex_score: f64,
    pub ml_score: Option<f64>,
    pub decision: Decision,
}

/// Runs extraction, regex scoring and the decision for records
#[derive(Debug, Clone)]
pub struct Scorer {
    extractor: SignalExtractor,
    regex: RegexScorer,
    engine: ScoringEngine,
    parallel: bool,
    workers: usize,
}

impl Scorer {
    /// Create a scorer
    ///
    /// # Errors
    ///
    /// Returns a model error when the classifier's numeric feature schema
    /// cannot be supplied, before any record is scored.
    pub fn new(
        extractor: SignalExtractor,
        regex: RegexScorer,
        engine: ScoringEngine,
    ) -> Result<Self> {
        if let ScoringEngine::Hybrid { ref classifier, .. } = engine {
            let columns = classifier.feature_columns();
            validate_columns(columns)?;
            tracing::debug!(
                classifier = classifier.name(),
                numeric_columns = columns.len(),
                "Classifier feature schema validated"
            );
        }

        Ok(Self {
            extractor,
            regex,
            engine,
            parallel: true,
            workers: 0,
        })
    }

    /// Configure batch execution; `workers == 0` uses one thread per core
    pub fn with_batch(mut self, parallel: bool, workers: usize) -> Self {
        self.parallel = parallel;
        self.workers = workers;
        self
    }

    /// Engine in use
    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Signal extractor in use
    pub fn extractor(&self) -> &SignalExtractor {
        &self.extractor
    }

    /// Score one text with its full breakdown
    pub fn explain(&self, text: &str) -> Explanation {
        let signals = self.extractor.extract(text);
        let regex_score = self.regex.score(&signals);
        let (decision, ml_score) = self.decide(text, &signals, regex_score);
        Explanation {
            contributions: self.regex.contributions(&signals),
            signals,
            regex_score,
            ml_score,
            decision,
        }
    }

    /// Score one record; never fails
    pub fn score_record(&self, record: &Record) -> HybridResult {
        let signals = self.extractor.extract(record.text());
        let regex_score = self.regex.score(&signals);
        let (decision, ml_score) = self.decide(record.text(), &signals, regex_score);
        HybridResult::new(record.id().clone(), decision, ml_score, regex_score, &signals)
    }

    /// Score a batch, preserving input order
    ///
    /// # Errors
    ///
    /// [`PiiFlagError::EmptyBatch`] for an empty slice.
    pub fn score_batch(&self, records: &[Record]) -> Result<Vec<HybridResult>> {
        if records.is_empty() {
            return Err(PiiFlagError::EmptyBatch);
        }

        if !self.parallel {
            return Ok(records.iter().map(|r| self.score_record(r)).collect());
        }

        if self.workers == 0 {
            return Ok(records.par_iter().map(|r| self.score_record(r)).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| PiiFlagError::Other(format!("Failed to build worker pool: {e}")))?;
        Ok(pool.install(|| records.par_iter().map(|r| self.score_record(r)).collect()))
    }

    fn decide(&self, text: &str, signals: &SignalSet, regex_score: f64) -> (Decision, Option<f64>) {
        match &self.engine {
            ScoringEngine::RegexOnly { policy } => (policy.decide(regex_score), None),
            ScoringEngine::Hybrid { classifier, engine } => {
                let features = build_features(classifier.feature_columns(), signals);
                let ml_score = classifier.predict_proba(text, &features);
                (engine.decide(ml_score, regex_score), Some(ml_score))
            }
        }
    }
}
