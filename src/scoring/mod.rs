//! Scoring pipeline
//!
//! Text flows through the signal extractor into the [`RegexScorer`]; in
//! hybrid mode the classifier score and the regex score are fused by the
//! [`HybridDecisionEngine`]. The [`ModeSelector`] decides which of the two
//! engines a run uses, and the [`Scorer`] drives records through it.
//!
//! # Example
//!
//! ```
//! use piiflag::detection::SignalExtractor;
//! use piiflag::domain::{Record, RecordId};
//! use piiflag::scoring::{RegexOnlyPolicy, RegexScorer, Scorer, ScoringEngine};
//!
//! let engine = ScoringEngine::RegexOnly {
//!     policy: RegexOnlyPolicy { threshold: 0.35 },
//! };
//! let scorer = Scorer::new(SignalExtractor::new()?, RegexScorer::default(), engine)?;
//!
//! let record = Record::new(RecordId::from_index(42), "Contato: maria@x.com");
//! let result = scorer.score_record(&record);
//! assert_eq!(result.pred_label, 1);
//! assert_eq!(result.regex_score, 0.35);
//! # Ok::<(), piiflag::domain::PiiFlagError>(())
//! ```

pub mod hybrid;
pub mod mode;
pub mod regex_score;
pub mod scorer;

pub use hybrid::{decide, Decision, DecisionRule, HybridDecisionEngine, HybridPolicy};
pub use mode::{ModeSelector, RegexOnlyPolicy, ScoringEngine, ScoringMode};
pub use regex_score::{RegexScorer, SignalWeights};
pub use scorer::{Explanation, HybridResult, Scorer};
