//! Score command implementation
//!
//! Loads records, resolves the scoring engine, scores the batch on the
//! rayon pool and writes the results.

use super::ScoringOptions;
use crate::cli::{exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::config::{load_config_or_default, PiiFlagConfig};
use crate::domain::{PiiFlagError, Result};
use crate::io::{load_records, write_results};
use crate::report::{PredictionReport, DEFAULT_BORDERLINE_THRESHOLD, DEFAULT_TOP};
use crate::{log_error_with_context, log_scoring_complete, log_scoring_start};
use clap::Args;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Arguments for the score command
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Input file (.csv or .jsonl)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file (.csv or .jsonl)
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub scoring: ScoringOptions,

    /// Score on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Print a prediction report after writing the output
    #[arg(long)]
    pub summary: bool,
}

/// Outcome of a scoring run
#[derive(Debug, Clone)]
pub struct ScoreSummary {
    pub run_id: Uuid,
    pub mode: &'static str,
    pub records: usize,
    pub positives: usize,
    pub forced_by_regex: usize,
    pub output: PathBuf,
    pub duration: Duration,
    pub report: Option<PredictionReport>,
}

impl ScoreArgs {
    /// Execute the score command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("score", run_id = %run_id);

        match self.run(&config, run_id).instrument(span).await {
            Ok(summary) => {
                println!(
                    "✅ Scored {} records ({} mode): {} flagged, {} forced by regex",
                    summary.records, summary.mode, summary.positives, summary.forced_by_regex
                );
                println!("   Output: {}", summary.output.display());
                if let Some(report) = summary.report {
                    print!("{}", report.format_console());
                }
                Ok(EXIT_OK)
            }
            Err(e) => {
                log_error_with_context!(&e, "Scoring failed");
                eprintln!("❌ {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    /// Run the scoring pipeline
    pub async fn run(&self, config: &PiiFlagConfig, run_id: Uuid) -> Result<ScoreSummary> {
        let start = Instant::now();

        let scorer = self
            .scoring
            .build_scorer(config)?
            .with_batch(config.batch.parallel && !self.sequential, config.batch.workers);
        let mode = scorer.engine().mode_name();

        let records = load_records(&self.input, &config.input)?;
        log_scoring_start!(mode, records.len());

        let results = tokio::task::spawn_blocking(move || scorer.score_batch(&records))
            .await
            .map_err(|e| PiiFlagError::Other(format!("Scoring task failed: {e}")))??;

        write_results(&self.output, &results, config.output.sort_by_score)?;

        let positives = results.iter().filter(|r| r.is_positive()).count();
        let duration = start.elapsed();
        log_scoring_complete!(results.len(), positives, duration);

        let report = self.summary.then(|| {
            PredictionReport::from_results(&results, DEFAULT_TOP, DEFAULT_BORDERLINE_THRESHOLD)
        });

        Ok(ScoreSummary {
            run_id,
            mode,
            records: results.len(),
            positives,
            forced_by_regex: results.iter().filter(|r| r.forced_by_regex).count(),
            output: self.output.clone(),
            duration,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_results;
    use crate::scoring::ScoringMode;
    use std::fs;
    use tempfile::TempDir;

    fn args(dir: &TempDir, mode: ScoringMode) -> ScoreArgs {
        ScoreArgs {
            input: dir.path().join("in.csv"),
            output: dir.path().join("out/preds.csv"),
            scoring: ScoringOptions {
                mode,
                model: Some(dir.path().join("missing-model.json")),
                alpha: None,
                threshold: None,
            },
            sequential: false,
            summary: true,
        }
    }

    #[tokio::test]
    async fn test_auto_without_model_scores_regex_only() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("in.csv"),
            "id,texto\n1,Bom dia\n2,Contato: maria@x.com\n3,fone (61) 99876-5432\n",
        )
        .unwrap();

        let summary = args(&dir, ScoringMode::Auto)
            .run(&PiiFlagConfig::default(), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(summary.mode, "regex");
        assert_eq!(summary.records, 3);
        assert_eq!(summary.positives, 1);
        assert!(summary.report.is_some());

        let written = read_results(dir.path().join("out/preds.csv")).unwrap();
        assert_eq!(written[0].id.as_str(), "2");
        assert!(written.iter().all(|r| r.ml_score.is_none()));
    }

    #[tokio::test]
    async fn test_explicit_hybrid_without_model_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("in.csv"), "texto\nBom dia\n").unwrap();

        let err = args(&dir, ScoringMode::Hybrid)
            .run(&PiiFlagConfig::default(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_empty_input_is_input_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("in.csv"), "texto\n").unwrap();

        let err = args(&dir, ScoringMode::Regex)
            .run(&PiiFlagConfig::default(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, PiiFlagError::EmptyBatch));
        assert!(!dir.path().join("out/preds.csv").exists());
    }

    #[tokio::test]
    async fn test_out_of_range_override_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("in.csv"), "texto\nBom dia\n").unwrap();
        let mut a = args(&dir, ScoringMode::Regex);
        a.scoring.threshold = Some(1.5);

        let err = a
            .run(&PiiFlagConfig::default(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, PiiFlagError::Configuration(_)));
    }
}
