//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the PiiFlag configuration file, its pattern library and the classifier
//! artifact it points at.

use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::classifier::ModelArtifact;
use crate::config::{load_config, PiiFlagConfig};
use crate::detection::SignalExtractor;
use crate::domain::ModelError;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        match SignalExtractor::from_config(&config.detection) {
            Ok(_) => {
                let source = config
                    .detection
                    .pattern_library
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in".to_string());
                println!("✅ Pattern library compiled ({source})");
            }
            Err(e) => {
                println!("❌ Pattern library is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        }

        let model_ok = check_model(&config);

        println!();
        print!("{}", format_summary(&config));
        println!();

        Ok(if model_ok { EXIT_OK } else { EXIT_CONFIG })
    }
}

/// Report the artifact status; false only when the artifact is unusable in every mode
fn check_model(config: &PiiFlagConfig) -> bool {
    match ModelArtifact::load(&config.model.path) {
        Ok(artifact) => {
            let info = artifact.info();
            println!(
                "✅ Classifier artifact loaded: {} (sha256 {})",
                info.model_id,
                &info.fingerprint[..12.min(info.fingerprint.len())]
            );
            true
        }
        Err(e @ ModelError::NotFound(_)) => {
            println!("⚠️  {e}");
            println!("   auto mode will fall back to regex-only scoring");
            true
        }
        Err(e) if e.is_recoverable() => {
            println!("⚠️  Classifier artifact cannot be used: {e}");
            println!("   auto mode will fall back to regex-only scoring");
            true
        }
        Err(e) => {
            println!("❌ Classifier artifact is inconsistent");
            println!("   Error: {e}");
            false
        }
    }
}

fn format_summary(config: &PiiFlagConfig) -> String {
    let scoring = &config.scoring;
    let w = &scoring.weights;
    let mut output = String::new();

    output.push_str("Configuration Summary:\n");
    output.push_str(&format!("  Log Level: {}\n", config.application.log_level));
    output.push_str(&format!(
        "  Text Columns: {:?}\n",
        config.input.text_column_candidates
    ));
    output.push_str(&format!(
        "  Weights: cpf={} email={} phone={} rg={} zip={} name_like={}\n",
        w.cpf, w.email, w.phone, w.rg, w.zip, w.name_like
    ));
    output.push_str(&format!(
        "  Regex Policy: threshold={}\n",
        scoring.regex.threshold
    ));
    output.push_str(&format!(
        "  Hybrid Policy: alpha={} threshold={} force_threshold={}\n",
        scoring.hybrid.alpha, scoring.hybrid.threshold, scoring.hybrid.force_threshold
    ));
    output.push_str(&format!(
        "  Auto Policy: alpha={} threshold={} force_threshold={}\n",
        scoring.auto.alpha, scoring.auto.threshold, scoring.auto.force_threshold
    ));
    output.push_str(&format!("  Model Path: {}\n", config.model.path.display()));
    output.push_str(&format!(
        "  Batch: parallel={} workers={}\n",
        config.batch.parallel, config.batch.workers
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let args = ValidateArgs {};
        let code = args.execute("/nonexistent/piiflag.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_valid_config_without_model_passes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("piiflag.toml");
        let model = dir.path().join("missing.json");
        fs::write(
            &path,
            format!("[model]\npath = {:?}\n", model.to_string_lossy()),
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(&path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn test_summary_lists_policies() {
        let summary = format_summary(&PiiFlagConfig::default());
        assert!(summary.contains("Regex Policy: threshold=0.35"));
        assert!(summary.contains("Hybrid Policy: alpha=0.7 threshold=0.3"));
        assert!(summary.contains("Auto Policy: alpha=0.45 threshold=0.25"));
    }
}
