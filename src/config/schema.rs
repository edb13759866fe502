//! Configuration schema types
//!
//! This module defines the configuration structure for PiiFlag. Every
//! section has defaults, so an empty file (or no file at all) is valid.

use crate::scoring::{HybridPolicy, RegexOnlyPolicy, SignalWeights};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main PiiFlag configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PiiFlagConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Record source settings
    #[serde(default)]
    pub input: InputConfig,

    /// Signal detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Scoring weights and per-entry-point policies
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Classifier artifact settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Batch execution settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Output sink settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PiiFlagConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.input.validate()?;
        self.detection.validate()?;
        self.scoring.validate()?;
        self.batch.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Record source configuration
///
/// Column names are matched case-insensitively after trimming, in the
/// order listed; the first candidate present wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Candidate names for the text column
    #[serde(default = "default_text_column_candidates")]
    pub text_column_candidates: Vec<String>,

    /// Candidate names for the id column
    #[serde(default = "default_id_column_candidates")]
    pub id_column_candidates: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            text_column_candidates: default_text_column_candidates(),
            id_column_candidates: default_id_column_candidates(),
        }
    }
}

impl InputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.text_column_candidates.is_empty() {
            return Err("input.text_column_candidates cannot be empty".to_string());
        }
        if self
            .text_column_candidates
            .iter()
            .chain(self.id_column_candidates.iter())
            .any(|c| c.trim().is_empty())
        {
            return Err("input column candidates cannot contain blank names".to_string());
        }
        Ok(())
    }
}

/// Signal detection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Path to a custom pattern library TOML file (built-in library if unset)
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,
}

impl DetectionConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(format!(
                    "Pattern library file not found: {}",
                    path.display()
                ));
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(format!(
                    "Pattern library must be a TOML file: {}",
                    path.display()
                ));
            }
        }
        Ok(())
    }
}

/// Scoring configuration
///
/// The regex-only, explicit hybrid and auto entry points carry independent
/// policies; their defaults intentionally differ.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Additive regex signal weights
    #[serde(default)]
    pub weights: SignalWeights,

    /// Regex-only policy (also used when auto mode falls back)
    #[serde(default)]
    pub regex: RegexModeConfig,

    /// Policy for explicitly requested hybrid mode
    #[serde(default)]
    pub hybrid: HybridModeConfig,

    /// Policy for auto mode when a classifier is available
    #[serde(default)]
    pub auto: AutoModeConfig,
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        validate_unit("scoring.regex.threshold", self.regex.threshold)?;
        validate_policy("scoring.hybrid", &self.hybrid.policy())?;
        validate_policy("scoring.auto", &self.auto.policy())?;
        Ok(())
    }
}

/// `[scoring.regex]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegexModeConfig {
    /// Decision cutoff on the regex score
    #[serde(default = "default_regex_threshold")]
    pub threshold: f64,
}

impl Default for RegexModeConfig {
    fn default() -> Self {
        Self {
            threshold: default_regex_threshold(),
        }
    }
}

impl RegexModeConfig {
    /// The regex-only policy described by this section
    pub fn policy(&self) -> RegexOnlyPolicy {
        RegexOnlyPolicy {
            threshold: self.threshold,
        }
    }
}

/// `[scoring.hybrid]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridModeConfig {
    /// Weight of the classifier score in the blend
    #[serde(default = "default_hybrid_alpha")]
    pub alpha: f64,

    /// Decision cutoff on the blended score
    #[serde(default = "default_hybrid_threshold")]
    pub threshold: f64,

    /// Regex score at or above which the label is forced to 1
    #[serde(default = "default_force_threshold")]
    pub force_threshold: f64,
}

impl Default for HybridModeConfig {
    fn default() -> Self {
        Self {
            alpha: default_hybrid_alpha(),
            threshold: default_hybrid_threshold(),
            force_threshold: default_force_threshold(),
        }
    }
}

impl HybridModeConfig {
    /// The hybrid policy described by this section
    pub fn policy(&self) -> HybridPolicy {
        HybridPolicy {
            alpha: self.alpha,
            threshold: self.threshold,
            force_threshold: self.force_threshold,
        }
    }
}

/// `[scoring.auto]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoModeConfig {
    /// Weight of the classifier score in the blend
    #[serde(default = "default_auto_alpha")]
    pub alpha: f64,

    /// Decision cutoff on the blended score
    #[serde(default = "default_auto_threshold")]
    pub threshold: f64,

    /// Regex score at or above which the label is forced to 1
    #[serde(default = "default_force_threshold")]
    pub force_threshold: f64,
}

impl Default for AutoModeConfig {
    fn default() -> Self {
        Self {
            alpha: default_auto_alpha(),
            threshold: default_auto_threshold(),
            force_threshold: default_force_threshold(),
        }
    }
}

impl AutoModeConfig {
    /// The hybrid policy used by auto mode when a classifier loads
    pub fn policy(&self) -> HybridPolicy {
        HybridPolicy {
            alpha: self.alpha,
            threshold: self.threshold,
            force_threshold: self.force_threshold,
        }
    }
}

/// Classifier artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the trained classifier artifact (JSON bundle)
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

/// Batch execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Score records on the rayon thread pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Worker threads (0 = one per core)
    #[serde(default)]
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            workers: 0,
        }
    }
}

impl BatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.workers > 512 {
            return Err(format!(
                "batch.workers must be <= 512, got {}",
                self.workers
            ));
        }
        Ok(())
    }
}

/// Output sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Sort written results by descending pred_score
    #[serde(default = "default_true")]
    pub sort_by_score: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sort_by_score: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_unit(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(format!("{name} must be within [0, 1], got {value}"));
    }
    Ok(())
}

fn validate_policy(section: &str, policy: &HybridPolicy) -> Result<(), String> {
    validate_unit(&format!("{section}.alpha"), policy.alpha)?;
    validate_unit(&format!("{section}.threshold"), policy.threshold)?;
    validate_unit(&format!("{section}.force_threshold"), policy.force_threshold)?;
    Ok(())
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_text_column_candidates() -> Vec<String> {
    [
        "texto mascarado",
        "texto",
        "mensagem",
        "pedido",
        "descricao",
        "descrição",
        "conteudo",
        "conteúdo",
        "manifestacao",
        "manifestação",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_id_column_candidates() -> Vec<String> {
    ["id", "protocolo", "numero", "número"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_regex_threshold() -> f64 {
    0.35
}

fn default_hybrid_alpha() -> f64 {
    0.70
}

fn default_hybrid_threshold() -> f64 {
    0.30
}

fn default_auto_alpha() -> f64 {
    0.45
}

fn default_auto_threshold() -> f64 {
    0.25
}

fn default_force_threshold() -> f64 {
    0.35
}

fn default_model_path() -> PathBuf {
    PathBuf::from("artifacts/models/hybrid_tfidf_logreg.json")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
