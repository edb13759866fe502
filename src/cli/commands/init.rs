//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "piiflag.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing PiiFlag configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        if let Some(parent) = Path::new(&self.output).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    println!("❌ Failed to create directory {}", parent.display());
                    println!("   Error: {e}");
                    return Ok(EXIT_FATAL);
                }
            }
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point model.path at a trained classifier artifact (optional)");
                println!("  2. Tune the [scoring.*] thresholds for your data");
                println!("  3. Validate configuration: piiflag validate-config");
                println!("  4. Score records: piiflag score -i records.csv -o preds.csv");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        r#"# PiiFlag Configuration File
# Hybrid PII flagging for free-text records
#
# Every setting has a default; delete what you do not need to change.
# Any key can be overridden with PIIFLAG_<SECTION>_<KEY>, for example
# PIIFLAG_SCORING_AUTO_THRESHOLD=0.3.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Record Source
# ============================================================================
[input]
# Column names are matched case-insensitively; the first one present wins
text_column_candidates = [
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
id_column_candidates = ["id", "protocolo", "numero", "número"]

# ============================================================================
# Signal Detection
# ============================================================================
[detection]
# Custom pattern library (built-in Brazilian patterns when unset)
# pattern_library = "patterns/br_pii_patterns.toml"

# ============================================================================
# Scoring
# ============================================================================
# Additive weights; the regex score is their sum, clipped to [0, 1]
[scoring.weights]
cpf = 0.45
email = 0.35
phone = 0.25
rg = 0.20
zip = 0.10
name_like = 0.05

# --mode regex, and auto mode when no classifier can be loaded
[scoring.regex]
threshold = 0.35

# --mode hybrid
[scoring.hybrid]
alpha = 0.70
threshold = 0.30
force_threshold = 0.35

# --mode auto with a classifier available
[scoring.auto]
alpha = 0.45
threshold = 0.25
force_threshold = 0.35

# ============================================================================
# Classifier Artifact
# ============================================================================
[model]
path = "artifacts/models/hybrid_tfidf_logreg.json"

# ============================================================================
# Batch Execution
# ============================================================================
[batch]
parallel = true
# Worker threads (0 = one per core)
workers = 0

# ============================================================================
# Output
# ============================================================================
[output]
# Sort rows by descending pred_score
sort_by_score = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log file path
local_path = "./logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
