//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PiiFlagConfig;
use crate::domain::errors::PiiFlagError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PiiFlagConfig
/// 4. Applies environment variable overrides (PIIFLAG_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use piiflag::config::loader::load_config;
///
/// let config = load_config("piiflag.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PiiFlagConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PiiFlagError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PiiFlagError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PiiFlagConfig = toml::from_str(&contents)
        .map_err(|e| PiiFlagError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(&mut config)?;
    Ok(config)
}

/// Loads configuration, falling back to built-in defaults when the file is absent
///
/// Only a missing file triggers the fallback. A file that exists but fails
/// to parse or validate is still an error. Environment overrides apply in
/// both cases.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<PiiFlagConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        config_path = %path.display(),
        "Configuration file not found, using built-in defaults"
    );
    let mut config = PiiFlagConfig::default();
    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut PiiFlagConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        PiiFlagError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PiiFlagError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        if idx > 0 {
            result.push('\n');
        }

        // Don't process env vars in comments
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(PiiFlagError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Reads and parses an override variable; unset means no override
fn env_value<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            PiiFlagError::Configuration(format!("Invalid value for {name}: '{raw}'"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using PIIFLAG_* prefix
///
/// Environment variables follow the pattern: PIIFLAG_<SECTION>_<KEY>
/// For example: PIIFLAG_SCORING_HYBRID_ALPHA, PIIFLAG_MODEL_PATH
fn apply_env_overrides(config: &mut PiiFlagConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_value::<String>("PIIFLAG_APPLICATION_LOG_LEVEL")? {
        config.application.log_level = val;
    }

    // Detection overrides
    if let Some(val) = env_value::<String>("PIIFLAG_DETECTION_PATTERN_LIBRARY")? {
        config.detection.pattern_library = Some(val.into());
    }

    // Scoring overrides
    if let Some(val) = env_value("PIIFLAG_SCORING_REGEX_THRESHOLD")? {
        config.scoring.regex.threshold = val;
    }
    if let Some(val) = env_value("PIIFLAG_SCORING_HYBRID_ALPHA")? {
        config.scoring.hybrid.alpha = val;
    }
    if let Some(val) = env_value("PIIFLAG_SCORING_HYBRID_THRESHOLD")? {
        config.scoring.hybrid.threshold = val;
    }
    if let Some(val) = env_value("PIIFLAG_SCORING_HYBRID_FORCE_THRESHOLD")? {
        config.scoring.hybrid.force_threshold = val;
    }
    if let Some(val) = env_value("PIIFLAG_SCORING_AUTO_ALPHA")? {
        config.scoring.auto.alpha = val;
    }
    if let Some(val) = env_value("PIIFLAG_SCORING_AUTO_THRESHOLD")? {
        config.scoring.auto.threshold = val;
    }
    if let Some(val) = env_value("PIIFLAG_SCORING_AUTO_FORCE_THRESHOLD")? {
        config.scoring.auto.force_threshold = val;
    }

    // Model overrides
    if let Some(val) = env_value::<String>("PIIFLAG_MODEL_PATH")? {
        config.model.path = val.into();
    }

    // Batch overrides
    if let Some(val) = env_value("PIIFLAG_BATCH_PARALLEL")? {
        config.batch.parallel = val;
    }
    if let Some(val) = env_value("PIIFLAG_BATCH_WORKERS")? {
        config.batch.workers = val;
    }

    // Output overrides
    if let Some(val) = env_value("PIIFLAG_OUTPUT_SORT_BY_SCORE")? {
        config.output.sort_by_score = val;
    }

    // Logging overrides
    if let Some(val) = env_value("PIIFLAG_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_value::<String>("PIIFLAG_LOGGING_LOCAL_PATH")? {
        config.logging.local_path = val;
    }
    if let Some(val) = env_value::<String>("PIIFLAG_LOGGING_LOCAL_ROTATION")? {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PIIFLAG_TEST_MODEL_DIR", "/srv/models");
        let input = "path = \"${PIIFLAG_TEST_MODEL_DIR}/model.json\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "path = \"/srv/models/model.json\"");
        std::env::remove_var("PIIFLAG_TEST_MODEL_DIR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PIIFLAG_TEST_MISSING_VAR");
        let input = "path = \"${PIIFLAG_TEST_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# path = \"${PIIFLAG_TEST_NEVER_SET}\"\nalpha = 0.5";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_or_default_missing_file() {
        let config = load_config_or_default("nonexistent-piiflag.toml").unwrap();
        assert_eq!(config.scoring.regex.threshold, 0.35);
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[scoring.hybrid]
alpha = 0.8
threshold = 0.4

[model]
path = "models/custom.json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.scoring.hybrid.alpha, 0.8);
        assert_eq!(config.scoring.hybrid.threshold, 0.4);
        assert_eq!(config.scoring.hybrid.force_threshold, 0.35);
        assert_eq!(config.model.path, std::path::PathBuf::from("models/custom.json"));
    }

    #[test]
    fn test_load_config_invalid_policy() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[scoring.auto]\nthreshold = 2.0\n")
            .unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("scoring.auto.threshold"));
    }
}
