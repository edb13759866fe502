//! Pattern library for PII signal detection

use super::signals::Signal;
use crate::domain::{PiiFlagError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Signal this pattern feeds
    pub signal: String,
    /// Regex pattern
    pub pattern: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct SignalPattern {
    /// Entry name in the library
    pub name: String,
    /// Signal fed by this pattern
    pub signal: Signal,
    /// Compiled regex
    pub regex: Regex,
    /// Human-readable description
    pub description: Option<String>,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: HashMap<String, PatternDefinition>,
}

/// Pattern registry: exactly one compiled pattern per [`Signal`]
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<SignalPattern>,
}

impl PatternRegistry {
    /// Create a pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PiiFlagError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            PiiFlagError::Configuration(format!("Failed to parse pattern library TOML: {e}"))
        })?;

        let mut slots: [Option<SignalPattern>; 6] = Default::default();

        // Sorted for deterministic error messages
        let mut entries: Vec<_> = library.patterns.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, def) in entries {
            let signal: Signal = def.signal.parse().map_err(|e| {
                PiiFlagError::Configuration(format!("Invalid signal in pattern '{name}': {e}"))
            })?;

            let regex = Regex::new(&def.pattern).map_err(|e| {
                PiiFlagError::Configuration(format!(
                    "Invalid regex in pattern '{name}': {}: {e}",
                    def.pattern
                ))
            })?;

            let slot = &mut slots[signal.index()];
            if let Some(existing) = slot {
                return Err(PiiFlagError::Configuration(format!(
                    "Signal '{signal}' is defined twice (patterns '{}' and '{name}')",
                    existing.name
                )));
            }

            *slot = Some(SignalPattern {
                name,
                signal,
                regex,
                description: def.description,
            });
        }

        let missing: Vec<&str> = Signal::ALL
            .iter()
            .filter(|s| slots[s.index()].is_none())
            .map(|s| s.name())
            .collect();
        if !missing.is_empty() {
            return Err(PiiFlagError::Configuration(format!(
                "Pattern library is missing signals: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            patterns: slots.into_iter().flatten().collect(),
        })
    }

    /// Create a registry with the built-in Brazilian Portuguese patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../patterns/br_pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// The pattern for a signal
    pub fn pattern(&self, signal: Signal) -> &SignalPattern {
        &self.patterns[signal.index()]
    }

    /// All patterns, in signal order
    pub fn all_patterns(&self) -> &[SignalPattern] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn registry() -> PatternRegistry {
        PatternRegistry::default_patterns().unwrap()
    }

    #[test]
    fn test_load_default_patterns() {
        let registry = registry();
        assert_eq!(registry.all_patterns().len(), Signal::ALL.len());
        for signal in Signal::ALL {
            assert_eq!(registry.pattern(signal).signal, signal);
        }
    }

    #[test_case("maria@x.com" ; "short domain")]
    #[test_case("joao.silva+ouvidoria@prefeitura.sp.gov.br" ; "subdomains and plus")]
    #[test_case("ANA@EXEMPLO.COM" ; "uppercase")]
    fn test_email_pattern_matches(text: &str) {
        assert!(registry().pattern(Signal::Email).regex.is_match(text));
    }

    #[test_case("not-an-email" ; "no at sign")]
    #[test_case("maria@localhost" ; "no tld")]
    fn test_email_pattern_rejects(text: &str) {
        assert!(!registry().pattern(Signal::Email).regex.is_match(text));
    }

    #[test_case("123.456.789-10" ; "grouped")]
    #[test_case("12345678910" ; "bare digits")]
    #[test_case("123456789-10" ; "hyphen only")]
    fn test_cpf_pattern_matches(text: &str) {
        assert!(registry().pattern(Signal::Cpf).regex.is_match(text));
    }

    #[test_case("123.456" ; "too short")]
    #[test_case("1234567891011" ; "too long")]
    fn test_cpf_pattern_rejects(text: &str) {
        assert!(!registry().pattern(Signal::Cpf).regex.is_match(text));
    }

    #[test_case("(61) 99876-5432" ; "mobile with area code")]
    #[test_case("+55 11 91234-5678" ; "country code")]
    #[test_case("3322-1100" ; "landline without area code")]
    fn test_phone_pattern_matches(text: &str) {
        assert!(registry().pattern(Signal::Phone).regex.is_match(text));
    }

    #[test_case("12.345.678-9" ; "grouped")]
    #[test_case("1.234.567-X" ; "x check digit")]
    #[test_case("12345678x" ; "bare")]
    fn test_rg_pattern_matches(text: &str) {
        assert!(registry().pattern(Signal::Rg).regex.is_match(text));
    }

    #[test_case("70040-010" ; "hyphenated")]
    #[test_case("70040010" ; "bare")]
    fn test_zip_pattern_matches(text: &str) {
        assert!(registry().pattern(Signal::Zip).regex.is_match(text));
    }

    #[test_case("Maria Silva" ; "plain")]
    #[test_case("Érica Gonçalves" ; "accented")]
    fn test_name_pattern_matches(text: &str) {
        assert!(registry().pattern(Signal::NameLike).regex.is_match(text));
    }

    #[test]
    fn test_custom_library_missing_signal() {
        let toml = r#"
[patterns.email]
signal = "email"
pattern = '@'
"#;
        let err = PatternRegistry::from_toml(toml).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing signals"));
        assert!(message.contains("cpf"));
    }

    #[test]
    fn test_custom_library_duplicate_signal() {
        let mut toml = include_str!("../../patterns/br_pii_patterns.toml").to_string();
        toml.push_str("\n[patterns.email_alt]\nsignal = \"email\"\npattern = '@'\n");
        let err = PatternRegistry::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }

    #[test]
    fn test_custom_library_invalid_regex() {
        let toml = r#"
[patterns.email]
signal = "email"
pattern = '(unclosed'
"#;
        let err = PatternRegistry::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("Invalid regex in pattern 'email'"));
    }

    #[test]
    fn test_custom_library_unknown_signal() {
        let toml = r#"
[patterns.passport]
signal = "passport"
pattern = '[A-Z]{2}\d{6}'
"#;
        let err = PatternRegistry::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("Unknown signal"));
    }
}
