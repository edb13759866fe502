//! Signal definitions and the signal extractor

use super::patterns::PatternRegistry;
use crate::config::DetectionConfig;
use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A pattern-based PII indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Email address
    Email,
    /// CPF-like national ID
    Cpf,
    /// Brazilian phone number
    Phone,
    /// RG-like ID
    Rg,
    /// CEP-like postal code
    Zip,
    /// Two or more consecutive capitalised words
    NameLike,
}

impl Signal {
    /// All signals, in extraction order
    pub const ALL: [Signal; 6] = [
        Signal::Email,
        Signal::Cpf,
        Signal::Phone,
        Signal::Rg,
        Signal::Zip,
        Signal::NameLike,
    ];

    /// Short signal name as used in pattern libraries
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Email => "email",
            Signal::Cpf => "cpf",
            Signal::Phone => "phone",
            Signal::Rg => "rg",
            Signal::Zip => "zip",
            Signal::NameLike => "name_like",
        }
    }

    /// Presence flag name (`has_<signal>`)
    pub fn flag_name(&self) -> &'static str {
        match self {
            Signal::Email => "has_email",
            Signal::Cpf => "has_cpf",
            Signal::Phone => "has_phone",
            Signal::Rg => "has_rg",
            Signal::Zip => "has_zip",
            Signal::NameLike => "has_name_like",
        }
    }

    /// Whether raw match counts are tracked for this signal
    pub fn is_counted(&self) -> bool {
        matches!(self, Signal::Email | Signal::Cpf | Signal::Phone)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Signal::Email => 0,
            Signal::Cpf => 1,
            Signal::Phone => 2,
            Signal::Rg => 3,
            Signal::Zip => 4,
            Signal::NameLike => 5,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Signal::Email),
            "cpf" => Ok(Signal::Cpf),
            "phone" => Ok(Signal::Phone),
            "rg" => Ok(Signal::Rg),
            "zip" | "cep" => Ok(Signal::Zip),
            "name_like" | "name" => Ok(Signal::NameLike),
            other => Err(format!("Unknown signal: {other}")),
        }
    }
}

/// Signals extracted from one text
///
/// Derived purely from the text and recomputed on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub has_email: bool,
    pub has_cpf: bool,
    pub has_phone: bool,
    pub has_rg: bool,
    pub has_zip: bool,
    pub has_name_like: bool,
    pub email_count: usize,
    pub cpf_count: usize,
    pub phone_count: usize,
}

impl SignalSet {
    /// Presence flag for a signal
    pub fn has(&self, signal: Signal) -> bool {
        match signal {
            Signal::Email => self.has_email,
            Signal::Cpf => self.has_cpf,
            Signal::Phone => self.has_phone,
            Signal::Rg => self.has_rg,
            Signal::Zip => self.has_zip,
            Signal::NameLike => self.has_name_like,
        }
    }

    /// Match count for counted signals, `None` for the others
    pub fn count(&self, signal: Signal) -> Option<usize> {
        match signal {
            Signal::Email => Some(self.email_count),
            Signal::Cpf => Some(self.cpf_count),
            Signal::Phone => Some(self.phone_count),
            _ => None,
        }
    }

    /// Set a presence flag
    pub fn set(&mut self, signal: Signal, present: bool) {
        match signal {
            Signal::Email => self.has_email = present,
            Signal::Cpf => self.has_cpf = present,
            Signal::Phone => self.has_phone = present,
            Signal::Rg => self.has_rg = present,
            Signal::Zip => self.has_zip = present,
            Signal::NameLike => self.has_name_like = present,
        }
    }

    /// Builder-style variant of [`set`](Self::set)
    pub fn with(mut self, signal: Signal) -> Self {
        self.set(signal, true);
        self
    }

    /// Signals whose flag is set, in extraction order
    pub fn active(&self) -> Vec<Signal> {
        Signal::ALL.into_iter().filter(|s| self.has(*s)).collect()
    }

    /// True when no flag is set
    pub fn is_empty(&self) -> bool {
        Signal::ALL.iter().all(|s| !self.has(*s))
    }
}

/// Scans text for pattern-based PII indicators
///
/// Pure and deterministic; the compiled pattern registry is shared and
/// read-only, so one extractor can serve many threads.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    registry: Arc<PatternRegistry>,
}

impl SignalExtractor {
    /// Create an extractor with the built-in pattern library
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(PatternRegistry::default_patterns()?))
    }

    /// Create an extractor with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Create an extractor from the detection configuration
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        match config.pattern_library {
            Some(ref path) => {
                tracing::info!(pattern_library = %path.display(), "Loading custom pattern library");
                Ok(Self::with_registry(PatternRegistry::from_file(path)?))
            }
            None => Self::new(),
        }
    }

    /// Extract the signal set for a text
    ///
    /// Never fails; an empty text yields an all-false, all-zero set.
    pub fn extract(&self, text: &str) -> SignalSet {
        let mut signals = SignalSet::default();
        if text.is_empty() {
            return signals;
        }

        for signal in Signal::ALL {
            let regex = &self.registry.pattern(signal).regex;
            if signal.is_counted() {
                let count = regex.find_iter(text).count();
                signals.set(signal, count > 0);
                match signal {
                    Signal::Email => signals.email_count = count,
                    Signal::Cpf => signals.cpf_count = count,
                    Signal::Phone => signals.phone_count = count,
                    _ => {}
                }
            } else {
                signals.set(signal, regex.is_match(text));
            }
        }

        signals
    }

    /// Matched substrings for one signal, for explanations
    pub fn matches<'t>(&self, signal: Signal, text: &'t str) -> Vec<&'t str> {
        self.registry
            .pattern(signal)
            .regex
            .find_iter(text)
            .map(|m| m.as_str())
            .collect()
    }

    /// The registry backing this extractor
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SignalExtractor {
        SignalExtractor::new().unwrap()
    }

    #[test]
    fn test_empty_text_yields_no_signals() {
        let signals = extractor().extract("");
        assert_eq!(signals, SignalSet::default());
        assert!(signals.is_empty());
    }

    #[test]
    fn test_email_only() {
        let signals = extractor().extract("Contato: maria@x.com");
        assert!(signals.has_email);
        assert_eq!(signals.email_count, 1);
        assert!(!signals.has_cpf);
        assert!(!signals.has_phone);
        assert!(!signals.has_rg);
        assert!(!signals.has_zip);
        assert!(!signals.has_name_like);
        assert_eq!(signals.active(), vec![Signal::Email]);
    }

    #[test]
    fn test_email_is_case_insensitive() {
        let signals = extractor().extract("ESCREVA PARA JOAO.SILVA@EXEMPLO.GOV.BR");
        assert!(signals.has_email);
    }

    #[test]
    fn test_plain_complaint_has_no_signals() {
        let signals = extractor().extract("Bom dia, gostaria de relatar um problema na rua.");
        assert!(signals.is_empty());
        assert_eq!(signals.email_count + signals.cpf_count + signals.phone_count, 0);
    }

    #[test]
    fn test_cpf_and_email() {
        let signals = extractor().extract("Meu CPF é 123.456.789-10 e email joao@exemplo.com.br");
        assert!(signals.has_cpf);
        assert!(signals.has_email);
        assert_eq!(signals.cpf_count, 1);
    }

    #[test]
    fn test_counts_are_non_overlapping_totals() {
        let signals = extractor().extract("a@b.com, c@d.org e e@f.net; CPFs 11122233344 e 555.666.777-88");
        assert_eq!(signals.email_count, 3);
        assert_eq!(signals.cpf_count, 2);
    }

    #[test]
    fn test_name_like_is_case_sensitive() {
        assert!(extractor().extract("falei com Maria Conceição ontem").has_name_like);
        assert!(!extractor().extract("falei com maria conceição ontem").has_name_like);
        assert!(!extractor().extract("MARIA CONCEIÇÃO").has_name_like);
    }

    #[test]
    fn test_uncounted_signals_have_no_count() {
        let signals = extractor().extract("CEP 01310-100");
        assert!(signals.has_zip);
        assert_eq!(signals.count(Signal::Zip), None);
        assert_eq!(signals.count(Signal::Email), Some(0));
    }

    #[test]
    fn test_matches_returns_substrings() {
        let ex = extractor();
        let found = ex.matches(Signal::Email, "fale com ana@prefeitura.sp.gov.br hoje");
        assert_eq!(found, vec!["ana@prefeitura.sp.gov.br"]);
    }

    #[test]
    fn test_signal_set_builder() {
        let set = SignalSet::default().with(Signal::Cpf).with(Signal::Zip);
        assert!(set.has(Signal::Cpf));
        assert!(set.has(Signal::Zip));
        assert_eq!(set.active(), vec![Signal::Cpf, Signal::Zip]);
    }

    #[test]
    fn test_signal_from_str() {
        assert_eq!("EMAIL".parse::<Signal>().unwrap(), Signal::Email);
        assert_eq!("cep".parse::<Signal>().unwrap(), Signal::Zip);
        assert_eq!("name_like".parse::<Signal>().unwrap(), Signal::NameLike);
        assert!("passport".parse::<Signal>().is_err());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let ex = extractor();
        let text = "Sr. João Pereira, tel (11) 98765-4321, CEP 01001-000";
        assert_eq!(ex.extract(text), ex.extract(text));
    }
}
