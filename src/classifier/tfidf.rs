//! TF-IDF text vectorizer

use crate::domain::ModelError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Row normalisation applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// Persisted vectorizer parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerSpec {
    /// Term to column index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

// Words of two or more word characters.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Sparse TF-IDF transform over a fixed vocabulary
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    spec: VectorizerSpec,
    token_re: Regex,
}

impl TfidfVectorizer {
    /// Validate the persisted parameters and build a vectorizer
    pub fn from_spec(spec: VectorizerSpec) -> Result<Self, ModelError> {
        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::InvalidFormat(format!(
                "ngram_range must satisfy 1 <= min <= max, got ({min_n}, {max_n})"
            )));
        }

        let size = spec.vocabulary.len();
        if spec.idf.len() != size {
            return Err(ModelError::DimensionMismatch(format!(
                "idf has {} entries for a vocabulary of {size} terms",
                spec.idf.len()
            )));
        }
        if let Some((term, idx)) = spec.vocabulary.iter().find(|(_, idx)| **idx >= size) {
            return Err(ModelError::DimensionMismatch(format!(
                "vocabulary term '{term}' maps to column {idx}, outside 0..{size}"
            )));
        }
        let mut seen = HashSet::with_capacity(size);
        if let Some((term, idx)) = spec.vocabulary.iter().find(|(_, idx)| !seen.insert(**idx)) {
            return Err(ModelError::DimensionMismatch(format!(
                "vocabulary term '{term}' reuses column {idx}"
            )));
        }

        let token_re = Regex::new(TOKEN_PATTERN)
            .map_err(|e| ModelError::InvalidFormat(format!("token pattern: {e}")))?;

        Ok(Self { spec, token_re })
    }

    /// Number of text feature columns
    pub fn vocabulary_size(&self) -> usize {
        self.spec.vocabulary.len()
    }

    /// Persisted parameters
    pub fn spec(&self) -> &VectorizerSpec {
        &self.spec
    }

    /// Word tokens of a text
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.spec.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        self.token_re
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Terms of a text: every n-gram in range, joined by a single space
    pub fn terms(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.spec.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Sparse row as `(column, value)` pairs sorted by column
    ///
    /// Out-of-vocabulary terms are ignored; a text with no known term yields
    /// an empty row.
    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.terms(text) {
            if let Some(&idx) = self.spec.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut row: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, count)| {
                let tf = if self.spec.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    count
                };
                (idx, tf * self.spec.idf[idx])
            })
            .collect();
        row.sort_by_key(|(idx, _)| *idx);

        if self.spec.norm == Norm::L2 {
            let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, v) in row.iter_mut() {
                    *v /= norm;
                }
            }
        }

        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(terms: &[&str], ngram_range: (usize, usize)) -> VectorizerSpec {
        VectorizerSpec {
            vocabulary: terms
                .iter()
                .enumerate()
                .map(|(i, t)| (t.to_string(), i))
                .collect(),
            idf: vec![1.0; terms.len()],
            ngram_range,
            lowercase: true,
            sublinear_tf: false,
            norm: Norm::L2,
        }
    }

    #[test]
    fn test_tokenize_drops_single_chars_and_lowercases() {
        let v = TfidfVectorizer::from_spec(spec(&[], (1, 1))).unwrap();
        assert_eq!(v.tokenize("Meu CPF é 123"), vec!["meu", "cpf", "123"]);
    }

    #[test]
    fn test_terms_include_bigrams() {
        let v = TfidfVectorizer::from_spec(spec(&[], (1, 2))).unwrap();
        assert_eq!(
            v.terms("meu cpf anexo"),
            vec!["meu", "cpf", "anexo", "meu cpf", "cpf anexo"]
        );
    }

    #[test]
    fn test_transform_l2_normalises() {
        let v = TfidfVectorizer::from_spec(spec(&["cpf", "email"], (1, 1))).unwrap();
        let row = v.transform("cpf email");
        assert_eq!(row.len(), 2);
        let expected = 1.0 / 2.0_f64.sqrt();
        assert!((row[0].1 - expected).abs() < 1e-12);
        assert!((row[1].1 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_terms_yield_empty_row() {
        let v = TfidfVectorizer::from_spec(spec(&["cpf"], (1, 1))).unwrap();
        assert!(v.transform("nada relevante aqui").is_empty());
        assert!(v.transform("").is_empty());
    }

    #[test]
    fn test_sublinear_tf() {
        let mut s = spec(&["cpf"], (1, 1));
        s.sublinear_tf = true;
        s.norm = Norm::None;
        let v = TfidfVectorizer::from_spec(s).unwrap();
        let row = v.transform("cpf cpf cpf");
        assert!((row[0].1 - (1.0 + 3.0_f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_idf_length_mismatch_rejected() {
        let mut s = spec(&["cpf", "email"], (1, 1));
        s.idf.pop();
        let err = TfidfVectorizer::from_spec(s).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch(_)));
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let mut s = spec(&["cpf", "email"], (1, 1));
        s.vocabulary.insert("email".to_string(), 0);
        let err = TfidfVectorizer::from_spec(s).unwrap_err();
        assert!(
            matches!(err, ModelError::DimensionMismatch(ref m) if m.contains("reuses column 0"))
        );
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let mut s = spec(&["cpf"], (1, 1));
        s.vocabulary.insert("email".to_string(), 7);
        s.idf.push(1.0);
        assert!(TfidfVectorizer::from_spec(s).is_err());
    }

    #[test]
    fn test_bad_ngram_range_rejected() {
        let err = TfidfVectorizer::from_spec(spec(&[], (2, 1))).unwrap_err();
        assert!(matches!(err, ModelError::InvalidFormat(_)));
    }
}
