//! Trained classifier artifact (JSON bundle)
//!
//! An artifact bundles the TF-IDF vectorizer, the logistic regression
//! weights and the numeric feature column order used at training time:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "model_id": "hybrid_tfidf_logreg",
//!   "vectorizer": { "vocabulary": {"cpf": 0}, "idf": [1.7], "ngram_range": [1, 2] },
//!   "model": { "coefficients": [2.1, 0.9, 0.8, 0.4, 0.3, 0.1, 0.0], "intercept": -1.2 },
//!   "feature_columns": ["has_cpf", "has_email", "has_phone", "has_rg", "has_zip", "injected_count"]
//! }
//! ```

use super::features::{validate_columns, FeatureColumn};
use super::logistic::LogisticRegression;
use super::tfidf::{TfidfVectorizer, VectorizerSpec};
use super::TextClassifier;
use crate::domain::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

/// Artifact format version this build reads
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// On-disk artifact document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDocument {
    pub format_version: u32,
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub vectorizer: VectorizerSpec,
    pub model: LogisticRegression,
    pub feature_columns: Vec<String>,
}

/// Summary of a loaded artifact for logs and explanations
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_id: String,
    pub fingerprint: String,
    pub created_at: Option<DateTime<Utc>>,
    pub vocabulary_size: usize,
    pub feature_columns: Vec<FeatureColumn>,
    pub source: Option<PathBuf>,
}

/// A validated, ready-to-score classifier artifact
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    model_id: String,
    created_at: Option<DateTime<Utc>>,
    fingerprint: String,
    source: Option<PathBuf>,
    vectorizer: TfidfVectorizer,
    model: LogisticRegression,
    feature_columns: Vec<FeatureColumn>,
}

impl ModelArtifact {
    /// Load and validate an artifact file
    ///
    /// # Errors
    ///
    /// - [`ModelError::NotFound`] / [`ModelError::Unreadable`] when the file
    ///   is absent or cannot be read
    /// - [`ModelError::InvalidFormat`] / [`ModelError::UnsupportedVersion`]
    ///   when the document cannot be decoded
    /// - [`ModelError::UnknownColumn`], [`ModelError::DimensionMismatch`] or
    ///   [`ModelError::SchemaMismatch`] when the document is inconsistent
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|e| ModelError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut artifact = Self::from_slice(&bytes)?;
        artifact.source = Some(path.to_path_buf());

        tracing::info!(
            model_id = %artifact.model_id,
            fingerprint = %artifact.fingerprint,
            path = %path.display(),
            vocabulary_size = artifact.vectorizer.vocabulary_size(),
            numeric_columns = artifact.feature_columns.len(),
            "Loaded classifier artifact"
        );

        Ok(artifact)
    }

    /// Decode and validate an artifact from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| ModelError::InvalidFormat(e.to_string()))?;

        let found = value
            .get("format_version")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| ModelError::InvalidFormat("missing format_version".to_string()))?;
        if found != u64::from(SUPPORTED_FORMAT_VERSION) {
            return Err(ModelError::UnsupportedVersion {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                supported: SUPPORTED_FORMAT_VERSION,
            });
        }

        let document: ArtifactDocument =
            serde_json::from_value(value).map_err(|e| ModelError::InvalidFormat(e.to_string()))?;

        Self::from_document(document, fingerprint(bytes))
    }

    /// Validate a decoded document
    pub fn from_document(
        document: ArtifactDocument,
        fingerprint: String,
    ) -> Result<Self, ModelError> {
        let feature_columns = document
            .feature_columns
            .iter()
            .map(|name| {
                name.parse::<FeatureColumn>()
                    .map_err(ModelError::UnknownColumn)
            })
            .collect::<Result<Vec<_>, _>>()?;
        validate_columns(&feature_columns)?;

        let vectorizer = TfidfVectorizer::from_spec(document.vectorizer)?;

        let expected = vectorizer.vocabulary_size() + feature_columns.len();
        if document.model.coefficients.len() != expected {
            return Err(ModelError::SchemaMismatch {
                expected,
                found: document.model.coefficients.len(),
            });
        }

        Ok(Self {
            model_id: document.model_id,
            created_at: document.created_at,
            fingerprint,
            source: None,
            vectorizer,
            model: document.model,
            feature_columns,
        })
    }

    /// Artifact identifier
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// SHA-256 of the artifact bytes, lowercase hex
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Summary for logs and explanations
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.model_id.clone(),
            fingerprint: self.fingerprint.clone(),
            created_at: self.created_at,
            vocabulary_size: self.vectorizer.vocabulary_size(),
            feature_columns: self.feature_columns.clone(),
            source: self.source.clone(),
        }
    }

    /// Positive-class probability, rejecting a numeric vector whose length
    /// differs from the artifact's feature columns
    pub fn try_predict_proba(
        &self,
        text: &str,
        numeric_features: &[f64],
    ) -> Result<f64, ModelError> {
        if numeric_features.len() != self.feature_columns.len() {
            return Err(ModelError::SchemaMismatch {
                expected: self.feature_columns.len(),
                found: numeric_features.len(),
            });
        }
        let row = self.vectorizer.transform(text);
        Ok(self
            .model
            .predict_proba(&row, self.vectorizer.vocabulary_size(), numeric_features))
    }
}

impl TextClassifier for ModelArtifact {
    fn predict_proba(&self, text: &str, numeric_features: &[f64]) -> f64 {
        debug_assert_eq!(numeric_features.len(), self.feature_columns.len());
        match self.try_predict_proba(text, numeric_features) {
            Ok(probability) => probability,
            Err(e) => {
                error!(
                    model_id = %self.model_id,
                    error = %e,
                    "Numeric features do not match artifact"
                );
                0.0
            }
        }
    }

    fn feature_columns(&self) -> &[FeatureColumn] {
        &self.feature_columns
    }

    fn name(&self) -> &str {
        &self.model_id
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
