//! Text classifier
//!
//! The hybrid engine treats the classifier as an opaque probability source:
//! text plus numeric signal features in, `P(contains PII)` out. The
//! reference implementation is a TF-IDF + logistic regression bundle loaded
//! from a JSON artifact ([`ModelArtifact`]).
//!
//! The numeric feature order is part of the trained artifact. Callers must
//! build feature vectors with [`build_features`] using the classifier's own
//! [`TextClassifier::feature_columns`].

pub mod artifact;
pub mod features;
pub mod logistic;
pub mod tfidf;

pub use artifact::{ArtifactDocument, ModelArtifact, ModelInfo, SUPPORTED_FORMAT_VERSION};
pub use features::{build_features, validate_columns, FeatureColumn, REFERENCE_FEATURE_COLUMNS};

use crate::domain::ModelError;
use std::path::Path;
use std::sync::Arc;

/// A probability model over text and numeric features
pub trait TextClassifier: Send + Sync {
    /// Positive-class probability in [0, 1]
    ///
    /// `numeric_features` is ordered as [`feature_columns`](Self::feature_columns).
    fn predict_proba(&self, text: &str, numeric_features: &[f64]) -> f64;

    /// Numeric feature columns, in the order the model was trained with
    fn feature_columns(&self) -> &[FeatureColumn];

    /// Identifier for logs
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Load the reference classifier artifact
pub fn load_classifier(path: &Path) -> Result<Arc<dyn TextClassifier>, ModelError> {
    Ok(Arc::new(ModelArtifact::load(path)?))
}
