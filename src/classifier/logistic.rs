//! Logistic regression over a sparse text block and a dense numeric block

use serde::{Deserialize, Serialize};

/// Persisted linear model
///
/// `coefficients` covers the text columns first, then the numeric columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    /// Linear decision value `w·x + b`
    ///
    /// `text_width` is the number of text columns; numeric features start
    /// at that offset in `coefficients`.
    pub fn decision_function(
        &self,
        sparse_text: &[(usize, f64)],
        text_width: usize,
        numeric: &[f64],
    ) -> f64 {
        let text_part = sparse_text
            .iter()
            .map(|(idx, v)| self.coefficients[*idx] * v)
            .fold(0.0, |acc, x| acc + x);
        let numeric_part = self.coefficients[text_width..]
            .iter()
            .zip(numeric)
            .map(|(w, x)| w * x)
            .fold(0.0, |acc, x| acc + x);
        text_part + numeric_part + self.intercept
    }

    /// Positive-class probability
    pub fn predict_proba(
        &self,
        sparse_text: &[(usize, f64)],
        text_width: usize,
        numeric: &[f64],
    ) -> f64 {
        sigmoid(self.decision_function(sparse_text, text_width, numeric))
    }
}

/// Logistic sigmoid, stable for large |z|
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
