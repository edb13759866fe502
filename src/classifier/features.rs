//! Numeric feature columns fed to the classifier alongside the text

use crate::detection::{Signal, SignalSet};
use crate::domain::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// One numeric feature column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    HasCpf,
    HasEmail,
    HasPhone,
    HasRg,
    HasZip,
    HasNameLike,
    EmailCount,
    CpfCount,
    PhoneCount,
    /// Training-time augmentation counter; always 0.0 at inference
    InjectedCount,
}

/// Column order of the reference training pipeline
pub const REFERENCE_FEATURE_COLUMNS: [FeatureColumn; 6] = [
    FeatureColumn::HasCpf,
    FeatureColumn::HasEmail,
    FeatureColumn::HasPhone,
    FeatureColumn::HasRg,
    FeatureColumn::HasZip,
    FeatureColumn::InjectedCount,
];

impl FeatureColumn {
    /// Column name as persisted in model artifacts
    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::HasCpf => "has_cpf",
            FeatureColumn::HasEmail => "has_email",
            FeatureColumn::HasPhone => "has_phone",
            FeatureColumn::HasRg => "has_rg",
            FeatureColumn::HasZip => "has_zip",
            FeatureColumn::HasNameLike => "has_name_like",
            FeatureColumn::EmailCount => "email_count",
            FeatureColumn::CpfCount => "cpf_count",
            FeatureColumn::PhoneCount => "phone_count",
            FeatureColumn::InjectedCount => "injected_count",
        }
    }

    /// Feature value for a signal set
    pub fn value(&self, signals: &SignalSet) -> f64 {
        let flag = |s: Signal| if signals.has(s) { 1.0 } else { 0.0 };
        match self {
            FeatureColumn::HasCpf => flag(Signal::Cpf),
            FeatureColumn::HasEmail => flag(Signal::Email),
            FeatureColumn::HasPhone => flag(Signal::Phone),
            FeatureColumn::HasRg => flag(Signal::Rg),
            FeatureColumn::HasZip => flag(Signal::Zip),
            FeatureColumn::HasNameLike => flag(Signal::NameLike),
            FeatureColumn::EmailCount => signals.email_count as f64,
            FeatureColumn::CpfCount => signals.cpf_count as f64,
            FeatureColumn::PhoneCount => signals.phone_count as f64,
            FeatureColumn::InjectedCount => 0.0,
        }
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "has_cpf" => Ok(FeatureColumn::HasCpf),
            "has_email" => Ok(FeatureColumn::HasEmail),
            "has_phone" => Ok(FeatureColumn::HasPhone),
            "has_rg" => Ok(FeatureColumn::HasRg),
            "has_zip" => Ok(FeatureColumn::HasZip),
            "has_name_like" => Ok(FeatureColumn::HasNameLike),
            "email_count" => Ok(FeatureColumn::EmailCount),
            "cpf_count" => Ok(FeatureColumn::CpfCount),
            "phone_count" => Ok(FeatureColumn::PhoneCount),
            "injected_count" => Ok(FeatureColumn::InjectedCount),
            other => Err(other.to_string()),
        }
    }
}

/// Build the numeric feature vector in the given column order
pub fn build_features(columns: &[FeatureColumn], signals: &SignalSet) -> Vec<f64> {
    columns.iter().map(|c| c.value(signals)).collect()
}

/// Reject column lists that name a column more than once
pub fn validate_columns(columns: &[FeatureColumn]) -> Result<(), ModelError> {
    let distinct: HashSet<_> = columns.iter().collect();
    if distinct.len() != columns.len() {
        return Err(ModelError::SchemaMismatch {
            expected: columns.len(),
            found: distinct.len(),
        });
    }
    Ok(())
}
