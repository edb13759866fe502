// PiiFlag - Hybrid PII flagging for free-text records
// Copyright (c) 2025 PiiFlag Contributors
// Licensed under the MIT License

//! # PiiFlag - Hybrid PII flagging
//!
//! PiiFlag flags free-text records (citizen requests, complaints, support
//! tickets) that likely contain personal data, by blending a deterministic
//! regex signal score with an optional trained text classifier.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** Brazilian PII signals (CPF, e-mail, phone, RG, CEP, names)
//! - **Scoring** the signals into a bounded regex confidence score
//! - **Classifying** text with a TF-IDF + logistic regression artifact
//! - **Deciding** labels with a regex safety net that can force a positive
//! - **Reporting** on scored batches
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`detection`] - Pattern library and signal extraction
//! - [`scoring`] - Regex scorer, hybrid decision engine and mode selection
//! - [`classifier`] - Trained classifier artifact and feature schema
//! - [`io`] - CSV / JSON Lines record sources and result sinks
//! - [`report`] - Batch prediction reports
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use piiflag::config::load_config_or_default;
//! use piiflag::detection::SignalExtractor;
//! use piiflag::io::{load_records, write_results};
//! use piiflag::scoring::{ModeSelector, RegexScorer, Scorer, ScoringMode};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("piiflag.toml")?;
//!
//!     // Auto mode falls back to regex-only when the artifact is missing
//!     let engine = ModeSelector::new(&config.scoring, config.model.path.clone())
//!         .resolve(ScoringMode::Auto)?;
//!     let scorer = Scorer::new(
//!         SignalExtractor::from_config(&config.detection)?,
//!         RegexScorer::new(config.scoring.weights),
//!         engine,
//!     )?;
//!
//!     let records = load_records("records.csv", &config.input)?;
//!     let results = scorer.score_batch(&records)?;
//!     write_results("preds.csv", &results, true)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], whose error type is
//! [`domain::PiiFlagError`]. Classifier artifact problems are reported as
//! [`domain::ModelError`]; some of them are recoverable in auto mode.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod detection;
pub mod domain;
pub mod io;
pub mod logging;
pub mod report;
pub mod scoring;
