//! Explain command implementation
//!
//! Scores one text and prints every step of the decision: the signals
//! found, each weight they contribute, the regex score, the classifier
//! score when available and the rule that fixed the label.

use super::ScoringOptions;
use crate::cli::{exit_code_for, EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::config::load_config_or_default;
use crate::detection::Signal;
use crate::log_error_with_context;
use crate::scoring::{DecisionRule, Explanation, Scorer};
use clap::Args;

/// Arguments for the explain command
#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Text to score
    pub text: String,

    #[command(flatten)]
    pub scoring: ScoringOptions,

    /// Print the explanation as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExplainArgs {
    /// Execute the explain command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let scorer = match self.scoring.build_scorer(&config) {
            Ok(s) => s,
            Err(e) => {
                log_error_with_context!(&e, "Failed to build scorer");
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let explanation = scorer.explain(&self.text);

        if self.json {
            match serde_json::to_string_pretty(&explanation) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("❌ Failed to serialize explanation: {e}");
                    return Ok(EXIT_FATAL);
                }
            }
        } else {
            print!("{}", format_explanation(&scorer, &self.text, &explanation));
        }

        Ok(EXIT_OK)
    }
}

fn format_explanation(scorer: &Scorer, text: &str, explanation: &Explanation) -> String {
    let mut output = String::new();

    output.push_str(&format!("🔎 Engine: {:?}\n\n", scorer.engine()));

    output.push_str("Signals\n");
    output.push_str("───────────────────────────────────────────────────────────────\n");
    for signal in Signal::ALL {
        let present = explanation.signals.has(signal);
        let mark = if present { "✔" } else { "·" };
        let count = explanation
            .signals
            .count(signal)
            .map(|c| format!(" x{c}"))
            .unwrap_or_default();
        output.push_str(&format!("  {mark} {:<12}{count}\n", signal.flag_name()));
        if present {
            for m in scorer.extractor().matches(signal, text) {
                output.push_str(&format!("      \"{m}\"\n"));
            }
        }
    }
    output.push('\n');

    output.push_str("Regex score\n");
    output.push_str("───────────────────────────────────────────────────────────────\n");
    for (signal, weight) in &explanation.contributions {
        output.push_str(&format!("  + {:<12} {weight:.2}\n", signal.name()));
    }
    output.push_str(&format!("  = regex_score  {:.4}\n\n", explanation.regex_score));

    output.push_str("Decision\n");
    output.push_str("───────────────────────────────────────────────────────────────\n");
    if let Some(ml) = explanation.ml_score {
        output.push_str(&format!("  ml_score         {ml:.4}\n"));
    }
    let decision = &explanation.decision;
    output.push_str(&format!("  pred_score       {:.4}\n", decision.pred_score));
    output.push_str(&format!("  pred_label       {}\n", decision.pred_label));
    output.push_str(&format!("  forced_by_regex  {}\n", decision.forced_by_regex));
    let rule = match decision.rule {
        DecisionRule::Threshold => "blended score compared against the threshold",
        DecisionRule::RegexOverride => "regex override forced a positive label",
        DecisionRule::RegexOnly => "regex score compared against the regex-only threshold",
    };
    output.push_str(&format!("  decided_by       {} ({rule})\n", decision.rule));

    output
}
