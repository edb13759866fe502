//! Prediction reports
//!
//! Summarises a scored output file without ground truth: label counts,
//! score distribution, which signals drive positives, the highest scores
//! and the rows sitting near the decision threshold.

use crate::scoring::HybridResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of rows listed in the top and borderline sections
pub const DEFAULT_TOP: usize = 15;

/// Default centre of the borderline window
pub const DEFAULT_BORDERLINE_THRESHOLD: f64 = 0.35;

/// Half-width of the borderline window
pub const BORDERLINE_MARGIN: f64 = 0.05;

// Right-inclusive bucket edges; the first bucket starts just below zero.
const BUCKET_EDGES: [f64; 8] = [-0.001, 0.05, 0.15, 0.25, 0.35, 0.50, 0.75, 1.0];
const BUCKET_LABELS: [&str; 7] = [
    "<=0.05",
    "0.05-0.15",
    "0.15-0.25",
    "0.25-0.35",
    "0.35-0.50",
    "0.50-0.75",
    "0.75-1.0",
];

/// Report over a set of scored results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// When the report was built
    pub generated_at: DateTime<Utc>,

    /// Rows in the input
    pub total: usize,

    /// Rows per label
    pub label_counts: LabelCounts,

    /// `pred_score` distribution (absent for an empty input)
    pub score_stats: Option<ScoreStats>,

    /// Rows per score bucket, in bucket order
    pub buckets: Vec<BucketCount>,

    /// Positives carrying each identifier signal
    pub positives_by_signal: SignalPositives,

    /// Rows whose label was forced by the regex override condition
    pub forced_by_regex: usize,

    /// Rows that carry a classifier score
    pub ml_scored: usize,

    /// Highest-scoring rows
    pub top: Vec<ReportRow>,

    /// Rows near the decision threshold
    pub borderline: BorderlineWindow,
}

/// Label counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    pub positive: usize,
    pub negative: usize,
}

/// Descriptive statistics of `pred_score`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub mean: f64,
    /// Sample standard deviation (0 for a single row)
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

/// One score bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketCount {
    pub label: String,
    pub count: usize,
}

/// Signal flags among positives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPositives {
    pub total: usize,
    pub has_cpf: usize,
    pub has_email: usize,
    pub has_phone: usize,
}

/// Compact row for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: String,
    pub pred_score: f64,
    pub pred_label: u8,
}

/// Rows with `pred_score` in `[low, high)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderlineWindow {
    pub threshold: f64,
    pub low: f64,
    pub high: f64,
    /// Rows in the window before truncation to the listing size
    pub count: usize,
    pub rows: Vec<ReportRow>,
}

impl PredictionReport {
    /// Build a report; `top` bounds both listings
    pub fn from_results(results: &[HybridResult], top: usize, borderline_threshold: f64) -> Self {
        let positives: Vec<&HybridResult> = results.iter().filter(|r| r.is_positive()).collect();

        let label_counts = LabelCounts {
            positive: positives.len(),
            negative: results.len() - positives.len(),
        };

        let positives_by_signal = SignalPositives {
            total: positives.len(),
            has_cpf: positives.iter().filter(|r| r.has_cpf).count(),
            has_email: positives.iter().filter(|r| r.has_email).count(),
            has_phone: positives.iter().filter(|r| r.has_phone).count(),
        };

        let mut by_score: Vec<&HybridResult> = results.iter().collect();
        by_score.sort_by(|a, b| b.pred_score.total_cmp(&a.pred_score));

        let low = borderline_threshold - BORDERLINE_MARGIN;
        let high = borderline_threshold + BORDERLINE_MARGIN;
        let in_window: Vec<&&HybridResult> = by_score
            .iter()
            .filter(|r| r.pred_score >= low && r.pred_score < high)
            .collect();

        Self {
            generated_at: Utc::now(),
            total: results.len(),
            label_counts,
            score_stats: ScoreStats::from_scores(results.iter().map(|r| r.pred_score)),
            buckets: bucket_counts(results),
            positives_by_signal,
            forced_by_regex: results.iter().filter(|r| r.forced_by_regex).count(),
            ml_scored: results.iter().filter(|r| r.ml_score.is_some()).count(),
            top: by_score.iter().take(top).map(|r| ReportRow::from(*r)).collect(),
            borderline: BorderlineWindow {
                threshold: borderline_threshold,
                low,
                high,
                count: in_window.len(),
                rows: in_window.iter().take(top).map(|r| ReportRow::from(**r)).collect(),
            },
        }
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                     PII PREDICTION REPORT                     \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 OVERVIEW\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Rows:                 {}\n", self.total));
        output.push_str(&format!(
            "  pred_label = 1:       {}\n",
            self.label_counts.positive
        ));
        output.push_str(&format!(
            "  pred_label = 0:       {}\n",
            self.label_counts.negative
        ));
        output.push_str(&format!("  Forced by regex:      {}\n", self.forced_by_regex));
        output.push_str(&format!("  With classifier score: {}\n", self.ml_scored));
        output.push('\n');

        if let Some(stats) = self.score_stats {
            output.push_str("📈 SCORE STATISTICS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            output.push_str(&format!("  mean   {:.4}\n", stats.mean));
            output.push_str(&format!("  std    {:.4}\n", stats.std));
            output.push_str(&format!("  min    {:.4}\n", stats.min));
            output.push_str(&format!("  25%    {:.4}\n", stats.p25));
            output.push_str(&format!("  50%    {:.4}\n", stats.median));
            output.push_str(&format!("  75%    {:.4}\n", stats.p75));
            output.push_str(&format!("  max    {:.4}\n", stats.max));
            output.push('\n');
        }

        output.push_str("🪣 SCORE BUCKETS\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        for bucket in &self.buckets {
            output.push_str(&format!("  {:12} {:>8}\n", bucket.label, bucket.count));
        }
        output.push('\n');

        output.push_str("🔍 POSITIVES BY SIGNAL (pred_label = 1)\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        if self.positives_by_signal.total == 0 {
            output.push_str("  No positives at the current threshold.\n");
        } else {
            let p = &self.positives_by_signal;
            output.push_str(&format!("  positives   {:>8}\n", p.total));
            output.push_str(&format!("  has_cpf     {:>8}\n", p.has_cpf));
            output.push_str(&format!("  has_email   {:>8}\n", p.has_email));
            output.push_str(&format!("  has_phone   {:>8}\n", p.has_phone));
        }
        output.push('\n');

        output.push_str("🏆 TOP SCORES\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        push_rows(&mut output, &self.top);
        output.push('\n');

        output.push_str(&format!(
            "⚖️  BORDERLINE (score in [{:.2}, {:.2}), {} rows)\n",
            self.borderline.low, self.borderline.high, self.borderline.count
        ));
        output.push_str("───────────────────────────────────────────────────────────────\n");
        push_rows(&mut output, &self.borderline.rows);
        output.push('\n');

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&HybridResult> for ReportRow {
    fn from(result: &HybridResult) -> Self {
        Self {
            id: result.id.to_string(),
            pred_score: result.pred_score,
            pred_label: result.pred_label,
        }
    }
}

impl ScoreStats {
    /// Statistics over the scores, `None` when there are none
    pub fn from_scores(scores: impl Iterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = scores.collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len() as f64;
        let mean = sorted.iter().fold(0.0, |acc, s| acc + s) / n;
        let std = if sorted.len() > 1 {
            let var = sorted
                .iter()
                .map(|s| (s - mean).powi(2))
                .fold(0.0, |acc, v| acc + v)
                / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };

        Some(Self {
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.50),
            p75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

fn bucket_counts(results: &[HybridResult]) -> Vec<BucketCount> {
    let mut counts = [0usize; 7];
    for result in results {
        let score = result.pred_score;
        if let Some(i) = (0..BUCKET_LABELS.len())
            .find(|&i| score > BUCKET_EDGES[i] && score <= BUCKET_EDGES[i + 1])
        {
            counts[i] += 1;
        }
    }
    BUCKET_LABELS
        .iter()
        .zip(counts)
        .map(|(label, count)| BucketCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn push_rows(output: &mut String, rows: &[ReportRow]) {
    if rows.is_empty() {
        output.push_str("  (none)\n");
        return;
    }
    output.push_str(&format!("  {:<24} {:>10} {:>10}\n", "id", "pred_score", "pred_label"));
    for row in rows {
        output.push_str(&format!(
            "  {:<24} {:>10.4} {:>10}\n",
            row.id, row.pred_score, row.pred_label
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;
    use crate::scoring::DecisionRule;

    fn row(id: usize, score: f64, label: u8) -> HybridResult {
        HybridResult {
            id: RecordId::from_index(id),
            pred_label: label,
            pred_score: score,
            ml_score: None,
            regex_score: score,
            forced_by_regex: false,
            decided_by: DecisionRule::RegexOnly,
            has_cpf: false,
            has_email: false,
            has_phone: false,
            has_rg: false,
            has_zip: false,
            has_name_like: false,
        }
    }

    fn sample() -> Vec<HybridResult> {
        let mut results = vec![
            row(0, 0.0, 0),
            row(1, 0.05, 0),
            row(2, 0.10, 0),
            row(3, 0.25, 0),
            row(4, 0.30, 0),
            row(5, 0.35, 1),
            row(6, 0.80, 1),
            row(7, 1.0, 1),
        ];
        results[5].has_email = true;
        results[6].has_cpf = true;
        results[6].has_email = true;
        results[6].forced_by_regex = true;
        results
    }

    #[test]
    fn test_label_counts_and_signals() {
        let report = PredictionReport::from_results(&sample(), DEFAULT_TOP, 0.35);
        assert_eq!(report.total, 8);
        assert_eq!(
            report.label_counts,
            LabelCounts {
                positive: 3,
                negative: 5
            }
        );
        assert_eq!(report.positives_by_signal.has_email, 2);
        assert_eq!(report.positives_by_signal.has_cpf, 1);
        assert_eq!(report.positives_by_signal.has_phone, 0);
        assert_eq!(report.forced_by_regex, 1);
        assert_eq!(report.ml_scored, 0);
    }

    #[test]
    fn test_buckets_are_right_inclusive() {
        let report = PredictionReport::from_results(&sample(), DEFAULT_TOP, 0.35);
        let counts: Vec<usize> = report.buckets.iter().map(|b| b.count).collect();
        // upper edges are inclusive: 0.05, 0.25 and 0.35 stay in the lower bucket
        assert_eq!(counts, vec![2, 1, 1, 2, 0, 0, 2]);
        assert_eq!(report.buckets[0].label, "<=0.05");
    }

    #[test]
    fn test_top_sorted_descending_and_truncated() {
        let report = PredictionReport::from_results(&sample(), 3, 0.35);
        let scores: Vec<f64> = report.top.iter().map(|r| r.pred_score).collect();
        assert_eq!(scores, vec![1.0, 0.80, 0.35]);
        assert_eq!(report.top[0].id, "7");
    }

    #[test]
    fn test_borderline_window_half_open() {
        let report = PredictionReport::from_results(&sample(), DEFAULT_TOP, 0.35);
        assert_eq!(report.borderline.count, 2);
        let ids: Vec<&str> = report.borderline.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "4"]);
    }

    #[test]
    fn test_score_stats() {
        let stats = ScoreStats::from_scores([0.0, 0.5, 1.0].into_iter()).unwrap();
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert!((stats.std - 0.5).abs() < 1e-12);
        assert_eq!(stats.median, 0.5);
        assert_eq!(stats.p25, 0.25);
        assert_eq!(stats.max, 1.0);
        assert!(ScoreStats::from_scores(std::iter::empty()).is_none());
    }

    #[test]
    fn test_empty_report() {
        let report = PredictionReport::from_results(&[], DEFAULT_TOP, 0.35);
        assert_eq!(report.total, 0);
        assert!(report.score_stats.is_none());
        let output = report.format_console();
        assert!(output.contains("No positives at the current threshold."));
    }

    #[test]
    fn test_format_console() {
        let report = PredictionReport::from_results(&sample(), DEFAULT_TOP, 0.35);
        let output = report.format_console();
        assert!(output.contains("PII PREDICTION REPORT"));
        assert!(output.contains("Rows:                 8"));
        assert!(output.contains("BORDERLINE (score in [0.30, 0.40), 2 rows)"));
    }

    #[test]
    fn test_format_json() {
        let report = PredictionReport::from_results(&sample(), DEFAULT_TOP, 0.35);
        let json: serde_json::Value = serde_json::from_str(&report.format_json().unwrap()).unwrap();
        assert_eq!(json["total"], 8);
        assert_eq!(json["buckets"].as_array().unwrap().len(), 7);
    }
}
