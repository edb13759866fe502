//! Report command implementation

use crate::cli::{exit_code_for, EXIT_FATAL, EXIT_OK};
use crate::io::read_results;
use crate::log_error_with_context;
use crate::report::{PredictionReport, DEFAULT_BORDERLINE_THRESHOLD, DEFAULT_TOP};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Scored output file written by `piiflag score`
    #[arg(short, long)]
    pub preds: PathBuf,

    /// Rows listed in the top and borderline sections
    #[arg(long, default_value_t = DEFAULT_TOP)]
    pub top: usize,

    /// Centre of the borderline window
    #[arg(long, default_value_t = DEFAULT_BORDERLINE_THRESHOLD)]
    pub borderline: f64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    /// Execute the report command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(preds = %self.preds.display(), "Building prediction report");

        let results = match read_results(&self.preds) {
            Ok(r) => r,
            Err(e) => {
                log_error_with_context!(&e, "Failed to read predictions");
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let report = PredictionReport::from_results(&results, self.top, self.borderline);

        if self.json {
            match report.format_json() {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("❌ Failed to serialize report: {e}");
                    return Ok(EXIT_FATAL);
                }
            }
        } else {
            print!("{}", report.format_console());
        }

        Ok(EXIT_OK)
    }
}
