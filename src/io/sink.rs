//! Result sink: write and read back scored output

use super::FileFormat;
use crate::domain::{PiiFlagError, Result};
use crate::scoring::HybridResult;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Write scored results, optionally sorted by descending `pred_score`
///
/// `.jsonl` writes JSON Lines; any other extension writes CSV with a header
/// row. Parent directories are created. Returns the number of rows written.
pub fn write_results(
    path: impl AsRef<Path>,
    results: &[HybridResult],
    sort_by_score: bool,
) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            PiiFlagError::Io(format!(
                "Failed to create output directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut ordered: Vec<&HybridResult> = results.iter().collect();
    if sort_by_score {
        // stable: ties keep input order
        ordered.sort_by(|a, b| b.pred_score.total_cmp(&a.pred_score));
    }

    let format = FileFormat::for_output(path);
    match format {
        FileFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)
                .map_err(|e| PiiFlagError::Io(format!("{}: {}", path.display(), e)))?;
            for result in &ordered {
                writer
                    .serialize(result)
                    .map_err(|e| PiiFlagError::Serialization(e.to_string()))?;
            }
            writer.flush()?;
        }
        FileFormat::Jsonl => {
            let mut writer = BufWriter::new(File::create(path)?);
            for result in &ordered {
                serde_json::to_writer(&mut writer, result)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
    }

    tracing::info!(
        path = %path.display(),
        format = %format,
        rows = ordered.len(),
        "Wrote scored results"
    );

    Ok(ordered.len())
}

/// Read results previously written by [`write_results`]
pub fn read_results(path: impl AsRef<Path>) -> Result<Vec<HybridResult>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PiiFlagError::Input(format!(
            "Predictions file not found: {}",
            path.display()
        )));
    }

    match FileFormat::for_output(path) {
        FileFormat::Csv => {
            let mut reader = csv::Reader::from_path(path)?;
            reader
                .deserialize()
                .enumerate()
                .map(|(index, row)| {
                    row.map_err(|e| {
                        PiiFlagError::Input(format!("{}: row {}: {}", path.display(), index + 1, e))
                    })
                })
                .collect()
        }
        FileFormat::Jsonl => {
            let reader = BufReader::new(File::open(path)?);
            let mut results = Vec::new();
            for (line_no, line) in reader.lines().enumerate() {
                let line = line.map_err(|e| {
                    PiiFlagError::Input(format!("{}: line {}: {}", path.display(), line_no + 1, e))
                })?;
                if line.trim().is_empty() {
                    continue;
                }
                let result = serde_json::from_str(&line).map_err(|e| {
                    PiiFlagError::Input(format!("{}: line {}: {}", path.display(), line_no + 1, e))
                })?;
                results.push(result);
            }
            Ok(results)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;
    use crate::scoring::DecisionRule;
    use tempfile::TempDir;

    fn result(id: &str, score: f64, ml: Option<f64>) -> HybridResult {
        HybridResult {
            id: RecordId::new(id).unwrap(),
            pred_label: u8::from(score >= 0.35),
            pred_score: score,
            ml_score: ml,
            regex_score: score,
            forced_by_regex: false,
            decided_by: if ml.is_some() {
                DecisionRule::Threshold
            } else {
                DecisionRule::RegexOnly
            },
            has_cpf: false,
            has_email: score >= 0.35,
            has_phone: false,
            has_rg: false,
            has_zip: false,
            has_name_like: false,
        }
    }

    #[test]
    fn test_csv_sorted_descending_and_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/preds.csv");
        let results = vec![
            result("a", 0.10, None),
            result("b", 0.80, None),
            result("c", 0.35, None),
        ];

        assert_eq!(write_results(&path, &results, true).unwrap(), 3);
        let back = read_results(&path).unwrap();
        let ids: Vec<_> = back.iter().map(|r| r.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(back[0].ml_score, None);
        assert_eq!(back[0].decided_by, DecisionRule::RegexOnly);
    }

    #[test]
    fn test_csv_header_and_empty_ml_score() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preds.csv");
        write_results(&path, &[result("1", 0.35, None)], true).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,pred_label,pred_score,ml_score,regex_score,forced_by_regex,decided_by,\
             has_cpf,has_email,has_phone,has_rg,has_zip,has_name_like"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,1,0.35,,0.35,false,regex_only,false,true,false,false,false,false"
        );
    }

    #[test]
    fn test_unsorted_keeps_input_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preds.jsonl");
        let results = vec![result("a", 0.10, Some(0.2)), result("b", 0.80, Some(0.9))];
        write_results(&path, &results, false).unwrap();
        let back = read_results(&path).unwrap();
        assert_eq!(back, results);
    }

    #[test]
    fn test_read_jsonl_invalid_utf8_is_input_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preds.jsonl");
        std::fs::write(&path, b"{\"id\": \"\xff\"}\n").unwrap();
        let err = read_results(&path).unwrap_err();
        assert!(matches!(err, PiiFlagError::Input(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_results("/nonexistent/preds.csv").unwrap_err();
        assert!(matches!(err, PiiFlagError::Input(_)));
    }
}
