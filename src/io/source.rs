//! Record source: CSV and JSON Lines with column auto-detection

use super::FileFormat;
use crate::config::InputConfig;
use crate::domain::{PiiFlagError, Record, RecordId, Result};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load every record of a CSV or JSON Lines file
///
/// The text and id columns are the first candidates from `input` that
/// match a header after trimming and lowercasing. Without an id column,
/// or when the id cell is blank, the zero-based row index is used. Missing
/// or null text becomes the empty string.
///
/// # Errors
///
/// - [`PiiFlagError::Input`] for unsupported extensions, unreadable files,
///   malformed rows, or when no text column can be found
pub fn load_records(path: impl AsRef<Path>, input: &InputConfig) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let format = FileFormat::for_input(path)?;
    if !path.exists() {
        return Err(PiiFlagError::Input(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let records = match format {
        FileFormat::Csv => load_csv(path, input)?,
        FileFormat::Jsonl => load_jsonl(path, input)?,
    };

    tracing::info!(
        path = %path.display(),
        format = %format,
        records = records.len(),
        "Loaded records"
    );

    Ok(records)
}

/// Resolved column positions for one source
#[derive(Debug)]
struct Columns {
    text: usize,
    id: Option<usize>,
}

fn normalise(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn find_column(headers: &[String], candidates: &[String]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        let candidate = normalise(candidate);
        headers.iter().position(|h| normalise(h) == candidate)
    })
}

fn resolve_columns(headers: &[String], input: &InputConfig) -> Result<Columns> {
    let text = find_column(headers, &input.text_column_candidates).ok_or_else(|| {
        PiiFlagError::Input(format!(
            "No text column found. Expected one of [{}], found [{}]",
            input.text_column_candidates.join(", "),
            headers.join(", ")
        ))
    })?;
    let id = find_column(headers, &input.id_column_candidates);

    tracing::debug!(
        text_column = %headers[text],
        id_column = id.map(|i| headers[i].as_str()).unwrap_or("<row index>"),
        "Resolved input columns"
    );

    Ok(Columns { text, id })
}

fn record_id(raw: Option<&str>, index: usize) -> RecordId {
    raw.and_then(|v| RecordId::new(v).ok())
        .unwrap_or_else(|| RecordId::from_index(index))
}

fn load_csv(path: &Path, input: &InputConfig) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let columns = resolve_columns(&headers, input)?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| {
            PiiFlagError::Input(format!("{}: row {}: {}", path.display(), index + 1, e))
        })?;
        let text = row.get(columns.text).unwrap_or("");
        let id = record_id(columns.id.and_then(|i| row.get(i)), index);
        records.push(Record::new(id, text));
    }

    Ok(records)
}

fn load_jsonl(path: &Path, input: &InputConfig) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|e| {
        PiiFlagError::Input(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let mut rows: Vec<Map<String, Value>> = Vec::new();
    let mut headers: Vec<String> = Vec::new();

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            PiiFlagError::Input(format!("{}: line {}: {}", path.display(), line_no + 1, e))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).map_err(|e| {
            PiiFlagError::Input(format!("{}: line {}: {}", path.display(), line_no + 1, e))
        })?;
        let Value::Object(object) = value else {
            return Err(PiiFlagError::Input(format!(
                "{}: line {}: expected a JSON object",
                path.display(),
                line_no + 1
            )));
        };
        for key in object.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        rows.push(object);
    }

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let columns = resolve_columns(&headers, input)?;
    let text_key = &headers[columns.text];
    let id_key = columns.id.map(|i| &headers[i]);

    Ok(rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let text = row.get(text_key).map(scalar_text).unwrap_or_default();
            let id = id_key
                .and_then(|k| row.get(k))
                .map(scalar_text);
            Record::new(record_id(id.as_deref(), index), text)
        })
        .collect())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_csv_with_id_and_text_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "in.csv",
            "Protocolo,Texto Mascarado\nP-1,Meu CPF é 123.456.789-10\nP-2,Bom dia\n",
        );
        let records = load_records(&path, &InputConfig::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id().as_str(), "P-1");
        assert_eq!(records[0].text(), "Meu CPF é 123.456.789-10");
        assert_eq!(records[1].id().as_str(), "P-2");
    }

    #[test]
    fn test_csv_without_id_uses_row_index() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "in.csv", "mensagem\nprimeira\nsegunda\n");
        let records = load_records(&path, &InputConfig::default()).unwrap();
        assert_eq!(records[0].id().as_str(), "0");
        assert_eq!(records[1].id().as_str(), "1");
    }

    #[test]
    fn test_blank_id_falls_back_to_index() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "in.csv", "id,texto\n  ,alpha\nX,beta\n");
        let records = load_records(&path, &InputConfig::default()).unwrap();
        assert_eq!(records[0].id().as_str(), "0");
        assert_eq!(records[1].id().as_str(), "X");
    }

    #[test]
    fn test_candidate_order_wins() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "in.csv", "texto,texto mascarado\nraw,masked\n");
        let records = load_records(&path, &InputConfig::default()).unwrap();
        assert_eq!(records[0].text(), "masked");
    }

    #[test]
    fn test_missing_text_column_lists_headers() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "in.csv", "id,assunto\n1,foo\n");
        let err = load_records(&path, &InputConfig::default()).unwrap_err();
        assert!(matches!(err, PiiFlagError::Input(_)));
        assert!(err.to_string().contains("assunto"));
    }

    #[test]
    fn test_jsonl_records() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "in.jsonl",
            "{\"id\": 10, \"texto\": \"email a@b.com\"}\n\n{\"id\": null, \"texto\": null}\n{\"texto\": 42}\n",
        );
        let records = load_records(&path, &InputConfig::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id().as_str(), "10");
        assert_eq!(records[1].id().as_str(), "1");
        assert_eq!(records[1].text(), "");
        assert_eq!(records[2].text(), "42");
        assert_eq!(records[2].id().as_str(), "2");
    }

    #[test]
    fn test_jsonl_non_object_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "in.jsonl", "[1, 2]\n");
        let err = load_records(&path, &InputConfig::default()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_jsonl_invalid_utf8_is_input_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.jsonl");
        std::fs::write(&path, b"{\"texto\": \"ok\"}\n{\"texto\": \"ol\xe1 mundo\"}\n").unwrap();
        let err = load_records(&path, &InputConfig::default()).unwrap_err();
        assert!(matches!(err, PiiFlagError::Input(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_xlsx_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "in.xlsx", "not really excel");
        let err = load_records(&path, &InputConfig::default()).unwrap_err();
        assert!(matches!(err, PiiFlagError::Input(_)));
        assert!(err.to_string().contains("Export the sheet to .csv or .jsonl"));
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let err = load_records("/nonexistent/in.csv", &InputConfig::default()).unwrap_err();
        assert!(matches!(err, PiiFlagError::Input(_)));
    }
}
