//! Row decoders — the narrow seam between the upload pipeline and the
//! format-specific parsers. The service only needs `bytes -> rows`;
//! everything else about a format is the decoder's business.

use std::collections::HashMap;

use serde_json::Value;

use super::format::FileFormat;
use super::Row;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("no decoder registered for {0} files")]
    Unavailable(FileFormat),

    #[error("malformed {0} payload: {1}")]
    Malformed(FileFormat, String),
}

/// Turns a raw upload body into ordered row records.
pub trait RowDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, DecodeError>;
}

/// Format → decoder dispatch table, fixed at startup. The builtin table
/// covers csv and json; xlsx and parquet decoders are deployment-provided
/// collaborators registered by the embedding application.
pub struct DecoderRegistry {
    decoders: HashMap<FileFormat, Box<dyn RowDecoder>>,
}

impl DecoderRegistry {
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(FileFormat::Csv, Box::new(CsvDecoder));
        registry.register(FileFormat::Json, Box::new(JsonDecoder));
        registry
    }

    pub fn register(&mut self, format: FileFormat, decoder: Box<dyn RowDecoder>) {
        self.decoders.insert(format, decoder);
    }

    pub fn decode(&self, format: FileFormat, bytes: &[u8]) -> Result<Vec<Row>, DecodeError> {
        self.decoders
            .get(&format)
            .ok_or(DecodeError::Unavailable(format))?
            .decode(bytes)
    }
}

// ── JSON ─────────────────────────────────────────────────────

/// Accepts a JSON array of flat objects, one object per row.
pub struct JsonDecoder;

impl RowDecoder for JsonDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, DecodeError> {
        serde_json::from_slice::<Vec<Row>>(bytes)
            .map_err(|e| DecodeError::Malformed(FileFormat::Json, e.to_string()))
    }
}

// ── CSV ──────────────────────────────────────────────────────

/// Minimal CSV decoder: first line is the header, fields are split on
/// commas with double-quote quoting, scalars are inferred per cell
/// (integer, float, bool, null, else string).
pub struct CsvDecoder;

impl RowDecoder for CsvDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>, DecodeError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DecodeError::Malformed(FileFormat::Csv, e.to_string()))?;

        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = match lines.next() {
            Some(line) => split_fields(line),
            None => return Ok(Vec::new()),
        };

        let mut rows = Vec::new();
        for (line_no, line) in lines.enumerate() {
            let fields = split_fields(line);
            if fields.len() != header.len() {
                return Err(DecodeError::Malformed(
                    FileFormat::Csv,
                    format!(
                        "row {} has {} fields, header has {}",
                        line_no + 2,
                        fields.len(),
                        header.len()
                    ),
                ));
            }
            let mut row = Row::new();
            for (key, field) in header.iter().zip(fields) {
                row.insert(key.clone(), infer_scalar(&field));
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

/// Split one CSV line into fields, honoring double-quoted fields with
/// doubled-quote escapes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn infer_scalar(field: &str) -> Value {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    match trimmed {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::String(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_header_becomes_keys_and_scalars_are_inferred() {
        let rows = CsvDecoder
            .decode(b"a,b,c\n1,2.5,hello\n-3,true,\n")
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], json!(1));
        assert_eq!(rows[0]["b"], json!(2.5));
        assert_eq!(rows[0]["c"], json!("hello"));
        assert_eq!(rows[1]["a"], json!(-3));
        assert_eq!(rows[1]["b"], json!(true));
        assert_eq!(rows[1]["c"], Value::Null);
    }

    #[test]
    fn csv_quoted_fields_keep_commas_and_quotes() {
        let rows = CsvDecoder
            .decode(b"name,note\n\"Smith, Jane\",\"said \"\"hi\"\"\"\n")
            .unwrap();
        assert_eq!(rows[0]["name"], json!("Smith, Jane"));
        assert_eq!(rows[0]["note"], json!("said \"hi\""));
    }

    #[test]
    fn csv_field_count_mismatch_is_malformed() {
        let err = CsvDecoder.decode(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(FileFormat::Csv, _)));
    }

    #[test]
    fn csv_empty_input_decodes_to_no_rows() {
        assert!(CsvDecoder.decode(b"").unwrap().is_empty());
        assert!(CsvDecoder.decode(b"a,b\n").unwrap().is_empty());
    }

    #[test]
    fn json_array_of_objects_decodes() {
        let rows = JsonDecoder
            .decode(br#"[{"a": 1}, {"a": null}]"#)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], json!(1));
        assert_eq!(rows[1]["a"], Value::Null);
    }

    #[test]
    fn json_non_array_is_malformed() {
        let err = JsonDecoder.decode(br#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(FileFormat::Json, _)));
    }

    #[test]
    fn registry_reports_missing_decoders() {
        let registry = DecoderRegistry::builtin();
        let err = registry.decode(FileFormat::Xlsx, b"").unwrap_err();
        assert!(matches!(err, DecodeError::Unavailable(FileFormat::Xlsx)));
    }

    #[test]
    fn registry_dispatches_by_format() {
        let registry = DecoderRegistry::builtin();
        let rows = registry.decode(FileFormat::Csv, b"a\n1\n").unwrap();
        assert_eq!(rows[0]["a"], json!(1));
    }
}
