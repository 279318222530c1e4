//! File source connector: CSV, JSON and JSON Lines into [`RawItem`]s.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, bail};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tenor_core::RawItem;
use tracing::{debug, warn};

/// Field used for text when the configured text field is missing from a JSON object.
const FALLBACK_TEXT_FIELD: &str = "title";

/// Which fields feed [`RawItem`]'s text, source id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumns {
    pub text: String,
    pub id: String,
    pub time: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            text: "text".into(),
            id: "id".into(),
            time: "created_at".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
    JsonLines,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "jsonl" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Read every item in `path`, in file order.
pub fn read_items(path: &Path, columns: &SourceColumns) -> anyhow::Result<Vec<RawItem>> {
    let Some(format) = InputFormat::from_path(path) else {
        bail!(
            "unsupported input file {} (expected .csv, .json, .jsonl or .ndjson)",
            path.display()
        );
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let items = match format {
        InputFormat::Csv => read_csv(file, columns),
        InputFormat::Json => read_json(file, columns),
        InputFormat::JsonLines => read_json_lines(BufReader::new(file), columns),
    }
    .with_context(|| format!("reading {}", path.display()))?;

    debug!(path = %path.display(), items = items.len(), "loaded source items");
    Ok(items)
}

pub fn read_csv<R: Read>(reader: R, columns: &SourceColumns) -> anyhow::Result<Vec<RawItem>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("reading CSV header")?.clone();
    if !headers.iter().any(|h| h == columns.text) {
        bail!("CSV has no '{}' column", columns.text);
    }

    let mut items = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("reading CSV row {}", i + 1))?;
        let mut text = String::new();
        let mut source_id = None;
        let mut time = None;
        let mut extra = Map::new();

        for (header, value) in headers.iter().zip(row.iter()) {
            if header == columns.text {
                text = value.to_string();
            } else if header == columns.id {
                source_id = non_empty(value);
            } else if header == columns.time {
                time = non_empty(value);
            } else {
                extra.insert(header.to_string(), Value::String(value.to_string()));
            }
        }

        let timestamp = time.and_then(|t| resolve_timestamp(&Value::String(t), &columns.time, &mut extra));
        items.push(RawItem {
            text,
            timestamp,
            source_id,
            extra,
        });
    }
    Ok(items)
}

/// A top-level array of objects, or a single object.
pub fn read_json<R: Read>(reader: R, columns: &SourceColumns) -> anyhow::Result<Vec<RawItem>> {
    let value: Value = serde_json::from_reader(reader).context("parsing JSON")?;
    match value {
        Value::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, v)| item_from_value(v, columns).with_context(|| format!("item {i}")))
            .collect(),
        Value::Object(object) => Ok(vec![item_from_object(object, columns)]),
        other => bail!("expected a JSON array or object, found {}", json_kind(&other)),
    }
}

/// One JSON object per line; blank lines are skipped.
pub fn read_json_lines<R: BufRead>(reader: R, columns: &SourceColumns) -> anyhow::Result<Vec<RawItem>> {
    let mut items = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(&line).with_context(|| format!("parsing line {}", i + 1))?;
        items.push(item_from_value(value, columns).with_context(|| format!("line {}", i + 1))?);
    }
    Ok(items)
}

fn item_from_value(value: Value, columns: &SourceColumns) -> anyhow::Result<RawItem> {
    match value {
        Value::Object(object) => Ok(item_from_object(object, columns)),
        other => bail!("expected a JSON object, found {}", json_kind(&other)),
    }
}

fn item_from_object(mut object: Map<String, Value>, columns: &SourceColumns) -> RawItem {
    let text = match object.remove(&columns.text) {
        Some(value) => scalar_string(&value).unwrap_or_default(),
        None => object
            .get(FALLBACK_TEXT_FIELD)
            .and_then(scalar_string)
            .unwrap_or_default(),
    };
    let source_id = object.remove(&columns.id).as_ref().and_then(scalar_string);
    let timestamp = object
        .remove(&columns.time)
        .and_then(|t| resolve_timestamp(&t, &columns.time, &mut object));

    RawItem {
        text,
        timestamp,
        source_id,
        extra: object,
    }
}

/// Parse a timestamp field. An unreadable value stays in `extra` under its own
/// name so it is not lost.
fn resolve_timestamp(value: &Value, field: &str, extra: &mut Map<String, Value>) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| n.as_f64().and_then(from_fractional_secs)),
        Value::Null => return None,
        _ => None,
    };
    if parsed.is_none() {
        warn!(field, value = %value, "unrecognised timestamp, keeping it as metadata");
        extra.insert(field.to_string(), value.clone());
    }
    parsed
}

/// RFC 3339, naive ISO 8601 (assumed UTC), `YYYY-MM-DD HH:MM:SS`, or unix seconds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(secs) = value.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    value.parse::<f64>().ok().and_then(from_fractional_secs)
}

fn from_fractional_secs(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn columns() -> SourceColumns {
        SourceColumns::default()
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.CSV")), Some(InputFormat::Csv));
        assert_eq!(InputFormat::from_path(Path::new("a.json")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("a.ndjson")), Some(InputFormat::JsonLines));
        assert_eq!(InputFormat::from_path(Path::new("a.jsonl")), Some(InputFormat::JsonLines));
        assert_eq!(InputFormat::from_path(Path::new("a.parquet")), None);
        assert_eq!(InputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn parses_supported_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-09T08:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-09T10:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-09T08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-09 08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("1709973000"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-09T08:30:00.250"),
            Some(expected + chrono::Duration::milliseconds(250))
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("  "), None);
    }

    #[test]
    fn csv_rows_become_items() {
        let data = "\
id,text,created_at,author
1,I love it,2024-03-09 08:30:00,ana
2,,,ben
3,meh,not a date,cy
";
        let items = read_csv(data.as_bytes(), &columns()).unwrap();
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].text, "I love it");
        assert_eq!(items[0].source_id.as_deref(), Some("1"));
        assert_eq!(
            items[0].timestamp,
            Some(Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap())
        );
        assert_eq!(items[0].extra.get("author"), Some(&Value::from("ana")));
        assert!(!items[0].extra.contains_key("created_at"));

        assert_eq!(items[1].text, "");
        assert_eq!(items[1].timestamp, None);

        assert_eq!(items[2].timestamp, None);
        assert_eq!(items[2].extra.get("created_at"), Some(&Value::from("not a date")));
    }

    #[test]
    fn csv_without_text_column_is_an_error() {
        let err = read_csv("id,body\n1,hello\n".as_bytes(), &columns()).unwrap_err();
        assert!(err.to_string().contains("'text'"), "got {err}");
    }

    #[test]
    fn csv_custom_columns() {
        let columns = SourceColumns {
            text: "body".into(),
            id: "post".into(),
            time: "when".into(),
        };
        let items = read_csv("post,body,when\nx9,hey,1709973000\n".as_bytes(), &columns).unwrap();
        assert_eq!(items[0].text, "hey");
        assert_eq!(items[0].source_id.as_deref(), Some("x9"));
        assert!(items[0].timestamp.is_some());
        assert!(items[0].extra.is_empty());
    }

    #[test]
    fn json_array_and_single_object() {
        let array = r#"[
            {"id": 7, "text": "great", "created_at": 1709973000, "likes": 3},
            {"title": "headline only"},
            {"text": null}
        ]"#;
        let items = read_json(array.as_bytes(), &columns()).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].source_id.as_deref(), Some("7"));
        assert!(items[0].timestamp.is_some());
        assert_eq!(items[0].extra.get("likes"), Some(&Value::from(3)));
        assert_eq!(items[1].text, "headline only");
        assert_eq!(items[2].text, "");

        let single = r#"{"text": "just one"}"#;
        let items = read_json(single.as_bytes(), &columns()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "just one");
    }

    #[test]
    fn json_rejects_non_objects() {
        assert!(read_json("42".as_bytes(), &columns()).is_err());
        assert!(read_json(r#"[{"text": "ok"}, "nope"]"#.as_bytes(), &columns()).is_err());
    }

    #[test]
    fn json_lines_skip_blank_lines() {
        let data = "{\"text\": \"a\"}\n\n{\"text\": \"b\"}\n";
        let items = read_json_lines(data.as_bytes(), &columns()).unwrap();
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn read_items_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(file, r#"{{"id": "a", "text": "first"}}"#).unwrap();
        writeln!(file, r#"{{"id": "b", "text": "second"}}"#).unwrap();
        drop(file);

        let items = read_items(&path, &columns()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].source_id.as_deref(), Some("b"));

        let unknown = dir.path().join("posts.txt");
        File::create(&unknown).unwrap();
        assert!(read_items(&unknown, &columns()).is_err());
    }
}
