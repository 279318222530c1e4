//! Record export to JSON or CSV, and summary export to JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use tenor_core::{Record, SentimentCategory, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Flat CSV row; `extra` is carried as a JSON string.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    source_id: Option<&'a str>,
    timestamp: Option<String>,
    text: &'a str,
    cleaned_text: &'a str,
    polarity: f64,
    subjectivity: f64,
    category: SentimentCategory,
    degraded: bool,
    extra: Option<String>,
}

impl<'a> CsvRow<'a> {
    fn from_record(record: &'a Record) -> anyhow::Result<Self> {
        let extra = if record.raw.extra.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&record.raw.extra)?)
        };
        Ok(Self {
            source_id: record.source_id(),
            timestamp: record.timestamp().map(|t| t.to_rfc3339()),
            text: &record.raw.text,
            cleaned_text: record.cleaned_text.as_str(),
            polarity: record.score.polarity,
            subjectivity: record.score.subjectivity,
            category: record.category,
            degraded: record.degraded,
            extra,
        })
    }
}

/// Write `records` to `path`; the format comes from `format`, else the extension.
pub fn write_records(
    path: &Path,
    records: &[Record],
    format: Option<OutputFormat>,
) -> anyhow::Result<OutputFormat> {
    let format = format
        .or_else(|| OutputFormat::from_path(path))
        .with_context(|| {
            format!(
                "cannot infer output format from {} (use --format json|csv)",
                path.display()
            )
        })?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let writer = BufWriter::new(file);
    match format {
        OutputFormat::Json => write_json(writer, records),
        OutputFormat::Csv => write_csv(writer, records),
    }
    .with_context(|| format!("writing {}", path.display()))?;
    Ok(format)
}

/// Write the full summary, histograms and daily series included, as JSON.
pub fn write_summary(path: &Path, summary: &Summary) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .with_context(|| format!("writing {}", path.display()))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, records: &[Record]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn write_csv<W: Write>(writer: W, records: &[Record]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(CsvRow::from_record(record)?)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tenor_core::{CleanedText, RawItem, SentimentScore};

    fn record(text: &str, polarity: f64, category: SentimentCategory) -> Record {
        let mut raw = RawItem::new(text)
            .with_source_id("p1")
            .with_timestamp(Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap());
        raw.extra.insert("likes".into(), 4.into());
        Record {
            raw,
            cleaned_text: CleanedText::new(text.to_lowercase()),
            score: SentimentScore::new(polarity, 0.5),
            category,
            degraded: false,
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.JSON")), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_path(Path::new("out.xlsx")), None);
    }

    #[test]
    fn csv_has_one_row_per_record() {
        let records = vec![
            record("Great", 0.8, SentimentCategory::Positive),
            record("Awful", -1.0, SentimentCategory::Negative),
        ];
        let mut buf = Vec::new();
        write_csv(&mut buf, &records).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "source_id,timestamp,text,cleaned_text,polarity,subjectivity,category,degraded,extra"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("p1,2024-03-09T08:30:00+00:00,Great,great,0.8,0.5,positive,false,"));
        assert!(lines[2].contains(",negative,"));
    }

    #[test]
    fn json_round_trips_records() {
        let records = vec![record("Fine", 0.0, SentimentCategory::Neutral)];
        let mut buf = Vec::new();
        write_json(&mut buf, &records).unwrap();
        let back: Vec<Record> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn summary_file_carries_histograms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = tenor_nlp::aggregate(&[
            record("Great", 0.8, SentimentCategory::Positive),
            record("Awful", -1.0, SentimentCategory::Negative),
        ]);

        write_summary(&path, &summary).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["total"], 2);
        let polarity = value["polarity_histogram"]["counts"].as_array().unwrap();
        let total: u64 = polarity.iter().map(|c| c.as_u64().unwrap()).sum();
        assert_eq!(total, 2);
        assert_eq!(value["subjectivity_histogram"]["lower"], 0.0);
        assert!(value["time_series"].is_array());
    }

    #[test]
    fn write_records_needs_a_known_format() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record("ok", 0.2, SentimentCategory::Positive)];

        let unknown = dir.path().join("records.out");
        assert!(write_records(&unknown, &records, None).is_err());

        let forced = write_records(&unknown, &records, Some(OutputFormat::Csv)).unwrap();
        assert_eq!(forced, OutputFormat::Csv);
        let written = std::fs::read_to_string(&unknown).unwrap();
        assert!(written.starts_with("source_id,"));

        let json = dir.path().join("records.json");
        assert_eq!(write_records(&json, &records, None).unwrap(), OutputFormat::Json);
    }
}
