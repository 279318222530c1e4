//! Arrow schema for pipeline records.
//!
//! Reporting and persistence collaborators consume records as a columnar
//! `RecordBatch`, one row per record in pipeline order.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use serde_json::Value;

use crate::record::Record;

/// Schema of the batch produced by [`records_to_batch`].
pub fn record_schema() -> Schema {
    Schema::new(vec![
        Field::new("source_id", DataType::Utf8, true),
        // Microseconds cover every representable chrono date; nanoseconds stop at 2262.
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            true,
        ),
        Field::new("text", DataType::Utf8, false),
        Field::new("cleaned_text", DataType::Utf8, false),
        Field::new("polarity", DataType::Float64, false),
        Field::new("subjectivity", DataType::Float64, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("degraded", DataType::Boolean, false),
        // JSON object of connector-specific fields, null when there are none.
        Field::new("extra", DataType::Utf8, true),
    ])
}

/// Convert records into a single Arrow batch, preserving order.
pub fn records_to_batch(records: &[Record]) -> Result<RecordBatch, ArrowError> {
    let source_ids: StringArray = records.iter().map(|r| r.source_id()).collect();
    let timestamps = TimestampMicrosecondArray::from(
        records
            .iter()
            .map(|r| r.timestamp().map(|t| t.timestamp_micros()))
            .collect::<Vec<_>>(),
    )
    .with_timezone("UTC");
    let texts: StringArray = records.iter().map(|r| Some(r.raw.text.as_str())).collect();
    let cleaned: StringArray = records
        .iter()
        .map(|r| Some(r.cleaned_text.as_str()))
        .collect();
    let polarity: Float64Array = records.iter().map(|r| Some(r.score.polarity)).collect();
    let subjectivity: Float64Array = records
        .iter()
        .map(|r| Some(r.score.subjectivity))
        .collect();
    let category: StringArray = records
        .iter()
        .map(|r| Some(r.category.as_str()))
        .collect();
    let degraded: BooleanArray = records.iter().map(|r| Some(r.degraded)).collect();
    let extra: StringArray = records
        .iter()
        .map(|r| {
            (!r.raw.extra.is_empty()).then(|| Value::Object(r.raw.extra.clone()).to_string())
        })
        .collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(source_ids),
        Arc::new(timestamps),
        Arc::new(texts),
        Arc::new(cleaned),
        Arc::new(polarity),
        Arc::new(subjectivity),
        Arc::new(category),
        Arc::new(degraded),
        Arc::new(extra),
    ];

    RecordBatch::try_new(Arc::new(record_schema()), columns)
}
