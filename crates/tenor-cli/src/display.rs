//! Console rendering for analysis results.
//!
//! The summary is a sectioned text report; records are shown as an Arrow
//! pretty-printed table built from the record batch.

use std::fmt;

use arrow::util::pretty::pretty_format_batches;
use tenor_core::{Histogram, Record, SentimentCategory, Summary, records_to_batch};

const RULE_WIDTH: usize = 60;
const WORDS_PER_LINE: usize = 8;

// ── Public API ──

pub fn print_summary(summary: &Summary, top_words: usize) {
    print!("{}", SummaryReport::new(summary, top_words));
}

pub fn print_records(records: &[Record]) -> anyhow::Result<()> {
    let batch = records_to_batch(records)?;
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}

/// The summary report, listing at most `top_words` words per category.
pub struct SummaryReport<'a> {
    summary: &'a Summary,
    top_words: usize,
}

impl<'a> SummaryReport<'a> {
    pub fn new(summary: &'a Summary, top_words: usize) -> Self {
        Self { summary, top_words }
    }
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "\n{rule}")?;
        writeln!(f, "SENTIMENT ANALYSIS RESULTS")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "\nTotal items analyzed: {}", summary.total)?;

        writeln!(f, "\nSentiment Distribution:")?;
        for category in SentimentCategory::ALL {
            let label = format!("{}:", capitalize(category.as_str()));
            writeln!(
                f,
                "  {:<9} {} ({:.1}%)",
                label,
                summary.count(category),
                summary.percentage(category)
            )?;
        }

        writeln!(f, "\nPolarity Statistics:")?;
        write_stat(f, "Mean:", summary.polarity_mean)?;
        write_stat(f, "Median:", summary.polarity_median)?;
        write_stat(f, "Std:", summary.polarity_stddev)?;

        writeln!(f, "\nSubjectivity Statistics:")?;
        write_stat(f, "Mean:", summary.subjectivity_mean)?;
        write_stat(f, "Median:", summary.subjectivity_median)?;

        writeln!(
            f,
            "\nDegraded items (model failed, scored neutral): {}",
            summary.degraded_count
        )?;

        write_words(f, "Top positive words", &summary.positive_words.top(self.top_words))?;
        write_words(f, "Top negative words", &summary.negative_words.top(self.top_words))?;

        if let Some(h) = &summary.polarity_histogram {
            write_histogram(f, "Polarity Histogram", h)?;
        }
        if let Some(h) = &summary.subjectivity_histogram {
            write_histogram(f, "Subjectivity Histogram", h)?;
        }

        if let Some(series) = &summary.time_series {
            writeln!(f, "\nDaily Sentiment:")?;
            for day in series {
                writeln!(
                    f,
                    "  {}  {:>6} items  mean {:.4}",
                    day.date, day.count, day.mean_polarity
                )?;
            }
        }

        writeln!(f, "{rule}")
    }
}

// ── Helpers ──

fn write_stat(f: &mut fmt::Formatter<'_>, label: &str, value: Option<f64>) -> fmt::Result {
    match value {
        Some(v) => writeln!(f, "  {label:<7} {v:.4}"),
        None => writeln!(f, "  {label:<7} undefined"),
    }
}

fn write_words(f: &mut fmt::Formatter<'_>, header: &str, words: &[(&str, usize)]) -> fmt::Result {
    if words.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n{header}:")?;
    for line in words.chunks(WORDS_PER_LINE) {
        let items: Vec<String> = line.iter().map(|(w, c)| format!("{w} ({c})")).collect();
        writeln!(f, "  {}", items.join(", "))?;
    }
    Ok(())
}

/// Non-empty bins only; the last bin is closed on the right.
fn write_histogram(f: &mut fmt::Formatter<'_>, header: &str, histogram: &Histogram) -> fmt::Result {
    let bins = histogram.counts.len();
    let width = histogram.bin_width();
    writeln!(f, "\n{header} ({bins} bins of {width:.3}):")?;
    for (i, &count) in histogram.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let lo = histogram.lower + i as f64 * width;
        let hi = if i + 1 == bins {
            histogram.upper
        } else {
            histogram.lower + (i + 1) as f64 * width
        };
        let close = if i + 1 == bins { ']' } else { ')' };
        writeln!(f, "  [{lo:>6.3}, {hi:>6.3}{close}  {count}")?;
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
