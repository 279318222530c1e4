mod config;
mod display;
mod export;
mod source;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tenor_nlp::{LexiconModel, Pipeline};
use tracing::Level;

use crate::config::Overrides;
use crate::export::OutputFormat;
use crate::source::SourceColumns;

#[derive(Parser)]
#[command(name = "tenor", version, about = "Sentiment analysis for social media text")]
struct Cli {
    /// Log debug detail to stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every item in a CSV, JSON or JSON Lines file and print a summary.
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Input file (.csv, .json, .jsonl, .ndjson).
    input: PathBuf,

    /// Column or field holding the text.
    #[arg(long, default_value = "text")]
    text_column: String,

    /// Column or field holding the item id.
    #[arg(long, default_value = "id")]
    id_column: String,

    /// Column or field holding the creation time.
    #[arg(long, default_value = "created_at")]
    time_column: String,

    /// Write the scored records here.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format; inferred from the output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the summary (statistics, word counts, histograms, daily series) as JSON.
    #[arg(long)]
    summary_output: Option<PathBuf>,

    /// Print every record as a table.
    #[arg(long)]
    show_records: bool,

    /// Polarity at or above which an item is positive.
    #[arg(long, allow_hyphen_values = true)]
    positive_threshold: Option<f64>,

    /// Polarity at or below which an item is negative.
    #[arg(long, allow_hyphen_values = true)]
    negative_threshold: Option<f64>,

    /// Drop hashtags entirely instead of keeping their text.
    #[arg(long)]
    strip_hashtag_text: bool,

    /// Keep the original letter case.
    #[arg(long)]
    keep_case: bool,

    /// Shortest word counted in the word frequencies.
    #[arg(long)]
    min_word_length: Option<usize>,

    /// How many words to list per category.
    #[arg(long)]
    top_words: Option<usize>,
}

impl AnalyzeArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            positive_threshold: self.positive_threshold,
            negative_threshold: self.negative_threshold,
            strip_hashtag_text: self.strip_hashtag_text.then_some(true),
            lowercase: self.keep_case.then_some(false),
            min_word_length: self.min_word_length,
            top_words: self.top_words,
        }
    }

    fn columns(&self) -> SourceColumns {
        SourceColumns {
            text: self.text_column.clone(),
            id: self.id_column.clone(),
            time: self.time_column.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Analyze(args) => cmd_analyze(args),
    }
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    tracing::info!("tenor v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load(&args.overrides()).context("loading configuration")?;
    let items = source::read_items(&args.input, &args.columns())?;
    let pipeline = Pipeline::new(&config, LexiconModel::default())?;
    let output = pipeline.run(items);

    display::print_summary(&output.summary, config.words.top_n);

    if args.show_records {
        display::print_records(&output.records)?;
    }

    if let Some(path) = &args.output {
        let format = export::write_records(path, &output.records, args.format)?;
        eprintln!(
            "Wrote {} records to {} ({:?})",
            output.records.len(),
            path.display(),
            format
        );
    }

    if let Some(path) = &args.summary_output {
        export::write_summary(path, &output.summary)?;
        eprintln!("Wrote summary to {}", path.display());
    }

    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "analysis finished"
    );
    Ok(())
}
