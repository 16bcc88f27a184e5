mod enricher;
mod fetcher;
mod parser;
mod settings;
mod table;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use fetcher::HttpFetcher;
use settings::{Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "etym_enricher",
    about = "Add first-use year and etymology columns to a word table"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich every row of the input table (word in the third column)
    Run {
        /// Input CSV (default: ./wordle_tables_clean.csv)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output CSV (default: tables_with_new_data.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Per-request timeout in seconds
        #[arg(short, long)]
        timeout_secs: Option<u64>,
        /// Lookups in flight at once (default: 1, strictly sequential)
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
    /// Look up a single word and print its derived fields
    Lookup {
        word: String,
        /// Per-request timeout in seconds
        #[arg(short, long)]
        timeout_secs: Option<u64>,
    },
    /// Print the era label a year falls into
    Classify {
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            timeout_secs,
            concurrency,
        } => {
            let settings = Settings::load(Overrides {
                input,
                output,
                timeout_secs,
                concurrency,
            })?;
            let fetcher = Arc::new(HttpFetcher::new(&settings)?);
            println!(
                "Enriching {} -> {} ({} at a time)...",
                settings.input.display(),
                settings.output.display(),
                settings.concurrency
            );
            let stats = enricher::run(&settings, fetcher).await?;
            println!(
                "Processing complete. {} rows written to {} ({} skipped, {} fetch errors, {} without year).",
                stats.written,
                settings.output.display(),
                stats.skipped,
                stats.fetch_errors,
                stats.missing_years
            );
            Ok(())
        }
        Commands::Lookup { word, timeout_secs } => {
            let settings = Settings::load(Overrides {
                timeout_secs,
                ..Default::default()
            })?;
            let http = HttpFetcher::new(&settings)?;
            let data = match enricher::fetch_word_data(&http, &word).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Error fetching {}: {}", word, e);
                    parser::WordData::unresolved()
                }
            };
            println!("Word:      {}", word);
            println!("URL:       {}", fetcher::word_url(&settings.base_url, &word));
            println!("Year:      {}", data.year);
            println!("Accurate:  {}", data.is_accurate);
            println!("Etymology: {}", data.etymology);
            Ok(())
        }
        Commands::Classify { year } => {
            println!("{}", parser::etymology::classify(year).as_str());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
