use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use crate::fetcher::{DocumentFetcher, FetchError};
use crate::parser::{self, WordData};
use crate::settings::Settings;
use crate::table::{self, EnrichedRow, OutputTable};

/// Counts reported after a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub written: usize,
    pub skipped: usize,
    pub fetch_errors: usize,
    pub missing_years: usize,
}

/// Fetch one word's page and extract its fields.
pub async fn fetch_word_data<F: DocumentFetcher>(
    fetcher: &F,
    word: &str,
) -> Result<WordData, FetchError> {
    info!("Processing: {}", word);
    let markup = fetcher.fetch(word).await?;
    Ok(parser::process_html(&markup, word))
}

/// Enrich every row of `settings.input` into `settings.output`.
///
/// Up to `settings.concurrency` lookups are in flight at once. Results are
/// written in input order as soon as every earlier row has been written.
pub async fn run<F: DocumentFetcher>(settings: &Settings, fetcher: Arc<F>) -> Result<RunStats> {
    let input = table::read_input(&settings.input)?;
    let mut output = OutputTable::create(&settings.output, &input.header)?;

    let mut stats = RunStats {
        skipped: input.skipped,
        ..Default::default()
    };
    let total = input.rows.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let semaphore = Arc::new(Semaphore::new(settings.concurrency));
    let (tx, mut rx) =
        mpsc::channel::<(usize, EnrichedRow, bool)>(settings.concurrency * 2);

    // Permits are taken in input order, so lookups start in input order and
    // run strictly one after another at concurrency 1.
    let rows = input.rows;
    tokio::spawn(async move {
        for (index, row) in rows.into_iter().enumerate() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let fetcher = Arc::clone(&fetcher);
            let tx = tx.clone();

            tokio::spawn(async move {
                let (data, failed) = match fetch_word_data(fetcher.as_ref(), row.word()).await {
                    Ok(data) => (data, false),
                    Err(e) => {
                        warn!("Error fetching {}: {}", row.word(), e);
                        (WordData::unresolved(), true)
                    }
                };
                drop(permit);
                let _ = tx.send((index, EnrichedRow::new(row, data), failed)).await;
            });
        }
        // rx closes once this loop and every worker have dropped their senders
    });

    let mut pending: BTreeMap<usize, EnrichedRow> = BTreeMap::new();
    let mut next = 0usize;

    while let Some((index, row, failed)) = rx.recv().await {
        if failed {
            stats.fetch_errors += 1;
        } else if row.data.year == -1 {
            stats.missing_years += 1;
        }
        pending.insert(index, row);

        while let Some(row) = pending.remove(&next) {
            output.write(&row)?;
            stats.written += 1;
            next += 1;
            pb.inc(1);
        }
    }

    // Only reachable if a task died before reporting; keep what we have in order.
    if !pending.is_empty() || next < total {
        warn!(
            "{} of {} rows never completed",
            total - next - pending.len(),
            total
        );
        for (_, row) in std::mem::take(&mut pending) {
            output.write(&row)?;
            stats.written += 1;
        }
    }

    output.finish()?;
    pb.finish_and_clear();
    info!(
        "Wrote {} rows to {} ({} skipped, {} fetch errors, {} without year)",
        stats.written,
        settings.output.display(),
        stats.skipped,
        stats.fetch_errors,
        stats.missing_years
    );

    Ok(stats)
}

// ── Tests ──
