use crate::columns::ColumnMap;
use crate::sheets::SheetsClient;
use indicatif::{ProgressBar, ProgressStyle};
use prospect_enricher::CompletionClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Options for configuring an enrichment run
pub struct EnrichOptions {
    /// First sheet row to process, 1-indexed (row 1 is the header).
    pub start_row: u32,
    /// Last sheet row to process, inclusive.
    pub end_row: u32,
    /// Courtesy pause between rows toward the completion API. Fixed, not
    /// adaptive.
    pub delay: Duration,
    pub show_progress_bars: bool,
}

/// Callback for reporting per-row progress messages
pub type EnrichProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum RowStatus {
    /// Profile written back to the sheet.
    Enriched,
    /// Fewer than two input cells; no query issued, no write performed.
    SkippedIncomplete,
    /// The completion endpoint yielded no usable profile; cells untouched.
    NoResult,
    /// The write back to the sheet failed; cells left as they were.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub row: u32,
    /// Unset when the row never bound a domain (incomplete input).
    pub domain: Option<String>,
    pub status: RowStatus,
}

/// Execute an enrichment run with the given options.
/// Returns one outcome per row the bulk read produced.
///
/// The input span is read once up front; each row is then processed
/// strictly in order with a single in-flight request. Every per-row
/// failure is isolated at the row boundary and the loop continues; only
/// the initial bulk read can fail the whole run.
pub async fn execute_enrich(
    options: EnrichOptions,
    sheets: &SheetsClient,
    completion: &CompletionClient,
    columns: &ColumnMap,
    progress_callback: Option<EnrichProgressCallback>,
) -> Result<Vec<RowOutcome>, String> {
    let EnrichOptions {
        start_row,
        end_row,
        delay,
        show_progress_bars,
    } = options;

    info!("Enriching rows {} to {}", start_row, end_row);
    let rows = sheets
        .read_rows(&columns.input_range(start_row, end_row))
        .await?;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new(rows.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let report = |message: String| {
        if let Some(ref callback) = progress_callback {
            callback(message);
        }
    };

    let mut outcomes = Vec::new();

    for (offset, cells) in rows.iter().enumerate() {
        let row = start_row + offset as u32;

        if let Some(ref pb) = progress_bar {
            let label = cells.get(1).map(String::as_str).unwrap_or("(incomplete)");
            pb.set_message(format!("Row {}: {}", row, label));
        }

        let outcome = process_row(row, cells, sheets, completion, columns).await;

        match &outcome.status {
            RowStatus::Enriched => {
                report(format!(
                    "Successfully processed {} (row {})",
                    outcome.domain.as_deref().unwrap_or("unknown"),
                    row
                ));
            }
            RowStatus::SkippedIncomplete => {
                report(format!("Skipping row {}: incomplete data", row));
            }
            RowStatus::NoResult => {
                report(format!(
                    "No result for {} (row {})",
                    outcome.domain.as_deref().unwrap_or("unknown"),
                    row
                ));
            }
            RowStatus::Failed(reason) => {
                report(format!(
                    "Error processing row {} ({}): {}",
                    row,
                    outcome.domain.as_deref().unwrap_or("unknown"),
                    reason
                ));
            }
        }

        outcomes.push(outcome);

        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }

        // Rate limiting
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    if let Some(ref pb) = progress_bar {
        let enriched = outcomes
            .iter()
            .filter(|o| o.status == RowStatus::Enriched)
            .count();
        pb.finish_with_message(format!(
            "Done: {}/{} rows enriched",
            enriched,
            outcomes.len()
        ));
    }

    info!("Enrichment complete: {} rows examined", outcomes.len());
    Ok(outcomes)
}

async fn process_row(
    row: u32,
    cells: &[String],
    sheets: &SheetsClient,
    completion: &CompletionClient,
    columns: &ColumnMap,
) -> RowOutcome {
    // The name cell is read but unused downstream; only the domain drives
    // the query.
    if cells.len() < 2 {
        warn!("Skipping row {}: incomplete data", row);
        return RowOutcome {
            row,
            domain: None,
            status: RowStatus::SkippedIncomplete,
        };
    }

    let domain = cells[1].clone();
    info!("Processing {} (row {})", domain, row);

    let Some(profile) = completion.profile_domain(&domain).await else {
        return RowOutcome {
            row,
            domain: Some(domain),
            status: RowStatus::NoResult,
        };
    };

    match sheets
        .write_row(&columns.output_range(row), &columns.profile_row(&profile))
        .await
    {
        Ok(()) => {
            info!("Updated row {}", row);
            RowOutcome {
                row,
                domain: Some(domain),
                status: RowStatus::Enriched,
            }
        }
        Err(e) => {
            warn!("Error processing row {} ({}): {}", row, domain, e);
            RowOutcome {
                row,
                domain: Some(domain),
                status: RowStatus::Failed(e),
            }
        }
    }
}
