// Run report generation

use crate::pipeline::{RowOutcome, RowStatus};

fn status_label(status: &RowStatus) -> &'static str {
    match status {
        RowStatus::Enriched => "enriched",
        RowStatus::SkippedIncomplete => "skipped (incomplete row)",
        RowStatus::NoResult => "no result",
        RowStatus::Failed(_) => "failed",
    }
}

/// Generate a run report from row outcomes
pub fn generate_enrich_report(outcomes: &[RowOutcome]) -> String {
    let mut report = String::new();

    let enriched = outcomes
        .iter()
        .filter(|o| o.status == RowStatus::Enriched)
        .count();
    let skipped = outcomes
        .iter()
        .filter(|o| o.status == RowStatus::SkippedIncomplete)
        .count();
    let no_result = outcomes
        .iter()
        .filter(|o| o.status == RowStatus::NoResult)
        .count();
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o.status, RowStatus::Failed(_)))
        .count();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Rows examined: {}\n", outcomes.len()));
    report.push_str(&format!("  Rows enriched: {}\n", enriched));
    report.push_str(&format!("  Rows skipped (incomplete): {}\n", skipped));
    report.push_str(&format!("  Rows with no result: {}\n", no_result));
    report.push_str(&format!("  Rows failed: {}\n", failed));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for outcome in outcomes {
        // Color code based on status
        let status_str = match &outcome.status {
            RowStatus::Enriched => format!("\x1b[32m{}\x1b[0m", status_label(&outcome.status)),
            RowStatus::NoResult => format!("\x1b[33m{}\x1b[0m", status_label(&outcome.status)),
            RowStatus::SkippedIncomplete => {
                format!("\x1b[90m{}\x1b[0m", status_label(&outcome.status))
            }
            RowStatus::Failed(_) => format!("\x1b[31m{}\x1b[0m", status_label(&outcome.status)),
        };

        let mut line = format!(
            "  row {:>4}  {}  {}",
            outcome.row,
            outcome.domain.as_deref().unwrap_or("-"),
            status_str
        );

        if let RowStatus::Failed(reason) = &outcome.status {
            line.push_str(&format!(" \x1b[90m{}\x1b[0m", reason));
        }

        report.push_str(&line);
        report.push('\n');
    }

    report
}
