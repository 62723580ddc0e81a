use clap::ArgMatches;
use colored::Colorize;
use prospect_core::auth::{CredentialProvider, FileCredentialProvider, ensure_fresh};
use prospect_core::columns::ColumnMap;
use prospect_core::pipeline::{EnrichOptions, execute_enrich};
use prospect_core::report::generate_enrich_report;
use prospect_core::sheets::SheetsClient;
use prospect_enricher::CompletionClient;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber;
use url::Url;

// Helper functions for the run handler

/// Resolve the inclusive end row from --end and --batch.
///
/// --end wins when both are given; --batch alone resolves to
/// start + batch - 1. Neither yields `None`, a user error.
pub fn resolve_end_row(start: u32, end: Option<u32>, batch: Option<u32>) -> Option<u32> {
    end.or_else(|| batch.map(|count| start.saturating_add(count).saturating_sub(1)))
}

/// Resolve the completion API key from the flag or the environment.
pub fn resolve_api_key(flag: Option<&String>) -> Result<String, String> {
    flag.cloned()
        .or_else(|| std::env::var("PPLX_API_KEY").ok())
        .ok_or_else(|| "No API key: pass --api-key or set PPLX_API_KEY".to_string())
}

/// Resolve the spreadsheet id from the flag or the environment.
pub fn resolve_spreadsheet_id(flag: Option<&String>) -> Result<String, String> {
    flag.cloned()
        .or_else(|| std::env::var("PROSPECT_SPREADSHEET_ID").ok())
        .ok_or_else(|| {
            "No spreadsheet id: pass --spreadsheet-id or set PROSPECT_SPREADSHEET_ID".to_string()
        })
}

pub async fn handle_run(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let start = *sub_matches.get_one::<u32>("start").unwrap();
    let end = sub_matches.get_one::<u32>("end").copied();
    let batch = sub_matches.get_one::<u32>("batch").copied();

    let Some(end) = resolve_end_row(start, end, batch) else {
        // Reported on stdout and the process still exits 0, matching the
        // behavior the surrounding tooling expects.
        println!("Error: Please specify either --end or --batch");
        return;
    };

    let api_key = match resolve_api_key(sub_matches.get_one::<String>("api-key")) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let spreadsheet_id =
        match resolve_spreadsheet_id(sub_matches.get_one::<String>("spreadsheet-id")) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("{} {}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        };

    let token_file = sub_matches.get_one::<String>("token-file").unwrap();
    let provider = FileCredentialProvider::new(token_file);
    let http = reqwest::Client::new();
    let credential = match ensure_fresh(&provider, &http).await {
        Ok(credential) => credential,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };
    println!("{} Credential ready", "✓".green().bold());

    let mut sheets = SheetsClient::new(spreadsheet_id, credential.access_token);
    if let Some(base) = sub_matches.get_one::<Url>("sheets-base") {
        sheets = sheets.with_base_url(base.as_str().trim_end_matches('/'));
    }

    let model = sub_matches.get_one::<String>("model").unwrap();
    let mut completion = CompletionClient::new(api_key).with_model(model);
    if let Some(base) = sub_matches.get_one::<Url>("api-base") {
        completion = completion.with_base_url(base.as_str().trim_end_matches('/'));
    }

    let delay_ms = *sub_matches.get_one::<u64>("delay-ms").unwrap();

    println!("\nProcessing companies from row {} to {}", start, end);
    println!("Model: {}", model);
    println!("Delay: {} ms\n", delay_ms);

    let options = EnrichOptions {
        start_row: start,
        end_row: end,
        delay: Duration::from_millis(delay_ms),
        show_progress_bars: true,
    };

    let progress_callback = Arc::new(|msg: String| {
        println!("{}", msg);
    });

    let outcomes = match execute_enrich(
        options,
        &sheets,
        &completion,
        &ColumnMap::default(),
        Some(progress_callback),
    )
    .await
    {
        Ok(outcomes) => outcomes,
        Err(e) => {
            // Per-row failures never reach here; only the bulk read can.
            eprintln!("{} Enrichment failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    println!("\n{} Processing completed!", "✓".green().bold());
    print!("{}", generate_enrich_report(&outcomes));
}

pub async fn handle_auth(sub_matches: &ArgMatches) {
    let token_file = sub_matches.get_one::<String>("token-file").unwrap();
    let refresh = sub_matches.get_flag("refresh");
    let provider = FileCredentialProvider::new(token_file);

    let credential = match provider.obtain() {
        Ok(credential) => credential,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    println!(
        "{} Token file: {}",
        "✓".green().bold(),
        provider.path().display().to_string().bright_white()
    );

    let state = if credential.is_expired() {
        "expired".yellow().bold()
    } else {
        "valid".green().bold()
    };
    println!("{} Access token: {}", "→".blue(), state);

    match credential.expiry {
        Some(expiry) => println!("{} Expiry: {}", "→".blue(), expiry.to_rfc3339()),
        None => println!("{} Expiry: not recorded", "→".blue()),
    }
    println!(
        "{} Refresh token: {}",
        "→".blue(),
        if credential.refresh_token.is_some() {
            "present"
        } else {
            "absent"
        }
    );

    if refresh && credential.is_expired() {
        let http = reqwest::Client::new();
        match ensure_fresh(&provider, &http).await {
            Ok(_) => println!("{} Access token refreshed", "✓".green().bold()),
            Err(e) => {
                eprintln!("{} {}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        }
    }
}
