use crate::CLAP_STYLING;
use clap::{arg, command};
use prospect_core::auth::DEFAULT_TOKEN_PATH;
use prospect_enricher::prompt::DEFAULT_MODEL;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("prospect")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("prospect")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("run")
                .about(
                    "Enrich a row range of the prospect sheet: query the completion API once \
                per domain and write the profile fields back to the same row.",
                )
                .arg(
                    arg!(-s --"start" <ROW>)
                        .required(false)
                        .help("First row to process, 1-indexed (row 1 is the header)")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("2"),
                )
                .arg(
                    arg!(-e --"end" <ROW>)
                        .required(false)
                        .help("Last row to process, inclusive")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(-b --"batch" <COUNT>)
                        .required(false)
                        .help(
                            "Number of rows to process; resolves the end row to \
                        start + batch - 1 when --end is not given",
                        )
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--"spreadsheet-id" <ID>)
                        .required(false)
                        .help("Target spreadsheet id (default: $PROSPECT_SPREADSHEET_ID)"),
                )
                .arg(
                    arg!(--"api-key" <KEY>)
                        .required(false)
                        .help("Completion API key (default: $PPLX_API_KEY)"),
                )
                .arg(
                    arg!(-m --"model" <MODEL>)
                        .required(false)
                        .help("Completion model identifier")
                        .default_value(DEFAULT_MODEL),
                )
                .arg(
                    arg!(--"delay-ms" <MILLIS>)
                        .required(false)
                        .help("Fixed pause between rows, a courtesy rate limit toward the API")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("1000"),
                )
                .arg(
                    arg!(--"token-file" <PATH>)
                        .required(false)
                        .help("OAuth2 token file for the Sheets API")
                        .default_value(DEFAULT_TOKEN_PATH),
                )
                .arg(
                    arg!(--"api-base" <URL>)
                        .required(false)
                        .help("Override the completion API base URL")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"sheets-base" <URL>)
                        .required(false)
                        .help("Override the Sheets API base URL")
                        .value_parser(clap::value_parser!(Url)),
                ),
        )
        .subcommand(
            command!("auth")
                .about("Inspect the cached Sheets credential and optionally refresh it")
                .arg(
                    arg!(--"token-file" <PATH>)
                        .required(false)
                        .help("OAuth2 token file for the Sheets API")
                        .default_value(DEFAULT_TOKEN_PATH),
                )
                .arg(
                    arg!(--"refresh")
                        .required(false)
                        .help("Refresh the access token if it has expired")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
