pub mod auth;
pub mod columns;
pub mod pipeline;
pub mod report;
pub mod sheets;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
                                          __
    ____  _________  _________  ___  _____/ /_
   / __ \/ ___/ __ \/ ___/ __ \/ _ \/ ___/ __/
  / /_/ / /  / /_/ (__  ) /_/ /  __/ /__/ /_
 / .___/_/   \____/____/ .___/\___/\___/\__/
/_/                   /_/
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "  {} {}",
        "company domain enrichment".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!();
}
