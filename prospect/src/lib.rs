// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{resolve_api_key, resolve_end_row, resolve_spreadsheet_id};

// Re-export pipeline functionality from prospect-core
pub use prospect_core::pipeline::{
    EnrichOptions, EnrichProgressCallback, RowOutcome, RowStatus, execute_enrich,
};
pub use prospect_core::report::generate_enrich_report;
