pub mod completion;
pub mod error;
pub mod profile;
pub mod prompt;

pub use completion::CompletionClient;
pub use error::EnrichError;
pub use profile::{CompanyProfile, extract_profile};
