use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Thin client for the Sheets v4 values endpoints.
pub struct SheetsClient {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsClient {
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!("Prospect/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Override the API base URL (tests point this at a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id,
            range
        )
    }

    /// Read an A1 range as rows of cell strings.
    ///
    /// An empty range comes back without a `values` key and becomes an
    /// empty vec. Rows may carry fewer cells than the span width; they are
    /// passed through as-is.
    pub async fn read_rows(&self, range: &str) -> Result<Vec<Vec<String>>, String> {
        let url = self.values_url(range);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| format!("Sheet read failed for range {}: {}", range, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "Sheet read failed with status {} for range {}",
                status, range
            ));
        }

        let decoded: ValueRange = response
            .json()
            .await
            .map_err(|e| format!("Sheet read returned invalid JSON for range {}: {}", range, e))?;

        Ok(decoded
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    /// Overwrite a single-row A1 range with literal string values.
    ///
    /// Uses RAW input semantics: cells are stored exactly as given, never
    /// reinterpreted as formulas.
    pub async fn write_row(&self, range: &str, values: &[String]) -> Result<(), String> {
        let url = self.values_url(range);
        debug!("PUT {}", url);

        let body = json!({ "values": [values] });

        let response = self
            .client
            .put(&url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Sheet write failed for range {}: {}", range, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "Sheet write failed with status {} for range {}",
                status, range
            ));
        }

        Ok(())
    }
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
