// OAuth2 credential handling for the Sheets API.
//
// The interactive consent flow is external provisioning: something else
// writes the token file. This module only loads it, refreshes an expired
// access token with the refresh_token grant, and persists the result.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub const DEFAULT_TOKEN_PATH: &str = "~/.config/prospect/token.json";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh this many seconds before the recorded expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl Credential {
    /// A credential with no recorded expiry is assumed valid.
    pub fn is_expired(&self) -> bool {
        match self.expiry {
            Some(expiry) => Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= expiry,
            None => false,
        }
    }
}

/// Source and sink for the cached OAuth2 credential.
///
/// Injected into handlers so tests can substitute an in-memory fake.
pub trait CredentialProvider {
    fn obtain(&self) -> Result<Credential, String>;
    fn persist(&self, credential: &Credential) -> Result<(), String>;
}

/// Credential cached as a JSON file between runs.
pub struct FileCredentialProvider {
    path: PathBuf,
}

impl FileCredentialProvider {
    /// `path` may contain a leading `~`.
    pub fn new(path: &str) -> Self {
        let expanded = shellexpand::tilde(path);
        Self {
            path: PathBuf::from(expanded.as_ref()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for FileCredentialProvider {
    fn obtain(&self) -> Result<Credential, String> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            format!(
                "Failed to read token file {}: {}. Provision it with an OAuth2 credential for the spreadsheets scope.",
                self.path.display(),
                e
            )
        })?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Invalid token file {}: {}", self.path.display(), e))
    }

    fn persist(&self, credential: &Credential) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        let content = serde_json::to_string_pretty(credential)
            .map_err(|e| format!("Failed to serialize credential: {}", e))?;
        fs::write(&self.path, content)
            .map_err(|e| format!("Failed to write token file {}: {}", self.path.display(), e))
    }
}

/// In-memory credential store for tests.
pub struct MemoryCredentialProvider {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialProvider {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            slot: Mutex::new(credential),
        }
    }

    /// The credential most recently persisted (or seeded).
    pub fn stored(&self) -> Option<Credential> {
        self.slot.lock().unwrap().clone()
    }
}

impl CredentialProvider for MemoryCredentialProvider {
    fn obtain(&self) -> Result<Credential, String> {
        self.slot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| "No credential available".to_string())
    }

    fn persist(&self, credential: &Credential) -> Result<(), String> {
        *self.slot.lock().unwrap() = Some(credential.clone());
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Obtain a ready-to-use credential, refreshing and persisting it first if
/// the cached one has expired.
pub async fn ensure_fresh(
    provider: &dyn CredentialProvider,
    http: &Client,
) -> Result<Credential, String> {
    let mut credential = provider.obtain()?;

    if !credential.is_expired() {
        debug!("Cached access token still valid");
        return Ok(credential);
    }

    let refresh_token = credential.refresh_token.clone().ok_or_else(|| {
        "Access token expired and no refresh token is available; re-provision the token file"
            .to_string()
    })?;

    debug!("Refreshing access token via {}", credential.token_uri);
    let params = [
        ("client_id", credential.client_id.as_str()),
        ("client_secret", credential.client_secret.as_str()),
        ("refresh_token", refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];

    let response = http
        .post(&credential.token_uri)
        .form(&params)
        .send()
        .await
        .map_err(|e| format!("Token refresh request failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Token refresh failed with status {}: {}", status, body));
    }

    let refreshed: RefreshResponse = response
        .json()
        .await
        .map_err(|e| format!("Token refresh response was not valid JSON: {}", e))?;

    credential.access_token = refreshed.access_token;
    credential.expiry = refreshed
        .expires_in
        .map(|secs| Utc::now() + Duration::seconds(secs));

    provider.persist(&credential)?;
    info!("Refreshed access token");

    Ok(credential)
}
