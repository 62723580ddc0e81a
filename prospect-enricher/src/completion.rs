use crate::error::{EnrichError, Result};
use crate::profile::{CompanyProfile, extract_profile};
use crate::prompt::{DEFAULT_MODEL, build_prompt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Client for the chat-completion endpoint that answers company research
/// prompts.
pub struct CompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, 30)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent(concat!("Prospect/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs((timeout_secs / 2).max(1)))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the API base URL (tests point this at a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send one prompt and return the raw reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!("POST {} (model: {})", url, self.model);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: ChatResponse = response.json().await?;
        decoded
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| EnrichError::MissingContent("choices[0].message.content".to_string()))
    }

    /// Research one domain and return its profile.
    ///
    /// An unparseable reply surfaces as [`EnrichError::ExtractionFailed`]
    /// carrying the start of the reply text.
    pub async fn fetch_profile(&self, domain: &str) -> Result<CompanyProfile> {
        let prompt = build_prompt(domain);
        let reply = self.complete(&prompt).await?;

        extract_profile(&reply).ok_or_else(|| {
            EnrichError::ExtractionFailed(format!(
                "no JSON object recovered from reply for {} (reply starts: {:?})",
                domain,
                reply.chars().take(120).collect::<String>()
            ))
        })
    }

    /// Research one domain and return its profile, or `None`.
    ///
    /// Transport failures, non-success statuses, malformed response
    /// envelopes and unparseable replies all collapse to `None` here so a
    /// batch run never aborts on a single bad row. Each failure is logged
    /// with the domain.
    pub async fn profile_domain(&self, domain: &str) -> Option<CompanyProfile> {
        match self.fetch_profile(domain).await {
            Ok(profile) => {
                info!("Parsed profile for {}", domain);
                Some(profile)
            }
            Err(e) => {
                warn!("Enrichment failed for {}: {}", domain, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat_body(content: &str) -> serde_json::Value {
        json!({
            "id": "cmpl-test",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    fn test_client(server: &MockServer) -> CompletionClient {
        CompletionClient::new("test-key").with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_complete_returns_reply_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({"model": DEFAULT_MODEL})))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("hello")))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let reply = client.complete("say hello").await.unwrap();
        assert_eq!(reply, "hello");
    }

    #[tokio::test]
    async fn test_complete_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let err = client.complete("anything").await.unwrap_err();
        match err {
            EnrichError::ApiStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("Expected ApiStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_empty_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "x", "choices": []})),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let err = client.complete("anything").await.unwrap_err();
        assert!(matches!(err, EnrichError::MissingContent(_)));
    }

    #[tokio::test]
    async fn test_profile_domain_with_fenced_reply() {
        let mock_server = MockServer::start().await;

        let reply = "Here is the result in JSON format:\n```json\n\
            {\"company_overview\": \"Acme makes everything\",\
             \"company_type\": \"Product-based\",\
             \"company_business\": \"B2B\",\
             \"company_industry\": \"Manufacturing\",\
             \"sources\": \"https://www.crunchbase.com/organization/acme\"}\n```";

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(reply)))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let profile = client.profile_domain("acme.com").await.unwrap();
        assert_eq!(profile.field("company_type"), "Product-based");
        assert_eq!(
            profile.field("sources"),
            "https://www.crunchbase.com/organization/acme"
        );
    }

    #[tokio::test]
    async fn test_profile_domain_server_error_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        assert!(client.profile_domain("acme.com").await.is_none());
    }

    #[tokio::test]
    async fn test_profile_domain_unparseable_reply_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_body("Sorry, I could not find that company.")),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        assert!(client.profile_domain("acme.com").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_profile_unparseable_reply_is_extraction_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_body("No JSON here, sorry.")),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let err = client.fetch_profile("acme.com").await.unwrap_err();
        match err {
            EnrichError::ExtractionFailed(detail) => {
                assert!(detail.contains("acme.com"));
                assert!(detail.contains("No JSON here"));
            }
            other => panic!("Expected ExtractionFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_with_timeout_one_second_still_connects() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("ok")))
            .mount(&mock_server)
            .await;

        // The derived connect timeout must never round down to zero.
        let client = CompletionClient::with_timeout("test-key", 1).with_base_url(mock_server.uri());
        let reply = client.complete("ping").await.unwrap();
        assert_eq!(reply, "ok");
    }
}
