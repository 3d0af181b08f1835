use crate::error::{SnapshotError, SnapshotResult};
use crate::provider::{Message, SnapshotProvider};
use crate::response::ProviderResponse;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use shwift_core::config::{Settings, API_KEY_ENV};
use shwift_core::SYSTEM_PERSONA;
use std::time::Instant;

/// Model every snapshot is generated with.
pub const SNAPSHOT_MODEL: &str = "gpt-4.1-mini";

/// Configuration for the OpenAI provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key; requests are refused while this is unset
    pub api_key: Option<SecretString>,
    /// Base URL of the Responses API
    pub base_url: String,
    /// Optional organization ID
    pub organization: Option<String>,
}

impl From<&Settings> for OpenAIConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            api_key: settings.openai_api_key().cloned(),
            base_url: settings.llm.base_url.clone(),
            organization: settings.llm.organization.clone(),
        }
    }
}

/// Snapshot provider backed by the OpenAI Responses API.
///
/// The HTTP client is built once and shared; the transport's default timeout
/// behaviour applies.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> SnapshotResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    fn api_key(&self) -> SnapshotResult<&SecretString> {
        self.config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                SnapshotError::Configuration(format!(
                    "{} not found. Please set it as an environment variable or in the \
                     configuration secrets before requesting a snapshot.",
                    API_KEY_ENV
                ))
            })
    }

    async fn send(&self, api_key: &SecretString, prompt: &str) -> SnapshotResult<ProviderResponse> {
        let request = ResponsesRequest {
            model: SNAPSHOT_MODEL,
            input: vec![Message::system(SYSTEM_PERSONA), Message::user(prompt)],
        };

        let mut request_builder = self
            .client
            .post(format!("{}/responses", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(api_key.expose_secret())
            .json(&request);

        if let Some(org) = &self.config.organization {
            request_builder = request_builder.header("OpenAI-Organization", org);
        }

        let response = request_builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SnapshotError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        tracing::debug!(model = SNAPSHOT_MODEL, bytes = body.len(), "Raw Responses API body received");

        Ok(serde_json::from_str::<ProviderResponse>(&body)?)
    }
}

#[async_trait]
impl SnapshotProvider for OpenAIProvider {
    async fn request_snapshot(&self, prompt: &str) -> SnapshotResult<String> {
        let api_key = self.api_key()?;
        let start = Instant::now();

        let response = self.send(api_key, prompt).await.map_err(|e| {
            tracing::warn!(error = %e, "Snapshot request failed");
            e
        })?;

        if matches!(response, ProviderResponse::Unrecognized(_)) {
            tracing::warn!("Responses API body had no recognisable text shape");
        }
        let text = response.extract_text();

        tracing::info!(
            model = SNAPSHOT_MODEL,
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = text.chars().count(),
            "Snapshot received"
        );
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        SNAPSHOT_MODEL
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> OpenAIConfig {
        OpenAIConfig {
            api_key: api_key.map(|k| SecretString::from(k.to_string())),
            // Nothing listens here; a request attempt would fail as Transport.
            base_url: "http://127.0.0.1:9".to_string(),
            organization: None,
        }
    }

    #[test]
    fn request_body_carries_model_and_two_messages() {
        let request = ResponsesRequest {
            model: SNAPSHOT_MODEL,
            input: vec![Message::system(SYSTEM_PERSONA), Message::user("prompt text")],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4.1-mini");
        assert_eq!(json["input"][0]["role"], "system");
        assert_eq!(json["input"][0]["content"], SYSTEM_PERSONA);
        assert_eq!(json["input"][1]["role"], "user");
        assert_eq!(json["input"][1]["content"], "prompt text");
    }

    #[tokio::test]
    async fn missing_key_short_circuits_with_configuration_error() {
        let provider = OpenAIProvider::new(config(None)).unwrap();
        assert!(!provider.is_configured());
        let err = provider.request_snapshot("hello").await.unwrap_err();
        assert!(err.is_configuration(), "unexpected error: {err}");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn blank_key_counts_as_missing() {
        let provider = OpenAIProvider::new(config(Some("   "))).unwrap();
        let err = provider.request_snapshot("hello").await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn config_is_taken_from_settings() {
        let mut settings = Settings::default();
        settings.llm.base_url = "http://localhost:8080/v1".into();
        settings.secrets.openai_api_key = Some(SecretString::from("sk-test".to_string()));
        let provider = OpenAIProvider::new(OpenAIConfig::from(&settings)).unwrap();
        assert!(provider.is_configured());
        assert_eq!(provider.model_name(), SNAPSHOT_MODEL);
        assert_eq!(provider.provider_name(), "openai");
    }
}
