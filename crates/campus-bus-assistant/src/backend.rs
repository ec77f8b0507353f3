//! Assistant backends
//!
//! [`GeminiBackend`] calls the Generative Language `generateContent` endpoint
//! directly with a reusable `reqwest::Client`.

use std::future::Future;

use campus_bus_types::AssistantError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::AssistantConfig;

/// Trait for sending a single prompt to a generative model
pub trait AssistantBackend: Send + Sync {
    fn ask(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;
}

/// Gemini REST backend
pub struct GeminiBackend {
    config: AssistantConfig,
    http: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: serde_json::Value,
    contents: serde_json::Value,
    generation_config: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    (!text.trim().is_empty()).then_some(text)
}

impl AssistantBackend for GeminiBackend {
    async fn ask(&self, system_instruction: &str, prompt: &str) -> Result<String, AssistantError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingApiKey)?;

        let body = GenerateRequest {
            system_instruction: json!({ "parts": [{ "text": system_instruction }] }),
            contents: json!([{ "role": "user", "parts": [{ "text": prompt }] }]),
            generation_config: json!({ "temperature": self.config.temperature }),
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Unavailable(format!("HTTP {}", status.as_u16())));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        let text = extract_text(parsed).ok_or(AssistantError::EmptyResponse)?;
        debug!(model = %self.config.model, chars = text.len(), "Assistant replied");
        Ok(text)
    }
}
