//! Transport assistant - free text in, free text out
//!
//! The assistant never surfaces an upstream failure to the rider: any backend
//! error is logged and replaced by a fixed offline message.

pub mod backend;
pub mod prompts;

pub use backend::{AssistantBackend, GeminiBackend};
pub use prompts::build_system_instruction;

use std::time::Duration;

use campus_bus_types::AssistantError;
use tracing::warn;

/// Reply used whenever the upstream call fails
pub const OFFLINE_REPLY: &str =
    "The assistant is currently offline. Please check the live map for updates.";

/// Reply used when the upstream answers with no text
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that request.";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Assistant backend configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AssistantConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Assistant that answers rider questions with a fixed system instruction
pub struct Assistant<B> {
    backend: B,
    system_instruction: String,
}

impl<B: AssistantBackend> Assistant<B> {
    pub fn new(backend: B, system_instruction: String) -> Self {
        Self {
            backend,
            system_instruction,
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Ask the backend, substituting the offline or empty reply on failure
    pub async fn reply(&self, prompt: &str) -> String {
        match self.backend.ask(&self.system_instruction, prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) | Err(AssistantError::EmptyResponse) => EMPTY_REPLY.to_string(),
            Err(e) => {
                warn!(error = %e, "Assistant request failed, using offline reply");
                OFFLINE_REPLY.to_string()
            }
        }
    }
}
