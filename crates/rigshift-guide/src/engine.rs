use std::sync::Arc;

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, StructuredOutputFormat};

use rigshift_core::AiSettings;

use crate::error::GuideError;
use crate::schema::SCHEMA_NAME;

/// The opaque text-generation boundary: a prompt plus a response schema in,
/// raw response text out.
#[async_trait]
pub trait TutorialBackend: Send + Sync {
    async fn complete(&self, prompt: &str, schema: &serde_json::Value) -> Result<String, GuideError>;
}

#[async_trait]
impl<T: TutorialBackend + ?Sized> TutorialBackend for Arc<T> {
    async fn complete(&self, prompt: &str, schema: &serde_json::Value) -> Result<String, GuideError> {
        (**self).complete(prompt, schema).await
    }
}

fn map_backend(provider: &str) -> Result<LLMBackend, GuideError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(GuideError::Request(format!("unknown provider: {other}"))),
    }
}

/// Backend calling a hosted or local model through the `llm` crate.
#[derive(Debug, Clone)]
pub struct LlmBackend {
    settings: AiSettings,
}

impl LlmBackend {
    pub fn new(settings: AiSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl TutorialBackend for LlmBackend {
    async fn complete(&self, prompt: &str, schema: &serde_json::Value) -> Result<String, GuideError> {
        let settings = &self.settings;
        let backend = map_backend(&settings.provider)?;

        let format: StructuredOutputFormat = serde_json::from_value(serde_json::json!({
            "name": SCHEMA_NAME,
            "schema": schema,
        }))
        .map_err(|e| GuideError::Request(format!("response schema: {e}")))?;

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&settings.model)
            .temperature(settings.temperature)
            .schema(format);

        if !settings.api_key.is_empty() {
            builder = builder.api_key(&settings.api_key);
        }

        let llm = builder
            .build()
            .map_err(|e| GuideError::Request(format!("build LLM: {e}")))?;

        tracing::info!(provider = %settings.provider, model = %settings.model, "sending tutorial request");

        let messages = vec![ChatMessage::user().content(prompt).build()];
        let response = llm
            .chat(&messages)
            .await
            .map_err(|e| GuideError::Request(format!("chat: {e}")))?;

        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err(GuideError::Format("LLM returned empty text".to_string())),
            None => Err(GuideError::Format("LLM returned no text".to_string())),
        }
    }
}
