use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Text-in, text-out access to the generative model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> AppResult<String>;
}

/// Chat-completions client for any OpenAI-compatible endpoint (Gemini by default).
pub struct OpenAiQuizModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiQuizModel {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.model_api_base)
            .with_api_key(config.model_api_key.expose_secret());

        Self {
            client: Client::with_config(openai_config),
            model: config.model_name.clone(),
            temperature: config.model_temperature,
        }
    }
}

#[async_trait]
impl QuizModel for OpenAiQuizModel {
    async fn complete(&self, system: &str, prompt: &str) -> AppResult<String> {
        let request = json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ]
        });

        let completion: ChatCompletion = self
            .client
            .chat()
            .create_byot(request)
            .await
            .map_err(|e| AppError::GenerationError(format!("Model request failed: {}", e)))?;

        first_choice_content(completion)
    }
}

fn first_choice_content(completion: ChatCompletion) -> AppResult<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AppError::GenerationError("Model returned an empty response".to_string()))
}
