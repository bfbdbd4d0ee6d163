use secrecy::{ExposeSecret, SecretString};
use std::env;

use crate::errors::{AppError, AppResult};

pub const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub public_base_url: String,
    pub model_api_key: SecretString,
    pub model_api_base: String,
    pub model_name: String,
    pub model_temperature: f32,
    pub generation_max_attempts: u32,
    pub quiz_cache_ttl_secs: u64, // 0 keeps entries for the process lifetime
    pub max_questions: u8,
}

impl Config {
    pub fn from_env() -> Self {
        let web_server_host =
            env::var("WEB_SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let web_server_port = env::var("WEB_SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://quiz.db?mode=rwc".to_string()),
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://{}:{}", web_server_host, web_server_port)),
            web_server_host,
            web_server_port,
            model_api_key: SecretString::from(
                env::var("MODEL_API_KEY")
                    .or_else(|_| env::var("GOOGLE_API_KEY"))
                    .unwrap_or_default(),
            ),
            model_api_base: env::var("MODEL_API_BASE")
                .unwrap_or_else(|_| GEMINI_OPENAI_BASE.to_string()),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            model_temperature: parse_env("MODEL_TEMPERATURE", 0.7),
            generation_max_attempts: parse_env("GENERATION_MAX_ATTEMPTS", 3u32).max(1),
            quiz_cache_ttl_secs: parse_env("QUIZ_CACHE_TTL_SECS", 600),
            max_questions: parse_env("MAX_QUESTIONS", 10u8).max(1),
        }
    }

    /// Checks the settings the server cannot run without.
    pub fn validate_for_production(&self) -> AppResult<()> {
        if self.model_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::InternalError(
                "MODEL_API_KEY (or GOOGLE_API_KEY) must be set".to_string(),
            ));
        }
        if self.database_url.trim().is_empty() {
            return Err(AppError::InternalError("DATABASE_URL must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn share_url(&self, share_link: &str) -> String {
        format!("{}/api/quizzes/{}", self.public_base_url, share_link)
    }

    /// In-memory database and a dummy model key.
    pub fn test_config() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 5000,
            public_base_url: "http://localhost:5000".to_string(),
            model_api_key: SecretString::from("test-model-key".to_string()),
            model_api_base: "http://localhost:9/v1".to_string(),
            model_name: "test-model".to_string(),
            model_temperature: 0.0,
            generation_max_attempts: 3,
            quiz_cache_ttl_secs: 600,
            max_questions: 10,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
