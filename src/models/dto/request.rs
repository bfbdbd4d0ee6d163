use async_graphql::InputObject;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::quiz::{default_title, Difficulty};
use crate::services::quiz_cache::GenerationParams;

fn default_question_count() -> i32 {
    5
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct GenerateQuizRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub topic: String,

    #[serde(default)]
    #[graphql(default)]
    pub difficulty: Difficulty,

    #[serde(default = "default_question_count")]
    #[graphql(default = 5)]
    #[validate(range(min = 1))]
    pub question_count: i32,
}

impl GenerateQuizRequest {
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams::new(&self.topic, self.difficulty, self.question_count as usize)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct CreateQuizRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub topic: String,

    #[serde(default)]
    #[graphql(default)]
    pub difficulty: Difficulty,

    #[serde(default = "default_question_count")]
    #[graphql(default = 5)]
    #[validate(range(min = 1))]
    pub question_count: i32,

    #[serde(default)]
    #[graphql(default)]
    pub shuffle_options: bool,
}

impl CreateQuizRequest {
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams::new(&self.topic, self.difficulty, self.question_count as usize)
    }

    /// Blank titles fall back to "<topic> Quiz".
    pub fn resolved_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => default_title(&self.topic),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct SubmitAttemptRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub respondent_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub respondent_email: Option<String>,

    /// One entry per question, in quiz order. `null` marks an unanswered question.
    pub answers: Vec<Option<i32>>,
}

impl SubmitAttemptRequest {
    /// Forms post an empty string when the email box is left blank.
    pub fn normalized(mut self) -> Self {
        self.respondent_name = self.respondent_name.trim().to_string();
        self.respondent_email = self
            .respondent_email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());
        self
    }
}
