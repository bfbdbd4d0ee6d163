use std::{fmt, str::FromStr};

use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::domain::quiz_question::QuizQuestion;

pub const SHARE_LINK_LEN: usize = 11;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub share_link: String, // public handle, unique
    pub shuffle_options: bool,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Enum, Copy, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Lowercase form used when talking to the model.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(AppError::ValidationError(format!(
                "Unknown difficulty '{}', expected Easy, Medium or Hard",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Quiz {
    pub fn new(
        title: &str,
        topic: &str,
        difficulty: Difficulty,
        share_link: &str,
        shuffle_options: bool,
        questions: Vec<QuizQuestion>,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            topic: topic.to_string(),
            difficulty,
            share_link: share_link.to_string(),
            shuffle_options,
            questions,
            created_at: Utc::now(),
        }
    }

    pub fn question_count(&self) -> i32 {
        self.questions.len() as i32
    }
}

/// Random URL-safe token identifying a quiz publicly.
pub fn new_share_link() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHARE_LINK_LEN)
        .map(char::from)
        .collect()
}

pub fn default_title(topic: &str) -> String {
    format!("{} Quiz", topic.trim())
}
