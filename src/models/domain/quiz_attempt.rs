use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub respondent_name: String,
    pub respondent_email: Option<String>,
    pub score: i32,
    pub total_questions: i32,
    pub answers: Vec<AttemptAnswer>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct AttemptAnswer {
    pub question: String,
    pub selected_index: Option<i32>,
    pub selected_answer: Option<String>,
    pub correct_index: i32,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl QuizAttempt {
    pub fn percentage(&self) -> f64 {
        percentage(self.score, self.total_questions)
    }
}

pub fn percentage(score: i32, total: i32) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(total) * 100.0
}
