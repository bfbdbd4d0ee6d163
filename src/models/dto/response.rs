use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Difficulty, Quiz, QuizAttempt, QuizQuestion};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizCreated {
    pub quiz: Quiz,
    pub share_url: String,
}

/// Generated questions that were never stored.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizPreview {
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
    pub file_name: String,
}

impl QuizPreview {
    pub fn new(topic: &str, difficulty: Difficulty, questions: Vec<QuizQuestion>) -> Self {
        QuizPreview {
            file_name: format!("{}_{}_quiz.json", topic.trim(), difficulty),
            topic: topic.trim().to_string(),
            difficulty,
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionForTaking {
    pub index: i32,
    pub question: String,
    pub options: Vec<String>,
}

/// Public view of a quiz, without the answer key.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizForTaking {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub share_link: String,
    pub questions: Vec<QuestionForTaking>,
}

impl QuizForTaking {
    pub fn from_quiz(quiz: Quiz) -> Self {
        QuizForTaking {
            id: quiz.id,
            title: quiz.title,
            topic: quiz.topic,
            difficulty: quiz.difficulty,
            share_link: quiz.share_link,
            questions: quiz
                .questions
                .into_iter()
                .enumerate()
                .map(|(index, question)| QuestionForTaking {
                    index: index as i32,
                    question: question.question,
                    options: question.options,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub share_link: String,
    pub question_count: i32,
    pub attempt_count: i32,
    pub created_at: DateTime<Utc>,
}

impl QuizSummary {
    pub fn from_quiz(quiz: &Quiz, attempt_count: i32) -> Self {
        QuizSummary {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            topic: quiz.topic.clone(),
            difficulty: quiz.difficulty,
            share_link: quiz.share_link.clone(),
            question_count: quiz.question_count(),
            attempt_count,
            created_at: quiz.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AttemptResult {
    pub attempt: QuizAttempt,
    pub quiz_title: String,
    pub share_link: String,
    pub percentage: f64,
}

impl AttemptResult {
    pub fn new(attempt: QuizAttempt, quiz: &Quiz) -> Self {
        AttemptResult {
            percentage: attempt.percentage(),
            quiz_title: quiz.title.clone(),
            share_link: quiz.share_link.clone(),
            attempt,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizReport {
    pub quiz: QuizSummary,
    pub attempts: Vec<QuizAttempt>,
    pub total_attempts: i32,
    pub average_score: f64,
    pub average_percentage: f64,
}
