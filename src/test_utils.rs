use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::{
    app_state::AppState, config::Config, db::Database, errors::AppResult,
    services::model_service::QuizModel,
};

static REQUESTED_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Generate (\d+) ").expect("REQUESTED_COUNT is a valid regex pattern"));

pub const STUB_OPTIONS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

/// A well-formed model reply. Question `i` has its correct answer at index `i % 4`.
pub fn quiz_reply(count: usize) -> String {
    let questions: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "question": format!("Stub question {}?", i + 1),
                "options": STUB_OPTIONS,
                "correct_answer": STUB_OPTIONS[i % STUB_OPTIONS.len()],
            })
        })
        .collect();
    json!({ "questions": questions }).to_string()
}

/// Answers every prompt with as many questions as it asks for and counts the calls.
pub struct StubQuizModel {
    calls: AtomicUsize,
}

impl Default for StubQuizModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StubQuizModel {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuizModel for StubQuizModel {
    async fn complete(&self, _system: &str, prompt: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let count = REQUESTED_COUNT
            .captures(prompt)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(1);
        Ok(quiz_reply(count))
    }
}

pub async fn test_state(model: StubQuizModel) -> AppState {
    test_state_with(Arc::new(model)).await
}

pub async fn test_state_with(model: Arc<dyn QuizModel>) -> AppState {
    let db = Database::connect_in_memory()
        .await
        .expect("in-memory database should open");
    db.migrate().await.expect("migrations should apply");
    AppState::with_parts(Config::test_config(), db, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quiz_generator::parse_generated_quiz;

    #[test]
    fn quiz_reply_is_accepted_by_the_parser() {
        let questions = parse_generated_quiz(&quiz_reply(6), 6).unwrap();
        assert_eq!(questions[5].correct_index, 1);
    }

    #[actix_web::test]
    async fn stub_answers_the_requested_count() {
        let stub = StubQuizModel::new();
        let reply = stub
            .complete("system", "Generate 3 easy multiple choice questions about x.")
            .await
            .unwrap();

        assert_eq!(parse_generated_quiz(&reply, 3).unwrap().len(), 3);
        assert_eq!(stub.calls(), 1);
    }
}
