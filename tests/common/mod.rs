#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use serde_json::json;

use quizforge::{
    app_state::AppState, config::Config, db::Database, errors::AppResult,
    services::model_service::QuizModel,
};

pub const OPTIONS: [&str; 4] = ["red", "green", "blue", "yellow"];

/// Replies with `count` questions; question `i` is answered by option `i % 4`.
pub struct CountingModel {
    pub count: usize,
    pub calls: AtomicUsize,
}

impl CountingModel {
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            count,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuizModel for CountingModel {
    async fn complete(&self, _system: &str, _prompt: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let questions: Vec<_> = (0..self.count)
            .map(|i| {
                json!({
                    "question": format!("Which colour is number {}?", i + 1),
                    "options": OPTIONS,
                    "correct_answer": OPTIONS[i % OPTIONS.len()],
                })
            })
            .collect();
        // wrapped in prose the way chat models often reply
        Ok(format!(
            "Here is your quiz:\n```json\n{}\n```",
            json!({ "topic": "colours", "difficulty": "easy", "questions": questions })
        ))
    }
}

pub async fn database() -> Database {
    let db = Database::connect_in_memory()
        .await
        .expect("in-memory database should open");
    db.migrate().await.expect("migrations should apply");
    db
}

pub async fn app_state(model: Arc<dyn QuizModel>) -> AppState {
    AppState::with_parts(Config::test_config(), database().await, model)
}
