use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{AttemptAnswer, QuizAttempt},
};

#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;
    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>>;
    async fn count_by_quiz(&self, quiz_id: &str) -> AppResult<i64>;
}

#[derive(Debug, FromRow)]
struct QuizAttemptRow {
    id: String,
    quiz_id: String,
    respondent_name: String,
    respondent_email: Option<String>,
    score: i32,
    total_questions: i32,
    answers: String,
    completed_at: DateTime<Utc>,
}

impl TryFrom<QuizAttemptRow> for QuizAttempt {
    type Error = AppError;

    fn try_from(row: QuizAttemptRow) -> Result<Self, Self::Error> {
        let answers: Vec<AttemptAnswer> = serde_json::from_str(&row.answers)?;

        Ok(QuizAttempt {
            id: row.id,
            quiz_id: row.quiz_id,
            respondent_name: row.respondent_name,
            respondent_email: row.respondent_email,
            score: row.score,
            total_questions: row.total_questions,
            answers,
            completed_at: row.completed_at,
        })
    }
}

const SELECT_ATTEMPT: &str = "SELECT id, quiz_id, respondent_name, respondent_email, score, total_questions, answers, completed_at FROM quiz_attempts";

pub struct SqliteQuizAttemptRepository {
    pool: SqlitePool,
}

impl SqliteQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl QuizAttemptRepository for SqliteQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let answers = serde_json::to_string(&attempt.answers)?;

        sqlx::query(
            "INSERT INTO quiz_attempts (id, quiz_id, respondent_name, respondent_email, score, total_questions, answers, completed_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&attempt.id)
        .bind(&attempt.quiz_id)
        .bind(&attempt.respondent_name)
        .bind(&attempt.respondent_email)
        .bind(attempt.score)
        .bind(attempt.total_questions)
        .bind(answers)
        .bind(attempt.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let row: Option<QuizAttemptRow> = sqlx::query_as(&format!("{SELECT_ATTEMPT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(QuizAttempt::try_from).transpose()
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let rows: Vec<QuizAttemptRow> = sqlx::query_as(&format!(
            "{SELECT_ATTEMPT} WHERE quiz_id = ? ORDER BY completed_at DESC, rowid DESC"
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(QuizAttempt::try_from).collect()
    }

    async fn count_by_quiz(&self, quiz_id: &str) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quiz_attempts WHERE quiz_id = ?")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
