use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizQuestion},
};

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_by_share_link(&self, share_link: &str) -> AppResult<Option<Quiz>>;
    async fn share_link_exists(&self, share_link: &str) -> AppResult<bool>;
    async fn list_all(&self) -> AppResult<Vec<Quiz>>;
    /// Every quiz, newest first, paired with its number of attempts.
    async fn list_with_attempt_counts(&self) -> AppResult<Vec<(Quiz, i64)>>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

#[derive(Debug, FromRow)]
struct QuizRow {
    id: String,
    title: String,
    topic: String,
    difficulty: String,
    share_link: String,
    shuffle_options: bool,
    questions: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuizRow> for Quiz {
    type Error = AppError;

    fn try_from(row: QuizRow) -> Result<Self, Self::Error> {
        let questions: Vec<QuizQuestion> = serde_json::from_str(&row.questions)?;

        Ok(Quiz {
            id: row.id,
            title: row.title,
            topic: row.topic,
            difficulty: row.difficulty.parse()?,
            share_link: row.share_link,
            shuffle_options: row.shuffle_options,
            questions,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct QuizWithCountRow {
    #[sqlx(flatten)]
    quiz: QuizRow,
    attempt_count: i64,
}

const SELECT_QUIZ: &str = "SELECT id, title, topic, difficulty, share_link, shuffle_options, questions, created_at FROM quizzes";

pub struct SqliteQuizRepository {
    pool: SqlitePool,
}

impl SqliteQuizRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl QuizRepository for SqliteQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let questions = serde_json::to_string(&quiz.questions)?;

        sqlx::query(
            "INSERT INTO quizzes (id, title, topic, difficulty, share_link, shuffle_options, questions, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&quiz.id)
        .bind(&quiz.title)
        .bind(&quiz.topic)
        .bind(quiz.difficulty.as_str())
        .bind(&quiz.share_link)
        .bind(quiz.shuffle_options)
        .bind(questions)
        .bind(quiz.created_at)
        .execute(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let row: Option<QuizRow> = sqlx::query_as(&format!("{SELECT_QUIZ} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Quiz::try_from).transpose()
    }

    async fn find_by_share_link(&self, share_link: &str) -> AppResult<Option<Quiz>> {
        let row: Option<QuizRow> = sqlx::query_as(&format!("{SELECT_QUIZ} WHERE share_link = ?"))
            .bind(share_link)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Quiz::try_from).transpose()
    }

    async fn share_link_exists(&self, share_link: &str) -> AppResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quizzes WHERE share_link = ?")
            .bind(share_link)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn list_all(&self) -> AppResult<Vec<Quiz>> {
        let rows: Vec<QuizRow> =
            sqlx::query_as(&format!("{SELECT_QUIZ} ORDER BY created_at DESC, rowid DESC"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(Quiz::try_from).collect()
    }

    async fn list_with_attempt_counts(&self) -> AppResult<Vec<(Quiz, i64)>> {
        let rows: Vec<QuizWithCountRow> = sqlx::query_as(
            "SELECT q.id AS id, q.title AS title, q.topic AS topic, q.difficulty AS difficulty, \
             q.share_link AS share_link, q.shuffle_options AS shuffle_options, \
             q.questions AS questions, q.created_at AS created_at, \
             COUNT(a.id) AS attempt_count \
             FROM quizzes q LEFT JOIN quiz_attempts a ON a.quiz_id = q.id \
             GROUP BY q.id \
             ORDER BY q.created_at DESC, q.rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Ok((Quiz::try_from(row.quiz)?, row.attempt_count)))
            .collect()
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM quiz_attempts WHERE quiz_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                id
            )));
        }

        tx.commit().await?;
        Ok(())
    }
}
