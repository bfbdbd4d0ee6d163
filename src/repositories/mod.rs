pub mod quiz_attempt_repository;
pub mod quiz_repository;

pub use quiz_attempt_repository::{QuizAttemptRepository, SqliteQuizAttemptRepository};
pub use quiz_repository::{QuizRepository, SqliteQuizRepository};
