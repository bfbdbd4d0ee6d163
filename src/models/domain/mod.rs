pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub use quiz::{Difficulty, Quiz};
pub use quiz_attempt::{AttemptAnswer, QuizAttempt};
pub use quiz_question::QuizQuestion;
