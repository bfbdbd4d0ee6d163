use crate::errors::{AppError, AppResult};
use crate::models::domain::{AttemptAnswer, Quiz, QuizAttempt, QuizQuestion};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN is a valid regex pattern"));

/// Lowercases, trims and collapses runs of whitespace to a single space.
pub fn normalize_answer(answer: &str) -> String {
    WHITESPACE_RUN
        .replace_all(answer.trim(), " ")
        .to_lowercase()
}

pub struct QuizAttemptService;

impl QuizAttemptService {
    /// Grade a quiz attempt. `selected` holds one entry per question, in quiz order.
    pub fn grade_attempt(
        quiz: &Quiz,
        selected: &[Option<i32>],
    ) -> AppResult<(i32, Vec<AttemptAnswer>)> {
        if selected.len() != quiz.questions.len() {
            return Err(AppError::ValidationError(format!(
                "Expected {} answers, got {}",
                quiz.questions.len(),
                selected.len()
            )));
        }

        let mut score = 0;
        let mut answers = Vec::with_capacity(selected.len());

        for (position, (question, choice)) in quiz.questions.iter().zip(selected).enumerate() {
            let answer = Self::grade_question(position, question, *choice)?;
            if answer.is_correct {
                score += 1;
            }
            answers.push(answer);
        }

        Ok((score, answers))
    }

    fn grade_question(
        position: usize,
        question: &QuizQuestion,
        choice: Option<i32>,
    ) -> AppResult<AttemptAnswer> {
        if let Some(index) = choice {
            if !question.is_valid_choice(index) {
                return Err(AppError::ValidationError(format!(
                    "Answer {} for question {} is not one of its {} choices",
                    index,
                    position + 1,
                    question.options.len()
                )));
            }
        }

        let is_correct = choice == Some(question.correct_index);

        Ok(AttemptAnswer {
            question: question.question.clone(),
            selected_index: choice,
            selected_answer: choice
                .and_then(|index| question.option_text(index))
                .map(str::to_string),
            correct_index: question.correct_index,
            correct_answer: question.correct_answer().to_string(),
            is_correct,
        })
    }

    /// Create a new quiz attempt from grading results
    pub fn create_attempt(
        quiz: &Quiz,
        respondent_name: &str,
        respondent_email: Option<String>,
        score: i32,
        answers: Vec<AttemptAnswer>,
    ) -> QuizAttempt {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            respondent_name: respondent_name.to_string(),
            respondent_email,
            score,
            total_questions: quiz.question_count(),
            answers,
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Difficulty;

    fn quiz() -> Quiz {
        let question = |text: &str, correct_index: i32| QuizQuestion {
            question: text.to_string(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_index,
        };
        Quiz::new(
            "Letters Quiz",
            "Letters",
            Difficulty::Easy,
            "lettersabc1",
            false,
            vec![question("first", 0), question("second", 2), question("third", 3)],
        )
    }

    #[test]
    fn normalize_answer_collapses_whitespace_and_case() {
        assert_eq!(normalize_answer("  New   York\tCity "), "new york city");
        assert_eq!(normalize_answer(""), "");
    }

    #[test]
    fn all_correct_scores_full_marks() {
        let (score, answers) =
            QuizAttemptService::grade_attempt(&quiz(), &[Some(0), Some(2), Some(3)]).unwrap();

        assert_eq!(score, 3);
        assert!(answers.iter().all(|a| a.is_correct));
    }

    #[test]
    fn score_counts_only_matching_answers() {
        let (score, answers) =
            QuizAttemptService::grade_attempt(&quiz(), &[Some(0), Some(1), None]).unwrap();

        assert_eq!(score, 1);
        assert_eq!(score as usize, answers.iter().filter(|a| a.is_correct).count());
        assert_eq!(answers[1].selected_answer.as_deref(), Some("B"));
        assert_eq!(answers[1].correct_answer, "C");
        assert_eq!(answers[2].selected_index, None);
        assert!(!answers[2].is_correct);
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let result = QuizAttemptService::grade_attempt(&quiz(), &[Some(0), Some(4), Some(3)]);
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let result = QuizAttemptService::grade_attempt(&quiz(), &[Some(-1), Some(2), Some(3)]);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn wrong_number_of_answers_is_rejected() {
        let result = QuizAttemptService::grade_attempt(&quiz(), &[Some(0)]);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn create_attempt_records_totals() {
        let quiz = quiz();
        let (score, answers) =
            QuizAttemptService::grade_attempt(&quiz, &[Some(0), Some(2), None]).unwrap();
        let attempt = QuizAttemptService::create_attempt(
            &quiz,
            "Grace",
            Some("grace@example.com".to_string()),
            score,
            answers,
        );

        assert_eq!(attempt.quiz_id, quiz.id);
        assert_eq!(attempt.score, 2);
        assert_eq!(attempt.total_questions, 3);
        assert_eq!(attempt.answers.len(), 3);
    }
}
