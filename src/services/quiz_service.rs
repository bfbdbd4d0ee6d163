use std::sync::Arc;

use validator::Validate;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::{
        domain::{quiz::new_share_link, Quiz, QuizQuestion},
        dto::{
            request::{CreateQuizRequest, GenerateQuizRequest, SubmitAttemptRequest},
            response::{AttemptResult, QuizCreated, QuizForTaking, QuizPreview, QuizSummary},
        },
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{quiz_attempt_service::QuizAttemptService, quiz_generator::QuizGenerator},
};

const SHARE_LINK_ATTEMPTS: usize = 5;

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    generator: Arc<QuizGenerator>,
    config: Arc<Config>,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        generator: Arc<QuizGenerator>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            generator,
            config,
        }
    }

    pub async fn create_quiz(&self, request: CreateQuizRequest) -> AppResult<QuizCreated> {
        request.validate()?;
        self.check_question_count(request.question_count)?;

        let params = request.generation_params();
        let mut questions = self.generator.generate(&params).await?;
        if request.shuffle_options {
            shuffle_questions(&mut questions);
        }

        let share_link = self.unique_share_link().await?;
        let quiz = Quiz::new(
            &request.resolved_title(),
            &params.topic,
            params.difficulty,
            &share_link,
            request.shuffle_options,
            questions,
        );

        let quiz = self.quizzes.create(quiz).await?;
        log::info!(
            "Created quiz {} ('{}', {} questions) at {}",
            quiz.id,
            quiz.topic,
            quiz.questions.len(),
            quiz.share_link
        );

        Ok(QuizCreated {
            share_url: self.config.share_url(&quiz.share_link),
            quiz,
        })
    }

    /// Generates without persisting. Shares the cache with `create_quiz`.
    pub async fn preview_quiz(&self, request: GenerateQuizRequest) -> AppResult<QuizPreview> {
        request.validate()?;
        self.check_question_count(request.question_count)?;

        let params = request.generation_params();
        let questions = self.generator.generate(&params).await?;

        Ok(QuizPreview::new(&params.topic, params.difficulty, questions))
    }

    pub async fn get_by_share_link(&self, share_link: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_share_link(share_link)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", share_link)))
    }

    pub async fn get_quiz_for_taking(&self, share_link: &str) -> AppResult<QuizForTaking> {
        let quiz = self.get_by_share_link(share_link).await?;
        Ok(QuizForTaking::from_quiz(quiz))
    }

    pub async fn list_quizzes(&self) -> AppResult<Vec<QuizSummary>> {
        let quizzes = self.quizzes.list_with_attempt_counts().await?;

        Ok(quizzes
            .iter()
            .map(|(quiz, attempt_count)| QuizSummary::from_quiz(quiz, *attempt_count as i32))
            .collect())
    }

    pub async fn delete_quiz(&self, id: &str) -> AppResult<()> {
        self.quizzes.delete(id).await?;
        log::info!("Deleted quiz {}", id);
        Ok(())
    }

    pub async fn submit_attempt(
        &self,
        share_link: &str,
        request: SubmitAttemptRequest,
    ) -> AppResult<AttemptResult> {
        let request = request.normalized();
        request.validate()?;

        let quiz = self.get_by_share_link(share_link).await?;
        let (score, answers) = QuizAttemptService::grade_attempt(&quiz, &request.answers)?;

        let attempt = QuizAttemptService::create_attempt(
            &quiz,
            &request.respondent_name,
            request.respondent_email,
            score,
            answers,
        );
        let attempt = self.attempts.create(attempt).await?;

        log::info!(
            "Recorded attempt {} on quiz {}: {}/{}",
            attempt.id,
            quiz.id,
            attempt.score,
            attempt.total_questions
        );

        Ok(AttemptResult::new(attempt, &quiz))
    }

    pub async fn get_attempt_result(&self, id: &str) -> AppResult<AttemptResult> {
        let attempt = self
            .attempts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attempt '{}' not found", id)))?;

        let quiz = self
            .quizzes
            .find_by_id(&attempt.quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", attempt.quiz_id)))?;

        Ok(AttemptResult::new(attempt, &quiz))
    }

    fn check_question_count(&self, count: i32) -> AppResult<()> {
        let max = i32::from(self.config.max_questions);
        if count > max {
            return Err(AppError::ValidationError(format!(
                "A quiz can have at most {} questions, {} requested",
                max, count
            )));
        }
        Ok(())
    }

    async fn unique_share_link(&self) -> AppResult<String> {
        for _ in 0..SHARE_LINK_ATTEMPTS {
            let candidate = new_share_link();
            if !self.quizzes.share_link_exists(&candidate).await? {
                return Ok(candidate);
            }
            log::debug!("Share link collision on {}", candidate);
        }

        Err(AppError::InternalError(
            "Could not allocate a unique share link".to_string(),
        ))
    }
}

fn shuffle_questions(questions: &mut [QuizQuestion]) {
    let mut rng = rand::rng();
    for question in questions.iter_mut() {
        question.shuffle_options(&mut rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::Database,
        models::domain::Difficulty,
        repositories::{SqliteQuizAttemptRepository, SqliteQuizRepository},
        services::{model_service::MockQuizModel, quiz_cache::QuizCache},
    };
    use serde_json::json;

    fn reply() -> String {
        json!({ "questions": [
            { "question": "2 + 2?", "options": ["3", "4", "5", "6"], "correct_answer": "4" },
            { "question": "Capital of Italy?", "options": ["Rome", "Milan", "Turin", "Naples"], "correct_answer": "Rome" }
        ]})
        .to_string()
    }

    async fn service(model: MockQuizModel) -> QuizService {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let generator = QuizGenerator::new(Arc::new(model), QuizCache::new(None), 2);
        QuizService::new(
            Arc::new(SqliteQuizRepository::new(&db)),
            Arc::new(SqliteQuizAttemptRepository::new(&db)),
            Arc::new(generator),
            Arc::new(Config::test_config()),
        )
    }

    fn answering_model(times: usize) -> MockQuizModel {
        let mut model = MockQuizModel::new();
        model
            .expect_complete()
            .times(times)
            .returning(|_, _| Ok(reply()));
        model
    }

    fn create_request() -> CreateQuizRequest {
        CreateQuizRequest {
            title: None,
            topic: "General knowledge".to_string(),
            difficulty: Difficulty::Easy,
            question_count: 2,
            shuffle_options: false,
        }
    }

    #[actix_web::test]
    async fn create_then_take_and_score() {
        let service = service(answering_model(1)).await;

        let created = service.create_quiz(create_request()).await.unwrap();
        assert_eq!(created.quiz.title, "General knowledge Quiz");
        assert!(created.share_url.ends_with(&created.quiz.share_link));

        let view = service
            .get_quiz_for_taking(&created.quiz.share_link)
            .await
            .unwrap();
        assert_eq!(view.questions.len(), 2);

        let result = service
            .submit_attempt(
                &created.quiz.share_link,
                SubmitAttemptRequest {
                    respondent_name: "Ada".to_string(),
                    respondent_email: None,
                    answers: vec![Some(1), Some(3)],
                },
            )
            .await
            .unwrap();
        assert_eq!(result.attempt.score, 1);
        assert_eq!(result.percentage, 50.0);

        let fetched = service.get_attempt_result(&result.attempt.id).await.unwrap();
        assert_eq!(fetched.attempt.score, 1);
        assert_eq!(fetched.quiz_title, "General knowledge Quiz");

        let summaries = service.list_quizzes().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].attempt_count, 1);
    }

    #[actix_web::test]
    async fn shuffled_quiz_keeps_answer_key_consistent() {
        let service = service(answering_model(1)).await;
        let mut request = create_request();
        request.shuffle_options = true;

        let created = service.create_quiz(request).await.unwrap();

        assert!(created.quiz.shuffle_options);
        assert_eq!(created.quiz.questions[0].correct_answer(), "4");
        assert_eq!(created.quiz.questions[1].correct_answer(), "Rome");
    }

    #[actix_web::test]
    async fn too_many_questions_never_reaches_the_model() {
        let service = service(answering_model(0)).await;
        let mut request = create_request();
        request.question_count = 11;

        assert!(matches!(
            service.create_quiz(request).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_web::test]
    async fn preview_is_not_persisted_and_shares_cache() {
        let service = service(answering_model(1)).await;

        let preview = service
            .preview_quiz(GenerateQuizRequest {
                topic: "General knowledge".to_string(),
                difficulty: Difficulty::Easy,
                question_count: 2,
            })
            .await
            .unwrap();
        assert_eq!(preview.file_name, "General knowledge_Easy_quiz.json");
        assert!(service.list_quizzes().await.unwrap().is_empty());

        // same parameters: served from cache, the mock allows a single call
        service.create_quiz(create_request()).await.unwrap();
    }

    #[actix_web::test]
    async fn unknown_links_and_ids_are_not_found() {
        let service = service(answering_model(0)).await;

        assert!(matches!(
            service.get_quiz_for_taking("missing").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_attempt_result("missing").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_quiz("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn invalid_submission_is_rejected() {
        let service = service(answering_model(1)).await;
        let created = service.create_quiz(create_request()).await.unwrap();

        let blank_name = service
            .submit_attempt(
                &created.quiz.share_link,
                SubmitAttemptRequest {
                    respondent_name: "  ".to_string(),
                    respondent_email: None,
                    answers: vec![Some(0), Some(0)],
                },
            )
            .await;
        assert!(matches!(blank_name, Err(AppError::ValidationError(_))));

        let short = service
            .submit_attempt(
                &created.quiz.share_link,
                SubmitAttemptRequest {
                    respondent_name: "Ada".to_string(),
                    respondent_email: None,
                    answers: vec![Some(0)],
                },
            )
            .await;
        assert!(matches!(short, Err(AppError::ValidationError(_))));
    }
}
