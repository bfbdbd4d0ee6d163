use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{SqliteQuizAttemptRepository, SqliteQuizRepository},
    services::{
        model_service::{OpenAiQuizModel, QuizModel},
        quiz_cache::QuizCache,
        quiz_generator::QuizGenerator,
        quiz_service::QuizService,
        report_service::ReportService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub report_service: Arc<ReportService>,
    pub db: Arc<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        db.migrate().await?;

        let model = Arc::new(OpenAiQuizModel::new(&config));
        log::info!(
            "Using model '{}' at {}",
            config.model_name,
            config.model_api_base
        );

        Ok(Self::with_parts(config, db, model))
    }

    /// Wires the services around an existing database and model.
    pub fn with_parts(config: Config, db: Database, model: Arc<dyn QuizModel>) -> Self {
        let config = Arc::new(config);

        let quiz_repository = Arc::new(SqliteQuizRepository::new(&db));
        let attempt_repository = Arc::new(SqliteQuizAttemptRepository::new(&db));

        let generator = Arc::new(QuizGenerator::new(
            model,
            QuizCache::from_ttl_secs(config.quiz_cache_ttl_secs),
            config.generation_max_attempts,
        ));

        let quiz_service = Arc::new(QuizService::new(
            quiz_repository.clone(),
            attempt_repository.clone(),
            generator,
            config,
        ));
        let report_service = Arc::new(ReportService::new(quiz_repository, attempt_repository));

        Self {
            quiz_service,
            report_service,
            db: Arc::new(db),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[actix_web::test]
    async fn test_with_parts_wires_services() {
        let state = crate::test_utils::test_state(crate::test_utils::StubQuizModel::new()).await;

        assert!(state.db.health_check().await.is_ok());
        assert!(state.quiz_service.list_quizzes().await.unwrap().is_empty());
    }
}
