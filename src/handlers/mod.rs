pub mod attempt_handler;
pub mod graphql_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod report_handler;

use actix_web::web;

use crate::errors::AppError;

pub use attempt_handler::{get_attempt, submit_attempt};
pub use graphql_handler::{graphql, graphiql};
pub use health_handler::{health_check, health_check_ready};
pub use quiz_handler::{create_quiz, delete_quiz, get_quiz, list_quizzes, preview_quiz};
pub use report_handler::{get_report, get_report_csv, get_report_pdf};

/// Registers every route. Expects `AppState` and `Schema` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid request body: {}", err)).into()
    });

    cfg.app_data(json_config)
        .service(health_check)
        .service(health_check_ready)
        .service(create_quiz)
        .service(list_quizzes)
        .service(get_report)
        .service(get_report_csv)
        .service(get_report_pdf)
        .service(submit_attempt)
        .service(get_quiz)
        .service(delete_quiz)
        .service(get_attempt)
        .service(preview_quiz)
        .service(graphql)
        .service(graphiql);
}
