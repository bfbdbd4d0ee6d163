use actix_web::{get, post, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::request::SubmitAttemptRequest};

#[post("/api/quizzes/{share_link}/attempts")]
async fn submit_attempt(
    state: web::Data<AppState>,
    share_link: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .quiz_service
        .submit_attempt(&share_link, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

#[get("/api/attempts/{id}")]
async fn get_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let result = state.quiz_service.get_attempt_result(&id).await?;
    Ok(HttpResponse::Ok().json(result))
}
