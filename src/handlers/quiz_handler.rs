use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{CreateQuizRequest, GenerateQuizRequest},
};

#[post("/api/quizzes")]
async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let created = state.quiz_service.create_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/api/quizzes")]
async fn list_quizzes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_quizzes().await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/api/quizzes/{share_link}")]
async fn get_quiz(
    state: web::Data<AppState>,
    share_link: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz_for_taking(&share_link).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/api/quizzes/{id}")]
async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Generated questions with answers, for download. Nothing is stored.
#[post("/api/previews")]
async fn preview_quiz(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let preview = state.quiz_service.preview_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .insert_header((
            "Content-Disposition",
            format!("inline; filename=\"{}\"", preview.file_name),
        ))
        .json(preview))
}
