use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    services::report_service::{render_csv, render_pdf},
};

fn attachment(file_name: String) -> (&'static str, String) {
    (
        "Content-Disposition",
        format!("attachment; filename=\"{}\"", file_name),
    )
}

#[get("/api/quizzes/{share_link}/report")]
async fn get_report(
    state: web::Data<AppState>,
    share_link: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let report = state.report_service.quiz_report(&share_link).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[get("/api/quizzes/{share_link}/report.csv")]
async fn get_report_csv(
    state: web::Data<AppState>,
    share_link: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let report = state.report_service.quiz_report(&share_link).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(attachment(format!("{}_report.csv", share_link)))
        .body(render_csv(&report)))
}

#[get("/api/quizzes/{share_link}/report.pdf")]
async fn get_report_pdf(
    state: web::Data<AppState>,
    share_link: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let report = state.report_service.quiz_report(&share_link).await?;
    let bytes = web::block(move || render_pdf(&report))
        .await
        .map_err(|e| AppError::InternalError(format!("PDF rendering failed: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(attachment(format!("{}_report.pdf", share_link)))
        .body(bytes))
}
