use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    middleware::SessionId,
    models::dto::{
        request::AnswerRequest,
        response::{CategoriesBody, Page, QuizStepBody},
    },
};

/// Landing page. Visiting it abandons any attempt in progress.
#[get("/")]
async fn index(state: web::Data<AppState>, session: SessionId) -> Result<HttpResponse, AppError> {
    if let Err(err) = state.quiz_service.abandon(session.as_str()).await {
        log::warn!("Could not abandon attempt of session {}: {}", session.as_str(), err);
    }

    let categories = state.catalog_service.list_categories().await?;
    Ok(HttpResponse::Ok().json(Page::new("Categories", CategoriesBody { categories })))
}

#[get("/test_body/{slug}")]
async fn test_body(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    session: SessionId,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let step = state
        .quiz_service
        .next_question(session.as_str(), &slug)
        .await?;

    let body = QuizStepBody::from(step);
    Ok(HttpResponse::Ok().json(Page::new(body.progress.title.clone(), body)))
}

#[post("/answers/{question_id}")]
async fn answer(
    state: web::Data<AppState>,
    question_id: web::Path<String>,
    request: web::Json<AnswerRequest>,
    session: SessionId,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let graded = state
        .quiz_service
        .grade_answer(session.as_str(), &question_id, &request.answers)
        .await?;

    let title = graded
        .progress
        .as_ref()
        .map(|p| p.title.clone())
        .unwrap_or_else(|| "Answer".to_string());
    Ok(HttpResponse::Ok().json(Page::new(title, graded)))
}
