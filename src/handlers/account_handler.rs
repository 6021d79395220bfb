use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{
            LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest, RegisterRequest,
        },
        response::{MessageBody, Page, UserDto},
    },
};

#[post("/users/register")]
async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.account_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(Page::new("Registration", UserDto::from(user))))
}

#[get("/users/verify/{email}/{key}")]
async fn verify(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (email, key) = path.into_inner();
    let session = state.account_service.verify(&email, &key).await?;
    Ok(HttpResponse::Ok().json(Page::new("Account activated", session)))
}

#[post("/users/login")]
async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let session = state.account_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Page::new("Login", session)))
}

#[post("/users/password_reset")]
async fn password_reset(
    state: web::Data<AppState>,
    request: web::Json<PasswordResetRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .account_service
        .request_password_reset(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Page::new(
        "Password recovery",
        MessageBody::new("If the account is active, a reset link has been sent"),
    )))
}

#[post("/users/password_reset/{token}")]
async fn password_reset_confirm(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<PasswordResetConfirmRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .account_service
        .reset_password(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Page::new(
        "Password changed",
        MessageBody::new("The password has been changed"),
    )))
}
