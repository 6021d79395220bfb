use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};

use crate::{
    auth::{utils::bearer_token, Claims, JwtService},
    errors::{AppError, AppResult},
};

/// A request carrying a valid bearer token.
pub struct AuthenticatedUser(pub Claims);

/// A request whose bearer token belongs to an administrator.
pub struct AdminUser(pub Claims);

fn claims_from_request(req: &HttpRequest) -> AppResult<Claims> {
    let jwt_service = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::InternalError("JWT service not configured".to_string()))?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    jwt_service.validate_token(bearer_token(header)?)
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req).map(AuthenticatedUser))
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = claims_from_request(req).and_then(|claims| {
            crate::auth::require_admin(&claims)?;
            Ok(claims)
        });

        ready(claims.map(AdminUser))
    }
}
