use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
};

pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

/// Reads the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> AppResult<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))
}
