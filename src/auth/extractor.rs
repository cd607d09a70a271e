/// Access-token extractor for protected handlers
///
/// Pulls the bearer token out of the request and validates it against the
/// configured secret. A missing header and a bad token both end in 401.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::{get_bearer_token, validate_access_token};
use crate::configuration::JwtSettings;
use crate::error::AppError;

/// The user a valid access token was issued to
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let jwt_config = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| AppError::Internal("JWT settings not registered".to_string()))?;

    let token = get_bearer_token(req.headers())?;
    let user_id = validate_access_token(&token, &jwt_config.secret)?;

    tracing::debug!(user_id = %user_id, "JWT validated successfully");
    Ok(AuthenticatedUser { user_id })
}
