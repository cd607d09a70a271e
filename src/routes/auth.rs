/// Authentication Routes
///
/// Login, access-token refresh and refresh-token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth::{
    generate_access_token, generate_refresh_token, get_bearer_token, revoke_refresh_token,
    save_refresh_token, user_for_refresh_token, verify_password,
};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ErrorContext, ValidationError};
use crate::routes::users::UserResponse;
use crate::store::ChirpyStore;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Optional shorter lifetime for the access token
    pub expires_in_seconds: Option<i64>,
}

/// User record plus both tokens
#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Freshly minted access token
#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Requested lifetime if it is positive and no longer than the configured one
fn access_token_lifetime(requested: Option<i64>, configured: i64) -> Duration {
    match requested {
        Some(seconds) if seconds > 0 && seconds <= configured => Duration::seconds(seconds),
        _ => Duration::seconds(configured),
    }
}

/// POST /api/login
///
/// # Errors
/// - 400: malformed JSON
/// - 401: unknown email or wrong password (same response for both)
pub async fn login(
    form: web::Json<LoginRequest>,
    store: web::Data<dyn ChirpyStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let user = store
        .get_user_by_email(form.email.trim())
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    verify_password(&form.password, &user.hashed_password)?;

    let lifetime = access_token_lifetime(form.expires_in_seconds, jwt_config.access_token_expiry);
    let token = generate_access_token(&user.id, &jwt_config.secret, lifetime)?;
    let refresh_token = generate_refresh_token()?;
    save_refresh_token(
        store.get_ref(),
        user.id,
        &refresh_token,
        jwt_config.refresh_token_expiry,
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserResponse::from(user),
        token,
        refresh_token,
    }))
}

/// POST /api/refresh
///
/// Exchanges `Authorization: Bearer <refresh_token>` for a new access token.
/// The refresh token itself is not rotated.
///
/// # Errors
/// - 400: missing Authorization header
/// - 401: unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    store: web::Data<dyn ChirpyStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let refresh_token =
        get_bearer_token(req.headers()).map_err(|_| ValidationError::MissingAuthHeader)?;
    let user_id = user_for_refresh_token(store.get_ref(), &refresh_token).await?;

    let token = generate_access_token(
        &user_id,
        &jwt_config.secret,
        Duration::seconds(jwt_config.access_token_expiry),
    )?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// # Errors
/// - 400: missing Authorization header
/// - 404: the refresh token was never issued
pub async fn revoke(
    req: HttpRequest,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revoke");

    let refresh_token =
        get_bearer_token(req.headers()).map_err(|_| ValidationError::MissingAuthHeader)?;
    revoke_refresh_token(store.get_ref(), &refresh_token).await?;

    tracing::info!(request_id = %context.request_id, "Refresh token revoked");

    Ok(HttpResponse::NoContent().finish())
}
