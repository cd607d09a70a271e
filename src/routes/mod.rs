mod admin;
mod auth;
mod chirps;
mod health_check;
mod polka;
mod users;

pub use admin::{metrics, reset};
pub use auth::{login, refresh, revoke, LoginRequest, LoginResponse, TokenResponse};
pub use chirps::{
    create_chirp, delete_chirp, get_chirp, list_chirps, validate_chirp, ChirpRequest,
    ChirpResponse, CleanedChirpResponse,
};
pub use health_check::health_check;
pub use polka::{handle_webhook, WebhookData, WebhookRequest, USER_UPGRADED_EVENT};
pub use users::{create_user, update_user, UserRequest, UserResponse};

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::HttpRequest;

use crate::error::{AppError, ValidationError};

/// Routes JSON body failures through `AppError` so clients get `{"error": ...}`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let error = match err {
        JsonPayloadError::ContentType => ValidationError::UnsupportedContentType,
        other => ValidationError::MalformedJson(other.to_string()),
    };
    AppError::Validation(error).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationError::MalformedQuery(err.to_string())).into()
}
