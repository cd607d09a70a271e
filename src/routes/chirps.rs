/// Chirp Routes
///
/// Posting, listing, fetching and deleting chirps, plus the standalone
/// body validator.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext, ValidationError};
use crate::models::{Chirp, SortOrder};
use crate::store::ChirpyStore;
use crate::validators::validate_chirp_body;

/// Body of `POST /api/chirps` and `POST /api/validate_chirp`
#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct CleanedChirpResponse {
    pub cleaned_body: String,
}

/// Query string of `GET /api/chirps`
#[derive(Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub sort: SortOrder,
}

fn parse_chirp_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidFormat("chirpID").into())
}

/// POST /api/chirps
///
/// # Errors
/// - 400: malformed JSON, empty or overlong body
/// - 401: missing or invalid access token
pub async fn create_chirp(
    form: web::Json<ChirpRequest>,
    caller: AuthenticatedUser,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_creation").with_user_id(caller.user_id);

    let body = validate_chirp_body(&form.body)?;
    let chirp = store
        .create_chirp(&body, caller.user_id)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(
        request_id = %context.request_id,
        chirp_id = %chirp.id,
        user_id = %caller.user_id,
        "Chirp created"
    );

    Ok(HttpResponse::Created().json(ChirpResponse::from(chirp)))
}

/// GET /api/chirps?author_id=<uuid>&sort=asc|desc
pub async fn list_chirps(
    query: web::Query<ListChirpsQuery>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let chirps = store.list_chirps(query.author_id, query.sort).await?;

    let response: Vec<ChirpResponse> = chirps.into_iter().map(ChirpResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/chirps/{chirp_id}
///
/// # Errors
/// - 400: the id is not a UUID
/// - 404: no such chirp
pub async fn get_chirp(
    path: web::Path<String>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;

    let chirp = store
        .get_chirp(chirp_id)
        .await?
        .ok_or(AppError::Database(DatabaseError::NotFound("Chirp")))?;

    Ok(HttpResponse::Ok().json(ChirpResponse::from(chirp)))
}

/// DELETE /api/chirps/{chirp_id}
///
/// Only the author may delete a chirp.
///
/// # Errors
/// - 401: missing or invalid access token
/// - 403: caller is not the author
/// - 404: no such chirp
pub async fn delete_chirp(
    path: web::Path<String>,
    caller: AuthenticatedUser,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_deletion").with_user_id(caller.user_id);
    let chirp_id = parse_chirp_id(&path)?;

    let chirp = store
        .get_chirp(chirp_id)
        .await?
        .ok_or(AppError::Database(DatabaseError::NotFound("Chirp")))?;

    if chirp.user_id != caller.user_id {
        let error = AppError::Auth(AuthError::Forbidden("user did not author that chirp"));
        context.log_error(&error);
        return Err(error);
    }

    store.delete_chirp(chirp_id).await?;

    tracing::info!(
        request_id = %context.request_id,
        chirp_id = %chirp_id,
        "Chirp deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/validate_chirp
///
/// Runs the chirp body rules without storing anything.
pub async fn validate_chirp(form: web::Json<ChirpRequest>) -> Result<HttpResponse, AppError> {
    let cleaned_body = validate_chirp_body(&form.body)?;
    Ok(HttpResponse::Ok().json(CleanedChirpResponse { cleaned_body }))
}
