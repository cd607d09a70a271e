/// Admin Routes
///
/// Hit-count page and the development-only reset.

use actix_web::{http::header::ContentType, web, HttpResponse};

use crate::configuration::ApplicationSettings;
use crate::error::{AppError, AuthError};
use crate::metrics::{render_metrics_page, HitCounter};
use crate::store::ChirpyStore;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<HitCounter>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_metrics_page(hits.get()))
}

/// POST /admin/reset
///
/// Zeroes the hit counter and deletes every user (with their chirps and
/// refresh tokens). Only available when the platform is `dev`.
///
/// # Errors
/// - 403: not running on the dev platform
pub async fn reset(
    app_config: web::Data<ApplicationSettings>,
    hits: web::Data<HitCounter>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    if !app_config.is_dev() {
        return Err(AuthError::Forbidden("Access denied").into());
    }

    hits.reset();
    let deleted = store.delete_all_users().await?;

    tracing::warn!(deleted_users = deleted, "Application state reset");

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("Hits reset to 0 and database reset to initial state."))
}
