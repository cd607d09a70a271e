/// Payment provider webhooks
///
/// Polka notifies us when a user pays for Chirpy Red. Requests are
/// authenticated with `Authorization: ApiKey <key>`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::get_api_key;
use crate::configuration::PolkaSettings;
use crate::error::{AppError, AuthError, ValidationError};
use crate::store::ChirpyStore;

pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: Uuid,
}

/// POST /api/polka/webhooks
///
/// # Errors
/// - 401: missing or wrong API key
/// - 400: malformed JSON
/// - 404: the user to upgrade does not exist
pub async fn handle_webhook(
    req: HttpRequest,
    body: web::Bytes,
    polka_config: web::Data<PolkaSettings>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    // Authenticate before looking at the payload
    let api_key = get_api_key(req.headers())?;
    if api_key != polka_config.api_key {
        return Err(AuthError::InvalidApiKey.into());
    }

    let webhook: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| ValidationError::MalformedJson(e.to_string()))?;

    if webhook.event != USER_UPGRADED_EVENT {
        tracing::debug!(event = %webhook.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user = store.upgrade_user(webhook.data.user_id).await?;
    tracing::info!(user_id = %user.id, "User upgraded to Chirpy Red");

    Ok(HttpResponse::NoContent().finish())
}
