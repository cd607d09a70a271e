use std::future::Future;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Response header carrying the id every log line of the request is tagged with
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: Uuid;
}

/// Install the global JSON subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies.
/// Call once, at process start.
pub fn init_telemetry(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
        .init();
}

/// Run `fut` with `id` as the current request id
pub async fn scope_request_id<F: Future>(id: Uuid, fut: F) -> F::Output {
    REQUEST_ID.scope(id, fut).await
}

/// Id of the request being served, or a fresh one outside any request
pub fn current_request_id() -> String {
    REQUEST_ID
        .try_with(|id| id.to_string())
        .unwrap_or_else(|_| Uuid::new_v4().to_string())
}
