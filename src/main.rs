use std::net::TcpListener;
use std::sync::Arc;

use chirpy::configuration::get_configuration;
use chirpy::metrics::HitCounter;
use chirpy::startup::run;
use chirpy::store::{ChirpyStore, InMemoryStore, PostgresStore};
use chirpy::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry("info");

    tracing::info!("Starting application");

    // Missing secrets abort startup here
    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!(
                platform = %config.application.platform,
                in_memory = config.database.in_memory,
                "Configuration loaded successfully"
            );
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let store: Arc<dyn ChirpyStore> = if configuration.database.in_memory {
        tracing::warn!("Using in-memory store; data is lost on restart");
        Arc::new(InMemoryStore::new())
    } else {
        tracing::info!("Attempting to connect to database");
        let store = PostgresStore::connect(&configuration.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create connection pool: {}", e);
                std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "Database connection error",
                )
            })?;
        tracing::info!("Database connection pool created successfully");
        Arc::new(store)
    };

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, store, HitCounter::new(), configuration)?;
    server.await
}
