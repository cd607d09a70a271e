use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::Settings;
use crate::metrics::HitCounter;
use crate::middleware::{HitCounterMiddleware, RequestLogger};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, handle_webhook, health_check,
    json_error_handler, list_chirps, login, metrics, query_error_handler, refresh, reset, revoke,
    update_user, validate_chirp,
};
use crate::store::ChirpyStore;

pub fn run(
    listener: TcpListener,
    store: Arc<dyn ChirpyStore>,
    hits: HitCounter,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let store: web::Data<dyn ChirpyStore> = web::Data::from(store);
    let hits_data = web::Data::new(hits.clone());
    let jwt_config = web::Data::new(settings.jwt.clone());
    let app_config = web::Data::new(settings.application.clone());
    let polka_config = web::Data::new(settings.polka.clone());
    let static_dir = settings.application.static_dir.clone();

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(RequestLogger)

            // Shared state
            .app_data(store.clone())
            .app_data(hits_data.clone())
            .app_data(jwt_config.clone())
            .app_data(app_config.clone())
            .app_data(polka_config.clone())
            // Bodies are decoded as JSON whatever their Content-Type
            .app_data(
                web::JsonConfig::default()
                    .content_type_required(false)
                    .error_handler(json_error_handler),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))

            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .service(
                        web::resource("/validate_chirp")
                            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                            .route(web::post().to(validate_chirp)),
                    )
                    .route("/users", web::post().to(create_user))
                    .route("/users", web::put().to(update_user))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .route("/chirps", web::post().to(create_chirp))
                    .route("/chirps", web::get().to(list_chirps))
                    .route("/chirps/{chirp_id}", web::get().to(get_chirp))
                    .route("/chirps/{chirp_id}", web::delete().to(delete_chirp))
                    .route("/polka/webhooks", web::post().to(handle_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )

            // Static files, every request counted
            .service(
                web::scope("/app")
                    .wrap(HitCounterMiddleware::new(hits.clone()))
                    .service(fs::Files::new("/", &static_dir).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
