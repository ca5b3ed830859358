use actix_multipart::form::MultipartFormConfig;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use dormsync::api::ApiClient;
use dormsync::auth::rate_limit::RateLimiter;
use dormsync::config::AppConfig;
use dormsync::routes;

/// Receipt uploads are capped at 10 MB per file; leave room for the other fields.
const UPLOAD_LIMIT: usize = 12 * 1024 * 1024;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Session key from SESSION_KEY keeps sessions valid across restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let api = ApiClient::new(&config.api_base_url, config.api_timeout).map_err(|e| {
        log::error!("Could not create the API client: {e}");
        std::io::Error::other(e.to_string())
    })?;
    let limiter = web::Data::new(RateLimiter::default());

    log::info!("Starting server at http://{} (API at {})", config.bind_addr, config.api_base_url);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(config.cookie_secure)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(api.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(limiter.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(UPLOAD_LIMIT)
                    .memory_limit(UPLOAD_LIMIT),
            )
            .service(actix_files::Files::new("/static", "./static"))
            .configure(routes::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(routes::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
