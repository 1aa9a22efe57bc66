// ============================================================================
// HTTP Transport - actix-web routes over the order, user and product layers
// ============================================================================
//
// - auth: bearer token extractor (every route except /health)
// - errors: component errors to `{code, message, details?}` responses
// - logging: per-request log lines and HTTP metrics
//
// ============================================================================

pub mod auth;
pub mod errors;
mod health;
mod logging;
mod orders;
mod products;
mod users;

pub use auth::BearerAuth;
pub use errors::ApiError;

use actix_web::{middleware, web, App, HttpServer};

use crate::context::AppContext;

/// JSON body limits and the error returned for undecodable bodies
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let details = err.to_string();
            ApiError::bad_request("INVALID_REQUEST_BODY", "Invalid request body")
                .with_details(details)
                .into()
        })
}

/// Every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure(cfg);
    orders::configure(cfg);
    users::configure(cfg);
    products::configure(cfg);
}

pub async fn start_api_server(context: AppContext, host: String, port: u16) -> std::io::Result<()> {
    tracing::info!("🚀 Starting API server on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(context.clone()))
            .app_data(web::Data::from(context.metrics.clone()))
            .app_data(json_config())
            .wrap(middleware::from_fn(logging::log_requests))
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
