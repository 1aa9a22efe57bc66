use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use std::sync::Arc;

use super::Metrics;

/// Start the metrics HTTP server on its own listener
pub async fn start_metrics_server(metrics: Arc<Metrics>, host: String, port: u16) -> std::io::Result<()> {
    tracing::info!("📊 Starting metrics server on http://{}:{}/metrics", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(metrics.clone()))
            .route("/metrics", web::get().to(metrics_handler))
            .route("/health", web::get().to(health_handler))
    })
    .workers(1)
    .bind((host.as_str(), port))?
    .run()
    .await
}

async fn metrics_handler(metrics: web::Data<Metrics>) -> impl Responder {
    match metrics.render() {
        Ok(buffer) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(buffer),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "order-service-metrics"
    }))
}
