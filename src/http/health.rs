use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::context::AppContext;
use crate::health::{ComponentReport, HealthStatus};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub components: Vec<ComponentReport>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}

/// Unauthenticated; 503 only when a component is unhealthy
async fn health(ctx: web::Data<AppContext>) -> HttpResponse {
    let catalog = ctx.catalog_health.check_health().await;
    let overall = HealthStatus::Healthy.worst(catalog.status.clone());

    let report = HealthReport {
        status: overall.label(),
        timestamp: Utc::now(),
        components: vec![catalog.report()],
    };

    if overall.is_unhealthy() {
        HttpResponse::ServiceUnavailable().json(report)
    } else {
        HttpResponse::Ok().json(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::seeded_context;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_health_without_token() {
        let ctx = seeded_context().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ctx))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["components"][0]["name"], "catalog");
    }
}
