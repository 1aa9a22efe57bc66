use std::time::Instant;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error};

use crate::metrics::Metrics;

/// Log every request on entry and exit and record it in the HTTP metrics.
///
/// The metrics path label is the matched route pattern, not the raw path.
pub async fn log_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let started = Instant::now();
    let method = req.method().to_string();
    let path = req.path().to_string();
    let peer = req
        .connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string();
    let metrics = req.app_data::<web::Data<Metrics>>().cloned();

    tracing::info!(method = %method, path = %path, peer = %peer, "Request started");

    let response = next.call(req).await?;

    let elapsed = started.elapsed();
    let status = response.status().as_u16();
    tracing::info!(
        method = %method,
        path = %path,
        peer = %peer,
        status,
        elapsed_ms = elapsed.as_millis() as u64,
        "Request completed"
    );

    if let Some(metrics) = metrics {
        let route = response
            .request()
            .match_pattern()
            .unwrap_or_else(|| "unmatched".to_string());
        metrics.record_http_request(&method, &route, status, elapsed.as_secs_f64());
    }

    Ok(response)
}
