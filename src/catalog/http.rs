use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{AuthContext, CatalogClient, CatalogError, Product};
use crate::health::{ComponentHealth, HealthCheckable, HealthStatus};
use crate::metrics::Metrics;
use crate::utils::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitState};

// ============================================================================
// HTTP Catalog Client
// ============================================================================
//
// GET {base}/products/{id}
//   200 -> product
//   404 -> not found
//   anything else, transport errors, timeouts -> unavailable
//
// A 401 from the product service is reported as unavailable: the caller has
// already been authenticated by this service.
//
// ============================================================================

/// Body returned by the external product service
#[derive(Debug, Deserialize)]
struct ProductPayload {
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: Decimal,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "inStock")]
    availability: bool,
}

impl ProductPayload {
    fn into_product(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            available: self.availability,
        }
    }
}

pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: String,
    service_token: Option<String>,
    timeout: Duration,
    circuit_breaker: CircuitBreaker,
    metrics: Option<Arc<Metrics>>,
}

impl HttpCatalogClient {
    pub fn new(
        base_url: impl Into<String>,
        service_token: Option<String>,
        timeout: Duration,
        breaker: CircuitBreakerConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            service_token: service_token.filter(|token| !token.is_empty()),
            timeout,
            circuit_breaker: CircuitBreaker::new("product_service", breaker),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state().await
    }

    /// Caller header wins; the service token is the fallback
    fn authorization(&self, auth: &AuthContext) -> Option<String> {
        auth.authorization
            .as_deref()
            .filter(|header| !header.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.service_token
                    .as_ref()
                    .map(|token| format!("Bearer {}", token))
            })
    }

    async fn request(&self, product_id: Uuid, auth: &AuthContext) -> Result<Product, CatalogError> {
        let url = format!("{}/products/{}", self.base_url, product_id);

        let mut request = self.client.get(&url);
        if let Some(header) = self.authorization(auth) {
            request = request.header(AUTHORIZATION, header);
        }

        let response = request.send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                format!("request failed: {}", e)
            };
            tracing::warn!(product_id = %product_id, error = %e, "Product service request failed");
            CatalogError::Unavailable(reason)
        })?;

        match response.status() {
            StatusCode::OK => {
                let payload: ProductPayload = response.json().await.map_err(|e| {
                    tracing::warn!(product_id = %product_id, error = %e, "Undecodable product response");
                    CatalogError::Unavailable(format!("invalid product response: {}", e))
                })?;

                if payload.price.is_sign_negative() {
                    tracing::warn!(product_id = %product_id, price = %payload.price, "Negative product price");
                    return Err(CatalogError::Unavailable("invalid product price".to_string()));
                }

                Ok(payload.into_product(product_id))
            }
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(product_id)),
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(product_id = %product_id, "Product service rejected credentials");
                Err(CatalogError::Unavailable("unauthorized access".to_string()))
            }
            status => {
                tracing::warn!(
                    product_id = %product_id,
                    status = status.as_u16(),
                    "Unexpected product service response"
                );
                Err(CatalogError::Unavailable(format!("status {}", status.as_u16())))
            }
        }
    }

    async fn observe(&self, result: &Result<Product, CatalogError>) {
        let Some(metrics) = &self.metrics else {
            return;
        };

        let outcome = match result {
            Ok(_) => "ok",
            Err(CatalogError::NotFound(_)) => "not_found",
            Err(CatalogError::NotPurchasable { .. }) => "not_purchasable",
            Err(CatalogError::Unavailable(_)) => "unavailable",
        };
        metrics.record_catalog_request(outcome);
        metrics.set_catalog_circuit_state(self.circuit_breaker.state().await);
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_product(&self, product_id: Uuid, auth: &AuthContext) -> Result<Product, CatalogError> {
        let result = self
            .circuit_breaker
            .call(self.request(product_id, auth), |e| {
                matches!(e, CatalogError::Unavailable(_))
            })
            .await;

        let result = match result {
            Ok(product) => Ok(product),
            Err(CircuitBreakerError::Operation(e)) => Err(e),
            Err(CircuitBreakerError::CircuitOpen) => {
                tracing::warn!(product_id = %product_id, "Circuit breaker open - product service unavailable");
                Err(CatalogError::Unavailable("circuit breaker open".to_string()))
            }
        };

        self.observe(&result).await;
        result
    }

    fn request_timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HealthCheckable for HttpCatalogClient {
    async fn check_health(&self) -> ComponentHealth {
        let status = match self.circuit_breaker.state().await {
            CircuitState::Closed => HealthStatus::Healthy,
            state => HealthStatus::Degraded(format!("circuit {}", state.as_str())),
        };
        ComponentHealth::new(self.component_name(), status).with_details(self.base_url.clone())
    }

    fn component_name(&self) -> &str {
        "catalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LAPTOP_ID;
    use actix_web::{dev::ServerHandle, web, App, HttpRequest, HttpResponse, HttpServer};

    const MISSING: Uuid = Uuid::from_u128(404);
    const FORBIDDEN: Uuid = Uuid::from_u128(401);
    const BROKEN: Uuid = Uuid::from_u128(500);
    const SLOW: Uuid = Uuid::from_u128(504);
    const GARBLED: Uuid = Uuid::from_u128(422);
    const ECHO_AUTH: Uuid = Uuid::from_u128(7);

    async fn product_route(path: web::Path<Uuid>, req: HttpRequest) -> HttpResponse {
        match path.into_inner() {
            id if id == LAPTOP_ID => HttpResponse::Ok().json(serde_json::json!({
                "id": 1,
                "name": "Laptop",
                "description": "High-performance laptop",
                "price": 1299.99,
                "availability": true
            })),
            MISSING => HttpResponse::NotFound().finish(),
            FORBIDDEN => HttpResponse::Unauthorized().finish(),
            BROKEN => HttpResponse::InternalServerError().finish(),
            GARBLED => HttpResponse::Ok().body("not json"),
            SLOW => {
                tokio::time::sleep(Duration::from_millis(500)).await;
                HttpResponse::Ok().finish()
            }
            ECHO_AUTH => {
                let header = req
                    .headers()
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                HttpResponse::Ok().json(serde_json::json!({
                    "name": header,
                    "price": 1,
                    "inStock": true
                }))
            }
            _ => HttpResponse::NotFound().finish(),
        }
    }

    fn spawn_product_service() -> (String, ServerHandle) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = HttpServer::new(|| {
            App::new().route("/products/{id}", web::get().to(product_route))
        })
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        (format!("http://127.0.0.1:{}", port), handle)
    }

    fn client(base_url: &str, failure_threshold: u32) -> HttpCatalogClient {
        HttpCatalogClient::new(
            base_url,
            Some("service-token-0123456789".to_string()),
            Duration::from_millis(200),
            CircuitBreakerConfig {
                failure_threshold,
                cooldown: Duration::from_secs(60),
                success_threshold: 1,
            },
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn test_fetch_product_ok() {
        let (base_url, handle) = spawn_product_service();
        let catalog = client(&base_url, 5);

        let product = catalog
            .fetch_product(LAPTOP_ID, &AuthContext::anonymous())
            .await
            .unwrap();

        assert_eq!(product.id, LAPTOP_ID);
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.price, Decimal::new(129999, 2));
        assert!(product.available);

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn test_status_classification() {
        let (base_url, handle) = spawn_product_service();
        let catalog = client(&base_url, 100);
        let auth = AuthContext::anonymous();

        assert_eq!(
            catalog.fetch_product(MISSING, &auth).await,
            Err(CatalogError::NotFound(MISSING))
        );
        assert!(matches!(
            catalog.fetch_product(FORBIDDEN, &auth).await,
            Err(CatalogError::Unavailable(_))
        ));
        assert!(matches!(
            catalog.fetch_product(BROKEN, &auth).await,
            Err(CatalogError::Unavailable(_))
        ));
        assert!(matches!(
            catalog.fetch_product(GARBLED, &auth).await,
            Err(CatalogError::Unavailable(_))
        ));

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn test_timeout_is_unavailable() {
        let (base_url, handle) = spawn_product_service();
        let catalog = client(&base_url, 5);

        let err = catalog
            .fetch_product(SLOW, &AuthContext::anonymous())
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::Unavailable("request timed out".to_string()));

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn test_unreachable_service_is_unavailable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let catalog = client(&format!("http://127.0.0.1:{}", port), 5);

        let err = catalog
            .fetch_product(LAPTOP_ID, &AuthContext::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(_)));
    }

    #[actix_web::test]
    async fn test_authorization_forwarding() {
        let (base_url, handle) = spawn_product_service();
        let catalog = client(&base_url, 5);

        let forwarded = catalog
            .fetch_product(ECHO_AUTH, &AuthContext::bearer("caller-token-abcdefghij"))
            .await
            .unwrap();
        assert_eq!(forwarded.name, "Bearer caller-token-abcdefghij");

        let fallback = catalog
            .fetch_product(ECHO_AUTH, &AuthContext::anonymous())
            .await
            .unwrap();
        assert_eq!(fallback.name, "Bearer service-token-0123456789");

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn test_circuit_opens_and_short_circuits() {
        let (base_url, handle) = spawn_product_service();
        let metrics = Arc::new(Metrics::new().unwrap());
        let catalog = client(&base_url, 2).with_metrics(metrics.clone());
        let auth = AuthContext::anonymous();

        // Not-found answers are healthy
        for _ in 0..3 {
            let _ = catalog.fetch_product(MISSING, &auth).await;
        }
        assert_eq!(catalog.circuit_state().await, CircuitState::Closed);

        for _ in 0..2 {
            let _ = catalog.fetch_product(BROKEN, &auth).await;
        }
        assert_eq!(catalog.circuit_state().await, CircuitState::Open);

        let err = catalog.fetch_product(LAPTOP_ID, &auth).await.unwrap_err();
        assert_eq!(err, CatalogError::Unavailable("circuit breaker open".to_string()));

        let health = catalog.check_health().await;
        assert!(health.status.is_degraded());
        assert_eq!(metrics.catalog_circuit_state.get(), 1);

        handle.stop(false).await;
    }
}
