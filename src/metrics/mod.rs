// Private module declaration
mod server;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::utils::CircuitState;

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - HTTP traffic (count and latency per route)
// - Order creation and status transitions
// - Product catalog lookups and circuit breaker state
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: IntCounterVec,
    pub http_request_duration: HistogramVec,

    // Order Metrics
    pub orders_created: IntCounter,
    pub order_transitions: IntCounterVec,

    // Catalog Metrics
    pub catalog_requests: IntCounterVec,
    pub catalog_circuit_state: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // HTTP Metrics
        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests handled"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_request_duration.clone()))?;

        // Order Metrics
        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_transitions = IntCounterVec::new(
            Opts::new("order_transitions_total", "Order status transitions"),
            &["to"],
        )?;
        registry.register(Box::new(order_transitions.clone()))?;

        // Catalog Metrics
        let catalog_requests = IntCounterVec::new(
            Opts::new("catalog_requests_total", "Product catalog lookups by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(catalog_requests.clone()))?;

        let catalog_circuit_state = IntGauge::new(
            "catalog_circuit_state",
            "Catalog circuit breaker state (0=Closed, 1=Open, 2=HalfOpen)",
        )?;
        registry.register(Box::new(catalog_circuit_state.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration,
            orders_created,
            order_transitions,
            catalog_requests,
            catalog_circuit_state,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Text exposition of every registered metric
    pub fn render(&self) -> anyhow::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }

    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        self.http_requests_total
            .with_label_values(&[method, path, &status.to_string()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    pub fn record_order_created(&self) {
        self.orders_created.inc();
    }

    pub fn record_order_transition(&self, to: &str) {
        self.order_transitions.with_label_values(&[to]).inc();
    }

    pub fn record_catalog_request(&self, outcome: &str) {
        self.catalog_requests.with_label_values(&[outcome]).inc();
    }

    pub fn set_catalog_circuit_state(&self, state: CircuitState) {
        self.catalog_circuit_state.set(state.as_gauge());
    }
}
