use std::sync::Arc;
use tokio::sync::Mutex;
use std::time::{Duration, Instant};

// ============================================================================
// Circuit Breaker for the product catalog
// ============================================================================
//
// Tracks consecutive dependency failures and short-circuits calls while the
// dependency looks unhealthy. Only outcomes the caller classifies as failures
// count; a "product not found" answer is a healthy response.
//
// States:
// - Closed: calls pass through
// - Open: calls rejected immediately until the cool-down elapses
// - HalfOpen: probe calls allowed, enough successes close the circuit
//
// The breaker never retries. A rejected call is reported to the caller, which
// decides how to surface it.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    /// Gauge encoding used by the metrics registry
    pub fn as_gauge(self) -> i64 {
        match self {
            CircuitState::Closed => 0,
            CircuitState::Open => 1,
            CircuitState::HalfOpen => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before opening the circuit
    pub failure_threshold: u32,
    /// Time spent open before probing again
    pub cooldown: Duration,
    /// Successes needed in half-open state to close
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    opened_at: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    name: &'static str,
    state: Arc<Mutex<BreakerState>>,
    config: CircuitBreakerConfig,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CircuitBreakerError<E> {
    /// The call was not attempted
    CircuitOpen,
    /// The call ran and returned this error
    Operation(E),
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            name,
            state: Arc::new(Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                opened_at: None,
            })),
            config,
        }
    }

    /// Run `operation` under breaker protection.
    ///
    /// `is_failure` decides whether an error result counts against the
    /// dependency's health.
    pub async fn call<F, T, E, P>(
        &self,
        operation: F,
        is_failure: P,
    ) -> Result<T, CircuitBreakerError<E>>
    where
        F: std::future::Future<Output = Result<T, E>>,
        P: FnOnce(&E) -> bool,
    {
        self.admit().await?;

        match operation.await {
            Ok(value) => {
                self.record_success().await;
                Ok(value)
            }
            Err(err) => {
                if is_failure(&err) {
                    self.record_failure().await;
                } else {
                    self.record_success().await;
                }
                Err(CircuitBreakerError::Operation(err))
            }
        }
    }

    async fn admit<E>(&self) -> Result<(), CircuitBreakerError<E>> {
        let mut state = self.state.lock().await;

        if state.state != CircuitState::Open {
            return Ok(());
        }

        match state.opened_at {
            Some(opened_at) if opened_at.elapsed() >= self.config.cooldown => {
                tracing::info!(breaker = self.name, "Circuit breaker half-open, probing dependency");
                state.state = CircuitState::HalfOpen;
                state.success_count = 0;
                Ok(())
            }
            _ => Err(CircuitBreakerError::CircuitOpen),
        }
    }

    async fn record_success(&self) {
        let mut state = self.state.lock().await;

        match state.state {
            CircuitState::HalfOpen => {
                state.success_count += 1;
                if state.success_count >= self.config.success_threshold {
                    tracing::info!(
                        breaker = self.name,
                        successes = state.success_count,
                        "Circuit breaker closed"
                    );
                    state.state = CircuitState::Closed;
                    state.failure_count = 0;
                    state.success_count = 0;
                    state.opened_at = None;
                }
            }
            CircuitState::Closed => {
                state.failure_count = 0;
            }
            CircuitState::Open => {}
        }
    }

    async fn record_failure(&self) {
        let mut state = self.state.lock().await;

        state.failure_count += 1;

        match state.state {
            CircuitState::Closed if state.failure_count >= self.config.failure_threshold => {
                tracing::warn!(
                    breaker = self.name,
                    failures = state.failure_count,
                    "Circuit breaker opened"
                );
                state.state = CircuitState::Open;
                state.opened_at = Some(Instant::now());
            }
            CircuitState::HalfOpen => {
                tracing::warn!(breaker = self.name, "Probe failed, circuit breaker reopened");
                state.state = CircuitState::Open;
                state.success_count = 0;
                state.opened_at = Some(Instant::now());
            }
            CircuitState::Closed | CircuitState::Open => {}
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.state.lock().await.state
    }

    pub async fn failure_count(&self) -> u32 {
        self.state.lock().await.failure_count
    }
}
