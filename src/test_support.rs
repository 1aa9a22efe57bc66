//! Shared fixtures for unit tests: a scriptable catalog and a wired engine.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::catalog::{AuthContext, CatalogClient, CatalogError, LocalCatalog, Product};
use crate::domain::order::{OrderEngine, OrderStore};
use crate::domain::user::{OrderLedger, UserStore};

const STUB_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Default)]
struct StubState {
    products: HashMap<Uuid, Product>,
    unavailable: HashSet<Uuid>,
    slow: HashMap<Uuid, Duration>,
}

/// Catalog backed by the seeded products, with per-product failure injection
pub struct StubCatalog {
    state: Mutex<StubState>,
    calls: AtomicUsize,
}

impl StubCatalog {
    pub fn seeded() -> Self {
        let catalog = LocalCatalog::seeded();
        let (products, _) = catalog.list(usize::MAX);
        Self {
            state: Mutex::new(StubState {
                products: products.into_iter().map(|p| (p.id, p)).collect(),
                ..Default::default()
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_unavailable(&self, product_id: Uuid) {
        self.state.lock().unwrap().unavailable.insert(product_id);
    }

    pub fn set_slow(&self, product_id: Uuid, delay: Duration) {
        self.state.lock().unwrap().slow.insert(product_id, delay);
    }

    pub fn set_price(&self, product_id: Uuid, price: Decimal) {
        if let Some(product) = self.state.lock().unwrap().products.get_mut(&product_id) {
            product.price = price;
        }
    }

    /// Number of lookups served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn fetch_product(&self, product_id: Uuid, _auth: &AuthContext) -> Result<Product, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (delay, outcome) = {
            let state = self.state.lock().unwrap();
            let outcome = if state.unavailable.contains(&product_id) {
                Err(CatalogError::Unavailable("injected outage".to_string()))
            } else {
                state
                    .products
                    .get(&product_id)
                    .cloned()
                    .ok_or(CatalogError::NotFound(product_id))
            };
            (state.slow.get(&product_id).copied(), outcome)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    fn request_timeout(&self) -> Duration {
        STUB_TIMEOUT
    }
}

/// Order and user stores wired together the way the service wires them
pub struct Fixture {
    pub engine: Arc<OrderEngine>,
    pub users: Arc<UserStore>,
    pub orders: Arc<OrderStore>,
    pub catalog: Arc<StubCatalog>,
}

impl Fixture {
    pub fn new(catalog: StubCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let orders = Arc::new(OrderStore::new());
        let users = Arc::new(UserStore::new(orders.clone() as Arc<dyn OrderLedger>));
        let engine = Arc::new(OrderEngine::new(orders.clone(), users.clone(), catalog.clone()));

        Self {
            engine,
            users,
            orders,
            catalog,
        }
    }
}
