use std::sync::Arc;

use crate::catalog::{CatalogClient, HttpCatalogClient, LocalCatalog};
use crate::config::Config;
use crate::domain::order::{OrderEngine, OrderStore};
use crate::domain::user::{OrderLedger, UserStore};
use crate::health::HealthCheckable;
use crate::metrics::Metrics;
use crate::seed;

// ============================================================================
// Application Context - everything the handlers share
// ============================================================================

#[derive(Clone)]
pub struct AppContext {
    pub engine: Arc<OrderEngine>,
    pub users: Arc<UserStore>,
    /// Backs the product endpoints whichever catalog the engine uses
    pub products: Arc<LocalCatalog>,
    pub catalog_health: Arc<dyn HealthCheckable>,
    pub metrics: Arc<Metrics>,
}

impl AppContext {
    pub async fn build(config: &Config) -> anyhow::Result<Self> {
        let metrics = Arc::new(Metrics::new()?);
        let products = Arc::new(LocalCatalog::seeded());

        let (catalog, catalog_health): (Arc<dyn CatalogClient>, Arc<dyn HealthCheckable>) =
            match &config.product_service_url {
                Some(url) => {
                    tracing::info!(url = %url, "Using external product service");
                    let client = Arc::new(
                        HttpCatalogClient::new(
                            url.clone(),
                            config.product_service_token.clone(),
                            config.catalog_timeout(),
                            config.circuit_breaker(),
                        )?
                        .with_metrics(metrics.clone()),
                    );
                    (client.clone() as Arc<dyn CatalogClient>, client as Arc<dyn HealthCheckable>)
                }
                None => {
                    tracing::info!(products = products.len(), "Using built-in product catalog");
                    (
                        products.clone() as Arc<dyn CatalogClient>,
                        products.clone() as Arc<dyn HealthCheckable>,
                    )
                }
            };

        let context = Self::assemble(catalog, catalog_health, products, metrics);

        if config.seed {
            let summary = seed::load_demo_data(&context.users, context.engine.store()).await?;
            tracing::info!(users = summary.users, orders = summary.orders, "Demo data loaded");
        }

        Ok(context)
    }

    /// Wire the stores and engine around a given catalog
    pub fn assemble(
        catalog: Arc<dyn CatalogClient>,
        catalog_health: Arc<dyn HealthCheckable>,
        products: Arc<LocalCatalog>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let orders = Arc::new(OrderStore::new());
        let users = Arc::new(UserStore::new(orders.clone() as Arc<dyn OrderLedger>));
        let engine = Arc::new(OrderEngine::new(orders, users.clone(), catalog));

        Self {
            engine,
            users,
            products,
            catalog_health,
            metrics,
        }
    }
}
