use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{AuthContext, CatalogClient, CatalogError, Product, DEFAULT_CATALOG_TIMEOUT};
use crate::health::{ComponentHealth, HealthCheckable, HealthStatus};

pub const LAPTOP_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);
pub const WIRELESS_MOUSE_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440001);
pub const DESK_LAMP_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440002);
pub const NOTEBOOK_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440003);
pub const COFFEE_MAKER_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440004);

/// Read-only, in-process product catalog.
///
/// Listing order is insertion order, so `/products` is stable across calls.
#[derive(Debug, Clone, Default)]
pub struct LocalCatalog {
    products: Vec<Product>,
    index: HashMap<Uuid, usize>,
}

impl LocalCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        let index = products
            .iter()
            .enumerate()
            .map(|(pos, product)| (product.id, pos))
            .collect();
        Self { products, index }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self::new(vec![
            product(
                LAPTOP_ID,
                "Laptop",
                "High-performance laptop for professionals",
                Decimal::new(129999, 2),
                "Electronics",
                true,
            ),
            product(
                WIRELESS_MOUSE_ID,
                "Wireless Mouse",
                "Ergonomic wireless mouse with precision tracking",
                Decimal::new(2999, 2),
                "Electronics",
                true,
            ),
            product(
                DESK_LAMP_ID,
                "Desk Lamp",
                "LED desk lamp with adjustable brightness",
                Decimal::new(4999, 2),
                "Office",
                false,
            ),
            product(
                NOTEBOOK_ID,
                "Notebook",
                "Premium leather-bound notebook",
                Decimal::new(1999, 2),
                "Office",
                true,
            ),
            product(
                COFFEE_MAKER_ID,
                "Coffee Maker",
                "Programmable coffee maker with timer",
                Decimal::new(7999, 2),
                "Kitchen",
                true,
            ),
        ])
    }

    pub fn get(&self, product_id: Uuid) -> Option<&Product> {
        self.index.get(&product_id).map(|&pos| &self.products[pos])
    }

    /// First `limit` products plus the catalog size
    pub fn list(&self, limit: usize) -> (Vec<Product>, usize) {
        let page = self.products.iter().take(limit).cloned().collect();
        (page, self.products.len())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn product(
    id: Uuid,
    name: &str,
    description: &str,
    price: Decimal,
    category: &str,
    available: bool,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: Some(description.to_string()),
        price,
        category: Some(category.to_string()),
        available,
    }
}

#[async_trait]
impl CatalogClient for LocalCatalog {
    async fn fetch_product(&self, product_id: Uuid, _auth: &AuthContext) -> Result<Product, CatalogError> {
        self.get(product_id)
            .cloned()
            .ok_or(CatalogError::NotFound(product_id))
    }

    fn request_timeout(&self) -> Duration {
        DEFAULT_CATALOG_TIMEOUT
    }
}

#[async_trait]
impl HealthCheckable for LocalCatalog {
    async fn check_health(&self) -> ComponentHealth {
        ComponentHealth::new(self.component_name(), HealthStatus::Healthy)
            .with_details(format!("{} products loaded", self.len()))
    }

    fn component_name(&self) -> &str {
        "catalog"
    }
}
