// ============================================================================
// Product Catalog - collaborator boundary
// ============================================================================
//
// The order engine only ever talks to the catalog through `CatalogClient`.
// Two implementations ship with the service:
// - HttpCatalogClient: calls an external product service over HTTP
// - LocalCatalog: the in-process seeded product list
//
// Every lookup resolves to exactly one of: product, not found, unavailable.
//
// ============================================================================

mod http;
mod local;

pub use http::HttpCatalogClient;
pub use local::{
    LocalCatalog, COFFEE_MAKER_ID, DESK_LAMP_ID, LAPTOP_ID, NOTEBOOK_ID, WIRELESS_MOUSE_ID,
};

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, ErrorKind};

/// Per-call timeout applied to catalog lookups unless configured otherwise
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "inStock", alias = "availability")]
    pub available: bool,
}

/// Caller credentials forwarded to the catalog
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    /// Raw `Authorization` header value, e.g. `Bearer abc...`
    pub authorization: Option<String>,
}

impl AuthContext {
    pub fn bearer(token: impl AsRef<str>) -> Self {
        Self {
            authorization: Some(format!("Bearer {}", token.as_ref())),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Product {0} not found")]
    NotFound(Uuid),

    #[error("Product {product_id} ({name}) is not available for purchase")]
    NotPurchasable { product_id: Uuid, name: String },

    #[error("Product service unavailable: {0}")]
    Unavailable(String),
}

impl DomainError for CatalogError {
    fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::NotPurchasable { .. } => ErrorKind::Conflict,
            CatalogError::Unavailable(_) => ErrorKind::DependencyUnavailable,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            CatalogError::NotFound(_) => "PRODUCT_NOT_FOUND",
            CatalogError::NotPurchasable { .. } => "PRODUCT_NOT_PURCHASABLE",
            CatalogError::Unavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_product(&self, product_id: Uuid, auth: &AuthContext) -> Result<Product, CatalogError>;

    /// Upper bound callers place on a single lookup
    fn request_timeout(&self) -> Duration;

    /// Fetch plus availability check
    async fn validate_product(&self, product_id: Uuid, auth: &AuthContext) -> Result<Product, CatalogError> {
        let product = self.fetch_product(product_id, auth).await?;
        if !product.available {
            return Err(CatalogError::NotPurchasable {
                product_id,
                name: product.name,
            });
        }
        Ok(product)
    }
}
