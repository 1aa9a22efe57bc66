use uuid::Uuid;

use super::value_objects::OrderStatus;
use crate::domain::identifiers::IdKind;
use crate::error::{join_ids, DomainError, ErrorKind};

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("Order must contain at least one product")]
    EmptyItems,

    #[error("Invalid {kind} ID format: '{value}'")]
    MalformedId { kind: IdKind, value: String },

    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: Uuid, quantity: i64 },

    #[error("Order {0} not found")]
    NotFound(Uuid),

    #[error("User {0} not found")]
    OwnerNotFound(Uuid),

    #[error("Order {id} is not pending (status: {status})")]
    NotPending { id: Uuid, status: OrderStatus },

    #[error("Invalid products: {}", join_ids(.0))]
    InvalidProducts(Vec<Uuid>),

    #[error("Products not available for purchase: {}", join_ids(.0))]
    ProductsNotPurchasable(Vec<Uuid>),

    #[error("Product service unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Invalid action '{0}'. Must be CANCEL or SUBMIT")]
    InvalidAction(String),
}

impl DomainError for OrderError {
    fn kind(&self) -> ErrorKind {
        match self {
            OrderError::EmptyItems
            | OrderError::MalformedId { .. }
            | OrderError::InvalidQuantity { .. }
            | OrderError::InvalidAction(_) => ErrorKind::Validation,
            OrderError::NotFound(_)
            | OrderError::OwnerNotFound(_)
            | OrderError::InvalidProducts(_) => ErrorKind::NotFound,
            OrderError::NotPending { .. } | OrderError::ProductsNotPurchasable(_) => {
                ErrorKind::Conflict
            }
            OrderError::CatalogUnavailable(_) => ErrorKind::DependencyUnavailable,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            OrderError::EmptyItems => "EMPTY_PRODUCTS",
            OrderError::MalformedId { kind, .. } => kind.invalid_code(),
            OrderError::InvalidQuantity { .. } => "INVALID_QUANTITY",
            OrderError::NotFound(_) => "ORDER_NOT_FOUND",
            OrderError::OwnerNotFound(_) => "USER_NOT_FOUND",
            OrderError::NotPending { .. } => "ORDER_NOT_PENDING",
            OrderError::InvalidProducts(_) => "INVALID_PRODUCTS",
            OrderError::ProductsNotPurchasable(_) => "PRODUCTS_NOT_PURCHASABLE",
            OrderError::CatalogUnavailable(_) => "SERVICE_UNAVAILABLE",
            OrderError::InvalidAction(_) => "INVALID_ACTION",
        }
    }
}
