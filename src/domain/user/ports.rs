use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::Order;

// ============================================================================
// Order Ledger - the slice of the order store the user side may touch
// ============================================================================

#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Cancel every listed order that is still PENDING; returns the ids cancelled
    async fn cancel_pending(&self, order_ids: &[Uuid]) -> Vec<Uuid>;

    /// Snapshot of the listed orders, unknown ids skipped
    async fn orders_by_ids(&self, order_ids: &[Uuid]) -> Vec<Order>;
}
