use async_trait::async_trait;
use uuid::Uuid;

// ============================================================================
// User Directory - the slice of the user store the order side may touch
// ============================================================================

/// Every method answers `None` when the user does not exist.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Record `order_id` in the user's order index
    async fn append_order(&self, user_id: Uuid, order_id: Uuid) -> Option<()>;

    async fn order_ids(&self, user_id: Uuid) -> Option<Vec<Uuid>>;

    /// Credit points, returning the new balance
    async fn award_points(&self, user_id: Uuid, points: u64) -> Option<u64>;
}
