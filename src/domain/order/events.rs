use rust_decimal::Decimal;

use super::value_objects::OrderLineItem;

// ============================================================================
// Order Events - facts produced by accepted commands
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    ItemsReplaced(ItemsReplaced),
    Submitted(OrderSubmitted),
    Cancelled,
}

/// Item set and total swapped in one step
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsReplaced {
    pub items: Vec<OrderLineItem>,
    pub total_price: Decimal,
}

/// PENDING -> PROCESSING, points credited to the owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSubmitted {
    pub accrued_points: u64,
}
