use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// A stored (product, quantity) pair. Quantity is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    #[serde(alias = "CANCELED")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_pending(self) -> bool {
        self == OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status change requested through `POST /orders/{id}/submit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Submit,
    Cancel,
}

impl FromStr for OrderAction {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUBMIT" => Ok(OrderAction::Submit),
            "CANCEL" => Ok(OrderAction::Cancel),
            other => Err(OrderError::InvalidAction(other.to_string())),
        }
    }
}

/// Points credited on submit: one per whole 10 currency units
pub fn loyalty_points_for(total: Decimal) -> u64 {
    if total.is_sign_negative() {
        return 0;
    }
    (total / Decimal::TEN).floor().to_u64().unwrap_or(u64::MAX)
}

// ============================================================================
// Unit Tests
// ============================================================================
