use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commands::OrderCommand;
use super::errors::OrderError;
use super::events::{ItemsReplaced, OrderEvent, OrderSubmitted};
use super::value_objects::{loyalty_points_for, OrderLineItem, OrderStatus};
use crate::domain::Aggregate;

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    // Identity
    pub id: Uuid,

    // Current State
    #[serde(rename = "products")]
    pub items: Vec<OrderLineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub accrued_loyalty_points: u64,

    // Audit Trail
    pub order_date: DateTime<Utc>,

    // Optional fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

/// Item set an order would have after a patch
#[derive(Debug, Clone, PartialEq)]
pub struct PatchPlan {
    pub items: Vec<OrderLineItem>,
    /// Products not on the order before the patch
    pub added: Vec<Uuid>,
}

impl Order {
    /// A fresh PENDING order with a new id
    pub fn place(user_id: Option<Uuid>, items: Vec<OrderLineItem>, total_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            items,
            total_price,
            status: OrderStatus::Pending,
            accrued_loyalty_points: 0,
            order_date: Utc::now(),
            user_id,
        }
    }

    pub fn ensure_pending(&self) -> Result<(), OrderError> {
        if self.status.is_pending() {
            Ok(())
        } else {
            Err(OrderError::NotPending {
                id: self.id,
                status: self.status,
            })
        }
    }

    pub fn quantity_of(&self, product_id: Uuid) -> Option<i32> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
    }

    /// Apply net deltas (one per product) to a copy of the item set.
    ///
    /// Zero is inert, removing an absent product is inert, and a line whose
    /// quantity drops to zero or below disappears.
    pub fn plan_patch(&self, deltas: &[(Uuid, i64)]) -> Result<PatchPlan, OrderError> {
        let mut items = self.items.clone();
        let mut added = Vec::new();

        for &(product_id, delta) in deltas {
            if delta == 0 {
                continue;
            }

            match items.iter().position(|item| item.product_id == product_id) {
                Some(pos) => {
                    let updated = i64::from(items[pos].quantity)
                        .checked_add(delta)
                        .ok_or(OrderError::InvalidQuantity {
                            product_id,
                            quantity: delta,
                        })?;
                    if updated <= 0 {
                        items.remove(pos);
                    } else {
                        items[pos].quantity = i32::try_from(updated).map_err(|_| {
                            OrderError::InvalidQuantity {
                                product_id,
                                quantity: updated,
                            }
                        })?;
                    }
                }
                None if delta > 0 => {
                    let quantity = i32::try_from(delta).map_err(|_| OrderError::InvalidQuantity {
                        product_id,
                        quantity: delta,
                    })?;
                    items.push(OrderLineItem {
                        product_id,
                        quantity,
                    });
                    added.push(product_id);
                }
                None => {}
            }
        }

        Ok(PatchPlan { items, added })
    }
}

// ============================================================================
// Aggregate Trait Implementation
// ============================================================================

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = OrderError;

    fn handle_command(&self, command: &Self::Command) -> Result<Self::Event, Self::Error> {
        // Every command is gated on PENDING
        self.ensure_pending()?;

        match command {
            OrderCommand::ReplaceItems { items, total_price } => {
                if let Some(bad) = items.iter().find(|item| item.quantity <= 0) {
                    return Err(OrderError::InvalidQuantity {
                        product_id: bad.product_id,
                        quantity: i64::from(bad.quantity),
                    });
                }

                Ok(OrderEvent::ItemsReplaced(ItemsReplaced {
                    items: items.clone(),
                    total_price: *total_price,
                }))
            }
            OrderCommand::Submit => Ok(OrderEvent::Submitted(OrderSubmitted {
                accrued_points: loyalty_points_for(self.total_price),
            })),
            OrderCommand::Cancel => Ok(OrderEvent::Cancelled),
        }
    }

    fn apply_event(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::ItemsReplaced(e) => {
                self.items = e.items.clone();
                self.total_price = e.total_price;
            }
            OrderEvent::Submitted(e) => {
                self.status = OrderStatus::Processing;
                self.accrued_loyalty_points = e.accrued_points;
            }
            OrderEvent::Cancelled => {
                self.status = OrderStatus::Cancelled;
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
