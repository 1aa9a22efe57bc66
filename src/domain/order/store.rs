use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::aggregate::Order;
use super::commands::OrderCommand;
use super::errors::OrderError;
use super::ports::UserDirectory;
use crate::domain::user::OrderLedger;
use crate::domain::Aggregate;

// ============================================================================
// Order Store - process-local order table
// ============================================================================
//
// Locking:
// - the table lock guards membership and creation order only
// - each order has its own mutex; mutations of one order serialize,
//   different orders never contend
// - lock order is table -> user directory and order -> user directory;
//   nothing here is taken while the user table is held
//
// ============================================================================

type OrderHandle = Arc<Mutex<Order>>;

#[derive(Default)]
struct OrderTable {
    orders: HashMap<Uuid, OrderHandle>,
    sequence: Vec<Uuid>,
}

#[derive(Default)]
pub struct OrderStore {
    table: RwLock<OrderTable>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new order, linking it to its owner in the same critical
    /// section. An unknown owner leaves the table untouched.
    pub async fn insert(&self, order: Order, users: &dyn UserDirectory) -> Result<Order, OrderError> {
        let mut table = self.table.write().await;

        if let Some(owner) = order.user_id {
            users
                .append_order(owner, order.id)
                .await
                .ok_or(OrderError::OwnerNotFound(owner))?;
        }

        table.sequence.push(order.id);
        table
            .orders
            .insert(order.id, Arc::new(Mutex::new(order.clone())));
        Ok(order)
    }

    /// Insert without touching any owner index
    pub async fn load(&self, order: Order) {
        let mut table = self.table.write().await;
        if table.orders.contains_key(&order.id) {
            return;
        }
        table.sequence.push(order.id);
        table.orders.insert(order.id, Arc::new(Mutex::new(order)));
    }

    pub(crate) async fn handle(&self, order_id: Uuid) -> Option<OrderHandle> {
        self.table.read().await.orders.get(&order_id).cloned()
    }

    pub async fn get(&self, order_id: Uuid) -> Option<Order> {
        let handle = self.handle(order_id).await?;
        let order = handle.lock().await;
        Some(order.clone())
    }

    /// All orders in creation order
    pub async fn list(&self) -> Vec<Order> {
        let handles: Vec<OrderHandle> = {
            let table = self.table.read().await;
            table
                .sequence
                .iter()
                .filter_map(|id| table.orders.get(id).cloned())
                .collect()
        };

        let mut orders = Vec::with_capacity(handles.len());
        for handle in handles {
            orders.push(handle.lock().await.clone());
        }
        orders
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.sequence.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl OrderLedger for OrderStore {
    async fn cancel_pending(&self, order_ids: &[Uuid]) -> Vec<Uuid> {
        let mut cancelled = Vec::new();
        for &order_id in order_ids {
            let Some(handle) = self.handle(order_id).await else {
                continue;
            };

            let mut order = handle.lock().await;
            if order.status.is_pending() && order.execute(&OrderCommand::Cancel).is_ok() {
                cancelled.push(order_id);
            }
        }
        cancelled
    }

    async fn orders_by_ids(&self, order_ids: &[Uuid]) -> Vec<Order> {
        let mut orders = Vec::with_capacity(order_ids.len());
        for &order_id in order_ids {
            if let Some(order) = self.get(order_id).await {
                orders.push(order);
            }
        }
        orders
    }
}
