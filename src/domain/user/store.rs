use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::aggregate::User;
use super::commands::{NewUser, UserCommand};
use super::errors::UserError;
use super::ports::OrderLedger;
use crate::domain::identifiers::parse_id;
use crate::domain::order::{Order, UserDirectory};
use crate::domain::Aggregate;

// ============================================================================
// User Store - users, loyalty balances and the user -> orders index
// ============================================================================
//
// One RwLock guards users and the index together. It is never held while an
// order lock is taken: deletion releases it before cascading.
//
// ============================================================================

#[derive(Default)]
struct UserTable {
    users: HashMap<Uuid, User>,
    order_index: HashMap<Uuid, Vec<Uuid>>,
}

impl UserTable {
    fn user_mut(&mut self, user_id: Uuid) -> Result<&mut User, UserError> {
        self.users.get_mut(&user_id).ok_or(UserError::NotFound(user_id))
    }
}

/// A user with the orders it owns
#[derive(Debug, Clone, Serialize)]
pub struct UserWithOrders {
    pub user: User,
    pub orders: Vec<Order>,
}

pub struct UserStore {
    table: RwLock<UserTable>,
    ledger: Arc<dyn OrderLedger>,
}

pub fn parse_user_id(raw: &str) -> Result<Uuid, UserError> {
    parse_id(raw).ok_or_else(|| UserError::MalformedId(raw.to_string()))
}

impl UserStore {
    pub fn new(ledger: Arc<dyn OrderLedger>) -> Self {
        Self {
            table: RwLock::new(UserTable::default()),
            ledger,
        }
    }

    pub async fn create_user(&self, input: &NewUser) -> Result<User, UserError> {
        let user = User::register(input)?;

        let mut table = self.table.write().await;
        if table.users.values().any(|u| u.username == user.username) {
            return Err(UserError::DuplicateUsername(user.username.to_string()));
        }
        if table.users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email.to_string()));
        }

        table.order_index.insert(user.id, Vec::new());
        table.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Insert a user with a known order index
    pub async fn load(&self, user: User, order_ids: Vec<Uuid>) {
        let mut table = self.table.write().await;
        table.order_index.insert(user.id, order_ids);
        table.users.insert(user.id, user);
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, UserError> {
        self.table
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .ok_or(UserError::NotFound(user_id))
    }

    pub async fn user_with_orders(&self, user_id: Uuid) -> Result<UserWithOrders, UserError> {
        let (user, order_ids) = {
            let table = self.table.read().await;
            let user = table
                .users
                .get(&user_id)
                .cloned()
                .ok_or(UserError::NotFound(user_id))?;
            let order_ids = table.order_index.get(&user_id).cloned().unwrap_or_default();
            (user, order_ids)
        };

        let orders = self.ledger.orders_by_ids(&order_ids).await;
        Ok(UserWithOrders { user, orders })
    }

    pub async fn loyalty_points(&self, user_id: Uuid) -> Result<u64, UserError> {
        self.get_user(user_id).await.map(|user| user.loyalty_points)
    }

    /// Check and decrement in one step; returns the remaining balance
    pub async fn redeem_points(&self, user_id: Uuid, points: i64) -> Result<u64, UserError> {
        let mut table = self.table.write().await;
        let user = table.user_mut(user_id)?;
        let event = user.execute(&UserCommand::RedeemPoints(points))?;
        Ok(event.balance())
    }

    pub async fn award_points(&self, user_id: Uuid, points: u64) -> Result<u64, UserError> {
        let mut table = self.table.write().await;
        let user = table.user_mut(user_id)?;
        let event = user.execute(&UserCommand::AwardPoints(points))?;
        Ok(event.balance())
    }

    /// Remove the user, then cancel its PENDING orders.
    ///
    /// Returns the ids of the orders that were cancelled.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, UserError> {
        let order_ids = {
            let mut table = self.table.write().await;
            table
                .users
                .remove(&user_id)
                .ok_or(UserError::NotFound(user_id))?;
            table.order_index.remove(&user_id).unwrap_or_default()
        };

        Ok(self.ledger.cancel_pending(&order_ids).await)
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop a user without the order cascade
    #[cfg(test)]
    pub(crate) async fn forget(&self, user_id: Uuid) {
        let mut table = self.table.write().await;
        table.users.remove(&user_id);
        table.order_index.remove(&user_id);
    }
}

#[async_trait]
impl UserDirectory for UserStore {
    async fn append_order(&self, user_id: Uuid, order_id: Uuid) -> Option<()> {
        let mut table = self.table.write().await;
        if !table.users.contains_key(&user_id) {
            return None;
        }
        table.order_index.entry(user_id).or_default().push(order_id);
        Some(())
    }

    async fn order_ids(&self, user_id: Uuid) -> Option<Vec<Uuid>> {
        let table = self.table.read().await;
        if !table.users.contains_key(&user_id) {
            return None;
        }
        Some(table.order_index.get(&user_id).cloned().unwrap_or_default())
    }

    async fn award_points(&self, user_id: Uuid, points: u64) -> Option<u64> {
        UserStore::award_points(self, user_id, points).await.ok()
    }
}
