use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::aggregate::Order;
use super::commands::{
    net_deltas, normalize_creation_items, parse_owner, CreateOrder, LineItemInput, OrderCommand,
};
use super::errors::OrderError;
use super::events::OrderEvent;
use super::ports::UserDirectory;
use super::store::OrderStore;
use super::value_objects::{OrderAction, OrderLineItem};
use crate::catalog::{AuthContext, CatalogClient, CatalogError, Product};
use crate::domain::identifiers::{parse_id, IdKind};
use crate::domain::Aggregate;

// ============================================================================
// Order Engine - lifecycle, line-item mutation and pricing
// ============================================================================
//
// - Catalog calls are each bounded by the catalog's request timeout and are
//   never retried.
// - Validation of products new to an order happens before the order's lock
//   is taken; repricing happens under it.
// - Every failure leaves stored state exactly as it was.
//
// ============================================================================

pub struct OrderEngine {
    store: Arc<OrderStore>,
    users: Arc<dyn UserDirectory>,
    catalog: Arc<dyn CatalogClient>,
}

pub fn parse_order_id(raw: &str) -> Result<Uuid, OrderError> {
    parse_id(raw).ok_or_else(|| OrderError::MalformedId {
        kind: IdKind::Order,
        value: raw.to_string(),
    })
}

impl OrderEngine {
    pub fn new(
        store: Arc<OrderStore>,
        users: Arc<dyn UserDirectory>,
        catalog: Arc<dyn CatalogClient>,
    ) -> Self {
        Self {
            store,
            users,
            catalog,
        }
    }

    pub fn store(&self) -> &Arc<OrderStore> {
        &self.store
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub async fn get_order(&self, order_id: Uuid) -> Result<Order, OrderError> {
        self.store
            .get(order_id)
            .await
            .ok_or(OrderError::NotFound(order_id))
    }

    /// Every order plus the count
    pub async fn list_orders(&self) -> (Vec<Order>, usize) {
        let orders = self.store.list().await;
        let total = orders.len();
        (orders, total)
    }

    /// Orders in the user's index, in the order they were placed
    pub async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, OrderError> {
        let ids = self
            .users
            .order_ids(user_id)
            .await
            .ok_or(OrderError::OwnerNotFound(user_id))?;

        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(order) = self.store.get(id).await {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    // ------------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------------

    pub async fn create_order(&self, request: &CreateOrder, auth: &AuthContext) -> Result<Order, OrderError> {
        let owner = parse_owner(request.user_id.as_deref())?;
        let items = normalize_creation_items(&request.products)?;

        let ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
        let products = self.validate_products(&ids, auth).await?;

        let mut total_price = Decimal::ZERO;
        for item in &items {
            if let Some(product) = products.get(&item.product_id) {
                total_price = add_line(total_price, product, item.quantity)?;
            }
        }

        let order = Order::place(owner, items, total_price);
        self.store.insert(order, self.users.as_ref()).await
    }

    // ------------------------------------------------------------------------
    // Line-item patch
    // ------------------------------------------------------------------------

    pub async fn patch_order_items(
        &self,
        order_id: Uuid,
        inputs: &[LineItemInput],
        auth: &AuthContext,
    ) -> Result<Order, OrderError> {
        let deltas = net_deltas(inputs)?;
        let handle = self
            .store
            .handle(order_id)
            .await
            .ok_or(OrderError::NotFound(order_id))?;

        // Validate candidate new products without holding the order
        let snapshot = handle.lock().await.clone();
        snapshot.ensure_pending()?;
        let candidates = snapshot.plan_patch(&deltas)?.added;
        let validated = self.validate_products(&candidates, auth).await?;

        let mut order = handle.lock().await;
        order.ensure_pending()?;
        let plan = order.plan_patch(&deltas)?;

        // Products that became new since the snapshot
        let late: Vec<Uuid> = plan
            .added
            .iter()
            .filter(|id| !validated.contains_key(*id))
            .copied()
            .collect();
        if !late.is_empty() {
            self.validate_products(&late, auth).await?;
        }

        let total_price = self.price_items(&plan.items, auth).await?;
        order.execute(&OrderCommand::ReplaceItems {
            items: plan.items,
            total_price,
        })?;

        Ok(order.clone())
    }

    // ------------------------------------------------------------------------
    // Status transitions
    // ------------------------------------------------------------------------

    pub async fn apply_action(&self, order_id: Uuid, action: OrderAction) -> Result<Order, OrderError> {
        let handle = self
            .store
            .handle(order_id)
            .await
            .ok_or(OrderError::NotFound(order_id))?;
        let mut order = handle.lock().await;

        match action {
            OrderAction::Submit => {
                let event = order.handle_command(&OrderCommand::Submit)?;
                if let (Some(owner), OrderEvent::Submitted(submitted)) = (order.user_id, &event) {
                    self.users
                        .award_points(owner, submitted.accrued_points)
                        .await
                        .ok_or(OrderError::OwnerNotFound(owner))?;
                }
                order.apply_event(&event);
            }
            OrderAction::Cancel => {
                order.execute(&OrderCommand::Cancel)?;
            }
        }

        Ok(order.clone())
    }

    // ------------------------------------------------------------------------
    // Catalog access
    // ------------------------------------------------------------------------

    async fn bounded<T>(&self, call: impl Future<Output = Result<T, CatalogError>>) -> Result<T, CatalogError> {
        tokio::time::timeout(self.catalog.request_timeout(), call)
            .await
            .unwrap_or_else(|_| Err(CatalogError::Unavailable("request timed out".to_string())))
    }

    /// Validate products concurrently and aggregate failures.
    ///
    /// Unavailability wins over missing products, which win over products
    /// that exist but cannot be bought.
    async fn validate_products(
        &self,
        product_ids: &[Uuid],
        auth: &AuthContext,
    ) -> Result<HashMap<Uuid, Product>, OrderError> {
        let results = join_all(
            product_ids
                .iter()
                .map(|&id| self.bounded(self.catalog.validate_product(id, auth))),
        )
        .await;

        let mut products = HashMap::with_capacity(product_ids.len());
        let mut missing = Vec::new();
        let mut not_purchasable = Vec::new();
        let mut unavailable = None;

        for (&id, result) in product_ids.iter().zip(results) {
            match result {
                Ok(product) => {
                    products.insert(id, product);
                }
                Err(CatalogError::NotFound(_)) => missing.push(id),
                Err(CatalogError::NotPurchasable { .. }) => not_purchasable.push(id),
                Err(CatalogError::Unavailable(reason)) => {
                    unavailable.get_or_insert(reason);
                }
            }
        }

        if let Some(reason) = unavailable {
            return Err(OrderError::CatalogUnavailable(reason));
        }
        if !missing.is_empty() {
            return Err(OrderError::InvalidProducts(missing));
        }
        if !not_purchasable.is_empty() {
            return Err(OrderError::ProductsNotPurchasable(not_purchasable));
        }
        Ok(products)
    }

    /// Fresh total over the final item set; any failed lookup is unavailability
    async fn price_items(&self, items: &[OrderLineItem], auth: &AuthContext) -> Result<Decimal, OrderError> {
        let results = join_all(
            items
                .iter()
                .map(|item| self.bounded(self.catalog.fetch_product(item.product_id, auth))),
        )
        .await;

        let mut total = Decimal::ZERO;
        for (item, result) in items.iter().zip(results) {
            match result {
                Ok(product) => total = add_line(total, &product, item.quantity)?,
                Err(CatalogError::Unavailable(reason)) => return Err(OrderError::CatalogUnavailable(reason)),
                Err(other) => return Err(OrderError::CatalogUnavailable(other.to_string())),
            }
        }
        Ok(total)
    }
}

/// Running total plus one priced line; overflow means the catalog price is unusable
fn add_line(total: Decimal, product: &Product, quantity: i32) -> Result<Decimal, OrderError> {
    product
        .price
        .checked_mul(Decimal::from(quantity))
        .and_then(|line| total.checked_add(line))
        .ok_or_else(|| {
            OrderError::CatalogUnavailable(format!("price of product {} overflows the order total", product.id))
        })
}
