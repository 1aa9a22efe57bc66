use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::catalog::{COFFEE_MAKER_ID, DESK_LAMP_ID, LAPTOP_ID, NOTEBOOK_ID, WIRELESS_MOUSE_ID};
use crate::domain::order::{Order, OrderLineItem, OrderStatus, OrderStore};
use crate::domain::user::{NewUser, User, UserError, UserStore};

// ============================================================================
// Demo Data - fixed users and orders loaded at startup
// ============================================================================
//
// Products live in `LocalCatalog::seeded`. Orders reference those ids and
// users reference these orders, so the three sets load together.
//
// ============================================================================

pub const JOHN_ID: Uuid = Uuid::from_u128(0x750e8400_e29b_41d4_a716_446655440000);
pub const JANE_ID: Uuid = Uuid::from_u128(0x750e8400_e29b_41d4_a716_446655440001);
pub const BOB_ID: Uuid = Uuid::from_u128(0x750e8400_e29b_41d4_a716_446655440002);

pub const PENDING_ORDER_ID: Uuid = Uuid::from_u128(0x650e8400_e29b_41d4_a716_446655440000);
pub const SHIPPED_ORDER_ID: Uuid = Uuid::from_u128(0x650e8400_e29b_41d4_a716_446655440001);
pub const PROCESSING_ORDER_ID: Uuid = Uuid::from_u128(0x650e8400_e29b_41d4_a716_446655440002);

/// What was loaded, for the startup log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub orders: usize,
}

pub async fn load_demo_data(users: &UserStore, orders: &OrderStore) -> Result<SeedSummary, UserError> {
    let now = Utc::now();

    let demo_orders = [
        demo_order(
            PENDING_ORDER_ID,
            JOHN_ID,
            OrderStatus::Pending,
            &[(LAPTOP_ID, 1), (WIRELESS_MOUSE_ID, 2)],
            Decimal::new(135997, 2),
            now - Duration::days(5),
        ),
        demo_order(
            SHIPPED_ORDER_ID,
            JOHN_ID,
            OrderStatus::Shipped,
            &[(DESK_LAMP_ID, 3)],
            Decimal::new(14997, 2),
            now - Duration::days(3),
        ),
        demo_order(
            PROCESSING_ORDER_ID,
            JANE_ID,
            OrderStatus::Processing,
            &[(NOTEBOOK_ID, 5), (COFFEE_MAKER_ID, 1)],
            Decimal::new(17994, 2),
            now - Duration::days(1),
        ),
    ];

    let demo_users = [
        (JOHN_ID, "johndoe", "john.doe@example.com", "John", "Doe", 1500),
        (JANE_ID, "janedoe", "jane.doe@example.com", "Jane", "Doe", 2300),
        (BOB_ID, "bobsmith", "bob.smith@example.com", "Bob", "Smith", 500),
    ];

    for (id, username, email, firstname, lastname, points) in demo_users {
        let mut user = User::register(&NewUser {
            username: username.to_string(),
            email: email.to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
        })?;
        user.id = id;
        user.loyalty_points = points;

        let owned = demo_orders
            .iter()
            .filter(|order| order.user_id == Some(id))
            .map(|order| order.id)
            .collect();
        users.load(user, owned).await;
    }

    for order in &demo_orders {
        orders.load(order.clone()).await;
    }

    Ok(SeedSummary {
        users: demo_users.len(),
        orders: demo_orders.len(),
    })
}

fn demo_order(
    id: Uuid,
    owner: Uuid,
    status: OrderStatus,
    items: &[(Uuid, i32)],
    total_price: Decimal,
    order_date: chrono::DateTime<Utc>,
) -> Order {
    let mut order = Order::place(
        Some(owner),
        items
            .iter()
            .map(|&(product_id, quantity)| OrderLineItem { product_id, quantity })
            .collect(),
        total_price,
    );
    order.id = id;
    order.status = status;
    order.order_date = order_date;
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AuthContext, LocalCatalog};
    use crate::domain::order::{LineItemInput, OrderAction, OrderEngine, OrderError};
    use crate::domain::user::OrderLedger;
    use std::sync::Arc;

    async fn seeded() -> (Arc<OrderEngine>, Arc<UserStore>) {
        let orders = Arc::new(OrderStore::new());
        let users = Arc::new(UserStore::new(orders.clone() as Arc<dyn OrderLedger>));
        load_demo_data(&users, &orders).await.unwrap();
        let engine = Arc::new(OrderEngine::new(
            orders,
            users.clone(),
            Arc::new(LocalCatalog::seeded()),
        ));
        (engine, users)
    }

    #[tokio::test]
    async fn test_demo_data_is_linked() {
        let (engine, users) = seeded().await;

        let john = users.user_with_orders(JOHN_ID).await.unwrap();
        assert_eq!(john.user.loyalty_points, 1500);
        let ids: Vec<Uuid> = john.orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![PENDING_ORDER_ID, SHIPPED_ORDER_ID]);

        assert!(users.user_with_orders(BOB_ID).await.unwrap().orders.is_empty());

        let (all, total) = engine.list_orders().await;
        assert_eq!(total, 3);
        assert_eq!(all[2].status, OrderStatus::Processing);
        assert_eq!(all[2].total_price, Decimal::new(17994, 2));
    }

    #[tokio::test]
    async fn test_demo_orders_follow_state_machine() {
        let (engine, users) = seeded().await;

        let err = engine
            .apply_action(SHIPPED_ORDER_ID, OrderAction::Cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::NotPending { .. }));

        let submitted = engine.apply_action(PENDING_ORDER_ID, OrderAction::Submit).await.unwrap();
        assert_eq!(submitted.accrued_loyalty_points, 135);
        assert_eq!(users.loyalty_points(JOHN_ID).await, Ok(1635));

        let err = engine
            .patch_order_items(
                PROCESSING_ORDER_ID,
                &[LineItemInput::new(NOTEBOOK_ID, 1)],
                &AuthContext::anonymous(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::NotPending { .. }));
    }
}
