use std::str::FromStr;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use super::auth::BearerAuth;
use super::errors::ApiError;
use crate::context::AppContext;
use crate::domain::order::commands::parse_owner;
use crate::domain::order::{parse_order_id, CreateOrder, Order, OrderAction, PatchOrder};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub action: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/orders")
            .route(web::get().to(list_orders))
            .route(web::post().to(create_order)),
    )
    .service(
        web::resource("/orders/{order_id}")
            .route(web::get().to(get_order))
            .route(web::patch().to(patch_order)),
    )
    .route("/orders/{order_id}/submit", web::post().to(submit_order));
}

async fn list_orders(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    query: web::Query<OrdersQuery>,
) -> Result<HttpResponse, ApiError> {
    let orders = match parse_owner(query.user_id.as_deref())? {
        Some(user_id) => ctx.engine.orders_for_user(user_id).await?,
        None => ctx.engine.list_orders().await.0,
    };
    let total = orders.len();

    Ok(HttpResponse::Ok().json(OrderList { orders, total }))
}

async fn create_order(
    auth: BearerAuth,
    ctx: web::Data<AppContext>,
    body: web::Json<CreateOrder>,
) -> Result<HttpResponse, ApiError> {
    let order = ctx.engine.create_order(&body, &auth.context()).await?;
    ctx.metrics.record_order_created();
    tracing::info!(order_id = %order.id, total_price = %order.total_price, "Order created");

    Ok(HttpResponse::Created().json(order))
}

async fn get_order(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_order_id(&path)?;
    let order = ctx.engine.get_order(order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

async fn patch_order(
    auth: BearerAuth,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: web::Json<PatchOrder>,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_order_id(&path)?;
    let order = ctx
        .engine
        .patch_order_items(order_id, &body.products, &auth.context())
        .await?;
    tracing::info!(order_id = %order.id, total_price = %order.total_price, "Order items updated");

    Ok(HttpResponse::Ok().json(order))
}

async fn submit_order(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: web::Json<ActionRequest>,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_order_id(&path)?;
    let action = OrderAction::from_str(&body.action)?;

    let order = ctx.engine.apply_action(order_id, action).await?;
    ctx.metrics.record_order_transition(order.status.as_str());
    tracing::info!(order_id = %order.id, status = %order.status, "Order status changed");

    Ok(HttpResponse::Ok().json(order))
}
