use actix_web::{web, HttpResponse};
use serde_json::json;

use super::auth::BearerAuth;
use super::errors::ApiError;
use crate::context::AppContext;
use crate::domain::order::OrderStatus;
use crate::domain::user::{parse_user_id, NewUser, RedeemPoints};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/user", web::post().to(create_user))
        .service(
            web::resource("/user/{user_id}")
                .route(web::get().to(get_user))
                .route(web::delete().to(delete_user)),
        )
        .service(
            web::resource("/user/{user_id}/points")
                .route(web::get().to(get_points))
                .route(web::post().to(redeem_points)),
        );
}

async fn create_user(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    body: web::Json<NewUser>,
) -> Result<HttpResponse, ApiError> {
    let user = ctx.users.create_user(&body).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User created");
    Ok(HttpResponse::Created().json(user))
}

async fn get_user(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = parse_user_id(&path)?;
    let view = ctx.users.user_with_orders(user_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

async fn delete_user(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = parse_user_id(&path)?;
    let cancelled = ctx.users.delete_user(user_id).await?;

    for _ in &cancelled {
        ctx.metrics.record_order_transition(OrderStatus::Cancelled.as_str());
    }
    tracing::info!(user_id = %user_id, cancelled_orders = cancelled.len(), "User deleted");

    Ok(HttpResponse::NoContent().finish())
}

async fn get_points(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = parse_user_id(&path)?;
    let points = ctx.users.loyalty_points(user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "loyaltyPoints": points })))
}

async fn redeem_points(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: web::Json<RedeemPoints>,
) -> Result<HttpResponse, ApiError> {
    let user_id = parse_user_id(&path)?;
    let remaining = ctx.users.redeem_points(user_id, body.points).await?;
    tracing::info!(user_id = %user_id, redeemed = body.points, remaining, "Loyalty points redeemed");

    Ok(HttpResponse::Ok().json(json!({ "remainingPoints": remaining })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{bearer, seeded_context};
    use crate::seed::{BOB_ID, JOHN_ID, PENDING_ORDER_ID, SHIPPED_ORDER_ID};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;

    macro_rules! app {
        ($ctx:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($ctx.clone()))
                    .app_data(crate::http::json_config())
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_user() {
        let ctx = seeded_context().await;
        let app = app!(ctx);

        let payload = json!({
            "username": "newuser",
            "email": "new@example.com",
            "firstname": "New",
            "lastname": "User"
        });
        let req = test::TestRequest::post()
            .uri("/user")
            .insert_header(bearer())
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["username"], "newuser");
        assert_eq!(body["loyaltyPoints"], 0);

        let req = test::TestRequest::post()
            .uri("/user")
            .insert_header(bearer())
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "USERNAME_TAKEN");
    }

    #[actix_web::test]
    async fn test_create_user_validation() {
        let ctx = seeded_context().await;
        let app = app!(ctx);

        let req = test::TestRequest::post()
            .uri("/user")
            .insert_header(bearer())
            .set_json(json!({"username": "xy", "email": "xy@example.com", "firstname": "X", "lastname": "Y"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[actix_web::test]
    async fn test_get_user_with_orders() {
        let ctx = seeded_context().await;
        let app = app!(ctx);

        let req = test::TestRequest::get()
            .uri(&format!("/user/{}", JOHN_ID))
            .insert_header(bearer())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user"]["username"], "johndoe");
        assert_eq!(body["orders"].as_array().map(Vec::len), Some(2));

        let req = test::TestRequest::get()
            .uri("/user/not-a-uuid")
            .insert_header(bearer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_points_balance_and_redeem() {
        let ctx = seeded_context().await;
        let app = app!(ctx);

        let req = test::TestRequest::get()
            .uri(&format!("/user/{}/points", BOB_ID))
            .insert_header(bearer())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["loyaltyPoints"], 500);

        let req = test::TestRequest::post()
            .uri(&format!("/user/{}/points", BOB_ID))
            .insert_header(bearer())
            .set_json(json!({"points": 200}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["remainingPoints"], 300);

        let req = test::TestRequest::post()
            .uri(&format!("/user/{}/points", BOB_ID))
            .insert_header(bearer())
            .set_json(json!({"points": 301}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INSUFFICIENT_POINTS");

        let req = test::TestRequest::post()
            .uri(&format!("/user/{}/points", BOB_ID))
            .insert_header(bearer())
            .set_json(json!({"points": 0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delete_user_cascades() {
        let ctx = seeded_context().await;
        let app = app!(ctx);

        let req = test::TestRequest::delete()
            .uri(&format!("/user/{}", JOHN_ID))
            .insert_header(bearer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let pending = ctx.engine.get_order(PENDING_ORDER_ID).await.unwrap();
        assert_eq!(pending.status, OrderStatus::Cancelled);
        let shipped = ctx.engine.get_order(SHIPPED_ORDER_ID).await.unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);

        let req = test::TestRequest::delete()
            .uri(&format!("/user/{}", JOHN_ID))
            .insert_header(bearer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
