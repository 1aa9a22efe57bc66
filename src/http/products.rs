use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use super::auth::BearerAuth;
use super::errors::ApiError;
use crate::catalog::{CatalogError, Product};
use crate::context::AppContext;
use crate::domain::identifiers::{parse_id, IdKind};

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
    pub limit: usize,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/products", web::get().to(list_products))
        .route("/products/{product_id}", web::get().to(get_product));
}

fn parse_limit(raw: Option<&str>) -> Result<usize, ApiError> {
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return Ok(DEFAULT_LIMIT);
    };
    match raw.parse::<usize>() {
        Ok(limit) if (1..=MAX_LIMIT).contains(&limit) => Ok(limit),
        _ => Err(ApiError::bad_request(
            "INVALID_LIMIT",
            format!("Limit must be between 1 and {}", MAX_LIMIT),
        )),
    }
}

async fn list_products(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    query: web::Query<ProductsQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = parse_limit(query.limit.as_deref())?;
    let (products, total) = ctx.products.list(limit);
    Ok(HttpResponse::Ok().json(ProductList {
        products,
        total,
        limit,
    }))
}

async fn get_product(
    _auth: BearerAuth,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let product_id = parse_id(&path).ok_or_else(|| {
        ApiError::bad_request(
            IdKind::Product.invalid_code(),
            format!("Invalid product ID format: '{}'", path.as_str()),
        )
    })?;

    let product = ctx
        .products
        .get(product_id)
        .cloned()
        .ok_or(CatalogError::NotFound(product_id))?;
    Ok(HttpResponse::Ok().json(product))
}
