use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::errors::OrderError;
use super::value_objects::OrderLineItem;
use crate::domain::identifiers::{parse_id, IdKind};

// ============================================================================
// Order Inputs - raw request payloads
// ============================================================================

/// One `{productId, quantity}` entry as received from a caller
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    #[serde(default)]
    pub product_id: String,
    pub quantity: i64,
}

impl LineItemInput {
    pub fn new(product_id: impl ToString, quantity: i64) -> Self {
        Self {
            product_id: product_id.to_string(),
            quantity,
        }
    }
}

/// Body of `POST /orders`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub products: Vec<LineItemInput>,
}

/// Body of `PATCH /orders/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchOrder {
    #[serde(default)]
    pub products: Vec<LineItemInput>,
}

// ============================================================================
// Order Commands - validated intent against one order
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum OrderCommand {
    ReplaceItems {
        items: Vec<OrderLineItem>,
        total_price: Decimal,
    },
    Submit,
    Cancel,
}

// ============================================================================
// Input normalisation
// ============================================================================

pub(crate) fn parse_product_id(raw: &str) -> Result<Uuid, OrderError> {
    parse_id(raw).ok_or_else(|| OrderError::MalformedId {
        kind: IdKind::Product,
        value: raw.to_string(),
    })
}

/// Empty or absent owner means "no owner"
pub(crate) fn parse_owner(raw: Option<&str>) -> Result<Option<Uuid>, OrderError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_id(value)
            .map(Some)
            .ok_or_else(|| OrderError::MalformedId {
                kind: IdKind::User,
                value: value.to_string(),
            }),
    }
}

/// Creation items: ids well-formed, quantities positive, duplicates merged.
///
/// First-appearance order is kept.
pub(crate) fn normalize_creation_items(inputs: &[LineItemInput]) -> Result<Vec<OrderLineItem>, OrderError> {
    if inputs.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    let mut merged: Vec<(Uuid, i64)> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let product_id = parse_product_id(&input.product_id)?;
        if input.quantity <= 0 {
            return Err(OrderError::InvalidQuantity {
                product_id,
                quantity: input.quantity,
            });
        }

        match merged.iter_mut().find(|(id, _)| *id == product_id) {
            Some((_, quantity)) => {
                *quantity = quantity
                    .checked_add(input.quantity)
                    .ok_or(OrderError::InvalidQuantity {
                        product_id,
                        quantity: input.quantity,
                    })?;
            }
            None => merged.push((product_id, input.quantity)),
        }
    }

    merged
        .into_iter()
        .map(|(product_id, quantity)| {
            i32::try_from(quantity)
                .map(|quantity| OrderLineItem { product_id, quantity })
                .map_err(|_| OrderError::InvalidQuantity { product_id, quantity })
        })
        .collect()
}

/// Patch deltas summed per product, first-appearance order kept
pub(crate) fn net_deltas(inputs: &[LineItemInput]) -> Result<Vec<(Uuid, i64)>, OrderError> {
    if inputs.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    let mut net: Vec<(Uuid, i64)> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let product_id = parse_product_id(&input.product_id)?;
        match net.iter_mut().find(|(id, _)| *id == product_id) {
            Some((_, delta)) => {
                *delta = delta
                    .checked_add(input.quantity)
                    .ok_or(OrderError::InvalidQuantity {
                        product_id,
                        quantity: input.quantity,
                    })?;
            }
            None => net.push((product_id, input.quantity)),
        }
    }
    Ok(net)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_items_merge_duplicates() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let items = normalize_creation_items(&[
            LineItemInput::new(a, 1),
            LineItemInput::new(b, 2),
            LineItemInput::new(a, 3),
        ])
        .unwrap();

        assert_eq!(
            items,
            vec![
                OrderLineItem { product_id: a, quantity: 4 },
                OrderLineItem { product_id: b, quantity: 2 },
            ]
        );
    }

    #[test]
    fn test_creation_items_reject_bad_input() {
        assert_eq!(normalize_creation_items(&[]), Err(OrderError::EmptyItems));

        let err = normalize_creation_items(&[LineItemInput::new("abc", 1)]).unwrap_err();
        assert!(matches!(err, OrderError::MalformedId { kind: IdKind::Product, .. }));

        let id = Uuid::new_v4();
        let err = normalize_creation_items(&[LineItemInput::new(id, 0)]).unwrap_err();
        assert_eq!(err, OrderError::InvalidQuantity { product_id: id, quantity: 0 });

        let err = normalize_creation_items(&[LineItemInput::new(id, i64::from(i32::MAX) + 1)]).unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_net_deltas_sum_per_product() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let net = net_deltas(&[
            LineItemInput::new(a, 2),
            LineItemInput::new(b, -1),
            LineItemInput::new(a, -5),
            LineItemInput::new(b, 0),
        ])
        .unwrap();

        assert_eq!(net, vec![(a, -3), (b, -1)]);
    }

    #[test]
    fn test_parse_owner() {
        assert_eq!(parse_owner(None), Ok(None));
        assert_eq!(parse_owner(Some("")), Ok(None));

        let id = Uuid::new_v4();
        assert_eq!(parse_owner(Some(&id.to_string())), Ok(Some(id)));
        assert!(matches!(
            parse_owner(Some("bogus")),
            Err(OrderError::MalformedId { kind: IdKind::User, .. })
        ));
    }

    #[test]
    fn test_create_order_payload() {
        let body = r#"{"userId":"","products":[{"productId":"x","quantity":2}]}"#;
        let payload: CreateOrder = serde_json::from_str(body).unwrap();
        assert_eq!(payload.user_id.as_deref(), Some(""));
        assert_eq!(payload.products, vec![LineItemInput::new("x", 2)]);
    }
}
