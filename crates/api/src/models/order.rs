//! Order domain types and order-request validation.
//!
//! Validation of the request body happens here, before any transaction is
//! opened. Only existence and stock checks are left to the transactional
//! path in `db::orders`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use minimart_core::{OrderDetailId, OrderId, ProductId, UserId};

use super::product::Product;

/// Validation messages for order requests.
pub mod messages {
    pub const BODY_MUST_BE_ARRAY: &str = "body must be an array";
    pub const BODY_MIN_ONE_ITEM: &str = "body must have at least one item";
    pub const PRODUCT_ID_REQUIRED: &str = "productId is required";
    pub const PRODUCT_ID_MUST_BE_NUMBER: &str = "productId must be a number";
    pub const PRODUCT_NOT_FOUND: &str = "specified product does not exist";
    pub const QUANTITY_REQUIRED: &str = "quantity is required";
    pub const QUANTITY_MUST_BE_NUMBER: &str = "quantity must be a number";
    pub const QUANTITY_MIN_ONE: &str = "quantity must be greater than 1";
}

/// One `{productId, quantity}` entry within an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Parse and validate a raw order request body.
///
/// Returns the parsed line items, or the list of validation messages.
/// Validation stops at the first malformed line item, but a rejected body
/// never reaches the database.
///
/// # Errors
///
/// Returns human-readable messages for: non-array body, empty body, and
/// missing or non-numeric `productId`/`quantity` fields, plus
/// `quantity < 1`.
pub fn parse_order_request(body: &Value) -> Result<Vec<LineItem>, Vec<String>> {
    let Some(entries) = body.as_array() else {
        return Err(vec![messages::BODY_MUST_BE_ARRAY.to_string()]);
    };

    if entries.is_empty() {
        return Err(vec![messages::BODY_MIN_ONE_ITEM.to_string()]);
    }

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_line_item(entry) {
            Ok(item) => items.push(item),
            Err(message) => return Err(vec![message.to_string()]),
        }
    }

    Ok(items)
}

fn parse_line_item(entry: &Value) -> Result<LineItem, &'static str> {
    let product_id = match entry.get("productId") {
        None | Some(Value::Null) => return Err(messages::PRODUCT_ID_REQUIRED),
        Some(value) => value
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or(messages::PRODUCT_ID_MUST_BE_NUMBER)?,
    };
    // Zero is reported as missing, like null; a negative id parses fine and
    // fails the existence check instead.
    if product_id == 0 {
        return Err(messages::PRODUCT_ID_REQUIRED);
    }

    let quantity = match entry.get("quantity") {
        None | Some(Value::Null) => return Err(messages::QUANTITY_REQUIRED),
        Some(value) => value
            .as_i64()
            .and_then(|q| i32::try_from(q).ok())
            .ok_or(messages::QUANTITY_MUST_BE_NUMBER)?,
    };
    if quantity < 1 {
        return Err(messages::QUANTITY_MIN_ONE);
    }

    Ok(LineItem {
        product_id: ProductId::new(product_id),
        quantity,
    })
}

/// A persisted line item with its product's current attributes embedded.
///
/// `price` and `quantity` come from the order detail row (frozen at
/// purchase time); `product` reflects the catalog as it is now.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailWithProduct {
    pub id: OrderDetailId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub price: i32,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub product: Product,
}

/// An order with all its line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithDetails {
    pub id: OrderId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub order_details: Vec<OrderDetailWithProduct>,
}
