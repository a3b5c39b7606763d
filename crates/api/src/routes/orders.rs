//! Order endpoints: creation (the checkout core) and per-user listing.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::Order;
use storefront_store::{OrderStore, ProductStore};

use crate::app::AppState;
use crate::error::{order_error_response, store_error_response};
use crate::routes::{ListResponse, page_from};
use storefront_checkout::{OrderItemRequest, OrderRequest};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemPayload>,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(rename = "userAddress")]
    pub user_address: BTreeMap<String, String>,
    /// Explicit identity; optional, the address-derived placeholder applies
    /// when absent.
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemPayload {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "boughtQuantity")]
    pub bought_quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub items: Vec<OrderItemPayload>,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(rename = "userAddress")]
    pub user_address: BTreeMap<String, String>,
    #[serde(rename = "createdOn")]
    pub created_on: DateTime<Utc>,
    pub user_id: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_hex(),
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemPayload {
                    product_id: item.product_id.to_hex(),
                    bought_quantity: item.bought_quantity,
                })
                .collect(),
            total_amount: order.total_amount,
            user_address: order.user_address,
            created_on: order.created_on,
            user_id: order.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn create_order<S: ProductStore + OrderStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<CreateOrderRequest>,
) -> Response {
    let request = OrderRequest {
        items: body
            .items
            .into_iter()
            .map(|item| OrderItemRequest {
                product_id: item.product_id,
                bought_quantity: item.bought_quantity,
            })
            .collect(),
        total_amount: body.total_amount,
        user_address: body.user_address,
        user_id: body.user_id,
    };

    match state.checkout.create_order(request).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_hex() })),
        )
            .into_response(),
        Err(err) => order_error_response(err),
    }
}

pub async fn list_user_orders<S: OrderStore>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<String>,
    Query(query): Query<ListOrdersQuery>,
) -> Response {
    let page = page_from(query.limit, query.offset);
    match state.catalog.list_user_orders(&user_id, page).await {
        Ok(paged) => Json(ListResponse::new(paged, OrderResponse::from)).into_response(),
        Err(err) => store_error_response(&err),
    }
}
