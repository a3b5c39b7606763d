//! Product endpoints: creation and filtered listing.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use storefront_core::{NewProduct, Product, ProductFilter};
use storefront_store::ProductStore;

use crate::app::AppState;
use crate::error::store_error_response;
use crate::routes::{ListResponse, non_empty, page_from};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name,
            price: product.price,
            quantity: product.quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub name: Option<String>,
    pub size: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn create_product<S: ProductStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<CreateProductRequest>,
) -> Response {
    let product = NewProduct {
        name: body.name,
        price: body.price,
        quantity: body.quantity,
    };
    match state.catalog.create_product(product).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_hex() })),
        )
            .into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub async fn list_products<S: ProductStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListProductsQuery>,
) -> Response {
    let filter = ProductFilter {
        name: non_empty(query.name),
        size: non_empty(query.size),
    };
    let page = page_from(query.limit, query.offset);

    match state.catalog.list_products(&filter, page).await {
        Ok(paged) => Json(ListResponse::new(paged, ProductResponse::from)).into_response(),
        Err(err) => store_error_response(&err),
    }
}
