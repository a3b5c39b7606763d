//! Router construction and shared application state.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use storefront_catalog::CatalogService;
use storefront_checkout::OrderAssembler;
use storefront_store::{Health, OrderStore, ProductStore};

use crate::routes;

/// Everything a handler needs, generic over the store backend so tests run
/// against the in-memory store and the binary against MongoDB.
pub struct AppState<S> {
    pub catalog: Arc<CatalogService<S>>,
    pub checkout: Arc<OrderAssembler<S>>,
    pub store: Arc<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            checkout: self.checkout.clone(),
            store: self.store.clone(),
        }
    }
}

pub fn build_app<S>(store: Arc<S>) -> Router
where
    S: ProductStore + OrderStore + Health + 'static,
{
    let state = AppState {
        catalog: Arc::new(CatalogService::new(store.clone())),
        checkout: Arc::new(OrderAssembler::new(store.clone())),
        store,
    };

    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health::<S>))
        .route(
            "/products",
            post(routes::products::create_product::<S>).get(routes::products::list_products::<S>),
        )
        .route("/orders", post(routes::orders::create_order::<S>))
        .route("/orders/:user_id", get(routes::orders::list_user_orders::<S>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use storefront_store::{MemoryStore, ProductStore};
    use tower::ServiceExt;

    fn test_app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (build_app(store.clone()), store)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => Request::builder().method(method).uri(uri).body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_product(app: &Router, name: &str, price: f64, quantity: i64) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/products",
            Some(json!({ "name": name, "price": price, "quantity": quantity })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_product_returns_hex_id() {
        let (app, _) = test_app();
        let id = create_product(&app, "Large T-Shirt", 25.99, 100).await;
        assert_eq!(id.len(), 24);
    }

    #[tokio::test]
    async fn product_listing_filters_and_echoes_pagination() {
        let (app, _) = test_app();
        create_product(&app, "Large T-Shirt", 25.99, 100).await;
        create_product(&app, "Small T-Shirt", 19.99, 50).await;
        create_product(&app, "Mug", 4.0, 10).await;

        let (status, body) = send(&app, "GET", "/products?name=shirt", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], json!(2));
        assert_eq!(body["limit"], json!(10));
        assert_eq!(body["offset"], json!(0));
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = send(&app, "GET", "/products?name=shirt&size=large", None).await;
        assert_eq!(body["total"], json!(1));
        assert_eq!(body["data"][0]["name"], json!("Large T-Shirt"));

        let (_, body) = send(&app, "GET", "/products?limit=2&offset=2", None).await;
        assert_eq!(body["total"], json!(3));
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn order_flow_decrements_stock_and_lists_by_user() {
        let (app, store) = test_app();
        let product_id = create_product(&app, "Large T-Shirt", 25.99, 100).await;

        let (status, body) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({
                "items": [{ "productId": product_id, "boughtQuantity": 2 }],
                "totalAmount": 51.98,
                "userAddress": { "City": "New York", "Country": "USA", "ZipCode": "10001" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_string());

        let product = store
            .find_product(product_id.parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.quantity, 98);

        let (status, body) = send(&app, "GET", "/orders/New%20York", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], json!(1));
        let order = &body["data"][0];
        assert_eq!(order["totalAmount"], json!(51.98));
        assert_eq!(order["user_id"], json!("New York"));
        assert_eq!(order["items"][0]["productId"], json!(product_id));
        assert!(order["createdOn"].is_string());
    }

    #[tokio::test]
    async fn order_error_statuses() {
        let (app, _) = test_app();
        let product_id = create_product(&app, "Mug", 4.0, 5).await;

        // malformed id
        let (status, body) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({
                "items": [{ "productId": "nope", "boughtQuantity": 1 }],
                "totalAmount": 4.0,
                "userAddress": {}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("nope"));

        // well-formed but unknown id
        let (status, _) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({
                "items": [{ "productId": "64a1b2c3d4e5f6789abcdef0", "boughtQuantity": 1 }],
                "totalAmount": 4.0,
                "userAddress": {}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // more than available
        let (status, body) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({
                "items": [{ "productId": product_id, "boughtQuantity": 6 }],
                "totalAmount": 24.0,
                "userAddress": {}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("insufficient_stock"));
        assert!(body["detail"].as_str().unwrap().contains("Available: 5"));
    }

    #[tokio::test]
    async fn oversubscribed_second_order_is_rejected() {
        let (app, store) = test_app();
        let product_id = create_product(&app, "Mug", 4.0, 5).await;
        let order = |qty: i64| {
            json!({
                "items": [{ "productId": product_id, "boughtQuantity": qty }],
                "totalAmount": 4.0 * qty as f64,
                "userAddress": { "City": "Oslo" }
            })
        };

        let (status, _) = send(&app, "POST", "/orders", Some(order(3))).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, "POST", "/orders", Some(order(3))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let product = store
            .find_product(product_id.parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.quantity, 2);
    }

    #[tokio::test]
    async fn health_reports_connected_store() {
        let (app, _) = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["database"], json!("connected"));
    }
}
