use std::sync::Arc;

use storefront_store::MongoStore;

#[tokio::main]
async fn main() {
    storefront_api::observability::init();

    let mongodb_url = match std::env::var("MONGODB_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::error!("MONGODB_URL not set");
            std::process::exit(1);
        }
    };

    let store = match MongoStore::connect(&mongodb_url).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(%err, "MongoDB connection failed");
            std::process::exit(1);
        }
    };

    let app = storefront_api::app::build_app(Arc::new(store));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
