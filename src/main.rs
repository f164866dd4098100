//src/main.rs

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() is fine here: if configuration fails, the app must not start.
    let app_state = AppState::new()
        .await
        .expect("Failed to initialize application state.");

    // Run the SQLx migrations on startup.
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Failed to run database migrations.");

    tracing::info!("✅ Database migrations applied!");

    let inventory_routes = Router::new()
        .route(
            "/movements",
            post(handlers::inventory::record_movement)
                .get(handlers::inventory::tenant_movement_history),
        )
        .route(
            "/items/{id}/movements",
            get(handlers::inventory::item_movement_history),
        )
        .route("/stock", get(handlers::inventory::list_stock))
        .route("/stock/low", get(handlers::inventory::list_low_stock))
        .route(
            "/stock/expiring",
            get(handlers::inventory::list_expiring_soon),
        )
        .route("/fulfillment", post(handlers::inventory::fulfill_order_line));

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route("/{id}", patch(handlers::products::update_product))
        .route("/{id}/lots", post(handlers::products::add_lot));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/inventory", inventory_routes)
        .nest("/api/products", product_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind the TCP listener");
    tracing::info!("🚀 Server listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Axum server error");
}
