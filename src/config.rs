// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{InventoryRepository, ProductRepository},
    services::{
        catalog_service::CatalogService, movement_service::MovementService,
        onboarding_service::OnboardingService, stock_query_service::StockQueryService,
    },
};

// Shared state, accessible from every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub movement_service: MovementService,
    pub onboarding_service: OnboardingService,
    pub stock_query_service: StockQueryService,
    pub catalog_service: CatalogService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Database connection established!");

        // --- Dependency graph ---
        let product_repo = ProductRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());

        let movement_service = MovementService::new(inventory_repo.clone());
        let onboarding_service = OnboardingService::new(
            product_repo.clone(),
            inventory_repo.clone(),
            movement_service.clone(),
        );
        let stock_query_service = StockQueryService::new(inventory_repo);
        let catalog_service = CatalogService::new(product_repo);

        Ok(Self {
            db_pool,
            movement_service,
            onboarding_service,
            stock_query_service,
            catalog_service,
        })
    }
}
