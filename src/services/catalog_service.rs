// src/services/catalog_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageParams},
    },
    db::ProductRepository,
    models::product::{Product, ProductPatch},
};

// Plain catalog administration: listing and admin edits. Creation goes
// through the onboarding workflow; deletion does not exist.
#[derive(Clone)]
pub struct CatalogService {
    product_repo: ProductRepository,
}

impl CatalogService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    pub async fn list_products(
        &self,
        tenant_id: Uuid,
        params: &PageParams,
    ) -> Result<Page<Product>, AppError> {
        let products = self
            .product_repo
            .list(tenant_id, params.limit(), params.offset())
            .await?;
        let total = self.product_repo.count(tenant_id).await?;
        Ok(Page::new(products, total, params))
    }

    // Single-statement update; no transaction needed.
    pub async fn update_product(
        &self,
        pool: &PgPool,
        tenant_id: Uuid,
        product_id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Product, AppError> {
        self.product_repo
            .update(pool, tenant_id, product_id, patch)
            .await?
            .ok_or(AppError::NotFound("product"))
    }
}
