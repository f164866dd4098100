// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{NewProduct, Product, ProductPatch},
};

// Postgres error code for unique-constraint violations; the DB index on
// (tenant_id, sku) backstops the SKU check under concurrent onboarding.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Write path: every function takes an executor so it can run inside the
    // caller's transaction.
    // ---

    pub async fn sku_exists<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        sku: &str,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM products WHERE tenant_id = $1 AND sku = $2)",
        )
        .bind(tenant_id)
        .bind(sku)
        .fetch_one(executor)
        .await?;
        Ok(exists.0)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        new_product: &NewProduct,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (tenant_id, sku, name, description, base_price, discount_price)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(tenant_id)
        .bind(&new_product.sku)
        .bind(&new_product.name)
        .bind(&new_product.description)
        .bind(new_product.base_price)
        .bind(new_product.discount_price)
        .fetch_one(executor)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                AppError::DuplicateSku(new_product.sku.clone())
            }
            _ => AppError::Database(e),
        })
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 AND tenant_id = $2",
        )
        .bind(product_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    // Untouched fields keep their current value.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET
                 name = COALESCE($3, name),
                 description = COALESCE($4, description),
                 base_price = COALESCE($5, base_price),
                 discount_price = COALESCE($6, discount_price),
                 active = COALESCE($7, active),
                 updated_at = now()
             WHERE id = $1 AND tenant_id = $2
             RETURNING *",
        )
        .bind(product_id)
        .bind(tenant_id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.base_price)
        .bind(patch.discount_price)
        .bind(patch.active)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    // ---
    // Read path: listing queries run on the main pool.
    // ---

    pub async fn list(
        &self,
        tenant_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE tenant_id = $1 ORDER BY name ASC LIMIT $2 OFFSET $3",
        )
        .bind(tenant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn count(&self, tenant_id: Uuid) -> Result<i64, AppError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total.0)
    }
}
