// src/db/inventory_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{InventoryItem, MovementType, StockMovement, StockRow},
};

// Shared WHERE clause for the stock listing and its count. $2 is the array
// of ILIKE patterns (empty array = no search), $3 an optional low-stock
// threshold, $4 an optional expiration cutoff.
const STOCK_FILTER: &str = "i.tenant_id = $1
      AND (cardinality($2::text[]) = 0
           OR p.name ILIKE ANY($2)
           OR p.sku ILIKE ANY($2)
           OR i.lot_number ILIKE ANY($2))
      AND ($3::bigint IS NULL OR i.quantity <= $3)
      AND ($4::date IS NULL OR i.expiration_date <= $4)";

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Write path: executor-generic, meant to run inside a transaction.
    // ---

    // Locks the aggregate row; concurrent movements against the same lot
    // serialize on this lock.
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<InventoryItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
        .bind(item_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    // All lots of one SKU, earliest expiration first, locked so two
    // fulfillments cannot pick the same stock.
    pub async fn lots_for_sku_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        sku: &str,
    ) -> Result<Vec<InventoryItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lots = sqlx::query_as::<_, InventoryItem>(
            "SELECT i.* FROM inventory_items i
             JOIN products p ON p.id = i.product_id
             WHERE i.tenant_id = $1 AND p.sku = $2
             ORDER BY i.expiration_date ASC, i.created_at ASC
             FOR UPDATE OF i",
        )
        .bind(tenant_id)
        .bind(sku)
        .fetch_all(executor)
        .await?;
        Ok(lots)
    }

    // New aggregates always start at quantity 0; the seeding movement brings
    // them to their initial quantity.
    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
        lot_number: &str,
        expiration_date: NaiveDate,
    ) -> Result<InventoryItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InventoryItem>(
            "INSERT INTO inventory_items (product_id, tenant_id, quantity, lot_number, expiration_date)
             VALUES ($1, $2, 0, $3, $4)
             RETURNING *",
        )
        .bind(product_id)
        .bind(tenant_id)
        .bind(lot_number)
        .bind(expiration_date)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn set_quantity<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        new_stock: i64,
    ) -> Result<InventoryItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InventoryItem>(
            "UPDATE inventory_items SET quantity = $2, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(item_id)
        .bind(new_stock)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    // Appends one ledger entry. There is deliberately no update/delete
    // counterpart anywhere in this repository.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_movement<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        movement_type: MovementType,
        quantity: i64,
        previous_stock: i64,
        new_stock: i64,
        reason: &str,
        order_id: Option<Uuid>,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, StockMovement>(
            "INSERT INTO stock_movements
                 (inventory_item_id, movement_type, quantity, previous_stock, new_stock, reason, order_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(item_id)
        .bind(movement_type)
        .bind(quantity)
        .bind(previous_stock)
        .bind(new_stock)
        .bind(reason)
        .bind(order_id)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    // ---
    // Read path: projections run on the main pool, outside any write
    // transaction.
    // ---

    pub async fn list_stock(
        &self,
        tenant_id: Uuid,
        search_patterns: &[String],
        max_quantity: Option<i64>,
        expires_on_or_before: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StockRow>, AppError> {
        let sql = format!(
            "SELECT i.id AS inventory_item_id, i.product_id, p.sku, p.name,
                    i.lot_number, i.expiration_date, i.quantity,
                    p.base_price, p.discount_price, p.active
             FROM inventory_items i
             JOIN products p ON p.id = i.product_id
             WHERE {STOCK_FILTER}
             ORDER BY p.name ASC, i.expiration_date ASC
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, StockRow>(&sql)
            .bind(tenant_id)
            .bind(search_patterns)
            .bind(max_quantity)
            .bind(expires_on_or_before)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count_stock(
        &self,
        tenant_id: Uuid,
        search_patterns: &[String],
        max_quantity: Option<i64>,
        expires_on_or_before: Option<NaiveDate>,
    ) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*)
             FROM inventory_items i
             JOIN products p ON p.id = i.product_id
             WHERE {STOCK_FILTER}"
        );
        let total: (i64,) = sqlx::query_as(&sql)
            .bind(tenant_id)
            .bind(search_patterns)
            .bind(max_quantity)
            .bind(expires_on_or_before)
            .fetch_one(&self.pool)
            .await?;
        Ok(total.0)
    }

    pub async fn item_exists(&self, tenant_id: Uuid, item_id: Uuid) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM inventory_items WHERE id = $1 AND tenant_id = $2)",
        )
        .bind(item_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    pub async fn movements_for_item(
        &self,
        item_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT * FROM stock_movements
             WHERE inventory_item_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(item_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }

    pub async fn count_movements_for_item(&self, item_id: Uuid) -> Result<i64, AppError> {
        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM stock_movements WHERE inventory_item_id = $1")
                .bind(item_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(total.0)
    }

    pub async fn movements_for_tenant(
        &self,
        tenant_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT m.* FROM stock_movements m
             JOIN inventory_items i ON i.id = m.inventory_item_id
             WHERE i.tenant_id = $1
             ORDER BY m.created_at DESC, m.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(tenant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }

    pub async fn count_movements_for_tenant(&self, tenant_id: Uuid) -> Result<i64, AppError> {
        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM stock_movements m
             JOIN inventory_items i ON i.id = m.inventory_item_id
             WHERE i.tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total.0)
    }
}
