// src/services/movement_service.rs

use sqlx::{PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InventoryRepository,
    models::inventory::{InventoryItem, MovementKind, MovementType, StockMovement},
};

// The movement engine: the only code path allowed to mutate an aggregate's
// quantity. Every mutation pairs the counter update with exactly one ledger
// entry inside one transaction, so the two can never diverge.
#[derive(Clone)]
pub struct MovementService {
    inventory_repo: InventoryRepository,
}

impl MovementService {
    pub fn new(inventory_repo: InventoryRepository) -> Self {
        Self { inventory_repo }
    }

    // Records one movement against one aggregate. Read, compute, write and
    // append happen in a single transaction; on any error nothing commits.
    pub async fn record_movement<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        item_id: Uuid,
        kind: MovementKind,
        reason: &str,
        order_id: Option<Uuid>,
    ) -> Result<(InventoryItem, StockMovement), AppError>
    where
        E: sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let result = self
            .apply_movement(&mut tx, tenant_id, item_id, kind, reason, order_id)
            .await?;
        tx.commit().await?;
        Ok(result)
    }

    // The read-compute-write-append sequence, running on the caller's
    // connection so the onboarding flow can compose it into its own
    // transaction. The FOR UPDATE read serializes concurrent movements on
    // the same aggregate: the second writer blocks until the first commits
    // and then observes its new_stock as previous_stock.
    pub(crate) async fn apply_movement(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        item_id: Uuid,
        kind: MovementKind,
        reason: &str,
        order_id: Option<Uuid>,
    ) -> Result<(InventoryItem, StockMovement), AppError> {
        if reason.trim().is_empty() {
            return Err(AppError::Validation(
                "a non-empty reason is required for stock movements".into(),
            ));
        }

        let item = self
            .inventory_repo
            .find_for_update(&mut *conn, tenant_id, item_id)
            .await?
            .ok_or(AppError::NotFound("inventory item"))?;

        let previous_stock = item.quantity;
        let new_stock = kind.apply(previous_stock)?;

        let updated_item = self
            .inventory_repo
            .set_quantity(&mut *conn, item.id, new_stock)
            .await?;

        let movement = self
            .inventory_repo
            .insert_movement(
                &mut *conn,
                item.id,
                kind.movement_type(),
                kind.recorded_quantity(),
                previous_stock,
                new_stock,
                reason,
                order_id,
            )
            .await?;

        tracing::info!(
            item_id = %item.id,
            movement_type = ?kind.movement_type(),
            previous_stock,
            new_stock,
            "stock movement recorded"
        );

        Ok((updated_item, movement))
    }

    // Adapter for the order pipeline: resolves a SKU to a lot and debits it.
    // Picks the earliest-expiring lot that can cover the whole quantity, so
    // one order line maps to one OUTBOUND movement on one lot.
    pub async fn decrement_for_order_fulfillment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        sku: &str,
        quantity: i64,
        order_id: Option<Uuid>,
    ) -> Result<InventoryItem, AppError>
    where
        E: sqlx::Acquire<'e, Database = Postgres>,
    {
        let kind = MovementKind::from_parts(MovementType::Outbound, quantity)?;

        let mut tx = executor.begin().await?;

        let lots = self
            .inventory_repo
            .lots_for_sku_for_update(&mut *tx, tenant_id, sku)
            .await?;
        if lots.is_empty() {
            return Err(AppError::NotFound("product with matching SKU"));
        }

        // A single movement can only debit one lot, so report the largest
        // single-lot availability when nothing covers the order line.
        let Some(lot) = lots.iter().find(|lot| lot.quantity >= quantity) else {
            let available = lots.iter().map(|lot| lot.quantity).max().unwrap_or(0);
            return Err(AppError::InsufficientStock { available });
        };

        let (updated_item, _movement) = self
            .apply_movement(&mut tx, tenant_id, lot.id, kind, "Order fulfillment", order_id)
            .await?;

        tx.commit().await?;
        Ok(updated_item)
    }
}
