// src/services/onboarding_service.rs

use sqlx::Postgres;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InventoryRepository, ProductRepository},
    models::{
        inventory::{InventoryItem, MovementKind, NewLot},
        product::{NewProduct, Product},
    },
    services::movement_service::MovementService,
};

// Onboarding composes: create product -> create its first lot at quantity 0
// -> seed it through the movement engine. One transaction, so a failed SKU
// check or seeding movement leaves nothing behind.
#[derive(Clone)]
pub struct OnboardingService {
    product_repo: ProductRepository,
    inventory_repo: InventoryRepository,
    movements: MovementService,
}

impl OnboardingService {
    pub fn new(
        product_repo: ProductRepository,
        inventory_repo: InventoryRepository,
        movements: MovementService,
    ) -> Self {
        Self {
            product_repo,
            inventory_repo,
            movements,
        }
    }

    pub async fn create_product_with_initial_stock<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        new_product: &NewProduct,
        new_lot: &NewLot,
    ) -> Result<(Product, InventoryItem), AppError>
    where
        E: sqlx::Acquire<'e, Database = Postgres>,
    {
        validate_initial_quantity(new_lot)?;

        let mut tx = executor.begin().await?;

        // Application-level check for a friendly error; the unique index on
        // (tenant_id, sku) still decides races, surfacing as DuplicateSku
        // from the insert.
        if self
            .product_repo
            .sku_exists(&mut *tx, tenant_id, &new_product.sku)
            .await?
        {
            return Err(AppError::DuplicateSku(new_product.sku.clone()));
        }

        let product = self
            .product_repo
            .insert(&mut *tx, tenant_id, new_product)
            .await?;

        let item = self
            .seed_lot(&mut tx, tenant_id, product.id, new_lot)
            .await?;

        tx.commit().await?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "product onboarded");
        Ok((product, item))
    }

    // Receiving a new batch of an existing SKU: same lot-creation and
    // seeding steps, against a product that must already exist.
    pub async fn add_lot_to_existing_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
        new_lot: &NewLot,
    ) -> Result<InventoryItem, AppError>
    where
        E: sqlx::Acquire<'e, Database = Postgres>,
    {
        validate_initial_quantity(new_lot)?;

        let mut tx = executor.begin().await?;

        self.product_repo
            .find_by_id(&mut *tx, tenant_id, product_id)
            .await?
            .ok_or(AppError::NotFound("product"))?;

        let item = self.seed_lot(&mut tx, tenant_id, product_id, new_lot).await?;

        tx.commit().await?;
        Ok(item)
    }

    // Creates the aggregate at 0 and brings it to its initial quantity via
    // an INBOUND movement, so the first ledger entry has previous_stock = 0.
    // A zero initial quantity records no movement.
    async fn seed_lot(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        tenant_id: Uuid,
        product_id: Uuid,
        new_lot: &NewLot,
    ) -> Result<InventoryItem, AppError> {
        let item = self
            .inventory_repo
            .insert_item(
                &mut **tx,
                tenant_id,
                product_id,
                &new_lot.lot_number,
                new_lot.expiration_date,
            )
            .await?;

        if new_lot.initial_quantity == 0 {
            return Ok(item);
        }

        let kind = MovementKind::Inbound {
            delta: new_lot.initial_quantity,
        };
        let (item, _movement) = self
            .movements
            .apply_movement(tx, tenant_id, item.id, kind, "Initial stock", None)
            .await?;
        Ok(item)
    }
}

fn validate_initial_quantity(new_lot: &NewLot) -> Result<(), AppError> {
    if new_lot.initial_quantity < 0 {
        return Err(AppError::Validation(
            "initialQuantity must not be negative".into(),
        ));
    }
    if new_lot.lot_number.trim().is_empty() {
        return Err(AppError::Validation("lotNumber must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn lot(initial_quantity: i64, lot_number: &str) -> NewLot {
        NewLot {
            lot_number: lot_number.to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2027, 1, 31).unwrap(),
            initial_quantity,
        }
    }

    #[test]
    fn negative_initial_quantity_is_rejected() {
        assert!(matches!(
            validate_initial_quantity(&lot(-1, "L-1")),
            Err(AppError::Validation(_))
        ));
        assert!(validate_initial_quantity(&lot(0, "L-1")).is_ok());
    }

    #[test]
    fn blank_lot_number_is_rejected() {
        assert!(matches!(
            validate_initial_quantity(&lot(10, "   ")),
            Err(AppError::Validation(_))
        ));
    }
}
