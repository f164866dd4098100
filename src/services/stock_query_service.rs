// src/services/stock_query_service.rs

use chrono::{Days, Utc};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageParams},
    },
    db::InventoryRepository,
    models::inventory::{StockMovement, StockRow},
};

// Read-only projections for the stock table, the low-stock and expiring
// panels, and the movement-history views. Nothing here mutates state.
#[derive(Clone)]
pub struct StockQueryService {
    inventory_repo: InventoryRepository,
}

impl StockQueryService {
    pub fn new(inventory_repo: InventoryRepository) -> Self {
        Self { inventory_repo }
    }

    pub async fn list_current_stock(
        &self,
        tenant_id: Uuid,
        params: &PageParams,
        search: Option<&str>,
    ) -> Result<Page<StockRow>, AppError> {
        let patterns = parse_search_terms(search);
        self.stock_page(tenant_id, params, &patterns, None, None).await
    }

    pub async fn list_low_stock(
        &self,
        tenant_id: Uuid,
        threshold: i64,
        params: &PageParams,
    ) -> Result<Page<StockRow>, AppError> {
        if threshold < 0 {
            return Err(AppError::Validation("threshold must not be negative".into()));
        }
        self.stock_page(tenant_id, params, &[], Some(threshold), None)
            .await
    }

    pub async fn list_expiring_soon(
        &self,
        tenant_id: Uuid,
        within_days: u64,
        params: &PageParams,
    ) -> Result<Page<StockRow>, AppError> {
        let cutoff = Utc::now()
            .date_naive()
            .checked_add_days(Days::new(within_days))
            .ok_or_else(|| AppError::Validation("withinDays is out of range".into()))?;
        self.stock_page(tenant_id, params, &[], None, Some(cutoff))
            .await
    }

    async fn stock_page(
        &self,
        tenant_id: Uuid,
        params: &PageParams,
        patterns: &[String],
        max_quantity: Option<i64>,
        expires_on_or_before: Option<chrono::NaiveDate>,
    ) -> Result<Page<StockRow>, AppError> {
        let rows = self
            .inventory_repo
            .list_stock(
                tenant_id,
                patterns,
                max_quantity,
                expires_on_or_before,
                params.limit(),
                params.offset(),
            )
            .await?;
        let total = self
            .inventory_repo
            .count_stock(tenant_id, patterns, max_quantity, expires_on_or_before)
            .await?;
        Ok(Page::new(rows, total, params))
    }

    pub async fn movement_history_for_item(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
        params: &PageParams,
    ) -> Result<Page<StockMovement>, AppError> {
        if !self.inventory_repo.item_exists(tenant_id, item_id).await? {
            return Err(AppError::NotFound("inventory item"));
        }
        let movements = self
            .inventory_repo
            .movements_for_item(item_id, params.limit(), params.offset())
            .await?;
        let total = self.inventory_repo.count_movements_for_item(item_id).await?;
        Ok(Page::new(movements, total, params))
    }

    pub async fn movement_history_for_tenant(
        &self,
        tenant_id: Uuid,
        params: &PageParams,
    ) -> Result<Page<StockMovement>, AppError> {
        let movements = self
            .inventory_repo
            .movements_for_tenant(tenant_id, params.limit(), params.offset())
            .await?;
        let total = self
            .inventory_repo
            .count_movements_for_tenant(tenant_id)
            .await?;
        Ok(Page::new(movements, total, params))
    }
}

// Splits a comma-separated search string into ILIKE patterns. Terms are
// OR'd: a row matches if any term matches its name, SKU or lot number.
fn parse_search_terms(search: Option<&str>) -> Vec<String> {
    search
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| format!("%{}%", term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_are_trimmed_and_wrapped() {
        assert_eq!(
            parse_search_terms(Some("amoxicillin, LOT-7 ,  x")),
            vec!["%amoxicillin%", "%LOT-7%", "%x%"]
        );
    }

    #[test]
    fn empty_input_yields_no_patterns() {
        assert!(parse_search_terms(None).is_empty());
        assert!(parse_search_terms(Some("")).is_empty());
        assert!(parse_search_terms(Some(" , ,")).is_empty());
    }
}
