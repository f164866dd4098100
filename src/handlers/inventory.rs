// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::PageParams},
    config::AppState,
    middleware::tenancy::TenantContext,
    models::inventory::{InventoryItem, MovementKind, MovementType, StockMovement},
};

// ---
// Payload: RecordMovement
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordMovementPayload {
    pub inventory_item_id: Uuid,

    pub movement_type: MovementType,

    // Delta for INBOUND/OUTBOUND/TRANSFER, new absolute total for
    // ADJUSTMENT; the per-type range rules are checked when the pair is
    // parsed into a movement kind.
    pub quantity: i64,

    #[validate(length(min = 1, message = "A reason is required."))]
    pub reason: String,

    pub order_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementReceipt {
    pub inventory_item: InventoryItem,
    pub movement: StockMovement,
}

// ---
// Handler: record_movement
// ---
#[utoipa::path(
    post,
    path = "/api/inventory/movements",
    request_body = RecordMovementPayload,
    responses(
        (status = 201, body = MovementReceipt),
        (status = 404, description = "Inventory item not found"),
        (status = 409, description = "Insufficient stock"),
    ),
    tag = "inventory"
)]
pub async fn record_movement(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<RecordMovementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let kind = MovementKind::from_parts(payload.movement_type, payload.quantity)?;

    let (inventory_item, movement) = app_state
        .movement_service
        .record_movement(
            &app_state.db_pool,
            tenant.0,
            payload.inventory_item_id,
            kind,
            &payload.reason,
            payload.order_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MovementReceipt {
            inventory_item,
            movement,
        }),
    ))
}

// ---
// Payload: order fulfillment (the order pipeline's adapter endpoint)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentPayload {
    #[validate(length(min = 1, message = "The SKU is required."))]
    pub sku: String,

    pub quantity: i64,

    pub order_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/inventory/fulfillment",
    request_body = FulfillmentPayload,
    responses(
        (status = 200, body = InventoryItem),
        (status = 404, description = "No matching SKU for this tenant"),
        (status = 409, description = "Insufficient stock"),
    ),
    tag = "inventory"
)]
pub async fn fulfill_order_line(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<FulfillmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated_item = app_state
        .movement_service
        .decrement_for_order_fulfillment(
            &app_state.db_pool,
            tenant.0,
            &payload.sku,
            payload.quantity,
            payload.order_id,
        )
        .await?;

    Ok((StatusCode::OK, Json(updated_item)))
}

// ---
// Stock listing queries
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StockListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    // Comma-separated terms, matched against product name, SKU and lot number.
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/inventory/stock",
    params(StockListQuery),
    responses((status = 200, description = "Current stock, joined with product fields")),
    tag = "inventory"
)]
pub async fn list_stock(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<StockListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = PageParams {
        page: query.page,
        page_size: query.page_size,
    };
    let page = app_state
        .stock_query_service
        .list_current_stock(tenant.0, &params, query.search.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(page)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LowStockQuery {
    pub threshold: i64,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/inventory/stock/low",
    params(LowStockQuery),
    responses((status = 200, description = "Lots at or below the threshold")),
    tag = "inventory"
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<LowStockQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = PageParams {
        page: query.page,
        page_size: query.page_size,
    };
    let page = app_state
        .stock_query_service
        .list_low_stock(tenant.0, query.threshold, &params)
        .await?;
    Ok((StatusCode::OK, Json(page)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringQuery {
    pub within_days: Option<u64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

const DEFAULT_EXPIRY_WINDOW_DAYS: u64 = 30;

#[utoipa::path(
    get,
    path = "/api/inventory/stock/expiring",
    params(ExpiringQuery),
    responses((status = 200, description = "Lots expiring within the window")),
    tag = "inventory"
)]
pub async fn list_expiring_soon(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<ExpiringQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = PageParams {
        page: query.page,
        page_size: query.page_size,
    };
    let within_days = query.within_days.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS);
    let page = app_state
        .stock_query_service
        .list_expiring_soon(tenant.0, within_days, &params)
        .await?;
    Ok((StatusCode::OK, Json(page)))
}

// ---
// Movement history
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/inventory/items/{id}/movements",
    params(("id" = Uuid, Path, description = "Inventory item id"), HistoryQuery),
    responses(
        (status = 200, description = "Movements for one aggregate, newest first"),
        (status = 404, description = "Inventory item not found"),
    ),
    tag = "inventory"
)]
pub async fn item_movement_history(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(item_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = PageParams {
        page: query.page,
        page_size: query.page_size,
    };
    let page = app_state
        .stock_query_service
        .movement_history_for_item(tenant.0, item_id, &params)
        .await?;
    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/movements",
    params(HistoryQuery),
    responses((status = 200, description = "Movements across the tenant, newest first")),
    tag = "inventory"
)]
pub async fn tenant_movement_history(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = PageParams {
        page: query.page,
        page_size: query.page_size,
    };
    let page = app_state
        .stock_query_service
        .movement_history_for_tenant(tenant.0, &params)
        .await?;
    Ok((StatusCode::OK, Json(page)))
}
