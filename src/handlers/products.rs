// src/handlers/products.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::{error::AppError, pagination::PageParams},
    config::AppState,
    middleware::tenancy::TenantContext,
    models::{
        inventory::{InventoryItem, NewLot},
        product::{NewProduct, Product, ProductPatch},
    },
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("The value must not be negative.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: initial lot (shared by onboarding and add-lot)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotPayload {
    #[validate(length(min = 1, message = "The lot number is required."))]
    pub lot_number: String,

    pub expiration_date: NaiveDate,

    #[validate(range(min = 0, message = "The initial quantity must not be negative."))]
    pub initial_quantity: i64,
}

impl LotPayload {
    fn to_new_lot(&self) -> NewLot {
        NewLot {
            lot_number: self.lot_number.clone(),
            expiration_date: self.expiration_date,
            initial_quantity: self.initial_quantity,
        }
    }
}

// ---
// Payload: CreateProduct (onboarding)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "The SKU is required."))]
    pub sku: String,

    #[validate(length(min = 1, message = "The name is required."))]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub base_price: Decimal,

    pub discount_price: Option<Decimal>,

    #[validate(nested)]
    pub initial_lot: LotPayload,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingReceipt {
    pub product: Product,
    pub inventory_item: InventoryItem,
}

// ---
// Handler: create_product (product + first lot + seeding movement)
// ---
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, body = OnboardingReceipt),
        (status = 409, description = "SKU already in use by this tenant"),
    ),
    tag = "products"
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let new_product = NewProduct {
        sku: payload.sku.clone(),
        name: payload.name.clone(),
        description: payload.description.clone(),
        base_price: payload.base_price,
        discount_price: payload.discount_price,
    };

    let (product, inventory_item) = app_state
        .onboarding_service
        .create_product_with_initial_stock(
            &app_state.db_pool,
            tenant.0,
            &new_product,
            &payload.initial_lot.to_new_lot(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OnboardingReceipt {
            product,
            inventory_item,
        }),
    ))
}

// ---
// Handler: add_lot (new batch of an existing SKU)
// ---
#[utoipa::path(
    post,
    path = "/api/products/{id}/lots",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = LotPayload,
    responses(
        (status = 201, body = InventoryItem),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn add_lot(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<LotPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let inventory_item = app_state
        .onboarding_service
        .add_lot_to_existing_product(
            &app_state.db_pool,
            tenant.0,
            product_id,
            &payload.to_new_lot(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(inventory_item)))
}

// ---
// Handler: list_products
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery),
    responses((status = 200, description = "The tenant's catalog, paginated")),
    tag = "products"
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let params = PageParams {
        page: query.page,
        page_size: query.page_size,
    };
    let page = app_state
        .catalog_service
        .list_products(tenant.0, &params)
        .await?;
    Ok((StatusCode::OK, Json(page)))
}

// ---
// Payload + handler: update_product (admin edits)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "The name must not be empty."))]
    pub name: Option<String>,

    pub description: Option<String>,

    pub base_price: Option<Decimal>,

    pub discount_price: Option<Decimal>,

    pub active: Option<bool>,
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, body = Product),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let patch = ProductPatch {
        name: payload.name,
        description: payload.description,
        base_price: payload.base_price,
        discount_price: payload.discount_price,
        active: payload.active,
    };

    let product = app_state
        .catalog_service
        .update_product(&app_state.db_pool, tenant.0, product_id, &patch)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}
