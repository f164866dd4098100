// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- INVENTORY ---
        handlers::inventory::record_movement,
        handlers::inventory::fulfill_order_line,
        handlers::inventory::list_stock,
        handlers::inventory::list_low_stock,
        handlers::inventory::list_expiring_soon,
        handlers::inventory::item_movement_history,
        handlers::inventory::tenant_movement_history,

        // --- PRODUCTS ---
        handlers::products::create_product,
        handlers::products::add_lot,
        handlers::products::list_products,
        handlers::products::update_product,
    ),
    components(
        schemas(
            models::product::Product,
            models::inventory::InventoryItem,
            models::inventory::StockMovement,
            models::inventory::StockRow,
            models::inventory::MovementType,
            handlers::inventory::RecordMovementPayload,
            handlers::inventory::MovementReceipt,
            handlers::inventory::FulfillmentPayload,
            handlers::products::CreateProductPayload,
            handlers::products::LotPayload,
            handlers::products::OnboardingReceipt,
            handlers::products::UpdateProductPayload,
        )
    ),
    tags(
        (name = "inventory", description = "Stock ledger: movements, listings and history"),
        (name = "products", description = "Catalog onboarding and administration"),
    )
)]
pub struct ApiDoc;
