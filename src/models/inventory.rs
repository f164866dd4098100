// src/models/inventory.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// --- Inventory aggregate ---
// One lot of one product at one tenant. `quantity` is mutated exclusively
// by the movement engine; a depleted lot stays at 0 for audit purposes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub tenant_id: Uuid,
    pub quantity: i64,
    pub lot_number: String,
    pub expiration_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Fields for creating a lot (onboarding or receiving a new batch).
#[derive(Debug, Clone)]
pub struct NewLot {
    pub lot_number: String,
    pub expiration_date: NaiveDate,
    pub initial_quantity: i64,
}

// --- Movement types ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "movement_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Inbound,
    Outbound,
    Adjustment,
    Transfer,
}

// --- Movement kinds ---
// The wire format carries a single `quantity` field whose meaning depends on
// the type: a delta for INBOUND/OUTBOUND/TRANSFER, the new absolute total
// for ADJUSTMENT. Internally that ambiguity is a tagged enum, so a delta can
// never be mistaken for an absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Inbound { delta: i64 },
    Outbound { delta: i64 },
    // Source-side debit only; arrival at a destination is an external concern.
    Transfer { delta: i64 },
    Adjustment { absolute: i64 },
}

impl MovementKind {
    // Parses the wire pair (type, quantity) into a kind, enforcing the
    // per-type range rules.
    pub fn from_parts(movement_type: MovementType, quantity: i64) -> Result<Self, AppError> {
        match movement_type {
            MovementType::Inbound | MovementType::Outbound | MovementType::Transfer
                if quantity <= 0 =>
            {
                Err(AppError::Validation(format!(
                    "quantity must be a positive delta for {:?} movements",
                    movement_type
                )))
            }
            MovementType::Adjustment if quantity < 0 => Err(AppError::Validation(
                "quantity must be a non-negative total for ADJUSTMENT movements".into(),
            )),
            MovementType::Inbound => Ok(MovementKind::Inbound { delta: quantity }),
            MovementType::Outbound => Ok(MovementKind::Outbound { delta: quantity }),
            MovementType::Transfer => Ok(MovementKind::Transfer { delta: quantity }),
            MovementType::Adjustment => Ok(MovementKind::Adjustment { absolute: quantity }),
        }
    }

    pub fn movement_type(&self) -> MovementType {
        match self {
            MovementKind::Inbound { .. } => MovementType::Inbound,
            MovementKind::Outbound { .. } => MovementType::Outbound,
            MovementKind::Transfer { .. } => MovementType::Transfer,
            MovementKind::Adjustment { .. } => MovementType::Adjustment,
        }
    }

    // The value recorded in the ledger's `quantity` column: the wire value,
    // with its type-dependent meaning.
    pub fn recorded_quantity(&self) -> i64 {
        match *self {
            MovementKind::Inbound { delta }
            | MovementKind::Outbound { delta }
            | MovementKind::Transfer { delta } => delta,
            MovementKind::Adjustment { absolute } => absolute,
        }
    }

    // The single definition of the ledger arithmetic. A debit larger than
    // the current stock is rejected outright, never clamped, so replaying
    // the history always reproduces the counter.
    pub fn apply(&self, previous: i64) -> Result<i64, AppError> {
        match *self {
            MovementKind::Inbound { delta } => Ok(previous + delta),
            MovementKind::Outbound { delta } | MovementKind::Transfer { delta } => {
                if delta > previous {
                    Err(AppError::InsufficientStock {
                        available: previous,
                    })
                } else {
                    Ok(previous - delta)
                }
            }
            MovementKind::Adjustment { absolute } => Ok(absolute.max(0)),
        }
    }
}

// --- Stock movement (ledger entry) ---
// Immutable fact: "this aggregate's quantity changed from X to Y, for this
// reason, at this time". Written once, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub reason: String,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// --- Stock listing row ---
// Aggregate joined with its product, as the stock table and the agent's
// tooling consume it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    pub inventory_item_id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub lot_number: String,
    pub expiration_date: NaiveDate,
    pub quantity: i64,
    pub base_price: Decimal,
    pub discount_price: Option<Decimal>,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn replay(movements: &[MovementKind]) -> i64 {
        movements.iter().fold(0, |stock, kind| {
            kind.apply(stock).expect("replayed movement must be valid")
        })
    }

    #[test]
    fn inbound_adds_the_delta() {
        // Aggregate at 100, inbound 50 -> 150.
        let kind = MovementKind::from_parts(MovementType::Inbound, 50).unwrap();
        assert_eq!(kind.apply(100).unwrap(), 150);
    }

    #[test]
    fn outbound_beyond_available_is_rejected() {
        // Aggregate at 150, outbound 200 -> InsufficientStock carrying 150.
        let kind = MovementKind::from_parts(MovementType::Outbound, 200).unwrap();
        match kind.apply(150) {
            Err(AppError::InsufficientStock { available }) => assert_eq!(available, 150),
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn adjustment_sets_the_absolute_total() {
        // Aggregate at 150, adjustment 80 -> 80 regardless of the previous value.
        let kind = MovementKind::from_parts(MovementType::Adjustment, 80).unwrap();
        assert_eq!(kind.apply(150).unwrap(), 80);
        assert_eq!(kind.apply(0).unwrap(), 80);
    }

    #[test]
    fn transfer_debits_the_source_like_outbound() {
        let kind = MovementKind::from_parts(MovementType::Transfer, 30).unwrap();
        assert_eq!(kind.apply(100).unwrap(), 70);
        assert!(matches!(
            kind.apply(10),
            Err(AppError::InsufficientStock { available: 10 })
        ));
    }

    #[test]
    fn outbound_of_the_exact_balance_empties_the_lot() {
        let kind = MovementKind::from_parts(MovementType::Outbound, 150).unwrap();
        assert_eq!(kind.apply(150).unwrap(), 0);
    }

    #[test]
    fn non_positive_deltas_are_invalid() {
        for movement_type in [
            MovementType::Inbound,
            MovementType::Outbound,
            MovementType::Transfer,
        ] {
            assert!(matches!(
                MovementKind::from_parts(movement_type, 0),
                Err(AppError::Validation(_))
            ));
            assert!(matches!(
                MovementKind::from_parts(movement_type, -5),
                Err(AppError::Validation(_))
            ));
        }
        // Adjusting to exactly 0 is a legitimate recount.
        assert!(MovementKind::from_parts(MovementType::Adjustment, 0).is_ok());
        assert!(MovementKind::from_parts(MovementType::Adjustment, -1).is_err());
    }

    #[test]
    fn replaying_a_history_reproduces_the_counter() {
        let history = [
            MovementKind::Inbound { delta: 100 },
            MovementKind::Outbound { delta: 30 },
            MovementKind::Adjustment { absolute: 80 },
            MovementKind::Transfer { delta: 20 },
            MovementKind::Inbound { delta: 5 },
        ];
        assert_eq!(replay(&history), 65);
    }

    fn kind_strategy() -> impl Strategy<Value = MovementKind> {
        prop_oneof![
            (1i64..=500).prop_map(|delta| MovementKind::Inbound { delta }),
            (1i64..=500).prop_map(|delta| MovementKind::Outbound { delta }),
            (1i64..=500).prop_map(|delta| MovementKind::Transfer { delta }),
            (0i64..=500).prop_map(|absolute| MovementKind::Adjustment { absolute }),
        ]
    }

    proptest! {
        // quantity >= 0 at all times, and delta bookkeeping is exact:
        // new - previous equals +delta/-delta, and adjustments land on the
        // absolute value.
        #[test]
        fn applied_movements_keep_stock_non_negative(
            kinds in proptest::collection::vec(kind_strategy(), 0..64)
        ) {
            let mut stock = 0i64;
            for kind in kinds {
                match kind.apply(stock) {
                    Ok(new_stock) => {
                        prop_assert!(new_stock >= 0);
                        match kind {
                            MovementKind::Inbound { delta } =>
                                prop_assert_eq!(new_stock - stock, delta),
                            MovementKind::Outbound { delta }
                            | MovementKind::Transfer { delta } =>
                                prop_assert_eq!(stock - new_stock, delta),
                            MovementKind::Adjustment { absolute } =>
                                prop_assert_eq!(new_stock, absolute),
                        }
                        stock = new_stock;
                    }
                    Err(AppError::InsufficientStock { available }) => {
                        // Rejections never mutate and always report the
                        // amount that was actually available.
                        prop_assert_eq!(available, stock);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
                }
            }
        }

        // Folding accepted movements in order reproduces the final counter.
        #[test]
        fn replay_consistency(
            kinds in proptest::collection::vec(kind_strategy(), 0..64)
        ) {
            let mut stock = 0i64;
            let mut accepted = Vec::new();
            for kind in kinds {
                if let Ok(new_stock) = kind.apply(stock) {
                    accepted.push(kind);
                    stock = new_stock;
                }
            }
            prop_assert_eq!(replay(&accepted), stock);
        }
    }
}
