//! Item entity model and DTOs.

use gearbook_core::booking::StockItem;
use gearbook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An item row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    /// Absolute ceiling of units that can ever be booked simultaneously.
    pub total_quantity: i32,
    /// `None` means ungrouped. There is no reserved "ungrouped" group row.
    pub group_id: Option<DbId>,
    /// Display hint, irrelevant to the availability math.
    pub color: Option<String>,
    /// Display hint, irrelevant to the availability math.
    pub icon: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Item {
    /// The engine view of this item.
    pub fn stock(&self) -> StockItem {
        StockItem {
            id: self.id,
            total_quantity: self.total_quantity,
        }
    }
}

/// DTO for creating a new item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub total_quantity: i32,
    pub group_id: Option<DbId>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// DTO for updating an existing item. All fields are optional; omitted
/// fields keep their current value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub total_quantity: Option<i32>,
    pub group_id: Option<DbId>,
    pub color: Option<String>,
    pub icon: Option<String>,
}
