// src/models/receive.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::inventory::StockLevel;

pub const RECEIVE_COMPLETED: &str = "completed";

// Entrada de material. Append-only: nunca é alterada depois de gravada.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveTransaction {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub item_id: Option<i64>,
    pub item_name: String,
    #[sqlx(rename = "receive_type")]
    #[serde(rename = "type")]
    pub receive_type: String,
    pub quantity: i32,
    #[sqlx(rename = "user_name")]
    #[serde(rename = "user")]
    pub user: String,
    pub department: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveOutcome {
    pub receipt: ReceiveTransaction,
    pub updated_stock_items: Vec<StockLevel>,
}
