// src/models/voucher.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;

use crate::common::numeric::{lenient_i32, lenient_i64};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "voucher_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VoucherStatus {
    Pending,
    Approved,
    PartiallyApproved,
    Rejected,
}

impl VoucherStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherStatus::Pending => "pending",
            VoucherStatus::Approved => "approved",
            VoucherStatus::PartiallyApproved => "partially_approved",
            VoucherStatus::Rejected => "rejected",
        }
    }

    /// Fichas que efetivamente retiraram material do estoque.
    pub fn is_issued(&self) -> bool {
        matches!(self, VoucherStatus::Approved | VoucherStatus::PartiallyApproved)
    }
}

// Eixo independente do status de aprovação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "receipt_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Received,
}

// Linha embutida na ficha (itemsJson). A ordem é a do pedido.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoucherLine {
    #[serde(deserialize_with = "lenient_i64")]
    pub item_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(deserialize_with = "lenient_i32")]
    pub quantity: i32,
}

impl VoucherLine {
    pub fn new(item_id: i64, quantity: i32) -> Self {
        Self { item_id, item_name: None, quantity }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueVoucher {
    #[schema(example = 42)]
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    #[sqlx(rename = "user_name")]
    #[serde(rename = "user")]
    pub user: String,
    pub department: String,
    pub employee_id: String,
    pub user_id: String,
    pub status: VoucherStatus,
    pub admin_notes: String,
    #[schema(value_type = Vec<VoucherLine>)]
    pub items_json: Json<Vec<VoucherLine>>,
    #[serde(rename = "status_received")]
    pub status_received: Option<ReceiptStatus>,
    #[serde(rename = "received_at")]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(rename = "received_by")]
    pub received_by: Option<String>,
}

impl IssueVoucher {
    pub fn lines(&self) -> &[VoucherLine] {
        &self.items_json.0
    }

    pub fn is_received(&self) -> bool {
        self.status_received == Some(ReceiptStatus::Received)
    }
}

// Resultado de aprovar / aprovar parcialmente / rejeitar.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoucherDecision {
    pub updated_voucher_id: i64,
    pub status: VoucherStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_stock_items: Option<Vec<crate::models::inventory::StockLevel>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptOutcome {
    Received,
    AlreadyReceived,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptConfirmation {
    pub status: ReceiptOutcome,
    pub voucher_id: i64,
}
