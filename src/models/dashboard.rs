// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    auxiliary::{Feedback, MatrixRule, PpeDocument},
    inventory::{Category, Department, PpeItem},
    loan::LoanTransaction,
    receive::ReceiveTransaction,
    voucher::IssueVoucher,
};

// Ranking dos itens mais retirados
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopIssuedItem {
    pub item_id: i64,
    pub item_name: String,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanStatusSummary {
    pub on_loan: u32,
    pub returned: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    IssueVoucher,
    LoanTransaction,
    ReturnTransaction,
    ReceiveTransaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub status: String,
}

// Itens no ponto de reposição ou abaixo dele
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderAlert {
    pub item_id: i64,
    pub item_name: String,
    pub stock: i32,
    pub reorder_point: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_stock_value: Decimal,
    pub top_issued_items: Vec<TopIssuedItem>,
    pub loan_status_summary: LoanStatusSummary,
    pub recent_activities: Vec<Activity>,
    pub reorder_alerts: Vec<ReorderAlert>,
}

// Tudo que o painel carrega na abertura.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitialData {
    pub ppe_items: Vec<PpeItem>,
    pub issue_vouchers: Vec<IssueVoucher>,
    pub receive_transactions: Vec<ReceiveTransaction>,
    pub loan_transactions: Vec<LoanTransaction>,
    pub categories: Vec<Category>,
    pub departments: Vec<Department>,
    pub feedback_data: Vec<Feedback>,
    pub ppe_matrix: Vec<MatrixRule>,
    pub ppe_documents: Vec<PpeDocument>,
    pub dashboard_metrics: DashboardMetrics,
}
