// src/models/loan.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::inventory::LoanableStock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loan_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    OnLoan,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::OnLoan => "on_loan",
            LoanStatus::Returned => "returned",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanTransaction {
    #[schema(example = 5)]
    pub loan_id: i64,
    pub item_id: i64,
    pub borrower_name: String,
    pub employee_id: String,
    pub user_id: String,
    pub department: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowOutcome {
    pub new_loan: LoanTransaction,
    pub updated_item: LoanableStock,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnOutcome {
    pub returned_loan_id: i64,
    pub updated_item: LoanableStock,
}
