// src/db/receive_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{common::error::AppError, db::store::ReceiveStore, models::receive::ReceiveTransaction};

const RECEIPT_COLUMNS: &str =
    "id, timestamp, item_id, item_name, receive_type, quantity, user_name, department, status";

#[derive(Clone)]
pub struct ReceiveRepository {
    pool: PgPool,
}

impl ReceiveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReceiveStore for ReceiveRepository {
    async fn list_receipts(&self) -> Result<Vec<ReceiveTransaction>, AppError> {
        let receipts = sqlx::query_as::<_, ReceiveTransaction>(&format!(
            "SELECT {} FROM receive_transactions ORDER BY id ASC",
            RECEIPT_COLUMNS
        ))
            .fetch_all(&self.pool)
            .await?;
        Ok(receipts)
    }

    async fn insert_receipt(&self, receipt: &ReceiveTransaction) -> Result<ReceiveTransaction, AppError> {
        let created = sqlx::query_as::<_, ReceiveTransaction>(&format!(
            r#"
            INSERT INTO receive_transactions
                (id, timestamp, item_id, item_name, receive_type, quantity, user_name, department, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            RECEIPT_COLUMNS
        ))
            .bind(receipt.id)
            .bind(receipt.timestamp)
            .bind(receipt.item_id)
            .bind(&receipt.item_name)
            .bind(&receipt.receive_type)
            .bind(receipt.quantity)
            .bind(&receipt.user)
            .bind(&receipt.department)
            .bind(&receipt.status)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }
}
