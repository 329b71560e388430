// src/db/voucher_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::{
    common::error::AppError,
    db::{item_repo::apply_stock_deltas_in, store::VoucherStore},
    models::{
        inventory::{StockDelta, StockLevel},
        voucher::{IssueVoucher, VoucherStatus},
    },
};

const VOUCHER_COLUMNS: &str = "id, timestamp, user_name, department, employee_id, user_id, status, \
     admin_notes, items_json, status_received, received_at, received_by";

#[derive(Clone)]
pub struct VoucherRepository {
    pool: PgPool,
}

impl VoucherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn voucher_exists(conn: &mut PgConnection, id: i64) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM issue_vouchers WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

#[async_trait]
impl VoucherStore for VoucherRepository {
    async fn list_vouchers(&self) -> Result<Vec<IssueVoucher>, AppError> {
        let vouchers = sqlx::query_as::<_, IssueVoucher>(&format!(
            "SELECT {} FROM issue_vouchers ORDER BY id ASC",
            VOUCHER_COLUMNS
        ))
            .fetch_all(&self.pool)
            .await?;
        Ok(vouchers)
    }

    async fn find_voucher(&self, id: i64) -> Result<Option<IssueVoucher>, AppError> {
        let voucher = sqlx::query_as::<_, IssueVoucher>(&format!(
            "SELECT {} FROM issue_vouchers WHERE id = $1",
            VOUCHER_COLUMNS
        ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(voucher)
    }

    async fn insert_voucher(&self, voucher: &IssueVoucher) -> Result<IssueVoucher, AppError> {
        let created = sqlx::query_as::<_, IssueVoucher>(&format!(
            r#"
            INSERT INTO issue_vouchers (id, timestamp, user_name, department, employee_id, user_id, status, admin_notes, items_json)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            VOUCHER_COLUMNS
        ))
            .bind(voucher.id)
            .bind(voucher.timestamp)
            .bind(&voucher.user)
            .bind(&voucher.department)
            .bind(&voucher.employee_id)
            .bind(&voucher.user_id)
            .bind(voucher.status)
            .bind(&voucher.admin_notes)
            .bind(&voucher.items_json)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn settle_voucher(
        &self,
        id: i64,
        status: VoucherStatus,
        admin_notes: &str,
        deductions: &[StockDelta],
    ) -> Result<Vec<StockLevel>, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Transição condicional: só sai de 'pending' uma vez
        let claimed: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE issue_vouchers
            SET status = $2, admin_notes = $3
            WHERE id = $1 AND status = 'pending'
            RETURNING id
            "#,
        )
            .bind(id)
            .bind(status)
            .bind(admin_notes)
            .fetch_optional(&mut *tx)
            .await?;

        if claimed.is_none() {
            return if voucher_exists(&mut tx, id).await? {
                Err(AppError::VoucherAlreadyProcessed(id))
            } else {
                Err(AppError::VoucherNotFound(id))
            };
        }

        // 2. Baixa de estoque na mesma transação (rollback no drop se falhar)
        let levels = apply_stock_deltas_in(&mut *tx, deductions).await?;

        tx.commit().await?;
        Ok(levels)
    }

    async fn mark_received(
        &self,
        id: i64,
        received_by: &str,
        received_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;

        let marked: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE issue_vouchers
            SET status_received = 'received', received_at = $2, received_by = $3
            WHERE id = $1 AND status_received IS NULL
            RETURNING id
            "#,
        )
            .bind(id)
            .bind(received_at)
            .bind(received_by)
            .fetch_optional(&mut *conn)
            .await?;

        if marked.is_some() {
            return Ok(true);
        }

        if voucher_exists(&mut conn, id).await? {
            Ok(false)
        } else {
            Err(AppError::VoucherNotFound(id))
        }
    }
}
