// src/db/loan_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::store::LoanStore,
    models::{inventory::LoanableStock, loan::LoanTransaction},
};

const LOAN_COLUMNS: &str = "loan_id, item_id, borrower_name, employee_id, user_id, department, \
     borrow_date, due_date, return_date, status, notes";

#[derive(Clone)]
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanStore for LoanRepository {
    async fn list_loans(&self) -> Result<Vec<LoanTransaction>, AppError> {
        let loans = sqlx::query_as::<_, LoanTransaction>(&format!(
            "SELECT {} FROM loan_transactions ORDER BY loan_id ASC",
            LOAN_COLUMNS
        ))
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    async fn find_loan(&self, loan_id: i64) -> Result<Option<LoanTransaction>, AppError> {
        let loan = sqlx::query_as::<_, LoanTransaction>(&format!(
            "SELECT {} FROM loan_transactions WHERE loan_id = $1",
            LOAN_COLUMNS
        ))
            .bind(loan_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(loan)
    }

    async fn open_loan(
        &self,
        loan: &LoanTransaction,
    ) -> Result<(LoanTransaction, LoanableStock), AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Trava o item e confere o saldo
        let item = sqlx::query_as::<_, LoanableStock>(
            "SELECT id, stock, on_loan_quantity FROM ppe_items WHERE id = $1 FOR UPDATE",
        )
            .bind(loan.item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::ItemNotFound(loan.item_id))?;

        if item.stock < 1 {
            return Err(AppError::OutOfStock(item.id));
        }

        // 2. Move uma unidade do estoque para "emprestado"
        let updated = sqlx::query_as::<_, LoanableStock>(
            r#"
            UPDATE ppe_items
            SET stock = stock - 1, on_loan_quantity = on_loan_quantity + 1
            WHERE id = $1
            RETURNING id, stock, on_loan_quantity
            "#,
        )
            .bind(item.id)
            .fetch_one(&mut *tx)
            .await?;

        // 3. Grava o empréstimo
        let created = sqlx::query_as::<_, LoanTransaction>(&format!(
            r#"
            INSERT INTO loan_transactions
                (loan_id, item_id, borrower_name, employee_id, user_id, department, borrow_date, due_date, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
            .bind(loan.loan_id)
            .bind(loan.item_id)
            .bind(&loan.borrower_name)
            .bind(&loan.employee_id)
            .bind(&loan.user_id)
            .bind(&loan.department)
            .bind(loan.borrow_date)
            .bind(loan.due_date)
            .bind(loan.status)
            .bind(&loan.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((created, updated))
    }

    async fn close_loan(
        &self,
        loan_id: i64,
        returned_at: DateTime<Utc>,
    ) -> Result<(LoanTransaction, LoanableStock), AppError> {
        let mut tx = self.pool.begin().await?;

        let closed = sqlx::query_as::<_, LoanTransaction>(&format!(
            r#"
            UPDATE loan_transactions
            SET status = 'returned', return_date = $2
            WHERE loan_id = $1 AND status = 'on_loan'
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
            .bind(loan_id)
            .bind(returned_at)
            .fetch_optional(&mut *tx)
            .await?;

        let closed = match closed {
            Some(loan) => loan,
            None => {
                let exists: bool = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM loan_transactions WHERE loan_id = $1)",
                )
                    .bind(loan_id)
                    .fetch_one(&mut *tx)
                    .await?;

                return Err(if exists {
                    AppError::LoanAlreadyReturned(loan_id)
                } else {
                    AppError::LoanNotFound(loan_id)
                });
            }
        };

        // GREATEST: on_loan_quantity nunca fica negativo
        let updated = sqlx::query_as::<_, LoanableStock>(
            r#"
            UPDATE ppe_items
            SET stock = stock + 1, on_loan_quantity = GREATEST(on_loan_quantity - 1, 0)
            WHERE id = $1
            RETURNING id, stock, on_loan_quantity
            "#,
        )
            .bind(closed.item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::ItemNotFound(closed.item_id))?;

        tx.commit().await?;
        Ok((closed, updated))
    }
}
