// src/services/loan_service.rs

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    common::error::{AppError, InputError},
    db::{ItemStore, LoanStore, SequenceAllocator, Table},
    models::loan::{BorrowOutcome, LoanStatus, LoanTransaction, ReturnOutcome},
};

#[derive(Debug, Clone, Default)]
pub struct NewLoan {
    pub item_id: i64,
    pub borrower_name: String,
    pub employee_id: String,
    pub user_id: String,
    pub department: String,
    pub due_date: Option<NaiveDate>,
    pub notes: String,
}

/// Data de devolução prevista: aceita `2025-03-01` ou um timestamp ISO-8601 completo.
/// Texto vazio vira `None`.
pub fn parse_due_date(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| Some(ts.date_naive()))
        .map_err(|_| AppError::InvalidInput(InputError::MalformedBody(format!("dueDate: {}", raw))))
}

#[derive(Clone)]
pub struct LoanService {
    sequence: Arc<dyn SequenceAllocator>,
    items: Arc<dyn ItemStore>,
    loans: Arc<dyn LoanStore>,
}

impl LoanService {
    pub fn new(
        sequence: Arc<dyn SequenceAllocator>,
        items: Arc<dyn ItemStore>,
        loans: Arc<dyn LoanStore>,
    ) -> Self {
        Self { sequence, items, loans }
    }

    pub async fn borrow(&self, request: NewLoan) -> Result<BorrowOutcome, AppError> {
        // Checagem antecipada para não gastar id à toa; o store confere de novo com lock.
        let item = self
            .items
            .find_item(request.item_id)
            .await?
            .ok_or(AppError::ItemNotFound(request.item_id))?;
        if item.stock < 1 {
            return Err(AppError::OutOfStock(item.id));
        }

        let loan_id = self.sequence.next_id(Table::LoanTransactions).await?;
        let loan = LoanTransaction {
            loan_id,
            item_id: request.item_id,
            borrower_name: request.borrower_name,
            employee_id: request.employee_id,
            user_id: request.user_id,
            department: request.department,
            borrow_date: Utc::now(),
            due_date: request.due_date,
            return_date: None,
            status: LoanStatus::OnLoan,
            notes: request.notes,
        };

        let (new_loan, updated_item) = self.loans.open_loan(&loan).await?;
        tracing::info!(
            "Empréstimo #{}: item {} para {} (saldo {})",
            new_loan.loan_id,
            new_loan.item_id,
            new_loan.borrower_name,
            updated_item.stock
        );

        Ok(BorrowOutcome { new_loan, updated_item })
    }

    pub async fn return_item(&self, loan_id: i64) -> Result<ReturnOutcome, AppError> {
        let loan = self
            .loans
            .find_loan(loan_id)
            .await?
            .ok_or(AppError::LoanNotFound(loan_id))?;
        if loan.status != LoanStatus::OnLoan {
            return Err(AppError::LoanAlreadyReturned(loan_id));
        }

        let (closed, updated_item) = self.loans.close_loan(loan_id, Utc::now()).await?;
        tracing::info!("Empréstimo #{} devolvido (item {})", closed.loan_id, closed.item_id);

        Ok(ReturnOutcome {
            returned_loan_id: closed.loan_id,
            updated_item,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{item, loan, Harness};

    fn borrow_request(item_id: i64) -> NewLoan {
        NewLoan {
            item_id,
            borrower_name: "Niran".into(),
            ..NewLoan::default()
        }
    }

    #[test]
    fn parses_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_due_date(Some("2025-03-01")).unwrap(), expected);
        assert_eq!(parse_due_date(Some("2025-03-01T10:00:00Z")).unwrap(), expected);
        assert_eq!(parse_due_date(Some("  ")).unwrap(), None);
        assert_eq!(parse_due_date(None).unwrap(), None);
        assert!(parse_due_date(Some("amanhã")).is_err());
    }

    #[tokio::test]
    async fn borrow_moves_one_unit_to_loan() {
        let h = Harness::new();
        h.store.seed_item(item(1, 3, 0));

        let outcome = h.loans.borrow(borrow_request(1)).await.unwrap();

        assert_eq!(outcome.new_loan.status, LoanStatus::OnLoan);
        assert_eq!(outcome.updated_item.stock, 2);
        assert_eq!(outcome.updated_item.on_loan_quantity, 1);
        assert!(h.store.loan(outcome.new_loan.loan_id).is_some());
    }

    #[tokio::test]
    async fn borrow_without_stock_changes_nothing() {
        let h = Harness::new();
        h.store.seed_item(item(2, 0, 0));

        let err = h.loans.borrow(borrow_request(2)).await.unwrap_err();

        assert!(matches!(err, AppError::OutOfStock(2)));
        let unchanged = h.store.item(2).unwrap();
        assert_eq!((unchanged.stock, unchanged.on_loan_quantity), (0, 0));
    }

    #[tokio::test]
    async fn borrow_unknown_item_is_not_found() {
        let h = Harness::new();
        let err = h.loans.borrow(borrow_request(42)).await.unwrap_err();
        assert!(matches!(err, AppError::ItemNotFound(42)));
    }

    #[tokio::test]
    async fn return_puts_the_unit_back() {
        let h = Harness::new();
        let mut stocked = item(1, 7, 2);
        stocked.on_loan_quantity = 1;
        h.store.seed_item(stocked);
        h.store.seed_loan(loan(5, 1, LoanStatus::OnLoan));

        let outcome = h.loans.return_item(5).await.unwrap();

        assert_eq!(outcome.returned_loan_id, 5);
        assert_eq!(outcome.updated_item.stock, 8);
        assert_eq!(outcome.updated_item.on_loan_quantity, 0);
        let closed = h.store.loan(5).unwrap();
        assert_eq!(closed.status, LoanStatus::Returned);
        assert!(closed.return_date.is_some());
    }

    #[tokio::test]
    async fn second_return_is_refused() {
        let h = Harness::new();
        h.store.seed_item(item(1, 7, 2));
        h.store.seed_loan(loan(5, 1, LoanStatus::OnLoan));

        h.loans.return_item(5).await.unwrap();
        let err = h.loans.return_item(5).await.unwrap_err();

        assert!(matches!(err, AppError::LoanAlreadyReturned(5)));
        assert_eq!(h.store.item(1).unwrap().stock, 8);
    }

    #[tokio::test]
    async fn on_loan_quantity_never_goes_negative() {
        let h = Harness::new();
        h.store.seed_item(item(1, 7, 2));
        h.store.seed_loan(loan(5, 1, LoanStatus::OnLoan));

        let outcome = h.loans.return_item(5).await.unwrap();
        assert_eq!(outcome.updated_item.on_loan_quantity, 0);
    }

    #[tokio::test]
    async fn return_unknown_loan_is_not_found() {
        let h = Harness::new();
        assert!(matches!(h.loans.return_item(77).await, Err(AppError::LoanNotFound(77))));
    }
}
