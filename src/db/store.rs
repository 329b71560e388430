// src/db/store.rs
//
// Contratos de persistência. Os services só enxergam estes traits; a implementação
// de produção é o Postgres (os *_repo.rs), os testes usam o `MemoryStore`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{
        AuxiliaryRepository, CatalogRepository, ItemRepository, LoanRepository,
        PgSequenceAllocator, ReceiveRepository, VoucherRepository,
    },
    models::{
        auxiliary::{Feedback, MatrixRule, MatrixRuleInput, NewDocument, NewFeedback, PpeDocument},
        inventory::{Category, Department, LoanableStock, PpeItem, StockDelta, StockLevel},
        loan::LoanTransaction,
        receive::ReceiveTransaction,
        voucher::{IssueVoucher, VoucherStatus},
    },
};

/// Tabelas cujo id é alocado antes do INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Categories,
    PpeItems,
    IssueVouchers,
    LoanTransactions,
    ReceiveTransactions,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::PpeItems => "ppe_items",
            Table::IssueVouchers => "issue_vouchers",
            Table::LoanTransactions => "loan_transactions",
            Table::ReceiveTransactions => "receive_transactions",
        }
    }

    pub fn key_column(&self) -> &'static str {
        match self {
            Table::LoanTransactions => "loan_id",
            _ => "id",
        }
    }
}

#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// Próximo id da tabela. Atômico: dois chamadores nunca recebem o mesmo valor.
    async fn next_id(&self, table: Table) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list_items(&self) -> Result<Vec<PpeItem>, AppError>;
    async fn find_item(&self, id: i64) -> Result<Option<PpeItem>, AppError>;
    async fn insert_item(&self, item: &PpeItem) -> Result<PpeItem, AppError>;
    async fn update_item(&self, item: &PpeItem) -> Result<Option<PpeItem>, AppError>;
    async fn delete_item(&self, id: i64) -> Result<bool, AppError>;

    /// Aplica todos os deltas ou nenhum (ver `project_stock_levels`).
    async fn apply_stock_deltas(&self, deltas: &[StockDelta]) -> Result<Vec<StockLevel>, AppError>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    async fn insert_category(&self, category: &Category) -> Result<Category, AppError>;
    async fn rename_category(&self, id: i64, name: &str) -> Result<Option<Category>, AppError>;
    async fn delete_category(&self, id: i64) -> Result<bool, AppError>;
    async fn list_departments(&self) -> Result<Vec<Department>, AppError>;
}

#[async_trait]
pub trait VoucherStore: Send + Sync {
    async fn list_vouchers(&self) -> Result<Vec<IssueVoucher>, AppError>;
    async fn find_voucher(&self, id: i64) -> Result<Option<IssueVoucher>, AppError>;
    async fn insert_voucher(&self, voucher: &IssueVoucher) -> Result<IssueVoucher, AppError>;

    /// Transição `pending -> status` junto com a baixa de estoque, na mesma unidade.
    /// Se a ficha já saiu de `pending` (inclusive por corrida) devolve
    /// `VoucherAlreadyProcessed` e nada é gravado.
    async fn settle_voucher(
        &self,
        id: i64,
        status: VoucherStatus,
        admin_notes: &str,
        deductions: &[StockDelta],
    ) -> Result<Vec<StockLevel>, AppError>;

    /// `false` quando a ficha já estava marcada como recebida.
    async fn mark_received(
        &self,
        id: i64,
        received_by: &str,
        received_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;
}

#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn list_loans(&self) -> Result<Vec<LoanTransaction>, AppError>;
    async fn find_loan(&self, loan_id: i64) -> Result<Option<LoanTransaction>, AppError>;

    /// Tira uma unidade do estoque (stock >= 1) e grava o empréstimo.
    async fn open_loan(
        &self,
        loan: &LoanTransaction,
    ) -> Result<(LoanTransaction, LoanableStock), AppError>;

    /// `on_loan -> returned` e devolve a unidade ao estoque.
    async fn close_loan(
        &self,
        loan_id: i64,
        returned_at: DateTime<Utc>,
    ) -> Result<(LoanTransaction, LoanableStock), AppError>;
}

#[async_trait]
pub trait ReceiveStore: Send + Sync {
    async fn list_receipts(&self) -> Result<Vec<ReceiveTransaction>, AppError>;
    async fn insert_receipt(&self, receipt: &ReceiveTransaction) -> Result<ReceiveTransaction, AppError>;
}

#[async_trait]
pub trait AuxiliaryStore: Send + Sync {
    async fn list_feedback(&self) -> Result<Vec<Feedback>, AppError>;
    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, AppError>;

    async fn list_matrix_rules(&self) -> Result<Vec<MatrixRule>, AppError>;
    async fn insert_matrix_rule(&self, rule: &MatrixRuleInput) -> Result<MatrixRule, AppError>;
    async fn update_matrix_rule(
        &self,
        id: i64,
        rule: &MatrixRuleInput,
    ) -> Result<Option<MatrixRule>, AppError>;
    async fn delete_matrix_rule(&self, id: i64) -> Result<bool, AppError>;

    async fn list_documents(&self) -> Result<Vec<PpeDocument>, AppError>;
    async fn find_document(&self, id: i64) -> Result<Option<PpeDocument>, AppError>;
    async fn insert_document(&self, document: &NewDocument) -> Result<PpeDocument, AppError>;
    async fn delete_document(&self, id: i64) -> Result<bool, AppError>;
}

// Conjunto de stores montado uma vez e compartilhado pelos services.
#[derive(Clone)]
pub struct Stores {
    pub sequence: Arc<dyn SequenceAllocator>,
    pub items: Arc<dyn ItemStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub vouchers: Arc<dyn VoucherStore>,
    pub loans: Arc<dyn LoanStore>,
    pub receipts: Arc<dyn ReceiveStore>,
    pub auxiliary: Arc<dyn AuxiliaryStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            sequence: Arc::new(PgSequenceAllocator::new(pool.clone())),
            items: Arc::new(ItemRepository::new(pool.clone())),
            catalog: Arc::new(CatalogRepository::new(pool.clone())),
            vouchers: Arc::new(VoucherRepository::new(pool.clone())),
            loans: Arc::new(LoanRepository::new(pool.clone())),
            receipts: Arc::new(ReceiveRepository::new(pool.clone())),
            auxiliary: Arc::new(AuxiliaryRepository::new(pool)),
        }
    }

    #[cfg(test)]
    pub fn in_memory(store: Arc<crate::db::memory::MemoryStore>) -> Self {
        Self {
            sequence: store.clone(),
            items: store.clone(),
            catalog: store.clone(),
            vouchers: store.clone(),
            loans: store.clone(),
            receipts: store.clone(),
            auxiliary: store,
        }
    }
}
