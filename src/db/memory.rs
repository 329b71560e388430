// src/db/memory.rs
//
// Store em memória usado nos testes. Um único Mutex cobre todas as tabelas, então
// cada operação é atômica do mesmo jeito que a transação do Postgres.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;

use crate::{
    common::error::AppError,
    db::store::{
        AuxiliaryStore, CatalogStore, ItemStore, LoanStore, ReceiveStore, SequenceAllocator, Table,
        VoucherStore,
    },
    models::{
        auxiliary::{Feedback, MatrixRule, MatrixRuleInput, NewDocument, NewFeedback, PpeDocument},
        inventory::{
            project_stock_levels, Category, Department, LoanableStock, PpeItem, StockDelta,
            StockLevel,
        },
        loan::{LoanStatus, LoanTransaction},
        receive::ReceiveTransaction,
        voucher::{IssueVoucher, ReceiptStatus, VoucherStatus},
    },
};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    departments: Vec<Department>,
    items: Vec<PpeItem>,
    vouchers: Vec<IssueVoucher>,
    loans: Vec<LoanTransaction>,
    receipts: Vec<ReceiveTransaction>,
    feedback: Vec<Feedback>,
    matrix: Vec<MatrixRule>,
    documents: Vec<PpeDocument>,
    sequences: HashMap<Table, i64>,
    auxiliary_seq: i64,
}

impl Tables {
    fn max_id(&self, table: Table) -> i64 {
        let ids: Box<dyn Iterator<Item = i64> + '_> = match table {
            Table::Categories => Box::new(self.categories.iter().map(|c| c.id)),
            Table::PpeItems => Box::new(self.items.iter().map(|i| i.id)),
            Table::IssueVouchers => Box::new(self.vouchers.iter().map(|v| v.id)),
            Table::LoanTransactions => Box::new(self.loans.iter().map(|l| l.loan_id)),
            Table::ReceiveTransactions => Box::new(self.receipts.iter().map(|r| r.id)),
        };
        ids.max().unwrap_or(0)
    }

    fn next_auxiliary_id(&mut self) -> i64 {
        self.auxiliary_seq += 1;
        self.auxiliary_seq
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    // --- Seeds e leituras diretas para os testes ---

    pub fn seed_item(&self, item: PpeItem) {
        self.lock().items.push(item);
    }

    pub fn seed_voucher(&self, voucher: IssueVoucher) {
        self.lock().vouchers.push(voucher);
    }

    pub fn seed_loan(&self, loan: LoanTransaction) {
        self.lock().loans.push(loan);
    }

    pub fn seed_department(&self, department: Department) {
        self.lock().departments.push(department);
    }

    pub fn item(&self, id: i64) -> Option<PpeItem> {
        self.lock().items.iter().find(|i| i.id == id).cloned()
    }

    pub fn voucher(&self, id: i64) -> Option<IssueVoucher> {
        self.lock().vouchers.iter().find(|v| v.id == id).cloned()
    }

    pub fn loan(&self, loan_id: i64) -> Option<LoanTransaction> {
        self.lock().loans.iter().find(|l| l.loan_id == loan_id).cloned()
    }
}

#[async_trait]
impl SequenceAllocator for MemoryStore {
    async fn next_id(&self, table: Table) -> Result<i64, AppError> {
        let mut tables = self.lock();
        let max = tables.max_id(table);
        let counter = tables.sequences.entry(table).or_insert(0);
        *counter = (*counter).max(max) + 1;
        Ok(*counter)
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list_items(&self) -> Result<Vec<PpeItem>, AppError> {
        Ok(self.lock().items.clone())
    }

    async fn find_item(&self, id: i64) -> Result<Option<PpeItem>, AppError> {
        Ok(self.item(id))
    }

    async fn insert_item(&self, item: &PpeItem) -> Result<PpeItem, AppError> {
        self.lock().items.push(item.clone());
        Ok(item.clone())
    }

    async fn update_item(&self, item: &PpeItem) -> Result<Option<PpeItem>, AppError> {
        let mut tables = self.lock();
        let Some(existing) = tables.items.iter_mut().find(|i| i.id == item.id) else {
            return Ok(None);
        };
        *existing = item.clone();
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let before = tables.items.len();
        tables.items.retain(|i| i.id != id);
        Ok(tables.items.len() < before)
    }

    async fn apply_stock_deltas(&self, deltas: &[StockDelta]) -> Result<Vec<StockLevel>, AppError> {
        let mut tables = self.lock();
        apply_deltas(&mut tables.items, deltas)
    }
}

fn apply_deltas(items: &mut [PpeItem], deltas: &[StockDelta]) -> Result<Vec<StockLevel>, AppError> {
    let current: Vec<StockLevel> = items
        .iter()
        .map(|i| StockLevel { id: i.id, stock: i.stock })
        .collect();
    let levels = project_stock_levels(&current, deltas)?;

    for level in &levels {
        if let Some(item) = items.iter_mut().find(|i| i.id == level.id) {
            item.stock = level.stock;
        }
    }
    Ok(levels)
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.lock().categories.clone())
    }

    async fn insert_category(&self, category: &Category) -> Result<Category, AppError> {
        self.lock().categories.push(category.clone());
        Ok(category.clone())
    }

    async fn rename_category(&self, id: i64, name: &str) -> Result<Option<Category>, AppError> {
        let mut tables = self.lock();
        Ok(tables.categories.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = name.to_string();
            c.clone()
        }))
    }

    async fn delete_category(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        Ok(tables.categories.len() < before)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let mut departments = self.lock().departments.clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }
}

#[async_trait]
impl VoucherStore for MemoryStore {
    async fn list_vouchers(&self) -> Result<Vec<IssueVoucher>, AppError> {
        Ok(self.lock().vouchers.clone())
    }

    async fn find_voucher(&self, id: i64) -> Result<Option<IssueVoucher>, AppError> {
        Ok(self.voucher(id))
    }

    async fn insert_voucher(&self, voucher: &IssueVoucher) -> Result<IssueVoucher, AppError> {
        self.lock().vouchers.push(voucher.clone());
        Ok(voucher.clone())
    }

    async fn settle_voucher(
        &self,
        id: i64,
        status: VoucherStatus,
        admin_notes: &str,
        deductions: &[StockDelta],
    ) -> Result<Vec<StockLevel>, AppError> {
        let mut tables = self.lock();

        let current = tables
            .vouchers
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.status)
            .ok_or(AppError::VoucherNotFound(id))?;
        if current != VoucherStatus::Pending {
            return Err(AppError::VoucherAlreadyProcessed(id));
        }

        // Estoque primeiro: se falhar, a ficha continua pendente.
        let levels = apply_deltas(&mut tables.items, deductions)?;

        if let Some(voucher) = tables.vouchers.iter_mut().find(|v| v.id == id) {
            voucher.status = status;
            voucher.admin_notes = admin_notes.to_string();
        }
        Ok(levels)
    }

    async fn mark_received(
        &self,
        id: i64,
        received_by: &str,
        received_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let voucher = tables
            .vouchers
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(AppError::VoucherNotFound(id))?;

        if voucher.is_received() {
            return Ok(false);
        }
        voucher.status_received = Some(ReceiptStatus::Received);
        voucher.received_at = Some(received_at);
        voucher.received_by = Some(received_by.to_string());
        Ok(true)
    }
}

#[async_trait]
impl LoanStore for MemoryStore {
    async fn list_loans(&self) -> Result<Vec<LoanTransaction>, AppError> {
        Ok(self.lock().loans.clone())
    }

    async fn find_loan(&self, loan_id: i64) -> Result<Option<LoanTransaction>, AppError> {
        Ok(self.loan(loan_id))
    }

    async fn open_loan(
        &self,
        loan: &LoanTransaction,
    ) -> Result<(LoanTransaction, LoanableStock), AppError> {
        let mut tables = self.lock();
        let item = tables
            .items
            .iter_mut()
            .find(|i| i.id == loan.item_id)
            .ok_or(AppError::ItemNotFound(loan.item_id))?;

        if item.stock < 1 {
            return Err(AppError::OutOfStock(item.id));
        }
        item.stock -= 1;
        item.on_loan_quantity += 1;
        let updated = LoanableStock {
            id: item.id,
            stock: item.stock,
            on_loan_quantity: item.on_loan_quantity,
        };

        tables.loans.push(loan.clone());
        Ok((loan.clone(), updated))
    }

    async fn close_loan(
        &self,
        loan_id: i64,
        returned_at: DateTime<Utc>,
    ) -> Result<(LoanTransaction, LoanableStock), AppError> {
        let mut tables = self.lock();

        let loan = tables
            .loans
            .iter()
            .find(|l| l.loan_id == loan_id)
            .ok_or(AppError::LoanNotFound(loan_id))?;
        if loan.status != LoanStatus::OnLoan {
            return Err(AppError::LoanAlreadyReturned(loan_id));
        }
        let item_id = loan.item_id;

        let item = tables
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(AppError::ItemNotFound(item_id))?;
        item.stock += 1;
        item.on_loan_quantity = (item.on_loan_quantity - 1).max(0);
        let updated = LoanableStock {
            id: item.id,
            stock: item.stock,
            on_loan_quantity: item.on_loan_quantity,
        };

        let mut closed = None;
        if let Some(loan) = tables.loans.iter_mut().find(|l| l.loan_id == loan_id) {
            loan.status = LoanStatus::Returned;
            loan.return_date = Some(returned_at);
            closed = Some(loan.clone());
        }
        let closed = closed.ok_or(AppError::LoanNotFound(loan_id))?;
        Ok((closed, updated))
    }
}

#[async_trait]
impl ReceiveStore for MemoryStore {
    async fn list_receipts(&self) -> Result<Vec<ReceiveTransaction>, AppError> {
        Ok(self.lock().receipts.clone())
    }

    async fn insert_receipt(&self, receipt: &ReceiveTransaction) -> Result<ReceiveTransaction, AppError> {
        self.lock().receipts.push(receipt.clone());
        Ok(receipt.clone())
    }
}

#[async_trait]
impl AuxiliaryStore for MemoryStore {
    async fn list_feedback(&self) -> Result<Vec<Feedback>, AppError> {
        let mut feedback = self.lock().feedback.clone();
        feedback.reverse();
        Ok(feedback)
    }

    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, AppError> {
        let mut tables = self.lock();
        let created = Feedback {
            id: tables.next_auxiliary_id(),
            transaction_id: feedback.transaction_id.clone(),
            item_id: feedback.item_id,
            item_name: feedback.item_name.clone(),
            feedback_type: feedback.feedback_type.clone(),
            rating: feedback.rating,
            comment: feedback.comment.clone(),
            user_name: feedback.user_name.clone(),
            created_at: Utc::now(),
        };
        tables.feedback.push(created.clone());
        Ok(created)
    }

    async fn list_matrix_rules(&self) -> Result<Vec<MatrixRule>, AppError> {
        Ok(self.lock().matrix.clone())
    }

    async fn insert_matrix_rule(&self, rule: &MatrixRuleInput) -> Result<MatrixRule, AppError> {
        let mut tables = self.lock();
        let created = matrix_rule(tables.next_auxiliary_id(), rule);
        tables.matrix.push(created.clone());
        Ok(created)
    }

    async fn update_matrix_rule(
        &self,
        id: i64,
        rule: &MatrixRuleInput,
    ) -> Result<Option<MatrixRule>, AppError> {
        let mut tables = self.lock();
        Ok(tables.matrix.iter_mut().find(|r| r.id == id).map(|existing| {
            *existing = matrix_rule(id, rule);
            existing.clone()
        }))
    }

    async fn delete_matrix_rule(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let before = tables.matrix.len();
        tables.matrix.retain(|r| r.id != id);
        Ok(tables.matrix.len() < before)
    }

    async fn list_documents(&self) -> Result<Vec<PpeDocument>, AppError> {
        let mut documents = self.lock().documents.clone();
        documents.reverse();
        Ok(documents)
    }

    async fn find_document(&self, id: i64) -> Result<Option<PpeDocument>, AppError> {
        Ok(self.lock().documents.iter().find(|d| d.id == id).cloned())
    }

    async fn insert_document(&self, document: &NewDocument) -> Result<PpeDocument, AppError> {
        let mut tables = self.lock();
        let created = PpeDocument {
            id: tables.next_auxiliary_id(),
            title: document.title.clone(),
            file_name: document.file_name.clone(),
            file_url: document.file_url.clone(),
            file_type: document.file_type.clone(),
            uploaded_by: document.uploaded_by.clone(),
            created_at: Utc::now(),
        };
        tables.documents.push(created.clone());
        Ok(created)
    }

    async fn delete_document(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let before = tables.documents.len();
        tables.documents.retain(|d| d.id != id);
        Ok(tables.documents.len() < before)
    }
}

fn matrix_rule(id: i64, rule: &MatrixRuleInput) -> MatrixRule {
    MatrixRule {
        id,
        job_function: rule.job_function.clone(),
        items_json: Json(rule.items_json.clone()),
        lifespan: rule.lifespan.clone(),
        remark: rule.remark.clone(),
        properties: rule.properties.clone(),
        department: rule.department.clone(),
    }
}
