// src/services/inventory_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    common::error::{AppError, InputError},
    db::{CatalogStore, ItemStore, ReceiveStore, SequenceAllocator, Table},
    models::{
        inventory::{Category, PpeItem, SavedItem},
        receive::{ReceiveOutcome, ReceiveTransaction, RECEIVE_COMPLETED},
        voucher::VoucherLine,
    },
    services::stock_service::{StockDirection, StockService},
};

// Dados do formulário de item. Sem `id` = item novo.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub reorder_point: i32,
    pub stock: i32,
    pub on_loan_quantity: i32,
    pub price: Decimal,
    pub image_url: String,
}

#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub item_id: i64,
    pub item_name: Option<String>,
    pub receive_type: String,
    pub quantity: i32,
    pub user: String,
    pub department: String,
}

#[derive(Clone)]
pub struct InventoryService {
    sequence: Arc<dyn SequenceAllocator>,
    items: Arc<dyn ItemStore>,
    catalog: Arc<dyn CatalogStore>,
    receipts: Arc<dyn ReceiveStore>,
    stock: StockService,
}

impl InventoryService {
    pub fn new(
        sequence: Arc<dyn SequenceAllocator>,
        items: Arc<dyn ItemStore>,
        catalog: Arc<dyn CatalogStore>,
        receipts: Arc<dyn ReceiveStore>,
    ) -> Self {
        let stock = StockService::new(items.clone());
        Self {
            sequence,
            items,
            catalog,
            receipts,
            stock,
        }
    }

    // --- CATEGORIAS ---

    pub async fn save_category(&self, id: Option<i64>, name: &str) -> Result<Category, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput(InputError::EmptyCategoryName));
        }

        match id {
            Some(id) => self
                .catalog
                .rename_category(id, name)
                .await?
                .ok_or(AppError::CategoryNotFound(id)),
            None => {
                let id = self.sequence.next_id(Table::Categories).await?;
                let created = self
                    .catalog
                    .insert_category(&Category { id, name: name.to_string() })
                    .await?;
                tracing::info!("Categoria #{} criada: {}", created.id, created.name);
                Ok(created)
            }
        }
    }

    pub async fn delete_category(&self, id: i64) -> Result<i64, AppError> {
        if !self.catalog.delete_category(id).await? {
            return Err(AppError::CategoryNotFound(id));
        }
        tracing::info!("Categoria #{} removida", id);
        Ok(id)
    }

    // --- ITENS ---

    pub async fn save_item(&self, draft: ItemDraft) -> Result<SavedItem, AppError> {
        let mut item = PpeItem {
            id: draft.id.unwrap_or_default(),
            code: draft.code,
            name: draft.name,
            category: draft.category,
            unit: draft.unit,
            reorder_point: draft.reorder_point,
            stock: draft.stock,
            on_loan_quantity: draft.on_loan_quantity,
            price: draft.price,
            image_url: draft.image_url,
        };

        if let Some(id) = draft.id {
            let updated = self
                .items
                .update_item(&item)
                .await?
                .ok_or(AppError::ItemNotFound(id))?;
            return Ok(SavedItem { item: updated, is_new: false });
        }

        item.id = self.sequence.next_id(Table::PpeItems).await?;
        let created = self.items.insert_item(&item).await?;
        tracing::info!("Item #{} cadastrado: {}", created.id, created.name);
        Ok(SavedItem { item: created, is_new: true })
    }

    pub async fn delete_item(&self, id: i64) -> Result<i64, AppError> {
        if !self.items.delete_item(id).await? {
            return Err(AppError::ItemNotFound(id));
        }
        tracing::info!("Item #{} removido", id);
        Ok(id)
    }

    // --- ENTRADA DE MATERIAL ---

    /// Registra o recebimento e depois soma ao estoque.
    pub async fn add_receive_transaction(&self, request: NewReceipt) -> Result<ReceiveOutcome, AppError> {
        if request.quantity <= 0 {
            return Err(AppError::InvalidInput(InputError::NonPositiveQuantity));
        }

        let item_name = match request.item_name.filter(|name| !name.trim().is_empty()) {
            Some(name) => name,
            None => self
                .items
                .find_item(request.item_id)
                .await?
                .map(|item| item.name)
                .unwrap_or_default(),
        };

        let id = self.sequence.next_id(Table::ReceiveTransactions).await?;
        let receipt = self
            .receipts
            .insert_receipt(&ReceiveTransaction {
                id,
                timestamp: Utc::now(),
                item_id: Some(request.item_id),
                item_name,
                receive_type: request.receive_type,
                quantity: request.quantity,
                user: request.user,
                department: request.department,
                status: RECEIVE_COMPLETED.to_string(),
            })
            .await?;

        let updated_stock_items = self
            .stock
            .adjust_stock(
                &[VoucherLine::new(request.item_id, request.quantity)],
                StockDirection::Increase,
            )
            .await?;

        tracing::info!("Recebimento #{}: item {} +{}", receipt.id, request.item_id, receipt.quantity);
        Ok(ReceiveOutcome { receipt, updated_stock_items })
    }
}
