// src/models/inventory.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- 1. Categorias ---
// Itens apontam para a categoria pelo NOME, não pelo id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Proteção das mãos")]
    pub name: String,
}

// --- 2. Departamentos (somente leitura) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub name: String,
}

// --- 3. Itens de EPI ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PpeItem {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "GLV-001")]
    pub code: String,
    #[schema(example = "Luva nitrílica")]
    pub name: String,
    pub category: String,
    #[schema(example = "par")]
    pub unit: String,
    /// Abaixo deste saldo o item pede reposição.
    pub reorder_point: i32,
    pub stock: i32,
    pub on_loan_quantity: i32,
    #[schema(example = "12.50")]
    pub price: Decimal,
    pub image_url: String,
}

impl PpeItem {
    pub fn needs_reorder(&self) -> bool {
        self.stock <= self.reorder_point
    }
}

// Variação de saldo aplicada a um item (+ entrada, - saída).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDelta {
    pub item_id: i64,
    pub delta: i32,
}

// Saldo resultante depois de um ajuste de estoque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub id: i64,
    pub stock: i32,
}

// Saldo de um item emprestável depois de empréstimo/devolução.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanableStock {
    pub id: i64,
    pub stock: i32,
    pub on_loan_quantity: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub item: PpeItem,
    pub is_new: bool,
}

/// Projeta os saldos depois de aplicar `deltas` em ordem, a partir dos saldos atuais
/// (`current`, já lidos do banco em uma única consulta).
///
/// Cada linha é calculada sobre o saldo corrente do item, então duas linhas do mesmo
/// item se acumulam. Itens que não existem mais são ignorados. Se algum saldo ficaria
/// negativo nada é aplicado e o item responsável é devolvido em `OutOfStock`.
pub fn project_stock_levels(
    current: &[StockLevel],
    deltas: &[StockDelta],
) -> Result<Vec<StockLevel>, crate::common::error::AppError> {
    let mut running: std::collections::HashMap<i64, i32> =
        current.iter().map(|level| (level.id, level.stock)).collect();
    let mut levels = Vec::with_capacity(deltas.len());

    for delta in deltas {
        let Some(stock) = running.get_mut(&delta.item_id) else {
            continue;
        };
        let new_stock = stock
            .checked_add(delta.delta)
            .filter(|value| *value >= 0)
            .ok_or(crate::common::error::AppError::OutOfStock(delta.item_id))?;
        *stock = new_stock;
        levels.push(StockLevel { id: delta.item_id, stock: new_stock });
    }

    Ok(levels)
}
