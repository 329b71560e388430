// src/db/item_repo.rs

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::{
    common::error::AppError,
    db::store::ItemStore,
    models::inventory::{project_stock_levels, PpeItem, StockDelta, StockLevel},
};

const ITEM_COLUMNS: &str =
    "id, code, name, category, unit, reorder_point, stock, on_loan_quantity, price, image_url";

#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Ajuste de estoque dentro de uma transação já aberta.
/// Lê todos os itens envolvidos numa única consulta (com lock), projeta os saldos
/// e grava cada linha. Usado pela entrada de material e pela aprovação de fichas.
pub(crate) async fn apply_stock_deltas_in(
    conn: &mut PgConnection,
    deltas: &[StockDelta],
) -> Result<Vec<StockLevel>, AppError> {
    if deltas.is_empty() {
        return Ok(Vec::new());
    }

    let mut ids: Vec<i64> = deltas.iter().map(|d| d.item_id).collect();
    ids.sort_unstable();
    ids.dedup();

    // ORDER BY id: ordem de lock estável entre requisições concorrentes
    let current = sqlx::query_as::<_, StockLevel>(
        "SELECT id, stock FROM ppe_items WHERE id = ANY($1) ORDER BY id FOR UPDATE",
    )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

    let levels = project_stock_levels(&current, deltas)?;

    for level in &levels {
        sqlx::query("UPDATE ppe_items SET stock = $2 WHERE id = $1")
            .bind(level.id)
            .bind(level.stock)
            .execute(&mut *conn)
            .await?;
    }

    Ok(levels)
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn list_items(&self) -> Result<Vec<PpeItem>, AppError> {
        let items = sqlx::query_as::<_, PpeItem>(&format!(
            "SELECT {} FROM ppe_items ORDER BY id ASC",
            ITEM_COLUMNS
        ))
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn find_item(&self, id: i64) -> Result<Option<PpeItem>, AppError> {
        let item = sqlx::query_as::<_, PpeItem>(&format!(
            "SELECT {} FROM ppe_items WHERE id = $1",
            ITEM_COLUMNS
        ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn insert_item(&self, item: &PpeItem) -> Result<PpeItem, AppError> {
        let created = sqlx::query_as::<_, PpeItem>(&format!(
            r#"
            INSERT INTO ppe_items (id, code, name, category, unit, reorder_point, stock, on_loan_quantity, price, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
            .bind(item.id)
            .bind(&item.code)
            .bind(&item.name)
            .bind(&item.category)
            .bind(&item.unit)
            .bind(item.reorder_point)
            .bind(item.stock)
            .bind(item.on_loan_quantity)
            .bind(item.price)
            .bind(&item.image_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_item(&self, item: &PpeItem) -> Result<Option<PpeItem>, AppError> {
        let updated = sqlx::query_as::<_, PpeItem>(&format!(
            r#"
            UPDATE ppe_items
            SET code = $2, name = $3, category = $4, unit = $5, reorder_point = $6,
                stock = $7, on_loan_quantity = $8, price = $9, image_url = $10
            WHERE id = $1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
            .bind(item.id)
            .bind(&item.code)
            .bind(&item.name)
            .bind(&item.category)
            .bind(&item.unit)
            .bind(item.reorder_point)
            .bind(item.stock)
            .bind(item.on_loan_quantity)
            .bind(item.price)
            .bind(&item.image_url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_item(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM ppe_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn apply_stock_deltas(&self, deltas: &[StockDelta]) -> Result<Vec<StockLevel>, AppError> {
        let mut tx = self.pool.begin().await?;
        let levels = apply_stock_deltas_in(&mut *tx, deltas).await?;
        tx.commit().await?;
        Ok(levels)
    }
}
