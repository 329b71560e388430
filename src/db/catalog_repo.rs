// src/db/catalog_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::store::CatalogStore,
    models::inventory::{Category, Department},
};

// Categorias e departamentos: cadastros simples, sem regra de negócio.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn insert_category(&self, category: &Category) -> Result<Category, AppError> {
        let created = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING id, name",
        )
            .bind(category.id)
            .bind(&category.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn rename_category(&self, id: i64, name: &str) -> Result<Option<Category>, AppError> {
        // Itens guardam o nome antigo: renomear não propaga.
        let updated = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name",
        )
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_category(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(departments)
    }
}
