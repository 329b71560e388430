// src/db/auxiliary_repo.rs

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use crate::{
    common::error::AppError,
    db::store::AuxiliaryStore,
    models::auxiliary::{Feedback, MatrixRule, MatrixRuleInput, NewDocument, NewFeedback, PpeDocument},
};

const FEEDBACK_COLUMNS: &str =
    "id, transaction_id, item_id, item_name, feedback_type, rating, comment, user_name, created_at";
const MATRIX_COLUMNS: &str = "id, job_function, items_json, lifespan, remark, properties, department";
const DOCUMENT_COLUMNS: &str = "id, title, file_name, file_url, file_type, uploaded_by, created_at";

#[derive(Clone)]
pub struct AuxiliaryRepository {
    pool: PgPool,
}

impl AuxiliaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuxiliaryStore for AuxiliaryRepository {
    // =========================================================================
    //  FEEDBACK
    // =========================================================================

    async fn list_feedback(&self) -> Result<Vec<Feedback>, AppError> {
        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {} FROM feedback ORDER BY created_at DESC, id DESC",
            FEEDBACK_COLUMNS
        ))
            .fetch_all(&self.pool)
            .await?;
        Ok(feedback)
    }

    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, AppError> {
        let created = sqlx::query_as::<_, Feedback>(&format!(
            r#"
            INSERT INTO feedback (transaction_id, item_id, item_name, feedback_type, rating, comment, user_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            FEEDBACK_COLUMNS
        ))
            .bind(&feedback.transaction_id)
            .bind(feedback.item_id)
            .bind(&feedback.item_name)
            .bind(&feedback.feedback_type)
            .bind(feedback.rating)
            .bind(&feedback.comment)
            .bind(&feedback.user_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    // =========================================================================
    //  MATRIZ DE EPI
    // =========================================================================

    async fn list_matrix_rules(&self) -> Result<Vec<MatrixRule>, AppError> {
        let rules = sqlx::query_as::<_, MatrixRule>(&format!(
            "SELECT {} FROM ppe_matrix ORDER BY id ASC",
            MATRIX_COLUMNS
        ))
            .fetch_all(&self.pool)
            .await?;
        Ok(rules)
    }

    async fn insert_matrix_rule(&self, rule: &MatrixRuleInput) -> Result<MatrixRule, AppError> {
        let created = sqlx::query_as::<_, MatrixRule>(&format!(
            r#"
            INSERT INTO ppe_matrix (job_function, items_json, lifespan, remark, properties, department)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MATRIX_COLUMNS
        ))
            .bind(&rule.job_function)
            .bind(Json(&rule.items_json))
            .bind(&rule.lifespan)
            .bind(&rule.remark)
            .bind(&rule.properties)
            .bind(&rule.department)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_matrix_rule(
        &self,
        id: i64,
        rule: &MatrixRuleInput,
    ) -> Result<Option<MatrixRule>, AppError> {
        let updated = sqlx::query_as::<_, MatrixRule>(&format!(
            r#"
            UPDATE ppe_matrix
            SET job_function = $2, items_json = $3, lifespan = $4, remark = $5, properties = $6, department = $7
            WHERE id = $1
            RETURNING {}
            "#,
            MATRIX_COLUMNS
        ))
            .bind(id)
            .bind(&rule.job_function)
            .bind(Json(&rule.items_json))
            .bind(&rule.lifespan)
            .bind(&rule.remark)
            .bind(&rule.properties)
            .bind(&rule.department)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_matrix_rule(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM ppe_matrix WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  DOCUMENTOS
    // =========================================================================

    async fn list_documents(&self) -> Result<Vec<PpeDocument>, AppError> {
        let documents = sqlx::query_as::<_, PpeDocument>(&format!(
            "SELECT {} FROM ppe_documents ORDER BY created_at DESC, id DESC",
            DOCUMENT_COLUMNS
        ))
            .fetch_all(&self.pool)
            .await?;
        Ok(documents)
    }

    async fn find_document(&self, id: i64) -> Result<Option<PpeDocument>, AppError> {
        let document = sqlx::query_as::<_, PpeDocument>(&format!(
            "SELECT {} FROM ppe_documents WHERE id = $1",
            DOCUMENT_COLUMNS
        ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    async fn insert_document(&self, document: &NewDocument) -> Result<PpeDocument, AppError> {
        let created = sqlx::query_as::<_, PpeDocument>(&format!(
            r#"
            INSERT INTO ppe_documents (title, file_name, file_url, file_type, uploaded_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            DOCUMENT_COLUMNS
        ))
            .bind(&document.title)
            .bind(&document.file_name)
            .bind(&document.file_url)
            .bind(&document.file_type)
            .bind(&document.uploaded_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn delete_document(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM ppe_documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
