// src/models/auxiliary.rs
// Registros de apoio: feedback, matriz de EPI por função e documentos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub transaction_id: Option<String>,
    pub item_id: Option<i64>,
    pub item_name: Option<String>,
    #[serde(rename = "type")]
    pub feedback_type: Option<String>,
    #[schema(example = 5)]
    pub rating: i32,
    pub comment: Option<String>,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Quais EPIs cada função precisa usar.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRule {
    pub id: i64,
    #[schema(example = "Soldador")]
    pub job_function: String,
    #[schema(value_type = Object)]
    pub items_json: Json<serde_json::Value>,
    pub lifespan: Option<String>,
    pub remark: Option<String>,
    pub properties: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PpeDocument {
    pub id: i64,
    pub title: String,
    pub file_name: String,
    pub file_url: String,
    pub file_type: String,
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Entradas (sem id: o banco gera) ---

#[derive(Debug, Clone, Default)]
pub struct NewFeedback {
    pub transaction_id: Option<String>,
    pub item_id: Option<i64>,
    pub item_name: Option<String>,
    pub feedback_type: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MatrixRuleInput {
    pub job_function: String,
    pub items_json: serde_json::Value,
    pub lifespan: Option<String>,
    pub remark: Option<String>,
    pub properties: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub file_name: String,
    pub file_url: String,
    pub file_type: String,
    pub uploaded_by: Option<String>,
}
