// src/handlers/payloads.rs
//
// Corpos aceitos em cada ação do dispatcher. O painel manda ids e quantidades
// ora como número, ora como string: por isso os `lenient_*`.

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{AppError, InputError},
        numeric::{lenient_i32, lenient_i64, lenient_opt_decimal, lenient_opt_i32, lenient_opt_i64},
    },
    models::{
        auxiliary::{MatrixRuleInput, NewFeedback},
        voucher::VoucherLine,
    },
    services::{
        auxiliary_service::DocumentUpload,
        inventory_service::{ItemDraft, NewReceipt},
        loan_service::{parse_due_date, NewLoan},
        voucher_service::NewVoucher,
    },
};

// ---
// Payloads só com identificador
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoucherIdPayload {
    #[serde(deserialize_with = "lenient_i64")]
    pub voucher_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanIdPayload {
    #[serde(deserialize_with = "lenient_i64")]
    pub loan_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryIdPayload {
    #[serde(deserialize_with = "lenient_i64")]
    pub category_id: i64,
}

// deletePpeItem, deleteMatrixRule, deleteDocument
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdPayload {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
}

// ---
// Payload: addNewVoucher
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewVoucherPayload {
    #[validate(length(min = 1, message = "O solicitante é obrigatório."))]
    pub user: String,
    #[serde(default)]
    pub department: String,
    pub employee_id: Option<String>,
    pub user_id: Option<String>,
    #[serde(default)]
    pub items: Vec<VoucherLine>,
}

impl From<NewVoucherPayload> for NewVoucher {
    fn from(payload: NewVoucherPayload) -> Self {
        NewVoucher {
            user: payload.user,
            department: payload.department,
            employee_id: payload.employee_id.unwrap_or_default(),
            user_id: payload.user_id.unwrap_or_default(),
            lines: payload.items,
        }
    }
}

// ---
// Payload: approvePartialVoucher
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartialApprovalPayload {
    #[serde(deserialize_with = "lenient_i64")]
    pub voucher_id: i64,
    #[serde(default)]
    pub items: Vec<VoucherLine>,
}

// ---
// Payload: confirmReceive
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmReceivePayload {
    #[serde(deserialize_with = "lenient_i64")]
    pub voucher_id: i64,
    #[serde(default)]
    #[validate(length(min = 1, message = "O userId é obrigatório."))]
    pub user_id: String,
    pub user_name: Option<String>,
}

// ---
// Payload: borrowItem
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowPayload {
    #[serde(deserialize_with = "lenient_i64")]
    pub item_id: i64,
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome de quem pega emprestado é obrigatório."))]
    pub borrower_name: String,
    pub employee_id: Option<String>,
    pub user_id: Option<String>,
    pub department: Option<String>,
    /// `YYYY-MM-DD` ou ISO-8601.
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

impl BorrowPayload {
    pub fn into_request(self) -> Result<NewLoan, AppError> {
        Ok(NewLoan {
            item_id: self.item_id,
            borrower_name: self.borrower_name,
            employee_id: self.employee_id.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            due_date: parse_due_date(self.due_date.as_deref())?,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

// ---
// Payload: addReceiveTransaction
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceivePayload {
    #[serde(deserialize_with = "lenient_i64")]
    pub item_id: i64,
    pub item_name: Option<String>,
    #[serde(rename = "type", default)]
    pub receive_type: String,
    #[serde(deserialize_with = "lenient_i32")]
    pub quantity: i32,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub department: String,
}

impl From<ReceivePayload> for NewReceipt {
    fn from(payload: ReceivePayload) -> Self {
        NewReceipt {
            item_id: payload.item_id,
            item_name: payload.item_name,
            receive_type: payload.receive_type,
            quantity: payload.quantity,
            user: payload.user,
            department: payload.department,
        }
    }
}

// ---
// Payload: checkAdminCredentials
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ---
// Payload: saveCategory
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

// ---
// Payload: savePpeItem
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    #[validate(range(min = 0, message = "O ponto de reposição não pode ser negativo."))]
    pub reorder_point: Option<i32>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    #[validate(range(min = 0, message = "A quantidade emprestada não pode ser negativa."))]
    pub on_loan_quantity: Option<i32>,
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<rust_decimal::Decimal>,
    pub image_url: Option<String>,
}

impl From<ItemPayload> for ItemDraft {
    fn from(payload: ItemPayload) -> Self {
        ItemDraft {
            id: payload.id,
            code: payload.code,
            name: payload.name,
            category: payload.category,
            unit: payload.unit,
            reorder_point: payload.reorder_point.unwrap_or(0),
            stock: payload.stock.unwrap_or(0),
            on_loan_quantity: payload.on_loan_quantity.unwrap_or(0),
            price: payload.price.unwrap_or_default(),
            image_url: payload.image_url.unwrap_or_default(),
        }
    }
}

// ---
// Payload: saveFeedback
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    // O painel manda o id da transação como número ou texto.
    #[schema(value_type = Option<String>)]
    pub transaction_id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub item_id: Option<i64>,
    pub item_name: Option<String>,
    #[serde(rename = "type")]
    pub feedback_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub user: Option<String>,
}

impl FeedbackPayload {
    pub fn into_feedback(self) -> Result<NewFeedback, AppError> {
        let rating = self
            .rating
            .ok_or(AppError::InvalidInput(InputError::MissingField("rating")))?;

        let transaction_id = self.transaction_id.and_then(|value| match value {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });

        Ok(NewFeedback {
            transaction_id,
            item_id: self.item_id,
            item_name: self.item_name,
            feedback_type: self.feedback_type,
            rating,
            comment: self.comment,
            user_name: self.user,
        })
    }
}

// ---
// Payload: saveMatrixRule
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRulePayload {
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, message = "A função é obrigatória."))]
    pub job_function: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub items_json: Value,
    pub lifespan: Option<String>,
    pub remark: Option<String>,
    pub properties: Option<String>,
    pub department: Option<String>,
}

impl From<MatrixRulePayload> for MatrixRuleInput {
    fn from(payload: MatrixRulePayload) -> Self {
        let items_json = match payload.items_json {
            Value::Null => Value::Array(Vec::new()),
            other => other,
        };
        MatrixRuleInput {
            job_function: payload.job_function,
            items_json,
            lifespan: payload.lifespan,
            remark: payload.remark,
            properties: payload.properties,
            department: payload.department,
        }
    }
}

// ---
// Payload: uploadDocument
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O arquivo é obrigatório."))]
    pub file_base64: String,
    pub user: Option<String>,
}

impl From<UploadDocumentPayload> for DocumentUpload {
    fn from(payload: UploadDocumentPayload) -> Self {
        DocumentUpload {
            title: payload.title,
            file_name: payload.file_name,
            file_base64: payload.file_base64,
            user: payload.user,
        }
    }
}
