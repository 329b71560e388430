use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Motivos de rejeição de entrada. Cada variante tem sua chave de tradução.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    MalformedBody(String),
    MissingField(&'static str),
    EmptyVoucher,
    NonPositiveQuantity,
    NoApprovedLines,
    EmptyCategoryName,
    RatingOutOfRange,
    InvalidBase64,
}

impl InputError {
    pub fn key(&self) -> &'static str {
        match self {
            InputError::MalformedBody(_) => "input.malformed_body",
            InputError::MissingField(_) => "input.missing_field",
            InputError::EmptyVoucher => "input.empty_voucher",
            InputError::NonPositiveQuantity => "input.non_positive_quantity",
            InputError::NoApprovedLines => "input.no_approved_lines",
            InputError::EmptyCategoryName => "input.empty_category_name",
            InputError::RatingOutOfRange => "input.rating_out_of_range",
            InputError::InvalidBase64 => "input.invalid_base64",
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::MalformedBody(detail) => write!(f, "corpo inválido: {}", detail),
            InputError::MissingField(field) => write!(f, "campo obrigatório ausente: {}", field),
            InputError::EmptyVoucher => write!(f, "ficha sem itens"),
            InputError::NonPositiveQuantity => write!(f, "quantidade deve ser maior que zero"),
            InputError::NoApprovedLines => write!(f, "nenhuma linha com quantidade aprovada"),
            InputError::EmptyCategoryName => write!(f, "nome da categoria vazio"),
            InputError::RatingOutOfRange => write!(f, "nota fora do intervalo 1..=5"),
            InputError::InvalidBase64 => write!(f, "arquivo em Base64 inválido"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Ação desconhecida: {0}")]
    InvalidAction(String),

    #[error("Entrada inválida: {0}")]
    InvalidInput(InputError),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Ficha de retirada {0} não encontrada")]
    VoucherNotFound(i64),

    #[error("Empréstimo {0} não encontrado")]
    LoanNotFound(i64),

    #[error("Item {0} não encontrado")]
    ItemNotFound(i64),

    #[error("Categoria {0} não encontrada")]
    CategoryNotFound(i64),

    #[error("Regra da matriz {0} não encontrada")]
    MatrixRuleNotFound(i64),

    #[error("Documento {0} não encontrado")]
    DocumentNotFound(i64),

    #[error("Ficha {0} já foi processada")]
    VoucherAlreadyProcessed(i64),

    #[error("Empréstimo {0} já foi devolvido")]
    LoanAlreadyReturned(i64),

    #[error("Estoque insuficiente para o item {0}")]
    OutOfStock(i64),

    // UpstreamFailure: banco
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // UpstreamFailure: LINE, disco, etc.
    #[error("Falha em serviço externo: {0}")]
    UpstreamFailure(String),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidAction(_)
            | AppError::InvalidInput(_)
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::VoucherNotFound(_)
            | AppError::LoanNotFound(_)
            | AppError::ItemNotFound(_)
            | AppError::CategoryNotFound(_)
            | AppError::MatrixRuleNotFound(_)
            | AppError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::VoucherAlreadyProcessed(_)
            | AppError::LoanAlreadyReturned(_)
            | AppError::OutOfStock(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::UpstreamFailure(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro de domínio na resposta HTTP, traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status_code();

        let message = match self {
            AppError::InvalidAction(action) => {
                i18n.translate(lang, "error.invalid_action", &[("action", action.clone())])
            }
            AppError::InvalidInput(input) => {
                let detail = match input {
                    InputError::MalformedBody(detail) => detail.clone(),
                    InputError::MissingField(field) => field.to_string(),
                    _ => String::new(),
                };
                i18n.translate(lang, input.key(), &[("detail", detail)])
            }
            AppError::ValidationError(errors) => {
                let fields: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .map(|(field, field_errors)| {
                        let messages: Vec<String> = field_errors
                            .iter()
                            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                            .collect();
                        if messages.is_empty() {
                            field.to_string()
                        } else {
                            format!("{}: {}", field, messages.join(", "))
                        }
                    })
                    .collect();
                i18n.translate(lang, "error.validation", &[("detail", fields.join("; "))])
            }
            AppError::VoucherNotFound(id) => {
                i18n.translate(lang, "error.voucher_not_found", &[("id", id.to_string())])
            }
            AppError::LoanNotFound(id) => {
                i18n.translate(lang, "error.loan_not_found", &[("id", id.to_string())])
            }
            AppError::ItemNotFound(id) => {
                i18n.translate(lang, "error.item_not_found", &[("id", id.to_string())])
            }
            AppError::CategoryNotFound(id) => {
                i18n.translate(lang, "error.category_not_found", &[("id", id.to_string())])
            }
            AppError::MatrixRuleNotFound(id) => {
                i18n.translate(lang, "error.matrix_rule_not_found", &[("id", id.to_string())])
            }
            AppError::DocumentNotFound(id) => {
                i18n.translate(lang, "error.document_not_found", &[("id", id.to_string())])
            }
            AppError::VoucherAlreadyProcessed(id) => {
                i18n.translate(lang, "error.voucher_already_processed", &[("id", id.to_string())])
            }
            AppError::LoanAlreadyReturned(id) => {
                i18n.translate(lang, "error.loan_already_returned", &[("id", id.to_string())])
            }
            AppError::OutOfStock(id) => {
                i18n.translate(lang, "error.out_of_stock", &[("id", id.to_string())])
            }
            // Banco, serviços externos e erros internos: detalhe só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                i18n.translate(lang, "error.internal", &[])
            }
        };

        ApiError { status, message }
    }
}

// Resposta de erro já traduzida. Mesmo envelope que o painel espera.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}
