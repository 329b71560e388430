// src/handlers/dispatch.rs
//
// Ponto de entrada único do painel: POST /api/ppe com `{action, payload}`.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError, InputError},
    config::AppState,
    handlers::payloads::{
        BorrowPayload, CategoryIdPayload, CategoryPayload, ConfirmReceivePayload,
        CredentialsPayload, FeedbackPayload, IdPayload, ItemPayload, LoanIdPayload,
        MatrixRulePayload, NewVoucherPayload, PartialApprovalPayload, ReceivePayload,
        UploadDocumentPayload, VoucherIdPayload,
    },
    middleware::i18n::Locale,
};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    action: String,
    #[serde(default)]
    payload: Value,
}

// Documentação do corpo (o handler lê texto cru).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DispatchRequest {
    #[schema(example = "approveVoucher")]
    pub action: String,
    #[schema(value_type = Object)]
    pub payload: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DispatchResponse {
    #[schema(example = "success")]
    pub status: String,
    #[schema(value_type = Object)]
    pub data: Value,
    pub version: String,
}

/// Uma variante por ação aceita pelo painel.
#[derive(Debug)]
pub enum PpeRequest {
    GetInitialData,
    SaveCategory(CategoryPayload),
    DeleteCategory(CategoryIdPayload),
    SavePpeItem(ItemPayload),
    DeletePpeItem(IdPayload),
    AddNewVoucher(NewVoucherPayload),
    ApproveVoucher(VoucherIdPayload),
    ApprovePartialVoucher(PartialApprovalPayload),
    RejectVoucher(VoucherIdPayload),
    ConfirmReceive(ConfirmReceivePayload),
    BorrowItem(BorrowPayload),
    ReturnItem(LoanIdPayload),
    AddReceiveTransaction(ReceivePayload),
    CheckAdminCredentials(CredentialsPayload),
    SaveFeedback(FeedbackPayload),
    SaveMatrixRule(MatrixRulePayload),
    DeleteMatrixRule(IdPayload),
    UploadDocument(UploadDocumentPayload),
    DeleteDocument(IdPayload),
}

// Payload ausente conta como `{}`: os campos com default ainda valem.
fn payload<T: DeserializeOwned + Validate>(raw: Value) -> Result<T, AppError> {
    let raw = match raw {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    let parsed: T = serde_json::from_value(raw)
        .map_err(|e| AppError::InvalidInput(InputError::MalformedBody(e.to_string())))?;
    parsed.validate()?;
    Ok(parsed)
}

fn to_data<T: Serialize>(result: T) -> Result<Value, AppError> {
    Ok(serde_json::to_value(result).map_err(anyhow::Error::from)?)
}

impl PpeRequest {
    pub fn parse(action: &str, raw: Value) -> Result<Self, AppError> {
        let request = match action {
            "getInitialData" => PpeRequest::GetInitialData,
            "saveCategory" => PpeRequest::SaveCategory(payload(raw)?),
            "deleteCategory" => PpeRequest::DeleteCategory(payload(raw)?),
            "savePpeItem" => PpeRequest::SavePpeItem(payload(raw)?),
            "deletePpeItem" => PpeRequest::DeletePpeItem(payload(raw)?),
            "addNewVoucher" => PpeRequest::AddNewVoucher(payload(raw)?),
            "approveVoucher" => PpeRequest::ApproveVoucher(payload(raw)?),
            "approvePartialVoucher" => PpeRequest::ApprovePartialVoucher(payload(raw)?),
            "rejectVoucher" => PpeRequest::RejectVoucher(payload(raw)?),
            "confirmReceive" => PpeRequest::ConfirmReceive(payload(raw)?),
            "borrowItem" => PpeRequest::BorrowItem(payload(raw)?),
            "returnItem" => PpeRequest::ReturnItem(payload(raw)?),
            "addReceiveTransaction" => PpeRequest::AddReceiveTransaction(payload(raw)?),
            "checkAdminCredentials" => PpeRequest::CheckAdminCredentials(payload(raw)?),
            "saveFeedback" => PpeRequest::SaveFeedback(payload(raw)?),
            "saveMatrixRule" => PpeRequest::SaveMatrixRule(payload(raw)?),
            "deleteMatrixRule" => PpeRequest::DeleteMatrixRule(payload(raw)?),
            "uploadDocument" => PpeRequest::UploadDocument(payload(raw)?),
            "deleteDocument" => PpeRequest::DeleteDocument(payload(raw)?),
            other => return Err(AppError::InvalidAction(other.to_string())),
        };
        Ok(request)
    }

    pub fn action(&self) -> &'static str {
        match self {
            PpeRequest::GetInitialData => "getInitialData",
            PpeRequest::SaveCategory(_) => "saveCategory",
            PpeRequest::DeleteCategory(_) => "deleteCategory",
            PpeRequest::SavePpeItem(_) => "savePpeItem",
            PpeRequest::DeletePpeItem(_) => "deletePpeItem",
            PpeRequest::AddNewVoucher(_) => "addNewVoucher",
            PpeRequest::ApproveVoucher(_) => "approveVoucher",
            PpeRequest::ApprovePartialVoucher(_) => "approvePartialVoucher",
            PpeRequest::RejectVoucher(_) => "rejectVoucher",
            PpeRequest::ConfirmReceive(_) => "confirmReceive",
            PpeRequest::BorrowItem(_) => "borrowItem",
            PpeRequest::ReturnItem(_) => "returnItem",
            PpeRequest::AddReceiveTransaction(_) => "addReceiveTransaction",
            PpeRequest::CheckAdminCredentials(_) => "checkAdminCredentials",
            PpeRequest::SaveFeedback(_) => "saveFeedback",
            PpeRequest::SaveMatrixRule(_) => "saveMatrixRule",
            PpeRequest::DeleteMatrixRule(_) => "deleteMatrixRule",
            PpeRequest::UploadDocument(_) => "uploadDocument",
            PpeRequest::DeleteDocument(_) => "deleteDocument",
        }
    }

    pub async fn execute(self, state: &AppState, locale: &Locale) -> Result<Value, AppError> {
        match self {
            PpeRequest::GetInitialData => {
                to_data(state.dashboard_service.initial_data(&locale.0).await?)
            }
            PpeRequest::SaveCategory(p) => {
                to_data(state.inventory_service.save_category(p.id, &p.name).await?)
            }
            PpeRequest::DeleteCategory(p) => {
                to_data(state.inventory_service.delete_category(p.category_id).await?)
            }
            PpeRequest::SavePpeItem(p) => to_data(state.inventory_service.save_item(p.into()).await?),
            PpeRequest::DeletePpeItem(p) => to_data(state.inventory_service.delete_item(p.id).await?),
            PpeRequest::AddNewVoucher(p) => to_data(state.voucher_service.create(p.into()).await?),
            PpeRequest::ApproveVoucher(p) => {
                to_data(state.voucher_service.approve_full(p.voucher_id).await?)
            }
            PpeRequest::ApprovePartialVoucher(p) => {
                to_data(state.voucher_service.approve_partial(p.voucher_id, &p.items).await?)
            }
            PpeRequest::RejectVoucher(p) => to_data(state.voucher_service.reject(p.voucher_id).await?),
            PpeRequest::ConfirmReceive(p) => to_data(
                state
                    .voucher_service
                    .confirm_receive(p.voucher_id, &p.user_id, p.user_name.as_deref())
                    .await?,
            ),
            PpeRequest::BorrowItem(p) => to_data(state.loan_service.borrow(p.into_request()?).await?),
            PpeRequest::ReturnItem(p) => to_data(state.loan_service.return_item(p.loan_id).await?),
            PpeRequest::AddReceiveTransaction(p) => {
                to_data(state.inventory_service.add_receive_transaction(p.into()).await?)
            }
            PpeRequest::CheckAdminCredentials(p) => {
                to_data(state.auth_service.check_admin_credentials(&p.username, &p.password))
            }
            PpeRequest::SaveFeedback(p) => {
                to_data(state.auxiliary_service.save_feedback(p.into_feedback()?).await?)
            }
            PpeRequest::SaveMatrixRule(p) => {
                let id = p.id;
                to_data(state.auxiliary_service.save_matrix_rule(id, p.into()).await?)
            }
            PpeRequest::DeleteMatrixRule(p) => {
                to_data(state.auxiliary_service.delete_matrix_rule(p.id).await?)
            }
            PpeRequest::UploadDocument(p) => {
                to_data(state.auxiliary_service.upload_document(p.into()).await?)
            }
            PpeRequest::DeleteDocument(p) => {
                to_data(state.auxiliary_service.delete_document(p.id).await?)
            }
        }
    }
}

async fn run(state: &AppState, locale: &Locale, body: &str) -> Result<Value, AppError> {
    // Corpo vazio equivale a `{}` (e cai em ação inválida).
    let body = if body.trim().is_empty() { "{}" } else { body };
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| AppError::InvalidInput(InputError::MalformedBody(e.to_string())))?;

    let request = PpeRequest::parse(&envelope.action, envelope.payload)?;
    tracing::info!("Ação recebida: {}", request.action());

    request.execute(state, locale).await
}

// ---
// Handler: dispatch
// ---
#[utoipa::path(
    post,
    path = "/api/ppe",
    tag = "PPE",
    request_body(content = DispatchRequest, content_type = "text/plain", description = "JSON `{action, payload}` enviado como texto"),
    responses(
        (status = 200, description = "Ação executada", body = DispatchResponse),
        (status = 400, description = "Ação desconhecida ou entrada inválida"),
        (status = 404, description = "Ficha, empréstimo ou item inexistente"),
        (status = 409, description = "Estado não permite a ação ou estoque insuficiente"),
        (status = 500, description = "Falha no banco ou em serviço externo")
    ),
    params(
        ("Accept-Language" = Option<String>, Header, description = "en, pt ou th")
    )
)]
pub async fn dispatch(
    State(app_state): State<AppState>,
    locale: Locale,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let data = run(&app_state, &locale, &body)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "data": data,
            "version": API_VERSION,
        })),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request},
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        handlers,
        models::voucher::VoucherStatus,
        services::testing::{item, line, pending_voucher, Harness},
    };

    async fn call(app: Router, body: Value, lang: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/ppe")
            .header(header::CONTENT_TYPE, "text/plain;charset=utf-8");
        if let Some(lang) = lang {
            request = request.header(header::ACCEPT_LANGUAGE, lang);
        }
        let request = request.body(Body::from(body.to_string())).unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn unknown_actions_are_rejected() {
        let err = PpeRequest::parse("dropTables", Value::Null).unwrap_err();
        assert!(matches!(err, AppError::InvalidAction(action) if action == "dropTables"));
    }

    #[test]
    fn payload_validation_runs_on_parse() {
        let err = PpeRequest::parse("borrowItem", json!({ "itemId": 1, "borrowerName": "" })).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = PpeRequest::parse("approveVoucher", json!({})).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(InputError::MalformedBody(_))));
    }

    #[tokio::test]
    async fn approves_a_voucher_through_the_envelope() {
        let h = Harness::new();
        h.store.seed_item(item(1, 10, 2));
        h.store.seed_voucher(pending_voucher(1, vec![line(1, 3)]));
        let app = handlers::router(h.state.clone());

        let (status, body) = call(app, json!({ "action": "approveVoucher", "payload": { "voucherId": "1" } }), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["version"], API_VERSION);
        assert_eq!(body["data"]["updatedVoucherId"], 1);
        assert_eq!(body["data"]["status"], "approved");
        assert_eq!(body["data"]["updatedStockItems"][0], json!({ "id": 1, "stock": 7 }));
        assert_eq!(h.store.voucher(1).unwrap().status, VoucherStatus::Approved);
    }

    #[tokio::test]
    async fn repeated_approval_is_a_conflict() {
        let h = Harness::new();
        h.store.seed_item(item(1, 10, 2));
        h.store.seed_voucher(pending_voucher(1, vec![line(1, 3)]));
        let request = json!({ "action": "approveVoucher", "payload": { "voucherId": 1 } });

        call(handlers::router(h.state.clone()), request.clone(), None).await;
        let (status, body) = call(handlers::router(h.state.clone()), request, None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Voucher #1 has already been processed");
    }

    #[tokio::test]
    async fn errors_follow_the_accept_language_header() {
        let h = Harness::new();
        h.store.seed_item(item(2, 0, 0));
        let app = handlers::router(h.state.clone());

        let (status, body) = call(
            app,
            json!({ "action": "borrowItem", "payload": { "itemId": 2, "borrowerName": "Niran" } }),
            Some("th-TH,th;q=0.9"),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "อุปกรณ์ ID: 2 หมดสต็อก");
    }

    #[tokio::test]
    async fn unknown_action_and_garbage_bodies_are_bad_requests() {
        let h = Harness::new();

        let (status, body) = call(handlers::router(h.state.clone()), json!({ "action": "nope" }), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid action: nope");

        let request = Request::builder()
            .method("POST")
            .uri("/api/ppe")
            .body(Body::from("not json"))
            .unwrap();
        let response = handlers::router(h.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn borrow_and_return_round_trip() {
        let h = Harness::new();
        h.store.seed_item(item(1, 1, 0));

        let (status, body) = call(
            handlers::router(h.state.clone()),
            json!({ "action": "borrowItem", "payload": { "itemId": 1, "borrowerName": "Niran", "dueDate": "" } }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updatedItem"], json!({ "id": 1, "stock": 0, "onLoanQuantity": 1 }));
        let loan_id = body["data"]["newLoan"]["loanId"].clone();

        let (status, body) = call(
            handlers::router(h.state.clone()),
            json!({ "action": "returnItem", "payload": { "loanId": loan_id } }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updatedItem"], json!({ "id": 1, "stock": 1, "onLoanQuantity": 0 }));
    }

    #[tokio::test]
    async fn initial_data_and_credentials() {
        let h = Harness::new();
        h.store.seed_item(item(1, 1, 2));

        let (status, body) = call(handlers::router(h.state.clone()), json!({ "action": "getInitialData" }), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["ppeItems"][0]["id"], 1);
        assert_eq!(body["data"]["dashboardMetrics"]["reorderAlerts"][0]["itemId"], 1);

        let (_, body) = call(
            handlers::router(h.state.clone()),
            json!({ "action": "checkAdminCredentials", "payload": { "username": "admin", "password": "s3nha" } }),
            None,
        )
        .await;
        assert_eq!(body["data"], true);
    }

    #[tokio::test]
    async fn voucher_lifecycle_over_http() {
        let h = Harness::new();
        h.store.seed_item(item(1, 10, 2));

        let (_, created) = call(
            handlers::router(h.state.clone()),
            json!({ "action": "addNewVoucher", "payload": {
                "user": "Somchai", "department": "Solda",
                "items": [{ "itemId": "1", "itemName": "Luva", "quantity": "4" }]
            }}),
            None,
        )
        .await;
        assert_eq!(created["data"]["status"], "pending");
        let voucher_id = created["data"]["id"].clone();

        let (_, decided) = call(
            handlers::router(h.state.clone()),
            json!({ "action": "approvePartialVoucher", "payload": {
                "voucherId": voucher_id,
                "items": [{ "itemId": 1, "itemName": "Luva", "quantity": 2 }]
            }}),
            None,
        )
        .await;
        assert_eq!(decided["data"]["status"], "partially_approved");
        assert_eq!(h.store.item(1).unwrap().stock, 8);

        let confirm = json!({ "action": "confirmReceive", "payload": { "voucherId": voucher_id, "userId": "U-9" } });
        let (_, first) = call(handlers::router(h.state.clone()), confirm.clone(), None).await;
        let (_, second) = call(handlers::router(h.state.clone()), confirm, None).await;
        assert_eq!(first["data"]["status"], "received");
        assert_eq!(second["data"]["status"], "already_received");
        assert_eq!(h.sink.sent().len(), 1);
    }
}
