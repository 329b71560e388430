// src/handlers/push.rs
//
// Repassa uma mensagem qualquer para um usuário da LINE (POST /api/push).

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError, InputError},
    config::AppState,
    middleware::i18n::Locale,
    services::PushMessage,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O userId é obrigatório."))]
    pub user_id: String,
    /// Texto simples ou um objeto de mensagem da LINE.
    #[schema(value_type = Object)]
    pub message: Option<Value>,
}

fn to_push_message(message: Option<Value>) -> Result<PushMessage, AppError> {
    match message {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(PushMessage::Text(text)),
        Some(structured @ Value::Object(_)) => Ok(PushMessage::Structured(structured)),
        _ => Err(AppError::InvalidInput(InputError::MissingField("message"))),
    }
}

#[utoipa::path(
    post,
    path = "/api/push",
    tag = "PPE",
    request_body = PushPayload,
    responses(
        (status = 200, description = "Mensagem aceita pela LINE"),
        (status = 400, description = "userId ou message ausente"),
        (status = 500, description = "Token da LINE não configurado"),
        (status = 502, description = "A LINE recusou a mensagem")
    )
)]
pub async fn push(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<PushPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let Json(payload) = payload
        .map_err(|e| to_api(AppError::InvalidInput(InputError::MalformedBody(e.body_text()))))?;
    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;
    let message = to_push_message(payload.message).map_err(to_api)?;

    if !app_state.notifier.is_configured() {
        return Err(to_api(AppError::InternalServerError(anyhow::anyhow!(
            "LINE_CHANNEL_ACCESS_TOKEN não configurado"
        ))));
    }

    match app_state.notifier.push(&payload.user_id, message).await {
        Ok(()) => Ok((StatusCode::OK, Json(json!({ "success": true })))),
        Err(e) => {
            tracing::error!("❌ Push para {} falhou: {}", payload.user_id, e);
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "success": false, "error": e.to_string() })),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        handlers,
        services::{notification::testing::RecordingSink, testing::Harness},
    };

    fn request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/push")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn accepts_text_or_structured_messages() {
        assert_eq!(
            to_push_message(Some(json!("oi"))).unwrap(),
            PushMessage::Text("oi".into())
        );
        assert!(matches!(
            to_push_message(Some(json!({ "type": "flex" }))),
            Ok(PushMessage::Structured(_))
        ));
        assert!(to_push_message(None).is_err());
        assert!(to_push_message(Some(json!(""))).is_err());
    }

    #[tokio::test]
    async fn forwards_to_the_sink() {
        let h = Harness::new();
        let response = handlers::router(h.state.clone())
            .oneshot(request(json!({ "userId": "U1", "message": "Olá" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.sink.sent(), vec![("U1".to_string(), PushMessage::Text("Olá".into()))]);
    }

    #[tokio::test]
    async fn missing_fields_are_bad_requests() {
        let h = Harness::new();
        let response = handlers::router(h.state.clone())
            .oneshot(request(json!({ "message": "Olá" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = handlers::router(h.state.clone())
            .oneshot(request(json!({ "userId": "U1" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sink_failures_are_reported_without_success() {
        let h = Harness::with_sink(Arc::new(RecordingSink::failing()));
        let response = handlers::router(h.state.clone())
            .oneshot(request(json!({ "userId": "U1", "message": "Olá" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
    }
}
