use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::config::AppState;

pub mod dispatch;
pub mod payloads;
pub mod push;

// Rotas da API. Swagger e CORS ficam no main.
pub fn router(app_state: AppState) -> Router {
    let documents_dir = app_state.settings.documents_dir.clone();
    let documents_mount = app_state
        .settings
        .documents_public_url
        .trim_end_matches('/')
        .to_string();

    let router = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/ppe", post(dispatch::dispatch))
        .route("/api/push", post(push::push));

    // URL pública absoluta (CDN, bucket): os arquivos são servidos por fora.
    let router = if documents_mount.starts_with('/') {
        router.nest_service(&documents_mount, ServeDir::new(documents_dir))
    } else {
        router
    };

    router.with_state(app_state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::services::{auxiliary_service::DocumentUpload, testing::Harness};

    #[tokio::test]
    async fn uploaded_documents_are_served_at_their_url() {
        let h = Harness::new();
        let document = h
            .auxiliary
            .upload_document(DocumentUpload {
                title: "Manual".into(),
                file_name: "manual.pdf".into(),
                file_base64: "JVBERi0xLjQ=".into(),
                user: None,
            })
            .await
            .unwrap();

        let request = Request::builder()
            .uri(&document.file_url)
            .body(Body::empty())
            .unwrap();
        let response = router(h.state.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"%PDF-1.4");
    }

    #[tokio::test]
    async fn unknown_documents_are_not_found() {
        let h = Harness::new();
        let request = Request::builder()
            .uri("/documents/nada.pdf")
            .body(Body::empty())
            .unwrap();
        let response = router(h.state.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
