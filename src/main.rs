//src/main.rs

use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::{
    config::{AppState, Settings},
    db::Stores,
    docs::ApiDoc,
    services::LineMessagingClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let db_pool = settings.connect().await?;

    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if settings.line_channel_access_token.is_none() {
        tracing::warn!("LINE_CHANNEL_ACCESS_TOKEN ausente: notificações desativadas");
    }
    let notifier = Arc::new(LineMessagingClient::new(
        settings.line_push_endpoint.clone(),
        settings.line_channel_access_token.clone(),
        settings.line_push_timeout,
    )?);

    let bind_addr = settings.bind_addr.clone();
    let app_state = AppState::assemble(Stores::postgres(db_pool), notifier, settings);

    let app = handlers::router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
