// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::Stores,
    services::{
        AuthService, AuxiliaryService, DashboardService, InventoryService, LoanService,
        NotificationSink, VoucherService,
    },
};

const DEFAULT_LINE_PUSH_ENDPOINT: &str = "https://api.line.me/v2/bot/message/push";

// Tudo o que vem do ambiente (.env em desenvolvimento).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: String,
    pub admin_username: String,
    pub admin_password_base64: Option<String>,
    pub line_channel_access_token: Option<String>,
    pub admin_line_user_id: Option<String>,
    pub line_push_endpoint: String,
    /// Limite de cada chamada à LINE; a confirmação de recebimento espera por ela.
    pub line_push_timeout: Duration,
    pub documents_dir: PathBuf,
    pub documents_public_url: String,
    /// Idioma das notas gravadas nas fichas e das mensagens na LINE.
    pub system_lang: String,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = optional("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let database_max_connections = or_default("DATABASE_MAX_CONNECTIONS", "5")
            .parse()
            .context("DATABASE_MAX_CONNECTIONS deve ser um número")?;

        let line_push_timeout_secs = or_default("LINE_PUSH_TIMEOUT_SECS", "10")
            .parse()
            .context("LINE_PUSH_TIMEOUT_SECS deve ser um número")?;

        Ok(Self {
            database_url,
            database_max_connections,
            bind_addr: or_default("BIND_ADDR", "0.0.0.0:3000"),
            admin_username: or_default("ADMIN_USERNAME", "admin"),
            admin_password_base64: optional("ADMIN_PASSWORD_BASE64"),
            line_channel_access_token: optional("LINE_CHANNEL_ACCESS_TOKEN"),
            admin_line_user_id: optional("ADMIN_LINE_USER_ID"),
            line_push_endpoint: or_default("LINE_PUSH_ENDPOINT", DEFAULT_LINE_PUSH_ENDPOINT),
            line_push_timeout: Duration::from_secs(line_push_timeout_secs),
            documents_dir: PathBuf::from(or_default("DOCUMENTS_DIR", "./documents")),
            documents_public_url: or_default("DOCUMENTS_PUBLIC_URL", "/documents"),
            system_lang: or_default("SYSTEM_LANG", "th").to_ascii_lowercase(),
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }

    #[cfg(test)]
    pub fn for_tests(documents_dir: PathBuf) -> Self {
        Self {
            database_url: String::new(),
            database_max_connections: 1,
            bind_addr: "127.0.0.1:0".into(),
            admin_username: "admin".into(),
            admin_password_base64: Some("czNuaGE=".into()),
            line_channel_access_token: Some("test-token".into()),
            admin_line_user_id: Some("ADMIN".into()),
            line_push_endpoint: DEFAULT_LINE_PUSH_ENDPOINT.into(),
            line_push_timeout: Duration::from_secs(1),
            documents_dir,
            documents_public_url: "/documents".into(),
            system_lang: "en".into(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub i18n_store: I18nStore,
    pub notifier: Arc<dyn NotificationSink>,
    pub voucher_service: VoucherService,
    pub loan_service: LoanService,
    pub inventory_service: InventoryService,
    pub dashboard_service: DashboardService,
    pub auxiliary_service: AuxiliaryService,
    pub auth_service: AuthService,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn assemble(stores: Stores, notifier: Arc<dyn NotificationSink>, settings: Settings) -> Self {
        let i18n_store = I18nStore::new();

        let system_lang = if i18n_store.supports(&settings.system_lang) {
            settings.system_lang.clone()
        } else {
            tracing::warn!("SYSTEM_LANG '{}' sem catálogo; usando o padrão", settings.system_lang);
            crate::common::i18n::DEFAULT_LANG.to_string()
        };

        let voucher_service = VoucherService::new(
            stores.sequence.clone(),
            stores.vouchers.clone(),
            notifier.clone(),
            i18n_store.clone(),
            system_lang,
            settings.admin_line_user_id.clone(),
        );
        let loan_service = LoanService::new(
            stores.sequence.clone(),
            stores.items.clone(),
            stores.loans.clone(),
        );
        let inventory_service = InventoryService::new(
            stores.sequence.clone(),
            stores.items.clone(),
            stores.catalog.clone(),
            stores.receipts.clone(),
        );
        let auxiliary_service = AuxiliaryService::new(
            stores.auxiliary.clone(),
            settings.documents_dir.clone(),
            settings.documents_public_url.clone(),
        );
        let auth_service = AuthService::new(
            settings.admin_username.clone(),
            settings.admin_password_base64.clone(),
        );
        let dashboard_service = DashboardService::new(stores, i18n_store.clone());

        Self {
            settings: Arc::new(settings),
            i18n_store,
            notifier,
            voucher_service,
            loan_service,
            inventory_service,
            dashboard_service,
            auxiliary_service,
            auth_service,
        }
    }
}
