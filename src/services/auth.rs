// src/services/auth.rs

use base64::{engine::general_purpose::STANDARD, Engine as _};

// Login do painel: um único admin, senha guardada em Base64 na configuração.
#[derive(Clone)]
pub struct AuthService {
    admin_username: String,
    admin_password_base64: Option<String>,
}

impl AuthService {
    pub fn new(admin_username: String, admin_password_base64: Option<String>) -> Self {
        Self {
            admin_username,
            admin_password_base64,
        }
    }

    pub fn check_admin_credentials(&self, username: &str, password: &str) -> bool {
        let Some(expected) = self.admin_password_base64.as_deref() else {
            tracing::warn!("ADMIN_PASSWORD_BASE64 não configurada; login do admin recusado");
            return false;
        };

        let provided = STANDARD.encode(password.as_bytes());
        let accepted = username == self.admin_username && provided == expected;
        if !accepted {
            tracing::info!("Tentativa de login recusada para '{}'", username);
        }
        accepted
    }
}
