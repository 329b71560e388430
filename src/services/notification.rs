// src/services/notification.rs
//
// Envio de mensagens push pela LINE Messaging API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::common::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    Text(String),
    /// Objeto de mensagem já no formato da LINE (flex, template...).
    Structured(Value),
}

impl PushMessage {
    fn to_line_message(&self) -> Value {
        match self {
            PushMessage::Text(text) => json!({ "type": "text", "text": text }),
            PushMessage::Structured(message) => message.clone(),
        }
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// `false` quando não há credencial: quem chama decide se isso é erro.
    fn is_configured(&self) -> bool;

    async fn push(&self, recipient: &str, message: PushMessage) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct LineMessagingClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl LineMessagingClient {
    /// `timeout` vale para a requisição inteira (conexão + resposta).
    pub fn new(endpoint: String, access_token: Option<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::UpstreamFailure(format!("cliente HTTP da LINE: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            access_token,
        })
    }
}

#[async_trait]
impl NotificationSink for LineMessagingClient {
    fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }

    async fn push(&self, recipient: &str, message: PushMessage) -> Result<(), AppError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| AppError::UpstreamFailure("LINE_CHANNEL_ACCESS_TOKEN ausente".into()))?;

        let body = json!({
            "to": recipient,
            "messages": [message.to_line_message()],
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::UpstreamFailure(format!("LINE inacessível: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamFailure(format!("LINE respondeu {}: {}", status, detail)));
        }

        tracing::debug!("Push enviado para {}", recipient);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_messages_use_the_line_text_shape() {
        let message = PushMessage::Text("olá".into()).to_line_message();
        assert_eq!(message, json!({ "type": "text", "text": "olá" }));
    }

    #[test]
    fn structured_messages_pass_through() {
        let flex = json!({ "type": "flex", "altText": "x", "contents": {} });
        assert_eq!(PushMessage::Structured(flex.clone()).to_line_message(), flex);
    }

    #[tokio::test]
    async fn refuses_to_send_without_a_token() {
        let client =
            LineMessagingClient::new("http://127.0.0.1:9/push".into(), None, Duration::from_secs(1)).unwrap();
        assert!(!client.is_configured());

        let err = client.push("U1", PushMessage::Text("x".into())).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamFailure(_)));
    }

    #[tokio::test]
    async fn gives_up_on_a_silent_endpoint() {
        // Aceita a conexão e nunca responde.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let client = LineMessagingClient::new(
            format!("http://{}/v2/bot/message/push", addr),
            Some("token".into()),
            Duration::from_millis(200),
        )
        .unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client.push("U1", PushMessage::Text("x".into())),
        )
        .await
        .expect("push should time out on its own");

        assert!(matches!(result, Err(AppError::UpstreamFailure(_))));
    }
}
