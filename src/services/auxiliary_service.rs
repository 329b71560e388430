// src/services/auxiliary_service.rs
//
// Feedback, matriz de EPI por função e documentos (PDFs de procedimento).

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;

use crate::{
    common::error::{AppError, InputError},
    db::AuxiliaryStore,
    models::auxiliary::{Feedback, MatrixRule, MatrixRuleInput, NewDocument, NewFeedback, PpeDocument},
};

#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub title: String,
    pub file_name: String,
    pub file_base64: String,
    pub user: Option<String>,
}

// Só o último componente do nome: nada de "../" vindo do cliente.
fn safe_file_name(raw: &str) -> Option<String> {
    Path::new(raw.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .filter(|name| !name.is_empty())
}

// Aceita também o formato data URL ("data:application/pdf;base64,....").
fn decode_payload(encoded: &str) -> Result<Vec<u8>, AppError> {
    let encoded = match encoded.split_once(";base64,") {
        Some((_, data)) => data,
        None => encoded,
    };
    STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::InvalidInput(InputError::InvalidBase64))
}

#[derive(Clone)]
pub struct AuxiliaryService {
    store: Arc<dyn AuxiliaryStore>,
    documents_dir: PathBuf,
    documents_public_url: String,
}

impl AuxiliaryService {
    pub fn new(store: Arc<dyn AuxiliaryStore>, documents_dir: PathBuf, documents_public_url: String) -> Self {
        Self {
            store,
            documents_dir,
            documents_public_url,
        }
    }

    // --- FEEDBACK ---
    pub async fn save_feedback(&self, feedback: NewFeedback) -> Result<Feedback, AppError> {
        if !(1..=5).contains(&feedback.rating) {
            return Err(AppError::InvalidInput(InputError::RatingOutOfRange));
        }
        let saved = self.store.insert_feedback(&feedback).await?;
        tracing::info!("Feedback #{} registrado (nota {})", saved.id, saved.rating);
        Ok(saved)
    }

    // --- MATRIZ ---
    pub async fn save_matrix_rule(&self, id: Option<i64>, rule: MatrixRuleInput) -> Result<MatrixRule, AppError> {
        match id {
            Some(id) => self
                .store
                .update_matrix_rule(id, &rule)
                .await?
                .ok_or(AppError::MatrixRuleNotFound(id)),
            None => self.store.insert_matrix_rule(&rule).await,
        }
    }

    pub async fn delete_matrix_rule(&self, id: i64) -> Result<i64, AppError> {
        if !self.store.delete_matrix_rule(id).await? {
            return Err(AppError::MatrixRuleNotFound(id));
        }
        Ok(id)
    }

    // --- DOCUMENTOS ---
    pub async fn upload_document(&self, upload: DocumentUpload) -> Result<PpeDocument, AppError> {
        let file_name = safe_file_name(&upload.file_name)
            .ok_or(AppError::InvalidInput(InputError::MissingField("fileName")))?;
        let bytes = decode_payload(&upload.file_base64)?;

        // Prefixo de timestamp evita sobrescrever arquivos com o mesmo nome.
        let stored_name = format!("{}_{}", Utc::now().timestamp_millis(), file_name);
        let path = self.documents_dir.join(&stored_name);

        tokio::fs::create_dir_all(&self.documents_dir)
            .await
            .map_err(|e| AppError::UpstreamFailure(format!("diretório de documentos: {}", e)))?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::UpstreamFailure(format!("gravação de {}: {}", path.display(), e)))?;

        let file_type = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "pdf".to_string());

        let document = self
            .store
            .insert_document(&NewDocument {
                title: upload.title,
                file_url: format!("{}/{}", self.documents_public_url.trim_end_matches('/'), stored_name),
                file_name: stored_name,
                file_type,
                uploaded_by: upload.user,
            })
            .await?;

        tracing::info!("Documento #{} salvo ({} bytes)", document.id, bytes.len());
        Ok(document)
    }

    pub async fn delete_document(&self, id: i64) -> Result<i64, AppError> {
        let document = self
            .store
            .find_document(id)
            .await?
            .ok_or(AppError::DocumentNotFound(id))?;

        if !self.store.delete_document(id).await? {
            return Err(AppError::DocumentNotFound(id));
        }

        // O registro já saiu; o arquivo é melhor esforço.
        let path = self.documents_dir.join(&document.file_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Não foi possível remover {}: {}", path.display(), e);
        }

        Ok(id)
    }
}
