// src/services/media.rs

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::{
    common::{error::AppError, multipart::UploadedFile},
    config::CloudinaryConfig,
    models::document::DocumentDescriptor,
};

/// Storage remoto dos documentos enviados.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Envia o arquivo para `folder` (relativo à pasta base) e devolve o descritor.
    async fn upload(&self, file: &UploadedFile, folder: &str)
        -> Result<DocumentDescriptor, AppError>;

    /// Apaga o objeto remoto pelo identificador do provedor.
    async fn delete(&self, public_id: &str) -> Result<(), AppError>;
}

/// Apaga vários objetos sem propagar erro: falhas só são logadas.
pub async fn purge_quietly(store: &dyn MediaStore, public_ids: &[&str]) {
    for public_id in public_ids {
        match store.delete(public_id).await {
            Ok(()) => tracing::info!("🗑️ Arquivo removido do storage: {}", public_id),
            Err(e) => tracing::warn!("Falha ao remover '{}' do storage: {}", public_id, e),
        }
    }
}

// =============================================================================
//  CLOUDINARY
// =============================================================================

const CLOUDINARY_API: &str = "https://api.cloudinary.com/v1_1";

// PDF, JPEG, PNG e WEBP são todos resource_type "image" no Cloudinary
const RESOURCE_TYPE: &str = "image";

#[derive(Clone)]
pub struct CloudinaryMediaStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Monta a string assinada: parâmetros em ordem alfabética, `k=v` unidos por `&`.
pub fn string_to_sign(params: &[(&str, &str)]) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|(key, _)| *key);
    sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// SHA-1 de `string_to_sign + api_secret`, em hex.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl CloudinaryMediaStore {
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            CLOUDINARY_API, self.config.cloud_name, RESOURCE_TYPE, action
        )
    }
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    async fn upload(
        &self,
        file: &UploadedFile,
        folder: &str,
    ) -> Result<DocumentDescriptor, AppError> {
        let folder = format!("{}/{}", self.config.folder, folder);
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| AppError::MediaStore(e.to_string()))?;

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::MediaStore(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::MediaStore(format!(
                "upload failed ({}): {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::MediaStore(e.to_string()))?;

        tracing::info!(
            "📤 Upload de '{}' concluído: {} ({} bytes)",
            file.field,
            uploaded.public_id,
            file.bytes.len()
        );

        Ok(DocumentDescriptor {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let params = [
            ("public_id", public_id),
            ("api_key", self.config.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::MediaStore(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::MediaStore(format!(
                "destroy failed ({}) for {}",
                response.status(),
                public_id
            )));
        }

        let destroyed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| AppError::MediaStore(e.to_string()))?;

        // "not found" conta como sucesso: o objeto já não existe
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(AppError::MediaStore(format!(
                "destroy returned '{}' for {}",
                other, public_id
            ))),
        }
    }
}

// =============================================================================
//  MEMÓRIA (testes)
// =============================================================================
