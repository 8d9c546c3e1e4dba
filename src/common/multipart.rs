// src/common/multipart.rs

use std::collections::HashMap;

use axum::{body::Bytes, extract::Multipart};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::common::error::AppError;

/// Limite por arquivo enviado.
pub const MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

/// Limite do corpo inteiro nas rotas com upload (dois arquivos + campos).
pub const MAX_FORM_BYTES: usize = 32 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
];

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

pub fn check_content_type(content_type: &str) -> Result<(), AppError> {
    // "image/png; charset=..." ainda é png
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if ALLOWED_MIME_TYPES.contains(&essence.as_str()) {
        Ok(())
    } else {
        Err(AppError::UnsupportedFileType(essence))
    }
}

pub fn check_size(field: &str, len: usize) -> Result<(), AppError> {
    if len > MAX_UPLOAD_BYTES {
        return Err(AppError::FileTooLarge {
            field: field.to_string(),
            limit_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
        });
    }
    Ok(())
}

/// Um formulário multipart já lido: campos de texto + arquivos validados.
#[derive(Debug, Default)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field.file_name().map(str::to_owned) {
                // Input de arquivo vazio no navegador
                Some(file_name) if file_name.is_empty() => continue,
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();

                    // O tipo é checado antes de ler o corpo
                    check_content_type(&content_type)?;

                    let bytes = field.bytes().await?;
                    check_size(&name, bytes.len())?;

                    form.files.insert(
                        name.clone(),
                        UploadedFile {
                            field: name,
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// Converte os campos de texto numa struct com lista fechada de campos.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        let object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        serde_json::from_value(Value::Object(object))
            .map_err(|e| AppError::BadRequest(format!("Invalid form fields: {}", e)))
    }
}

/// Remove espaços e descarta strings vazias.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lista os campos obrigatórios que vieram em branco.
pub fn missing_fields(required: &[(&str, &Option<String>)]) -> Vec<String> {
    required
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Como `missing_fields`, mas ausente é aceito: só reclama do que veio em branco.
pub fn blank_fields(fields: &[(&str, &Option<String>)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect()
}
