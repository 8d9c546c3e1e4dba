// src/common/error.rs

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    // --- Uploads ---
    #[error("Unsupported file type '{0}'. Allowed: pdf, jpeg, jpg, png, webp")]
    UnsupportedFileType(String),

    #[error("File '{field}' exceeds the {limit_mb} MB limit")]
    FileTooLarge { field: String, limit_mb: usize },

    #[error("Document '{0}' is required")]
    MissingDocument(&'static str),

    // --- Unicidade ---
    #[error("Customer with this email already exists")]
    CustomerEmailExists,

    #[error("Option already exists")]
    LeadOptionExists,

    #[error("{0}")]
    UniqueConstraintViolation(String),

    #[error("Email already in use")]
    EmailAlreadyExists,

    // --- Auth ---
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or missing authentication token")]
    InvalidToken,

    #[error("You need the '{0}' role to perform this action")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    // --- Serviços externos ---
    #[error("Media store error: {0}")]
    MediaStore(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MissingFields(_)
            | AppError::BadRequest(_)
            | AppError::Multipart(_)
            | AppError::UnsupportedFileType(_)
            | AppError::MissingDocument(_)
            | AppError::CustomerEmailExists
            | AppError::LeadOptionExists => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UniqueConstraintViolation(_) | AppError::EmailAlreadyExists => {
                StatusCode::CONFLICT
            }
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MediaStore(_) | AppError::Notification(_) => StatusCode::BAD_GATEWAY,
            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                })
            }
            AppError::MissingFields(fields) => json!({
                "error": self.to_string(),
                "details": fields,
            }),
            // Upstream: loga o detalhe, devolve mensagem curta.
            AppError::MediaStore(_) | AppError::Notification(_) => {
                tracing::warn!("Falha em serviço externo: {}", self);
                json!({ "error": self.to_string() })
            }
            // Erros 500 nunca expõem a mensagem original para o cliente.
            e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                json!({ "error": "An unexpected error occurred." })
            }
            e => json!({ "error": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Extrai o nome da constraint violada, se o erro for de unicidade.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}
