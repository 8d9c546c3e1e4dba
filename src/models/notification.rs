// src/models/notification.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Mensagem de template com documento no cabeçalho e parâmetros no corpo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMessage {
    pub to: String,
    pub template: String,
    pub language: String,
    pub document_url: String,
    pub filename: String,
    pub body_parameters: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendWhatsAppPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "+91 98765 43210")]
    pub to: String,

    #[validate(url(message = "invalid_url"))]
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/v1/courier/invoice.pdf")]
    pub document_url: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "invoice.pdf")]
    pub filename: String,

    #[serde(default)]
    #[schema(example = json!(["Asha Patil", "AWB123456"]))]
    pub parameters: Vec<String>,

    /// Usa o template padrão da configuração quando ausente.
    pub template: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationReceipt {
    pub to: String,
    /// ID devolvido pela API do WhatsApp, quando houver
    pub message_id: Option<String>,
}
