// src/services/notification_service.rs

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    config::WhatsAppConfig,
    models::notification::{NotificationReceipt, TemplateMessage},
};

/// Envio de mensagens de template. Sem retry: falhou, vira erro.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Retorna o ID da mensagem quando o provedor informa.
    async fn send_template(&self, message: &TemplateMessage) -> Result<Option<String>, AppError>;
}

/// Corpo da chamada /messages da Graph API.
pub fn template_body(message: &TemplateMessage) -> Value {
    let mut components = vec![json!({
        "type": "header",
        "parameters": [{
            "type": "document",
            "document": {
                "link": message.document_url,
                "filename": message.filename,
            }
        }]
    })];

    if !message.body_parameters.is_empty() {
        let parameters: Vec<Value> = message
            .body_parameters
            .iter()
            .map(|text| json!({ "type": "text", "text": text }))
            .collect();
        components.push(json!({ "type": "body", "parameters": parameters }));
    }

    json!({
        "messaging_product": "whatsapp",
        "recipient_type": "individual",
        "to": message.to,
        "type": "template",
        "template": {
            "name": message.template,
            "language": { "code": message.language },
            "components": components,
        }
    })
}

/// Mantém só os dígitos; números locais de 10 dígitos ganham o DDI padrão.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Result<String, AppError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        0 => Err(AppError::BadRequest("Destination phone number is required".into())),
        10 => Ok(format!("{}{}", default_country_code, digits)),
        _ => Ok(digits),
    }
}

// =============================================================================
//  WHATSAPP (GRAPH API)
// =============================================================================

#[derive(Clone)]
pub struct WhatsAppNotifier {
    client: reqwest::Client,
    api_url: String,
    access_token: String,
    phone_number_id: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

impl WhatsAppNotifier {
    pub fn new(
        api_url: String,
        access_token: String,
        phone_number_id: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token,
            phone_number_id,
        })
    }
}

#[async_trait]
impl Notifier for WhatsAppNotifier {
    async fn send_template(&self, message: &TemplateMessage) -> Result<Option<String>, AppError> {
        let url = format!("{}/{}/messages", self.api_url, self.phone_number_id);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&template_body(message))
            .send()
            .await
            .map_err(|e| AppError::Notification(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "WhatsApp API returned {}: {}",
                status, body
            )));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| AppError::Notification(e.to_string()))?;

        Ok(sent.messages.into_iter().next().map(|m| m.id))
    }
}

/// Usado quando não há credenciais do WhatsApp na configuração.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send_template(&self, _message: &TemplateMessage) -> Result<Option<String>, AppError> {
        Err(AppError::Notification("WhatsApp is not configured".into()))
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct NotificationService {
    notifier: Arc<dyn Notifier>,
    template: String,
    language: String,
    default_country_code: String,
}

impl NotificationService {
    pub fn new(notifier: Arc<dyn Notifier>, config: &WhatsAppConfig) -> Self {
        Self {
            notifier,
            template: config.template.clone(),
            language: config.language.clone(),
            default_country_code: config.default_country_code.clone(),
        }
    }

    pub async fn send_document(
        &self,
        to: &str,
        document_url: &str,
        filename: &str,
        parameters: Vec<String>,
        template: Option<String>,
    ) -> Result<NotificationReceipt, AppError> {
        let to = normalize_phone(to, &self.default_country_code)?;

        let message = TemplateMessage {
            to: to.clone(),
            template: template
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| self.template.clone()),
            language: self.language.clone(),
            document_url: document_url.to_string(),
            filename: filename.to_string(),
            body_parameters: parameters,
        };

        let message_id = self.notifier.send_template(&message).await?;

        tracing::info!("📨 WhatsApp '{}' enviado para {}", message.template, to);

        Ok(NotificationReceipt { to, message_id })
    }
}
