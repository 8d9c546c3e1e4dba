// src/handlers/notifications.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::AdminOnly,
    models::notification::{NotificationReceipt, SendWhatsAppPayload},
};

// POST /api/notifications/whatsapp
#[utoipa::path(
    post,
    path = "/api/notifications/whatsapp",
    tag = "Notifications",
    request_body = SendWhatsAppPayload,
    responses(
        (status = 200, description = "Mensagem aceita pela API do WhatsApp", body = NotificationReceipt),
        (status = 400, description = "Destino ou documento inválido"),
        (status = 502, description = "Falha na API do WhatsApp")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_whatsapp(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Json(payload): Json<SendWhatsAppPayload>,
) -> Result<Json<NotificationReceipt>, AppError> {
    payload.validate()?;

    let receipt = app_state
        .notification_service
        .send_document(
            &payload.to,
            &payload.document_url,
            &payload.filename,
            payload.parameters,
            payload.template,
        )
        .await?;

    Ok(Json(receipt))
}
