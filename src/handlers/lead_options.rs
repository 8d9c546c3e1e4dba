// src/handlers/lead_options.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::AdminOnly,
    models::lead_option::{DeleteManyPayload, DeleteManyResponse, LeadOption, LeadOptionPayload},
};

// POST /api/lead-options/add
#[utoipa::path(
    post,
    path = "/api/lead-options/add",
    tag = "Lead Options",
    request_body = LeadOptionPayload,
    responses(
        (status = 201, description = "Opção criada", body = LeadOption),
        (status = 400, description = "Campos em branco ou opção já existente")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_option(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Json(payload): Json<LeadOptionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let option = app_state.lead_option_service.create_option(payload).await?;
    Ok((StatusCode::CREATED, Json(option)))
}

// GET /api/lead-options/all
#[utoipa::path(
    get,
    path = "/api/lead-options/all",
    tag = "Lead Options",
    responses(
        (status = 200, description = "Todas as opções", body = Vec<LeadOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_options(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let options = app_state.lead_option_service.list_all().await?;
    Ok(Json(options))
}

// GET /api/lead-options/field/{name}
#[utoipa::path(
    get,
    path = "/api/lead-options/field/{name}",
    tag = "Lead Options",
    params(("name" = String, Path, description = "Nome do campo (sem diferenciar maiúsculas)")),
    responses(
        (status = 200, description = "Opções do campo", body = Vec<LeadOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn options_by_field(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let options = app_state.lead_option_service.list_by_field(&name).await?;
    Ok(Json(options))
}

// PUT /api/lead-options/update/{id}
#[utoipa::path(
    put,
    path = "/api/lead-options/update/{id}",
    tag = "Lead Options",
    params(("id" = Uuid, Path, description = "ID da opção")),
    request_body = LeadOptionPayload,
    responses(
        (status = 200, description = "Opção atualizada", body = LeadOption),
        (status = 400, description = "Campos em branco ou opção já existente"),
        (status = 404, description = "Opção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_option(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadOptionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let option = app_state.lead_option_service.update_option(id, payload).await?;
    Ok(Json(option))
}

// DELETE /api/lead-options/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/lead-options/delete/{id}",
    tag = "Lead Options",
    params(("id" = Uuid, Path, description = "ID da opção")),
    responses(
        (status = 200, description = "Opção removida"),
        (status = 404, description = "Opção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_option(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lead_option_service.delete_option(id).await?;
    Ok(Json(json!({ "message": "Option deleted successfully" })))
}

// DELETE /api/lead-options/delete-multiple
#[utoipa::path(
    delete,
    path = "/api/lead-options/delete-multiple",
    tag = "Lead Options",
    request_body = DeleteManyPayload,
    responses(
        (status = 200, description = "Quantidade removida", body = DeleteManyResponse),
        (status = 400, description = "ids ausente, vazio ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_many(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Json(payload): Json<DeleteManyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state.lead_option_service.delete_many(payload.ids).await?;
    Ok(Json(result))
}
