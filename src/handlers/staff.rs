// src/handlers/staff.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::{error::AppError, multipart::FormData},
    config::AppState,
    middleware::rbac::AdminOnly,
    models::{
        document::DocumentKind,
        staff::{Staff, StaffForm, StaffListQuery, StaffPage, StaffStatusPayload},
    },
    services::staff_service::StaffUploads,
};

async fn read_form(multipart: Multipart) -> Result<(StaffForm, StaffUploads), AppError> {
    let mut form = FormData::from_multipart(multipart).await?;
    let payload: StaffForm = form.payload()?;
    let uploads = StaffUploads {
        id_proof: form.take_file(DocumentKind::IdProof.field_name()),
        address_proof: form.take_file(DocumentKind::AddressProof.field_name()),
    };
    Ok((payload, uploads))
}

// POST /api/staff
#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    request_body(content = StaffForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Funcionário criado", body = Staff),
        (status = 400, description = "Campos ou documentos ausentes"),
        (status = 409, description = "Email, contato ou documento já cadastrado"),
        (status = 413, description = "Arquivo maior que 15 MB")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_staff(
    _: AdminOnly,
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (form, uploads) = read_form(multipart).await?;
    let staff = app_state.staff_service.create_staff(form, uploads).await?;

    Ok((StatusCode::CREATED, Json(staff)))
}

// GET /api/staff?page=&limit=&search=
#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    params(
        ("page" = Option<i64>, Query, description = "Página (padrão 1)"),
        ("limit" = Option<i64>, Query, description = "Itens por página (1 a 100, padrão 10)"),
        ("search" = Option<String>, Query, description = "Busca em nome, sobrenome, email e contato")
    ),
    responses(
        (status = 200, description = "Página de funcionários", body = StaffPage)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_staff(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Query(query): Query<StaffListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.staff_service.list_staff(query).await?;
    Ok(Json(page))
}

// GET /api/staff/{id}
#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário", body = Staff),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_staff(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let staff = app_state.staff_service.get_staff(id).await?;
    Ok(Json(staff))
}

// PUT /api/staff/{id}
#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    request_body(content = StaffForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Funcionário atualizado", body = Staff),
        (status = 404, description = "Funcionário não encontrado"),
        (status = 409, description = "Valor único já usado por outro funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_staff(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (form, uploads) = read_form(multipart).await?;
    let staff = app_state.staff_service.update_staff(id, form, uploads).await?;

    Ok(Json(staff))
}

// PATCH /api/staff/{id}/status
#[utoipa::path(
    patch,
    path = "/api/staff/{id}/status",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    request_body = StaffStatusPayload,
    responses(
        (status = 200, description = "Flags atualizadas", body = Staff),
        (status = 400, description = "Nenhum campo de status enviado"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StaffStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let staff = app_state.staff_service.update_status(id, payload).await?;
    Ok(Json(staff))
}

// DELETE /api/staff/{id}
#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário desativado (exclusão lógica)"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_staff(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.staff_service.delete_staff(id).await?;
    Ok(Json(json!({ "message": "Staff deleted successfully" })))
}
