// src/handlers/customers.rs

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    common::{
        error::AppError,
        multipart::{FormData, UploadedFile},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::CallerScope},
    models::{
        customer::{Customer, CustomerForm, CustomerStatusCounts, CustomerStatusPayload},
        document::DocumentKind,
        notification::NotificationReceipt,
    },
};

/// Lê o multipart e separa os campos de texto dos dois documentos.
async fn read_form(
    multipart: Multipart,
) -> Result<(CustomerForm, [Option<UploadedFile>; 2]), AppError> {
    let mut form = FormData::from_multipart(multipart).await?;
    let payload: CustomerForm = form.payload()?;
    let files = DocumentKind::ALL.map(|kind| form.take_file(kind.field_name()));
    Ok((payload, files))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body(content = CustomerForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Campos obrigatórios, arquivo inválido ou email duplicado"),
        (status = 413, description = "Arquivo maior que 15 MB")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (form, [id_proof, address_proof]) = read_form(multipart).await?;

    let customer = app_state
        .customer_service
        .create_customer(form, id_proof, address_proof, Some(user.id))
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "Clientes visíveis para o usuário", body = Vec<Customer>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.customer_service.list_customers(scope).await?;
    Ok(Json(customers))
}

// GET /api/customers/counts
#[utoipa::path(
    get,
    path = "/api/customers/counts",
    tag = "Customers",
    responses(
        (status = 200, description = "Totais por status", body = CustomerStatusCounts)
    ),
    security(("api_jwt" = []))
)]
pub async fn status_counts(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
) -> Result<impl IntoResponse, AppError> {
    let counts = app_state.customer_service.status_counts(scope).await?;
    Ok(Json(counts))
}

// GET /api/customers/{code}
#[utoipa::path(
    get,
    path = "/api/customers/{code}",
    tag = "Customers",
    params(("code" = String, Path, description = "Código do cliente (CUST-XXXXXXXX)")),
    responses(
        (status = 200, description = "Cliente", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.customer_service.get_customer(&code, scope).await?;
    Ok(Json(customer))
}

// PUT /api/customers/{code}
#[utoipa::path(
    put,
    path = "/api/customers/{code}",
    tag = "Customers",
    params(("code" = String, Path, description = "Código do cliente")),
    request_body(content = CustomerForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 400, description = "Dados inválidos ou email duplicado"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(code): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (form, [id_proof, address_proof]) = read_form(multipart).await?;

    let customer = app_state
        .customer_service
        .update_customer(&code, scope, form, id_proof, address_proof)
        .await?;

    Ok(Json(customer))
}

// DELETE /api/customers/{code}
#[utoipa::path(
    delete,
    path = "/api/customers/{code}",
    tag = "Customers",
    params(("code" = String, Path, description = "Código do cliente")),
    responses(
        (status = 200, description = "Cliente excluído"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.customer_service.delete_customer(&code, scope).await?;
    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}

// PATCH /api/customers/{code}/status
#[utoipa::path(
    patch,
    path = "/api/customers/{code}/status",
    tag = "Customers",
    params(("code" = String, Path, description = "Código do cliente")),
    request_body = CustomerStatusPayload,
    responses(
        (status = 200, description = "Status aplicado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_status(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(code): Path<String>,
    Json(payload): Json<CustomerStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state
        .customer_service
        .set_status(&code, scope, payload.status)
        .await?;
    Ok(Json(customer))
}

// POST /api/customers/{code}/notify
#[utoipa::path(
    post,
    path = "/api/customers/{code}/notify",
    tag = "Customers",
    params(("code" = String, Path, description = "Código do cliente")),
    responses(
        (status = 200, description = "Documento enviado pelo WhatsApp", body = NotificationReceipt),
        (status = 400, description = "Cliente sem documento"),
        (status = 502, description = "Falha na API do WhatsApp")
    ),
    security(("api_jwt" = []))
)]
pub async fn notify_customer(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = app_state.customer_service.notify_customer(&code, scope).await?;
    Ok(Json(receipt))
}
