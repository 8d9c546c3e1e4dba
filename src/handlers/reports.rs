// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminOnly, CallerScope},
    models::report::{ReportFormat, ReportQuery},
};

fn attachment(name: &str, format: ReportFormat, bytes: Vec<u8>) -> impl IntoResponse {
    let disposition = format!(
        "attachment; filename=\"{}-{}.{}\"",
        name,
        chrono::Utc::now().format("%Y%m%d"),
        format.extension()
    );

    (
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
}

// GET /api/reports/customers?format=pdf|csv
#[utoipa::path(
    get,
    path = "/api/reports/customers",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Relatório de clientes (PDF ou CSV)"),
        (status = 500, description = "Fonte do PDF não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn customer_report(
    State(app_state): State<AppState>,
    CallerScope(scope): CallerScope,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let format = query.format.unwrap_or_default();
    let bytes = app_state.report_service.customer_report(scope, format).await?;

    Ok(attachment("customers", format, bytes))
}

// GET /api/reports/staff?format=pdf|csv
#[utoipa::path(
    get,
    path = "/api/reports/staff",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Relatório de funcionários (PDF ou CSV)"),
        (status = 500, description = "Fonte do PDF não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn staff_report(
    _: AdminOnly,
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let format = query.format.unwrap_or_default();
    let bytes = app_state.report_service.staff_report(format).await?;

    Ok(attachment("staff", format, bytes))
}
