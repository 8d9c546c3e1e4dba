// src/models/lead_option.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadOption {
    pub id: Uuid,
    #[schema(example = "City")]
    pub field_name: String,
    #[schema(example = "Pune")]
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadOptionPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "City")]
    pub field_name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Pune")]
    pub value: String,
}

/// `ids` fica como `Value` para que "não é array" vire 400 com mensagem própria.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeleteManyPayload {
    #[schema(value_type = Vec<Uuid>)]
    pub ids: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManyResponse {
    pub deleted_count: u64,
}
