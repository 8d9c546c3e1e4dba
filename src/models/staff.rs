// src/models/staff.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{customer::RecordStatus, document::DocumentDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffAddress {
    pub line: String,
    #[schema(example = "Pune")]
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffDocuments {
    pub id_proof: DocumentDescriptor,
    pub address_proof: DocumentDescriptor,
}

impl StaffDocuments {
    pub fn public_ids(&self) -> [&str; 2] {
        [&self.id_proof.public_id, &self.address_proof.public_id]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: Uuid,

    pub first_name: String,
    pub last_name: String,

    #[schema(example = "rider.one@courier.in")]
    pub email: String,
    #[schema(example = "9123456780")]
    pub contact_number: String,
    #[schema(example = "ABCDE1234F")]
    pub id_proof_number: String,
    #[schema(example = "Delivery Executive")]
    pub designation: Option<String>,

    // Guardados como JSONB
    #[schema(value_type = StaffAddress)]
    pub address: Json<StaffAddress>,
    #[schema(value_type = StaffDocuments)]
    pub documents: Json<StaffDocuments>,

    pub is_blacklisted: bool,
    pub is_available: bool,
    pub is_deactivated: bool,
    pub is_deleted: bool,
    pub status: RecordStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Campos de texto aceitos nos formulários de funcionário.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub id_proof_number: Option<String>,
    pub designation: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewStaff {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub id_proof_number: String,
    pub designation: Option<String>,
    pub address: StaffAddress,
    pub documents: StaffDocuments,
}

/// Atualização com lista fechada de campos (sem atribuição em massa).
#[derive(Debug, Clone, Default)]
pub struct StaffChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub id_proof_number: Option<String>,
    pub designation: Option<String>,
    pub address: Option<StaffAddress>,
    pub documents: Option<StaffDocuments>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffStatusPayload {
    pub is_blacklisted: Option<bool>,
    pub is_available: Option<bool>,
    pub is_deactivated: Option<bool>,
    pub status: Option<RecordStatus>,
}

impl StaffStatusPayload {
    pub fn is_empty(&self) -> bool {
        self.is_blacklisted.is_none()
            && self.is_available.is_none()
            && self.is_deactivated.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StaffListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
// Mantém `offset()` dentro de i64 para qualquer `limit` aceito
const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Paginação já normalizada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffPage {
    pub data: Vec<Staff>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl StaffPage {
    pub fn new(data: Vec<Staff>, total: i64, page: Page) -> Self {
        let total_pages = (total + page.limit - 1) / page.limit;
        Self {
            data,
            total,
            page: page.page,
            limit: page.limit,
            total_pages,
        }
    }
}
