// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

// Mapeia o CREATE TYPE record_status do banco (clientes e funcionários)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "record_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Inactive,
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,

    // Chave de negócio usada nas rotas
    #[schema(example = "CUST-1A2B3C4D")]
    pub customer_code: String,

    #[schema(example = "Asha")]
    pub first_name: String,
    pub middle_name: Option<String>,
    #[schema(example = "Patil")]
    pub last_name: String,

    #[schema(example = "9876543210")]
    pub contact_number: String,
    #[schema(example = "asha.patil@example.com")]
    pub email: String,

    pub address_line: String,
    #[schema(example = "Pune")]
    pub city: String,
    #[schema(example = "Maharashtra")]
    pub state: String,
    #[schema(example = "411001")]
    pub pincode: String,
    pub country: Option<String>,

    pub status: RecordStatus,
    pub is_blacklisted: bool,

    // Caminhos dos documentos enviados
    pub id_proof_url: Option<String>,
    pub address_proof_url: Option<String>,

    // Identificadores no provedor de mídia (só para apagar o objeto remoto)
    #[serde(skip)]
    pub id_proof_public_id: Option<String>,
    #[serde(skip)]
    pub address_proof_public_id: Option<String>,

    // Auditoria
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Objetos remotos ainda referenciados pelo cliente.
    pub fn public_ids(&self) -> Vec<&str> {
        [&self.id_proof_public_id, &self.address_proof_public_id]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Campos de texto aceitos nos formulários de cliente (criação e edição).
/// Qualquer outro campo enviado é ignorado.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub id_proof_url: Option<String>,
    pub address_proof_url: Option<String>,
}

/// Dados já validados para o INSERT.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub customer_code: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub contact_number: String,
    pub email: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: Option<String>,
    pub id_proof_url: Option<String>,
    pub address_proof_url: Option<String>,
    pub id_proof_public_id: Option<String>,
    pub address_proof_public_id: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Atualização parcial: `None` mantém o valor atual.
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub id_proof_url: Option<String>,
    pub address_proof_url: Option<String>,
    pub id_proof_public_id: Option<String>,
    pub address_proof_public_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStatusCounts {
    pub total: i64,
    pub active: i64,
    pub blacklisted: i64,
}

/// Transições de status disponíveis na rota PATCH /customers/{code}/status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatusAction {
    /// status = active e limpa a lista negra
    Active,
    /// status = inactive, lista negra intocada
    Inactive,
    /// isBlacklisted = true, status intocado
    Blacklisted,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerStatusPayload {
    #[schema(example = "blacklisted")]
    pub status: CustomerStatusAction,
}
