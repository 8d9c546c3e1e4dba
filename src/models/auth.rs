// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(email(message = "The email address is invalid."))]
    #[schema(example = "ops@courier.in")]
    pub email: String,

    #[validate(length(min = 6, message = "The password must have at least 6 characters."))]
    pub password: String,

    #[schema(example = "Ravi Kulkarni")]
    pub full_name: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "The email address is invalid."))]
    pub email: String,
    #[validate(length(min = 6, message = "The password must have at least 6 characters."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub role: Role,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

/// Filtro de visibilidade calculado a partir do papel de quem chama.
/// Administradores veem tudo; funcionários só o que eles mesmos cadastraram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleScope {
    All,
    CreatedBy(Uuid),
}

impl RoleScope {
    pub fn for_user(user: &User) -> Self {
        match user.role {
            Role::Admin => RoleScope::All,
            Role::Staff => RoleScope::CreatedBy(user.id),
        }
    }

    /// `None` quando não há restrição (vira `$1 IS NULL` no SQL).
    pub fn created_by(&self) -> Option<Uuid> {
        match self {
            RoleScope::All => None,
            RoleScope::CreatedBy(id) => Some(*id),
        }
    }

    pub fn allows(&self, created_by: Option<Uuid>) -> bool {
        match self {
            RoleScope::All => true,
            RoleScope::CreatedBy(id) => created_by == Some(*id),
        }
    }
}
