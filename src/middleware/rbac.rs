// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    models::auth::{Role, RoleScope, User},
};

/// 1. O Trait que define qual papel uma rota exige
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> Role;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

fn current_user(parts: &Parts) -> Result<&User, AppError> {
    parts.extensions.get::<User>().ok_or(AppError::InvalidToken)
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        // O papel vem do usuário carregado pelo auth_guard, não do token
        let required = T::role();
        if user.role != required {
            tracing::warn!(
                "⛔ Usuário {} sem o papel '{}' tentou acessar uma rota restrita",
                user.id,
                required.as_str()
            );
            return Err(AppError::Forbidden(required.as_str()));
        }

        Ok(RequireRole(PhantomData))
    }
}

/// Filtro de visibilidade do usuário atual (admin vê tudo, staff vê o que criou).
pub struct CallerScope(pub RoleScope);

impl<S> FromRequestParts<S> for CallerScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts).map(|user| CallerScope(RoleScope::for_user(user)))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct RoleAdmin;
impl RoleDef for RoleAdmin {
    fn role() -> Role { Role::Admin }
}

pub type AdminOnly = RequireRole<RoleAdmin>;
