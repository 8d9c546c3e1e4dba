// src/db/lead_option_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{unique_violation, AppError},
    models::lead_option::LeadOption,
};

#[async_trait]
pub trait LeadOptionRepository: Send + Sync {
    async fn create_option(&self, field_name: &str, value: &str) -> Result<LeadOption, AppError>;

    async fn list_options(&self) -> Result<Vec<LeadOption>, AppError>;

    /// Compara o nome do campo sem diferenciar maiúsculas.
    async fn list_by_field(&self, field_name: &str) -> Result<Vec<LeadOption>, AppError>;

    async fn update_option(
        &self,
        id: Uuid,
        field_name: &str,
        value: &str,
    ) -> Result<Option<LeadOption>, AppError>;

    async fn delete_option(&self, id: Uuid) -> Result<bool, AppError>;

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, AppError>;
}

fn map_option_error(e: sqlx::Error) -> AppError {
    if unique_violation(&e).is_some() {
        return AppError::LeadOptionExists;
    }
    e.into()
}

#[derive(Clone)]
pub struct PgLeadOptionRepository {
    pool: PgPool,
}

impl PgLeadOptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadOptionRepository for PgLeadOptionRepository {
    async fn create_option(&self, field_name: &str, value: &str) -> Result<LeadOption, AppError> {
        sqlx::query_as::<_, LeadOption>(
            "INSERT INTO lead_options (field_name, value) VALUES ($1, $2) RETURNING *",
        )
        .bind(field_name)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(map_option_error)
    }

    async fn list_options(&self) -> Result<Vec<LeadOption>, AppError> {
        let options = sqlx::query_as::<_, LeadOption>(
            "SELECT * FROM lead_options ORDER BY field_name ASC, value ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }

    async fn list_by_field(&self, field_name: &str) -> Result<Vec<LeadOption>, AppError> {
        let options = sqlx::query_as::<_, LeadOption>(
            "SELECT * FROM lead_options WHERE LOWER(field_name) = LOWER($1) ORDER BY value ASC",
        )
        .bind(field_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }

    async fn update_option(
        &self,
        id: Uuid,
        field_name: &str,
        value: &str,
    ) -> Result<Option<LeadOption>, AppError> {
        sqlx::query_as::<_, LeadOption>(
            r#"
            UPDATE lead_options
            SET field_name = $2, value = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(field_name)
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_option_error)
    }

    async fn delete_option(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM lead_options WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM lead_options WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
