// src/db/staff_repo.rs

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::{unique_violation, AppError},
    models::staff::{NewStaff, Page, Staff, StaffChanges, StaffStatusPayload},
};

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn create_staff(&self, staff: &NewStaff) -> Result<Staff, AppError>;

    /// Lista os não excluídos, com busca opcional. Retorna (página, total).
    async fn list_staff(
        &self,
        page: Page,
        search: Option<&str>,
    ) -> Result<(Vec<Staff>, i64), AppError>;

    async fn find_active(&self, id: Uuid) -> Result<Option<Staff>, AppError>;

    /// Sem filtro de paginação, para os relatórios.
    async fn list_all_active(&self) -> Result<Vec<Staff>, AppError>;

    async fn update_staff(
        &self,
        id: Uuid,
        changes: &StaffChanges,
    ) -> Result<Option<Staff>, AppError>;

    async fn update_status(
        &self,
        id: Uuid,
        status: &StaffStatusPayload,
    ) -> Result<Option<Staff>, AppError>;

    /// Exclusão lógica: is_deleted = true, status = inactive.
    async fn soft_delete(&self, id: Uuid) -> Result<Option<Staff>, AppError>;
}

/// Traduz as constraints de unicidade da tabela `staff` para 409.
fn map_staff_error(e: sqlx::Error) -> AppError {
    let field = match unique_violation(&e).as_deref() {
        Some("staff_email_key") => "email",
        Some("staff_contact_number_key") => "contact number",
        Some("staff_id_proof_number_key") => "ID proof number",
        Some(_) => "value",
        None => return e.into(),
    };
    AppError::UniqueConstraintViolation(format!("Staff with this {} already exists", field))
}

/// Escapa os curingas do LIKE e envolve em %...%.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[derive(Clone)]
pub struct PgStaffRepository {
    pool: PgPool,
}

impl PgStaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for PgStaffRepository {
    async fn create_staff(&self, staff: &NewStaff) -> Result<Staff, AppError> {
        sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (
                first_name, last_name, email, contact_number,
                id_proof_number, designation, address, documents
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.contact_number)
        .bind(&staff.id_proof_number)
        .bind(&staff.designation)
        .bind(Json(&staff.address))
        .bind(Json(&staff.documents))
        .fetch_one(&self.pool)
        .await
        .map_err(map_staff_error)
    }

    async fn list_staff(
        &self,
        page: Page,
        search: Option<&str>,
    ) -> Result<(Vec<Staff>, i64), AppError> {
        let pattern = search.map(like_pattern);

        // Busca OR nos quatro campos de texto, sem diferenciar maiúsculas
        let filter = r#"
            is_deleted = FALSE
            AND (
                $1::text IS NULL
                OR first_name ILIKE $1
                OR last_name ILIKE $1
                OR email ILIKE $1
                OR contact_number ILIKE $1
            )
        "#;

        let rows = sqlx::query_as::<_, Staff>(&format!(
            "SELECT * FROM staff WHERE {} ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            filter
        ))
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM staff WHERE {}", filter))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn find_active(&self, id: Uuid) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT * FROM staff WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    async fn list_all_active(&self) -> Result<Vec<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT * FROM staff WHERE is_deleted = FALSE ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    async fn update_staff(
        &self,
        id: Uuid,
        changes: &StaffChanges,
    ) -> Result<Option<Staff>, AppError> {
        sqlx::query_as::<_, Staff>(
            r#"
            UPDATE staff SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                contact_number = COALESCE($5, contact_number),
                id_proof_number = COALESCE($6, id_proof_number),
                designation = COALESCE($7, designation),
                address = COALESCE($8, address),
                documents = COALESCE($9, documents),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(&changes.contact_number)
        .bind(&changes.id_proof_number)
        .bind(&changes.designation)
        .bind(changes.address.as_ref().map(Json))
        .bind(changes.documents.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_staff_error)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: &StaffStatusPayload,
    ) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            UPDATE staff SET
                is_blacklisted = COALESCE($2, is_blacklisted),
                is_available = COALESCE($3, is_available),
                is_deactivated = COALESCE($4, is_deactivated),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.is_blacklisted)
        .bind(status.is_available)
        .bind(status.is_deactivated)
        .bind(status.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            UPDATE staff SET
                is_deleted = TRUE,
                status = 'inactive',
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ravi"), "%ravi%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
