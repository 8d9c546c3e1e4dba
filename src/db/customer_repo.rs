// src/db/customer_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::{unique_violation, AppError},
    models::{
        auth::RoleScope,
        customer::{
            Customer, CustomerChanges, CustomerStatusAction, CustomerStatusCounts, NewCustomer,
        },
    },
};

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, AppError>;

    async fn list_customers(&self, scope: RoleScope) -> Result<Vec<Customer>, AppError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Customer>, AppError>;

    async fn update_customer(
        &self,
        code: &str,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>, AppError>;

    /// Remove a linha de vez e devolve o que foi apagado.
    async fn delete_customer(&self, code: &str) -> Result<Option<Customer>, AppError>;

    async fn status_counts(&self, scope: RoleScope) -> Result<CustomerStatusCounts, AppError>;

    async fn apply_status(
        &self,
        code: &str,
        action: CustomerStatusAction,
    ) -> Result<Option<Customer>, AppError>;
}

/// Traduz as constraints de unicidade da tabela `customers`.
fn map_customer_error(e: sqlx::Error) -> AppError {
    match unique_violation(&e).as_deref() {
        Some("customers_email_key") => AppError::CustomerEmailExists,
        Some(constraint) => {
            AppError::InternalServerError(anyhow::anyhow!("unique violation on {}", constraint))
        }
        None => e.into(),
    }
}

#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                customer_code, first_name, middle_name, last_name,
                contact_number, email,
                address_line, city, state, pincode, country,
                id_proof_url, address_proof_url,
                id_proof_public_id, address_proof_public_id, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&customer.customer_code)
        .bind(&customer.first_name)
        .bind(&customer.middle_name)
        .bind(&customer.last_name)
        .bind(&customer.contact_number)
        .bind(&customer.email)
        .bind(&customer.address_line)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.pincode)
        .bind(&customer.country)
        .bind(&customer.id_proof_url)
        .bind(&customer.address_proof_url)
        .bind(&customer.id_proof_public_id)
        .bind(&customer.address_proof_public_id)
        .bind(customer.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(map_customer_error)
    }

    async fn list_customers(&self, scope: RoleScope) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE ($1::uuid IS NULL OR created_by = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(scope.created_by())
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Customer>, AppError> {
        let customer =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE customer_code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(customer)
    }

    async fn update_customer(
        &self,
        code: &str,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>, AppError> {
        // COALESCE: campo ausente mantém o valor atual
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                first_name = COALESCE($2, first_name),
                middle_name = COALESCE($3, middle_name),
                last_name = COALESCE($4, last_name),
                contact_number = COALESCE($5, contact_number),
                email = COALESCE($6, email),
                address_line = COALESCE($7, address_line),
                city = COALESCE($8, city),
                state = COALESCE($9, state),
                pincode = COALESCE($10, pincode),
                country = COALESCE($11, country),
                id_proof_url = COALESCE($12, id_proof_url),
                address_proof_url = COALESCE($13, address_proof_url),
                id_proof_public_id = COALESCE($14, id_proof_public_id),
                address_proof_public_id = COALESCE($15, address_proof_public_id),
                updated_at = NOW()
            WHERE customer_code = $1
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(&changes.first_name)
        .bind(&changes.middle_name)
        .bind(&changes.last_name)
        .bind(&changes.contact_number)
        .bind(&changes.email)
        .bind(&changes.address_line)
        .bind(&changes.city)
        .bind(&changes.state)
        .bind(&changes.pincode)
        .bind(&changes.country)
        .bind(&changes.id_proof_url)
        .bind(&changes.address_proof_url)
        .bind(&changes.id_proof_public_id)
        .bind(&changes.address_proof_public_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_customer_error)
    }

    async fn delete_customer(&self, code: &str) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            "DELETE FROM customers WHERE customer_code = $1 RETURNING *",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn status_counts(&self, scope: RoleScope) -> Result<CustomerStatusCounts, AppError> {
        let counts = sqlx::query_as::<_, CustomerStatusCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COUNT(*) FILTER (WHERE is_blacklisted) AS blacklisted
            FROM customers
            WHERE ($1::uuid IS NULL OR created_by = $1)
            "#,
        )
        .bind(scope.created_by())
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn apply_status(
        &self,
        code: &str,
        action: CustomerStatusAction,
    ) -> Result<Option<Customer>, AppError> {
        let set_clause = match action {
            CustomerStatusAction::Active => "status = 'active', is_blacklisted = FALSE",
            CustomerStatusAction::Inactive => "status = 'inactive'",
            // Lista negra não mexe no status
            CustomerStatusAction::Blacklisted => "is_blacklisted = TRUE",
        };

        let sql = format!(
            "UPDATE customers SET {}, updated_at = NOW() WHERE customer_code = $1 RETURNING *",
            set_clause
        );

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }
}
