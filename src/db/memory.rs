//! Repositórios em memória para os testes.
//!
//! Reproduzem as constraints de unicidade das migrações, para que os
//! serviços tratem "já existe" exatamente como no Postgres.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        CustomerRepository, LeadOptionRepository, StaffRepository, UserRepository,
    },
    models::{
        auth::{Role, RoleScope, User},
        customer::{
            Customer, CustomerChanges, CustomerStatusAction, CustomerStatusCounts, NewCustomer,
            RecordStatus,
        },
        lead_option::LeadOption,
        staff::{NewStaff, Page, Staff, StaffChanges, StaffStatusPayload},
    },
};

// =============================================================================
//  USERS
// =============================================================================

#[derive(Default)]
pub struct MemoryUserRepository {
    rows: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.rows.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.rows.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        full_name: Option<&str>,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|u| u.email == email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: full_name.map(str::to_owned),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }
}

// =============================================================================
//  CUSTOMERS
// =============================================================================

#[derive(Default)]
pub struct MemoryCustomerRepository {
    rows: RwLock<Vec<Customer>>,
}

impl MemoryCustomerRepository {
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

fn set_if<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

fn set_opt_if<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        *target = value.clone();
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn create_customer(&self, new: &NewCustomer) -> Result<Customer, AppError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.email == new.email) {
            return Err(AppError::CustomerEmailExists);
        }

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            customer_code: new.customer_code.clone(),
            first_name: new.first_name.clone(),
            middle_name: new.middle_name.clone(),
            last_name: new.last_name.clone(),
            contact_number: new.contact_number.clone(),
            email: new.email.clone(),
            address_line: new.address_line.clone(),
            city: new.city.clone(),
            state: new.state.clone(),
            pincode: new.pincode.clone(),
            country: new.country.clone(),
            status: RecordStatus::Active,
            is_blacklisted: false,
            id_proof_url: new.id_proof_url.clone(),
            address_proof_url: new.address_proof_url.clone(),
            id_proof_public_id: new.id_proof_public_id.clone(),
            address_proof_public_id: new.address_proof_public_id.clone(),
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        rows.push(customer.clone());
        Ok(customer)
    }

    async fn list_customers(&self, scope: RoleScope) -> Result<Vec<Customer>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|c| scope.allows(c.created_by))
            .cloned()
            .collect())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Customer>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|c| c.customer_code == code).cloned())
    }

    async fn update_customer(
        &self,
        code: &str,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>, AppError> {
        let mut rows = self.rows.write().await;

        if let Some(email) = &changes.email {
            if rows.iter().any(|c| &c.email == email && c.customer_code != code) {
                return Err(AppError::CustomerEmailExists);
            }
        }

        let Some(c) = rows.iter_mut().find(|c| c.customer_code == code) else {
            return Ok(None);
        };

        set_if(&mut c.first_name, &changes.first_name);
        set_opt_if(&mut c.middle_name, &changes.middle_name);
        set_if(&mut c.last_name, &changes.last_name);
        set_if(&mut c.contact_number, &changes.contact_number);
        set_if(&mut c.email, &changes.email);
        set_if(&mut c.address_line, &changes.address_line);
        set_if(&mut c.city, &changes.city);
        set_if(&mut c.state, &changes.state);
        set_if(&mut c.pincode, &changes.pincode);
        set_opt_if(&mut c.country, &changes.country);
        set_opt_if(&mut c.id_proof_url, &changes.id_proof_url);
        set_opt_if(&mut c.address_proof_url, &changes.address_proof_url);
        set_opt_if(&mut c.id_proof_public_id, &changes.id_proof_public_id);
        set_opt_if(&mut c.address_proof_public_id, &changes.address_proof_public_id);
        c.updated_at = Utc::now();

        Ok(Some(c.clone()))
    }

    async fn delete_customer(&self, code: &str) -> Result<Option<Customer>, AppError> {
        let mut rows = self.rows.write().await;
        let Some(pos) = rows.iter().position(|c| c.customer_code == code) else {
            return Ok(None);
        };
        Ok(Some(rows.remove(pos)))
    }

    async fn status_counts(&self, scope: RoleScope) -> Result<CustomerStatusCounts, AppError> {
        let rows = self.rows.read().await;
        let visible: Vec<_> = rows.iter().filter(|c| scope.allows(c.created_by)).collect();
        Ok(CustomerStatusCounts {
            total: visible.len() as i64,
            active: visible.iter().filter(|c| c.status == RecordStatus::Active).count() as i64,
            blacklisted: visible.iter().filter(|c| c.is_blacklisted).count() as i64,
        })
    }

    async fn apply_status(
        &self,
        code: &str,
        action: CustomerStatusAction,
    ) -> Result<Option<Customer>, AppError> {
        let mut rows = self.rows.write().await;
        let Some(c) = rows.iter_mut().find(|c| c.customer_code == code) else {
            return Ok(None);
        };

        match action {
            CustomerStatusAction::Active => {
                c.status = RecordStatus::Active;
                c.is_blacklisted = false;
            }
            CustomerStatusAction::Inactive => c.status = RecordStatus::Inactive,
            CustomerStatusAction::Blacklisted => c.is_blacklisted = true,
        }
        c.updated_at = Utc::now();

        Ok(Some(c.clone()))
    }
}

// =============================================================================
//  STAFF
// =============================================================================

#[derive(Default)]
pub struct MemoryStaffRepository {
    rows: RwLock<Vec<Staff>>,
}

impl MemoryStaffRepository {
    /// Inclui as linhas excluídas logicamente.
    pub async fn raw(&self, id: Uuid) -> Option<Staff> {
        self.rows.read().await.iter().find(|s| s.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

fn staff_conflict(
    rows: &[Staff],
    skip: Option<Uuid>,
    email: Option<&String>,
    contact: Option<&String>,
    id_proof: Option<&String>,
) -> Option<AppError> {
    let others = || rows.iter().filter(move |s| Some(s.id) != skip);
    let field = if email.is_some_and(|e| others().any(|s| &s.email == e)) {
        "email"
    } else if contact.is_some_and(|c| others().any(|s| &s.contact_number == c)) {
        "contact number"
    } else if id_proof.is_some_and(|p| others().any(|s| &s.id_proof_number == p)) {
        "ID proof number"
    } else {
        return None;
    };
    Some(AppError::UniqueConstraintViolation(format!(
        "Staff with this {} already exists",
        field
    )))
}

fn matches_search(staff: &Staff, term: &str) -> bool {
    let term = term.to_lowercase();
    [
        &staff.first_name,
        &staff.last_name,
        &staff.email,
        &staff.contact_number,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

#[async_trait]
impl StaffRepository for MemoryStaffRepository {
    async fn create_staff(&self, new: &NewStaff) -> Result<Staff, AppError> {
        let mut rows = self.rows.write().await;
        if let Some(err) = staff_conflict(
            &rows,
            None,
            Some(&new.email),
            Some(&new.contact_number),
            Some(&new.id_proof_number),
        ) {
            return Err(err);
        }

        let now = Utc::now();
        let staff = Staff {
            id: Uuid::new_v4(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            email: new.email.clone(),
            contact_number: new.contact_number.clone(),
            id_proof_number: new.id_proof_number.clone(),
            designation: new.designation.clone(),
            address: Json(new.address.clone()),
            documents: Json(new.documents.clone()),
            is_blacklisted: false,
            is_available: true,
            is_deactivated: false,
            is_deleted: false,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        };
        rows.push(staff.clone());
        Ok(staff)
    }

    async fn list_staff(
        &self,
        page: Page,
        search: Option<&str>,
    ) -> Result<(Vec<Staff>, i64), AppError> {
        let rows = self.rows.read().await;
        let matching: Vec<Staff> = rows
            .iter()
            .rev()
            .filter(|s| !s.is_deleted)
            .filter(|s| search.is_none_or(|term| matches_search(s, term)))
            .cloned()
            .collect();

        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();

        Ok((data, total))
    }

    async fn find_active(&self, id: Uuid) -> Result<Option<Staff>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|s| s.id == id && !s.is_deleted).cloned())
    }

    async fn list_all_active(&self) -> Result<Vec<Staff>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().rev().filter(|s| !s.is_deleted).cloned().collect())
    }

    async fn update_staff(
        &self,
        id: Uuid,
        changes: &StaffChanges,
    ) -> Result<Option<Staff>, AppError> {
        let mut rows = self.rows.write().await;
        if let Some(err) = staff_conflict(
            &rows,
            Some(id),
            changes.email.as_ref(),
            changes.contact_number.as_ref(),
            changes.id_proof_number.as_ref(),
        ) {
            return Err(err);
        }

        let Some(s) = rows.iter_mut().find(|s| s.id == id && !s.is_deleted) else {
            return Ok(None);
        };

        set_if(&mut s.first_name, &changes.first_name);
        set_if(&mut s.last_name, &changes.last_name);
        set_if(&mut s.email, &changes.email);
        set_if(&mut s.contact_number, &changes.contact_number);
        set_if(&mut s.id_proof_number, &changes.id_proof_number);
        set_opt_if(&mut s.designation, &changes.designation);
        if let Some(address) = &changes.address {
            s.address = Json(address.clone());
        }
        if let Some(documents) = &changes.documents {
            s.documents = Json(documents.clone());
        }
        s.updated_at = Utc::now();

        Ok(Some(s.clone()))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: &StaffStatusPayload,
    ) -> Result<Option<Staff>, AppError> {
        let mut rows = self.rows.write().await;
        let Some(s) = rows.iter_mut().find(|s| s.id == id && !s.is_deleted) else {
            return Ok(None);
        };

        set_if(&mut s.is_blacklisted, &status.is_blacklisted);
        set_if(&mut s.is_available, &status.is_available);
        set_if(&mut s.is_deactivated, &status.is_deactivated);
        set_if(&mut s.status, &status.status);
        s.updated_at = Utc::now();

        Ok(Some(s.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Option<Staff>, AppError> {
        let mut rows = self.rows.write().await;
        let Some(s) = rows.iter_mut().find(|s| s.id == id && !s.is_deleted) else {
            return Ok(None);
        };

        s.is_deleted = true;
        s.status = RecordStatus::Inactive;
        s.updated_at = Utc::now();

        Ok(Some(s.clone()))
    }
}

// =============================================================================
//  LEAD OPTIONS
// =============================================================================

#[derive(Default)]
pub struct MemoryLeadOptionRepository {
    rows: RwLock<Vec<LeadOption>>,
    /// Quantas chamadas de exclusão chegaram ao "banco"
    pub delete_calls: RwLock<usize>,
}

#[async_trait]
impl LeadOptionRepository for MemoryLeadOptionRepository {
    async fn create_option(&self, field_name: &str, value: &str) -> Result<LeadOption, AppError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|o| o.field_name == field_name && o.value == value) {
            return Err(AppError::LeadOptionExists);
        }

        let now = Utc::now();
        let option = LeadOption {
            id: Uuid::new_v4(),
            field_name: field_name.to_string(),
            value: value.to_string(),
            created_at: now,
            updated_at: now,
        };
        rows.push(option.clone());
        Ok(option)
    }

    async fn list_options(&self) -> Result<Vec<LeadOption>, AppError> {
        let mut options = self.rows.read().await.clone();
        options.sort_by(|a, b| (&a.field_name, &a.value).cmp(&(&b.field_name, &b.value)));
        Ok(options)
    }

    async fn list_by_field(&self, field_name: &str) -> Result<Vec<LeadOption>, AppError> {
        let wanted = field_name.to_lowercase();
        let mut options: Vec<_> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|o| o.field_name.to_lowercase() == wanted)
            .cloned()
            .collect();
        options.sort_by(|a, b| a.value.cmp(&b.value));
        Ok(options)
    }

    async fn update_option(
        &self,
        id: Uuid,
        field_name: &str,
        value: &str,
    ) -> Result<Option<LeadOption>, AppError> {
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|o| o.id != id && o.field_name == field_name && o.value == value)
        {
            return Err(AppError::LeadOptionExists);
        }

        let Some(o) = rows.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        o.field_name = field_name.to_string();
        o.value = value.to_string();
        o.updated_at = Utc::now();

        Ok(Some(o.clone()))
    }

    async fn delete_option(&self, id: Uuid) -> Result<bool, AppError> {
        *self.delete_calls.write().await += 1;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|o| o.id != id);
        Ok(rows.len() < before)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        *self.delete_calls.write().await += 1;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|o| !ids.contains(&o.id));
        Ok((before - rows.len()) as u64)
    }
}
