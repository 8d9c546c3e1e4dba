// src/services/customer_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    common::{
        error::AppError,
        multipart::{blank_fields, clean, missing_fields, UploadedFile},
    },
    db::CustomerRepository,
    models::{
        auth::RoleScope,
        customer::{
            Customer, CustomerChanges, CustomerForm, CustomerStatusAction, CustomerStatusCounts,
            NewCustomer,
        },
        notification::NotificationReceipt,
    },
    services::{
        media::{purge_quietly, MediaStore},
        notification_service::NotificationService,
    },
};

const UPLOAD_FOLDER: &str = "customers";

#[derive(Clone)]
pub struct CustomerService {
    repo: Arc<dyn CustomerRepository>,
    media: Arc<dyn MediaStore>,
    notifications: NotificationService,
}

/// Erro de validação no mesmo formato do `#[derive(Validate)]`.
pub(crate) fn validation_error(field: &'static str, code: &'static str, message: &str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.to_string().into());
    errors.add(field, error);
    AppError::ValidationError(errors)
}

fn check_email(email: &str) -> Result<(), AppError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(validation_error("email", "email", "The email address is invalid."))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_customer_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("CUST-{}", id[..8].to_uppercase())
}

/// Nome do arquivo a partir do fim da URL.
fn file_name_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("document")
        .to_string()
}

impl CustomerService {
    pub fn new(
        repo: Arc<dyn CustomerRepository>,
        media: Arc<dyn MediaStore>,
        notifications: NotificationService,
    ) -> Self {
        Self { repo, media, notifications }
    }

    /// Envia os arquivos presentes. Se um falhar, os anteriores são apagados.
    async fn upload_all(
        &self,
        files: [Option<&UploadedFile>; 2],
    ) -> Result<[Option<(String, String)>; 2], AppError> {
        let mut uploaded: [Option<(String, String)>; 2] = [None, None];

        for (slot, file) in files.into_iter().enumerate() {
            let Some(file) = file else { continue };
            match self.media.upload(file, UPLOAD_FOLDER).await {
                Ok(doc) => uploaded[slot] = Some((doc.url, doc.public_id)),
                Err(e) => {
                    let done: Vec<&str> = uploaded
                        .iter()
                        .flatten()
                        .map(|(_, id)| id.as_str())
                        .collect();
                    purge_quietly(self.media.as_ref(), &done).await;
                    return Err(e);
                }
            }
        }

        Ok(uploaded)
    }

    async fn discard(&self, uploaded: &[Option<(String, String)>; 2]) {
        let ids: Vec<&str> = uploaded.iter().flatten().map(|(_, id)| id.as_str()).collect();
        if !ids.is_empty() {
            purge_quietly(self.media.as_ref(), &ids).await;
        }
    }

    pub async fn create_customer(
        &self,
        form: CustomerForm,
        id_proof: Option<UploadedFile>,
        address_proof: Option<UploadedFile>,
        created_by: Option<Uuid>,
    ) -> Result<Customer, AppError> {
        // 1. Campos obrigatórios, antes de qualquer upload
        let missing = missing_fields(&[
            ("firstName", &form.first_name),
            ("lastName", &form.last_name),
            ("contactNumber", &form.contact_number),
            ("email", &form.email),
            ("addressLine", &form.address_line),
            ("city", &form.city),
            ("state", &form.state),
            ("pincode", &form.pincode),
        ]);
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let email = normalize_email(form.email.as_deref().unwrap_or_default());
        check_email(&email)?;

        // 2. Uploads
        let uploaded = self
            .upload_all([id_proof.as_ref(), address_proof.as_ref()])
            .await?;
        let [id_proof_doc, address_proof_doc] = &uploaded;

        let new_customer = NewCustomer {
            customer_code: new_customer_code(),
            first_name: clean(form.first_name).unwrap_or_default(),
            middle_name: clean(form.middle_name),
            last_name: clean(form.last_name).unwrap_or_default(),
            contact_number: clean(form.contact_number).unwrap_or_default(),
            email,
            address_line: clean(form.address_line).unwrap_or_default(),
            city: clean(form.city).unwrap_or_default(),
            state: clean(form.state).unwrap_or_default(),
            pincode: clean(form.pincode).unwrap_or_default(),
            country: clean(form.country),
            id_proof_url: id_proof_doc.as_ref().map(|(url, _)| url.clone()),
            address_proof_url: address_proof_doc.as_ref().map(|(url, _)| url.clone()),
            id_proof_public_id: id_proof_doc.as_ref().map(|(_, id)| id.clone()),
            address_proof_public_id: address_proof_doc.as_ref().map(|(_, id)| id.clone()),
            created_by,
        };

        // 3. Persistência: a constraint do banco decide se o e-mail já existe
        match self.repo.create_customer(&new_customer).await {
            Ok(customer) => {
                tracing::info!("🧾 Cliente {} criado", customer.customer_code);
                Ok(customer)
            }
            Err(e) => {
                self.discard(&uploaded).await;
                Err(e)
            }
        }
    }

    pub async fn list_customers(&self, scope: RoleScope) -> Result<Vec<Customer>, AppError> {
        self.repo.list_customers(scope).await
    }

    /// Fora do escopo do chamador conta como inexistente.
    pub async fn get_customer(&self, code: &str, scope: RoleScope) -> Result<Customer, AppError> {
        self.repo
            .find_by_code(code)
            .await?
            .filter(|c| scope.allows(c.created_by))
            .ok_or(AppError::NotFound("Customer"))
    }

    pub async fn update_customer(
        &self,
        code: &str,
        scope: RoleScope,
        form: CustomerForm,
        id_proof: Option<UploadedFile>,
        address_proof: Option<UploadedFile>,
    ) -> Result<Customer, AppError> {
        // Campo obrigatório enviado em branco é erro; ausente mantém o valor
        let blank = blank_fields(&[
            ("firstName", &form.first_name),
            ("lastName", &form.last_name),
            ("contactNumber", &form.contact_number),
            ("email", &form.email),
            ("addressLine", &form.address_line),
            ("city", &form.city),
            ("state", &form.state),
            ("pincode", &form.pincode),
        ]);
        if !blank.is_empty() {
            return Err(AppError::MissingFields(blank));
        }

        let email = clean(form.email).map(|e| normalize_email(&e));
        if let Some(email) = &email {
            check_email(email)?;
        }

        // 404 antes de mandar qualquer arquivo
        let existing = self.get_customer(code, scope).await?;

        let uploaded = self
            .upload_all([id_proof.as_ref(), address_proof.as_ref()])
            .await?;
        let [id_proof_doc, address_proof_doc] = &uploaded;

        // Arquivo enviado tem precedência sobre o caminho vindo no corpo
        let changes = CustomerChanges {
            first_name: clean(form.first_name),
            middle_name: clean(form.middle_name),
            last_name: clean(form.last_name),
            contact_number: clean(form.contact_number),
            email,
            address_line: clean(form.address_line),
            city: clean(form.city),
            state: clean(form.state),
            pincode: clean(form.pincode),
            country: clean(form.country),
            id_proof_url: id_proof_doc
                .as_ref()
                .map(|(url, _)| url.clone())
                .or(clean(form.id_proof_url)),
            address_proof_url: address_proof_doc
                .as_ref()
                .map(|(url, _)| url.clone())
                .or(clean(form.address_proof_url)),
            id_proof_public_id: id_proof_doc.as_ref().map(|(_, id)| id.clone()),
            address_proof_public_id: address_proof_doc.as_ref().map(|(_, id)| id.clone()),
        };

        match self.repo.update_customer(code, &changes).await {
            Ok(Some(customer)) => {
                // Só depois de gravado: o arquivo substituído sai do storage
                let replaced: Vec<&str> = [
                    (id_proof_doc, &existing.id_proof_public_id),
                    (address_proof_doc, &existing.address_proof_public_id),
                ]
                .into_iter()
                .filter(|(new_doc, _)| new_doc.is_some())
                .filter_map(|(_, old_id)| old_id.as_deref())
                .collect();
                if !replaced.is_empty() {
                    purge_quietly(self.media.as_ref(), &replaced).await;
                }
                Ok(customer)
            }
            Ok(None) => {
                self.discard(&uploaded).await;
                Err(AppError::NotFound("Customer"))
            }
            Err(e) => {
                self.discard(&uploaded).await;
                Err(e)
            }
        }
    }

    /// Exclusão física + limpeza dos arquivos no storage.
    pub async fn delete_customer(&self, code: &str, scope: RoleScope) -> Result<(), AppError> {
        self.get_customer(code, scope).await?;
        let customer = self
            .repo
            .delete_customer(code)
            .await?
            .ok_or(AppError::NotFound("Customer"))?;

        let ids = customer.public_ids();
        if !ids.is_empty() {
            purge_quietly(self.media.as_ref(), &ids).await;
        }
        tracing::info!("🗑️ Cliente {} excluído", code);
        Ok(())
    }

    pub async fn status_counts(&self, scope: RoleScope) -> Result<CustomerStatusCounts, AppError> {
        self.repo.status_counts(scope).await
    }

    pub async fn set_status(
        &self,
        code: &str,
        scope: RoleScope,
        action: CustomerStatusAction,
    ) -> Result<Customer, AppError> {
        self.get_customer(code, scope).await?;
        self.repo
            .apply_status(code, action)
            .await?
            .ok_or(AppError::NotFound("Customer"))
    }

    /// Envia o documento do cliente pelo WhatsApp (nome completo no corpo do template).
    pub async fn notify_customer(
        &self,
        code: &str,
        scope: RoleScope,
    ) -> Result<NotificationReceipt, AppError> {
        let customer = self.get_customer(code, scope).await?;

        let document_url = customer
            .id_proof_url
            .clone()
            .or_else(|| customer.address_proof_url.clone())
            .ok_or_else(|| AppError::BadRequest("Customer has no uploaded document".into()))?;

        self.notifications
            .send_document(
                &customer.contact_number,
                &document_url,
                &file_name_from_url(&document_url),
                vec![customer.full_name()],
                None,
            )
            .await
    }
}
