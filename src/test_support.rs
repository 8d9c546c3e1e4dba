// src/test_support.rs

//! Aplicação montada sobre os backends em memória, para os testes.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{body::Bytes, Router};
use uuid::Uuid;

use crate::{
    config::{AppState, Backends, CloudinaryConfig, Config, WhatsAppConfig},
    db::{
        memory::{
            MemoryCustomerRepository, MemoryLeadOptionRepository, MemoryStaffRepository,
            MemoryUserRepository,
        },
        UserRepository,
    },
    models::{
        auth::{Role, User},
        customer::CustomerForm,
        staff::StaffForm,
    },
    common::multipart::UploadedFile,
    routes,
    services::{
        media::memory::MemoryMediaStore, notification_service::memory::MemoryNotifier,
        staff_service::StaffUploads,
    },
};

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        jwt_secret: "test-secret".into(),
        server_addr: "127.0.0.1:0".into(),
        http_timeout: Duration::from_secs(5),
        // Pasta inexistente: PDF falha com FontNotFound
        fonts_dir: PathBuf::from("./missing-report-fonts"),
        cloudinary: CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
            folder: "courier".into(),
        },
        whatsapp: WhatsAppConfig {
            api_url: "https://graph.test/v19.0".into(),
            access_token: None,
            phone_number_id: None,
            template: "document_delivery".into(),
            language: "en".into(),
            default_country_code: "91".into(),
        },
        bootstrap_admin: None,
    }
}

pub struct TestApp {
    pub state: AppState,
    pub users: Arc<MemoryUserRepository>,
    pub customers: Arc<MemoryCustomerRepository>,
    pub staff: Arc<MemoryStaffRepository>,
    pub lead_options: Arc<MemoryLeadOptionRepository>,
    pub media: Arc<MemoryMediaStore>,
    pub notifier: Arc<MemoryNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepository::default());
        let customers = Arc::new(MemoryCustomerRepository::default());
        let staff = Arc::new(MemoryStaffRepository::default());
        let lead_options = Arc::new(MemoryLeadOptionRepository::default());
        let media = Arc::new(MemoryMediaStore::default());
        let notifier = Arc::new(MemoryNotifier::default());

        let state = AppState::from_backends(
            &test_config(),
            Backends {
                users: users.clone(),
                customers: customers.clone(),
                staff: staff.clone(),
                lead_options: lead_options.clone(),
                media: media.clone(),
                notifier: notifier.clone(),
            },
        );

        Self { state, users, customers, staff, lead_options, media, notifier }
    }

    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
    }

    /// Cria um usuário direto no repositório e devolve um token válido para ele.
    pub async fn login_as(&self, email: &str, role: Role) -> (User, String) {
        let user = self
            .users
            .create_user(email, None, "unused-hash", role)
            .await
            .unwrap();
        let token = self.state.auth_service.create_token(&user).unwrap();
        (user, token)
    }

    pub async fn admin_token(&self) -> String {
        self.login_as("admin@courier.in", Role::Admin).await.1
    }
}

pub fn customer_form(email: &str) -> CustomerForm {
    CustomerForm {
        first_name: Some("Asha".into()),
        last_name: Some("Patil".into()),
        contact_number: Some("9876543210".into()),
        email: Some(email.into()),
        address_line: Some("12 MG Road".into()),
        city: Some("Pune".into()),
        state: Some("Maharashtra".into()),
        pincode: Some("411001".into()),
        country: Some("India".into()),
        ..Default::default()
    }
}

pub fn staff_form(email: &str, contact_number: &str, id_proof_number: &str) -> StaffForm {
    StaffForm {
        first_name: Some("Rohan".into()),
        last_name: Some("Kale".into()),
        email: Some(email.into()),
        contact_number: Some(contact_number.into()),
        id_proof_number: Some(id_proof_number.into()),
        designation: Some("Delivery Executive".into()),
        address_line: Some("4 Station Road".into()),
        city: Some("Pune".into()),
        state: Some("Maharashtra".into()),
        pincode: Some("411002".into()),
    }
}

pub fn file(field: &str, content_type: &str, file_name: &str) -> UploadedFile {
    UploadedFile {
        field: field.into(),
        file_name: file_name.into(),
        content_type: content_type.into(),
        bytes: Bytes::from_static(b"%PDF-1.4 test document"),
    }
}

pub fn pdf(field: &str) -> UploadedFile {
    file(field, "application/pdf", &format!("{field}.pdf"))
}

pub fn staff_uploads() -> StaffUploads {
    StaffUploads {
        id_proof: Some(pdf("idProof")),
        address_proof: Some(pdf("addressProof")),
    }
}

/// Monta um corpo multipart/form-data à mão para os testes de rota.
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: format!("test-boundary-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// (content-type, corpo)
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
