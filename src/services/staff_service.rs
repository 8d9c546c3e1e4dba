// src/services/staff_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    common::{
        error::AppError,
        multipart::{blank_fields, clean, missing_fields, UploadedFile},
    },
    db::StaffRepository,
    models::{
        document::{DocumentDescriptor, DocumentKind},
        staff::{
            NewStaff, Page, Staff, StaffAddress, StaffChanges, StaffDocuments, StaffForm,
            StaffListQuery, StaffPage, StaffStatusPayload,
        },
    },
    services::{
        customer_service::validation_error,
        media::{purge_quietly, MediaStore},
    },
};

const UPLOAD_FOLDER: &str = "staff";

#[derive(Clone)]
pub struct StaffService {
    repo: Arc<dyn StaffRepository>,
    media: Arc<dyn MediaStore>,
}

/// Arquivos novos de um formulário de funcionário.
#[derive(Debug, Default)]
pub struct StaffUploads {
    pub id_proof: Option<UploadedFile>,
    pub address_proof: Option<UploadedFile>,
}

impl StaffUploads {
    fn get(&self, kind: DocumentKind) -> Option<&UploadedFile> {
        match kind {
            DocumentKind::IdProof => self.id_proof.as_ref(),
            DocumentKind::AddressProof => self.address_proof.as_ref(),
        }
    }
}

/// Identificadores dos documentos enviados neste pedido.
fn fresh_public_ids(documents: &StaffDocuments, uploads: &StaffUploads) -> Vec<String> {
    DocumentKind::ALL
        .into_iter()
        .filter(|kind| uploads.get(*kind).is_some())
        .map(|kind| match kind {
            DocumentKind::IdProof => documents.id_proof.public_id.clone(),
            DocumentKind::AddressProof => documents.address_proof.public_id.clone(),
        })
        .collect()
}

fn slot(documents: &mut StaffDocuments, kind: DocumentKind) -> &mut DocumentDescriptor {
    match kind {
        DocumentKind::IdProof => &mut documents.id_proof,
        DocumentKind::AddressProof => &mut documents.address_proof,
    }
}

impl StaffService {
    pub fn new(repo: Arc<dyn StaffRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { repo, media }
    }

    pub async fn create_staff(
        &self,
        form: StaffForm,
        uploads: StaffUploads,
    ) -> Result<Staff, AppError> {
        let missing = missing_fields(&[
            ("firstName", &form.first_name),
            ("lastName", &form.last_name),
            ("email", &form.email),
            ("contactNumber", &form.contact_number),
            ("idProofNumber", &form.id_proof_number),
            ("addressLine", &form.address_line),
            ("city", &form.city),
            ("state", &form.state),
            ("pincode", &form.pincode),
        ]);
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        // Os dois documentos são obrigatórios no cadastro
        let (Some(id_file), Some(address_file)) = (&uploads.id_proof, &uploads.address_proof)
        else {
            let kind = DocumentKind::ALL
                .into_iter()
                .find(|kind| uploads.get(*kind).is_none())
                .unwrap_or(DocumentKind::IdProof);
            return Err(AppError::MissingDocument(kind.field_name()));
        };

        let email = form.email.as_deref().unwrap_or_default().trim().to_lowercase();
        if !email.validate_email() {
            return Err(validation_error("email", "email", "The email address is invalid."));
        }

        // Sobe os dois; se o segundo falhar, o primeiro é apagado
        let id_proof = self.media.upload(id_file, UPLOAD_FOLDER).await?;
        let address_proof = match self.media.upload(address_file, UPLOAD_FOLDER).await {
            Ok(doc) => doc,
            Err(e) => {
                purge_quietly(self.media.as_ref(), &[&id_proof.public_id]).await;
                return Err(e);
            }
        };

        let new_staff = NewStaff {
            first_name: clean(form.first_name).unwrap_or_default(),
            last_name: clean(form.last_name).unwrap_or_default(),
            email,
            contact_number: clean(form.contact_number).unwrap_or_default(),
            id_proof_number: clean(form.id_proof_number).unwrap_or_default(),
            designation: clean(form.designation),
            address: StaffAddress {
                line: clean(form.address_line).unwrap_or_default(),
                city: clean(form.city).unwrap_or_default(),
                state: clean(form.state).unwrap_or_default(),
                pincode: clean(form.pincode).unwrap_or_default(),
            },
            documents: StaffDocuments { id_proof, address_proof },
        };

        // Duplicidade de email/contato/documento vem da constraint do banco (409)
        match self.repo.create_staff(&new_staff).await {
            Ok(staff) => {
                tracing::info!("🧑‍💼 Funcionário {} cadastrado", staff.id);
                Ok(staff)
            }
            Err(e) => {
                purge_quietly(self.media.as_ref(), &new_staff.documents.public_ids()).await;
                Err(e)
            }
        }
    }

    pub async fn list_staff(&self, query: StaffListQuery) -> Result<StaffPage, AppError> {
        let page = Page::from_query(query.page, query.limit);
        let search = clean(query.search);

        let (data, total) = self.repo.list_staff(page, search.as_deref()).await?;

        Ok(StaffPage::new(data, total, page))
    }

    pub async fn get_staff(&self, id: Uuid) -> Result<Staff, AppError> {
        self.repo
            .find_active(id)
            .await?
            .ok_or(AppError::NotFound("Staff"))
    }

    pub async fn update_staff(
        &self,
        id: Uuid,
        form: StaffForm,
        uploads: StaffUploads,
    ) -> Result<Staff, AppError> {
        let blank = blank_fields(&[
            ("firstName", &form.first_name),
            ("lastName", &form.last_name),
            ("email", &form.email),
            ("contactNumber", &form.contact_number),
            ("idProofNumber", &form.id_proof_number),
            ("addressLine", &form.address_line),
            ("city", &form.city),
            ("state", &form.state),
            ("pincode", &form.pincode),
        ]);
        if !blank.is_empty() {
            return Err(AppError::MissingFields(blank));
        }

        let email = clean(form.email).map(|e| e.to_lowercase());
        if email.as_deref().is_some_and(|e| !e.validate_email()) {
            return Err(validation_error("email", "email", "The email address is invalid."));
        }

        let existing = self.get_staff(id).await?;

        // Endereço: mescla só o que veio no formulário
        let address_sent = [&form.address_line, &form.city, &form.state, &form.pincode]
            .iter()
            .any(|v| v.is_some());
        let address = address_sent.then(|| {
            let current = &existing.address.0;
            StaffAddress {
                line: clean(form.address_line.clone()).unwrap_or_else(|| current.line.clone()),
                city: clean(form.city.clone()).unwrap_or_else(|| current.city.clone()),
                state: clean(form.state.clone()).unwrap_or_else(|| current.state.clone()),
                pincode: clean(form.pincode.clone()).unwrap_or_else(|| current.pincode.clone()),
            }
        });

        let documents = self.replace_documents(&existing, &uploads).await?;
        let fresh_ids: Vec<String> = documents
            .as_ref()
            .map(|docs| fresh_public_ids(docs, &uploads))
            .unwrap_or_default();

        let changes = StaffChanges {
            first_name: clean(form.first_name),
            last_name: clean(form.last_name),
            email,
            contact_number: clean(form.contact_number),
            id_proof_number: clean(form.id_proof_number),
            designation: clean(form.designation),
            address,
            documents,
        };

        // Sem rollback do arquivo antigo; os novos deste pedido são descartados
        let result = self
            .repo
            .update_staff(id, &changes)
            .await
            .and_then(|row| row.ok_or(AppError::NotFound("Staff")));
        if result.is_err() && !fresh_ids.is_empty() {
            let ids: Vec<&str> = fresh_ids.iter().map(String::as_str).collect();
            purge_quietly(self.media.as_ref(), &ids).await;
        }
        result
    }

    /// Envia todos os documentos novos antes de tocar nos antigos.
    /// Depois apaga cada antigo no provedor e devolve os descritores a gravar.
    async fn replace_documents(
        &self,
        existing: &Staff,
        uploads: &StaffUploads,
    ) -> Result<Option<StaffDocuments>, AppError> {
        let mut fresh: Vec<(DocumentKind, DocumentDescriptor)> = Vec::new();
        for kind in DocumentKind::ALL {
            let Some(file) = uploads.get(kind) else { continue };
            match self.media.upload(file, UPLOAD_FOLDER).await {
                Ok(doc) => fresh.push((kind, doc)),
                Err(e) => {
                    let ids: Vec<&str> = fresh.iter().map(|(_, d)| d.public_id.as_str()).collect();
                    purge_quietly(self.media.as_ref(), &ids).await;
                    return Err(e);
                }
            }
        }
        if fresh.is_empty() {
            return Ok(None);
        }

        let mut documents = existing.documents.0.clone();
        for (done, (kind, new_doc)) in fresh.iter().enumerate() {
            let old_doc = slot(&mut documents, *kind).clone();

            if let Err(e) = self.media.delete(&old_doc.public_id).await {
                let ids: Vec<&str> =
                    fresh[done..].iter().map(|(_, d)| d.public_id.as_str()).collect();
                purge_quietly(self.media.as_ref(), &ids).await;
                // O que já teve o antigo apagado precisa apontar para o novo
                if done > 0 {
                    self.persist_documents(existing.id, documents).await;
                }
                return Err(e);
            }
            tracing::info!(
                "🔁 Documento {} substituído: {} -> {}",
                kind.field_name(),
                old_doc.public_id,
                new_doc.public_id
            );

            *slot(&mut documents, *kind) = new_doc.clone();
        }

        Ok(Some(documents))
    }

    async fn persist_documents(&self, id: Uuid, documents: StaffDocuments) {
        let changes = StaffChanges {
            documents: Some(documents),
            ..Default::default()
        };
        if let Err(e) = self.repo.update_staff(id, &changes).await {
            tracing::warn!("Falha ao gravar documentos do funcionário {}: {}", id, e);
        }
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        payload: StaffStatusPayload,
    ) -> Result<Staff, AppError> {
        if payload.is_empty() {
            return Err(AppError::BadRequest("No status field to update".into()));
        }

        self.repo
            .update_status(id, &payload)
            .await?
            .ok_or(AppError::NotFound("Staff"))
    }

    /// Exclusão lógica + limpeza dos arquivos no storage.
    pub async fn delete_staff(&self, id: Uuid) -> Result<Staff, AppError> {
        let staff = self
            .repo
            .soft_delete(id)
            .await?
            .ok_or(AppError::NotFound("Staff"))?;

        purge_quietly(self.media.as_ref(), &staff.documents.public_ids()).await;
        tracing::info!("🗑️ Funcionário {} desativado (exclusão lógica)", id);

        Ok(staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::customer::RecordStatus,
        test_support::{file, pdf, staff_form, staff_uploads, TestApp},
    };

    #[tokio::test]
    async fn create_requires_both_documents() {
        let app = TestApp::new();
        let uploads = StaffUploads {
            id_proof: Some(pdf("idProof")),
            address_proof: None,
        };

        let err = app
            .state
            .staff_service
            .create_staff(staff_form("r1@courier.in", "9000000001", "ID-1"), uploads)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingDocument("addressProof")));
        assert_eq!(app.media.uploads().await, 0);
    }

    #[tokio::test]
    async fn duplicates_conflict_on_each_unique_field() {
        let app = TestApp::new();
        let service = &app.state.staff_service;
        service
            .create_staff(staff_form("r1@courier.in", "9000000001", "ID-1"), staff_uploads())
            .await
            .unwrap();

        let attempts = [
            staff_form("R1@courier.in", "9000000002", "ID-2"),
            staff_form("r2@courier.in", "9000000001", "ID-2"),
            staff_form("r2@courier.in", "9000000002", "ID-1"),
        ];
        for form in attempts {
            let err = service.create_staff(form, staff_uploads()).await.unwrap_err();
            assert!(matches!(err, AppError::UniqueConstraintViolation(_)), "{err:?}");
        }

        assert_eq!(app.staff.len().await, 1);
        // Só os dois documentos do cadastro válido continuam no storage
        assert_eq!(app.media.objects.read().await.len(), 2);
    }

    #[tokio::test]
    async fn replacing_a_document_deletes_the_old_remote_object() {
        let app = TestApp::new();
        let service = &app.state.staff_service;
        let staff = service
            .create_staff(staff_form("r1@courier.in", "9000000001", "ID-1"), staff_uploads())
            .await
            .unwrap();
        let old_id_proof = staff.documents.id_proof.public_id.clone();
        let old_address = staff.documents.address_proof.public_id.clone();

        let uploads = StaffUploads {
            id_proof: Some(file("idProof", "image/png", "scan.png")),
            address_proof: None,
        };
        let updated = service
            .update_staff(staff.id, StaffForm::default(), uploads)
            .await
            .unwrap();

        assert_ne!(updated.documents.id_proof.public_id, old_id_proof);
        assert_eq!(updated.documents.address_proof.public_id, old_address);
        assert!(!app.media.contains(&old_id_proof).await);
        assert!(app.media.contains(&updated.documents.id_proof.public_id).await);
        assert_eq!(*app.media.deleted.read().await, vec![old_id_proof]);
    }

    #[tokio::test]
    async fn failed_second_upload_keeps_old_documents() {
        let app = TestApp::new();
        let service = &app.state.staff_service;
        let staff = service
            .create_staff(staff_form("r1@courier.in", "9000000001", "ID-1"), staff_uploads())
            .await
            .unwrap();
        let old_ids = staff.documents.public_ids().map(String::from);

        // Uploads 1 e 2 foram do cadastro; o 4º é o addressProof novo
        app.media.fail_on_upload(4).await;
        let err = service
            .update_staff(staff.id, StaffForm::default(), staff_uploads())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MediaStore(_)));

        let row = service.get_staff(staff.id).await.unwrap();
        assert_eq!(row.documents.public_ids().map(String::from), old_ids);
        for id in &old_ids {
            assert!(app.media.contains(id).await, "{id} should still exist");
        }
        // O idProof novo foi descartado
        assert_eq!(app.media.objects.read().await.len(), 2);
        assert!(app.media.deleted.read().await.iter().all(|id| !old_ids.contains(id)));
    }

    #[tokio::test]
    async fn conflicting_update_discards_new_upload() {
        let app = TestApp::new();
        let service = &app.state.staff_service;
        service
            .create_staff(staff_form("a@courier.in", "9000000001", "ID-1"), staff_uploads())
            .await
            .unwrap();
        let b = service
            .create_staff(staff_form("b@courier.in", "9000000002", "ID-2"), staff_uploads())
            .await
            .unwrap();

        let form = StaffForm {
            email: Some("a@courier.in".into()),
            ..Default::default()
        };
        let uploads = StaffUploads {
            id_proof: Some(pdf("idProof")),
            address_proof: None,
        };
        let err = service.update_staff(b.id, form, uploads).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConstraintViolation(_)), "{err:?}");

        // A: 2 objetos; B: só o addressProof (o idProof antigo já tinha saído)
        let objects = app.media.objects.read().await;
        assert_eq!(objects.len(), 3);
        assert!(objects.contains_key(&b.documents.address_proof.public_id));
    }

    #[tokio::test]
    async fn update_conflicts_on_each_unique_field() {
        let app = TestApp::new();
        let service = &app.state.staff_service;
        service
            .create_staff(staff_form("a@courier.in", "9000000001", "ID-1"), staff_uploads())
            .await
            .unwrap();
        let b = service
            .create_staff(staff_form("b@courier.in", "9000000002", "ID-2"), staff_uploads())
            .await
            .unwrap();

        let attempts = [
            StaffForm { email: Some("A@courier.in".into()), ..Default::default() },
            StaffForm { contact_number: Some("9000000001".into()), ..Default::default() },
            StaffForm { id_proof_number: Some("ID-1".into()), ..Default::default() },
        ];
        for form in attempts {
            let err = service
                .update_staff(b.id, form, StaffUploads::default())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::UniqueConstraintViolation(_)), "{err:?}");
        }

        let row = service.get_staff(b.id).await.unwrap();
        assert_eq!(row.email, "b@courier.in");
        assert_eq!(row.id_proof_number, "ID-2");
    }

    #[tokio::test]
    async fn update_merges_partial_address() {
        let app = TestApp::new();
        let service = &app.state.staff_service;
        let staff = service
            .create_staff(staff_form("r1@courier.in", "9000000001", "ID-1"), staff_uploads())
            .await
            .unwrap();

        let form = StaffForm {
            city: Some("Nashik".into()),
            designation: Some("Hub Supervisor".into()),
            ..Default::default()
        };
        let updated = service
            .update_staff(staff.id, form, StaffUploads::default())
            .await
            .unwrap();

        assert_eq!(updated.address.city, "Nashik");
        assert_eq!(updated.address.line, staff.address.line);
        assert_eq!(updated.designation.as_deref(), Some("Hub Supervisor"));
        assert_eq!(app.media.uploads().await, 2);
    }

    #[tokio::test]
    async fn delete_is_soft_and_purges_documents() {
        let app = TestApp::new();
        let service = &app.state.staff_service;
        let staff = service
            .create_staff(staff_form("r1@courier.in", "9000000001", "ID-1"), staff_uploads())
            .await
            .unwrap();

        service.delete_staff(staff.id).await.unwrap();

        let row = app.staff.raw(staff.id).await.expect("row must still exist");
        assert!(row.is_deleted);
        assert_eq!(row.status, RecordStatus::Inactive);
        assert!(app.media.objects.read().await.is_empty());

        assert!(matches!(service.get_staff(staff.id).await, Err(AppError::NotFound("Staff"))));
        assert!(matches!(service.delete_staff(staff.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn status_update_requires_a_field() {
        let app = TestApp::new();
        let service = &app.state.staff_service;
        let staff = service
            .create_staff(staff_form("r1@courier.in", "9000000001", "ID-1"), staff_uploads())
            .await
            .unwrap();

        assert!(matches!(
            service.update_status(staff.id, StaffStatusPayload::default()).await,
            Err(AppError::BadRequest(_))
        ));

        let updated = service
            .update_status(
                staff.id,
                StaffStatusPayload {
                    is_available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_available);
        assert!(!updated.is_blacklisted);
    }

    #[tokio::test]
    async fn search_is_or_across_fields_and_case_insensitive() {
        let app = TestApp::new();
        let service = &app.state.staff_service;

        let mut form = staff_form("ravi@courier.in", "9000000001", "ID-1");
        form.first_name = Some("Ravi".into());
        service.create_staff(form, staff_uploads()).await.unwrap();

        let mut form = staff_form("meena@courier.in", "9811100000", "ID-2");
        form.last_name = Some("Raval".into());
        service.create_staff(form, staff_uploads()).await.unwrap();

        service
            .create_staff(staff_form("zed@courier.in", "9000000003", "ID-3"), staff_uploads())
            .await
            .unwrap();

        let by_name = service
            .list_staff(StaffListQuery {
                search: Some("RAV".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.total, 2);

        let by_contact = service
            .list_staff(StaffListQuery {
                search: Some("98111".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_contact.total, 1);
        assert_eq!(by_contact.data[0].email, "meena@courier.in");
    }

    #[tokio::test]
    async fn list_paginates_and_hides_deleted() {
        let app = TestApp::new();
        let service = &app.state.staff_service;

        let mut ids = Vec::new();
        for i in 0..5 {
            let staff = service
                .create_staff(
                    staff_form(&format!("r{i}@courier.in"), &format!("900000000{i}"), &format!("ID-{i}")),
                    staff_uploads(),
                )
                .await
                .unwrap();
            ids.push(staff.id);
        }
        service.delete_staff(ids[0]).await.unwrap();

        let page = service
            .list_staff(StaffListQuery {
                page: Some(2),
                limit: Some(3),
                search: None,
            })
            .await
            .unwrap();

        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, ids[1]);
    }
}
