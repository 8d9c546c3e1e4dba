// src/services/lead_option_service.rs

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::LeadOptionRepository,
    models::lead_option::{DeleteManyResponse, LeadOption, LeadOptionPayload},
};

#[derive(Clone)]
pub struct LeadOptionService {
    repo: Arc<dyn LeadOptionRepository>,
}

/// Valida e remove espaços das pontas. Só espaços conta como vazio.
fn normalize(payload: LeadOptionPayload) -> Result<(String, String), AppError> {
    let payload = LeadOptionPayload {
        field_name: payload.field_name.trim().to_string(),
        value: payload.value.trim().to_string(),
    };
    payload.validate()?;

    Ok((payload.field_name, payload.value))
}

/// `ids` precisa ser um array não vazio de UUIDs. Qualquer outra coisa é 400.
fn parse_ids(ids: Option<Value>) -> Result<Vec<Uuid>, AppError> {
    let Some(Value::Array(items)) = ids else {
        return Err(AppError::BadRequest("ids must be a non-empty array".into()));
    };
    if items.is_empty() {
        return Err(AppError::BadRequest("ids must be a non-empty array".into()));
    }

    items
        .iter()
        .map(|item| {
            item.as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(|| AppError::BadRequest(format!("Invalid id: {}", item)))
        })
        .collect()
}

impl LeadOptionService {
    pub fn new(repo: Arc<dyn LeadOptionRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_option(&self, payload: LeadOptionPayload) -> Result<LeadOption, AppError> {
        let (field_name, value) = normalize(payload)?;
        self.repo.create_option(&field_name, &value).await
    }

    pub async fn list_all(&self) -> Result<Vec<LeadOption>, AppError> {
        self.repo.list_options().await
    }

    pub async fn list_by_field(&self, field_name: &str) -> Result<Vec<LeadOption>, AppError> {
        self.repo.list_by_field(field_name.trim()).await
    }

    pub async fn update_option(
        &self,
        id: Uuid,
        payload: LeadOptionPayload,
    ) -> Result<LeadOption, AppError> {
        let (field_name, value) = normalize(payload)?;
        self.repo
            .update_option(id, &field_name, &value)
            .await?
            .ok_or(AppError::NotFound("Option"))
    }

    pub async fn delete_option(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_option(id).await? {
            return Err(AppError::NotFound("Option"));
        }
        Ok(())
    }

    pub async fn delete_many(&self, ids: Option<Value>) -> Result<DeleteManyResponse, AppError> {
        let ids = parse_ids(ids)?;
        let deleted_count = self.repo.delete_many(&ids).await?;

        tracing::info!("🧹 {} opções de lead removidas", deleted_count);
        Ok(DeleteManyResponse { deleted_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryLeadOptionRepository;
    use serde_json::json;

    fn payload(field_name: &str, value: &str) -> LeadOptionPayload {
        LeadOptionPayload {
            field_name: field_name.into(),
            value: value.into(),
        }
    }

    fn service() -> (LeadOptionService, Arc<MemoryLeadOptionRepository>) {
        let repo = Arc::new(MemoryLeadOptionRepository::default());
        (LeadOptionService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn same_pair_twice_is_rejected() {
        let (service, _) = service();
        service.create_option(payload("City", "Pune")).await.unwrap();

        let err = service.create_option(payload(" City ", "Pune ")).await.unwrap_err();
        assert!(matches!(err, AppError::LeadOptionExists));

        let cities = service.list_by_field("city").await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].value, "Pune");
    }

    #[tokio::test]
    async fn same_value_under_other_field_is_allowed() {
        let (service, _) = service();
        service.create_option(payload("City", "Pune")).await.unwrap();
        service.create_option(payload("Branch", "Pune")).await.unwrap();
        assert_eq!(service.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn blank_values_fail_validation() {
        let (service, _) = service();
        assert!(matches!(
            service.create_option(payload("City", "   ")).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_are_not_found() {
        let (service, _) = service();
        let id = Uuid::new_v4();
        assert!(matches!(
            service.update_option(id, payload("City", "Pune")).await,
            Err(AppError::NotFound("Option"))
        ));
        assert!(matches!(service.delete_option(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_many_rejects_bad_input_without_touching_storage() {
        let (service, repo) = service();

        for ids in [None, Some(json!([])), Some(json!("abc")), Some(json!(["not-a-uuid"]))] {
            assert!(matches!(service.delete_many(ids).await, Err(AppError::BadRequest(_))));
        }
        assert_eq!(*repo.delete_calls.read().await, 0);
    }

    #[tokio::test]
    async fn delete_many_reports_count() {
        let (service, _) = service();
        let a = service.create_option(payload("City", "Pune")).await.unwrap();
        let b = service.create_option(payload("City", "Nagpur")).await.unwrap();
        service.create_option(payload("City", "Nashik")).await.unwrap();

        let result = service
            .delete_many(Some(json!([a.id, b.id, Uuid::new_v4()])))
            .await
            .unwrap();
        assert_eq!(result.deleted_count, 2);
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }
}
