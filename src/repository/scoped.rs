use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::config;
use crate::repository::error::RepositoryError;
use crate::repository::store::RecordStore;
use crate::tenant::{assert_tenant_access, attach_tenant_scope, TenantError, TenantScoped};
use crate::types::{Operation, Payload, ORGANIZATION_ID_FIELD};

/// Fields only the repository may write
pub const SYSTEM_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositorySettings {
    /// Report cross-tenant rows as missing instead of forbidden
    pub conceal_mismatch: bool,
}

impl RepositorySettings {
    pub fn from_config() -> Self {
        Self {
            conceal_mismatch: config().repository.conceal_mismatch,
        }
    }
}

/// Entity access with the tenant guard applied at every boundary:
/// writes are stamped with the acting tenant, reads and mutations are
/// checked against it, and listings only return what the principal may see.
pub struct ScopedRepository<S> {
    entity: String,
    store: Arc<S>,
    settings: RepositorySettings,
}

impl<S: RecordStore> ScopedRepository<S> {
    pub fn new(entity: impl Into<String>, store: Arc<S>) -> Self {
        Self::with_settings(entity, store, RepositorySettings::from_config())
    }

    pub fn with_settings(
        entity: impl Into<String>,
        store: Arc<S>,
        settings: RepositorySettings,
    ) -> Self {
        Self {
            entity: entity.into(),
            store,
            settings,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub async fn create<P>(
        &self,
        principal: &P,
        payload: Payload,
    ) -> Result<Payload, RepositoryError>
    where
        P: TenantScoped + ?Sized + Sync,
    {
        reject_system_fields(&payload)?;

        let mut record = attach_tenant_scope(&payload, principal);
        if let Err(err) = assert_tenant_access(principal, &record, None) {
            self.log_denied(Operation::Create, None, &err);
            return Err(err.into());
        }

        let id = Uuid::new_v4();
        let now = Value::String(Utc::now().to_rfc3339());
        record.insert("id".to_string(), Value::String(id.to_string()));
        record.insert("created_at".to_string(), now.clone());
        record.insert("updated_at".to_string(), now);

        self.store.insert(&self.entity, id, record.clone()).await?;
        tracing::debug!("Created {} record {}", self.entity, id);

        Ok(record)
    }

    pub async fn get<P>(&self, principal: &P, id: Uuid) -> Result<Payload, RepositoryError>
    where
        P: TenantScoped + ?Sized + Sync,
    {
        self.fetch_authorized(Operation::Select, principal, id).await
    }

    pub async fn list<P>(&self, principal: &P) -> Result<Vec<Payload>, RepositoryError>
    where
        P: TenantScoped + ?Sized + Sync,
    {
        let rows = self.store.scan(&self.entity).await?;
        let total = rows.len();

        let visible: Vec<Payload> = rows
            .into_iter()
            .filter(|row| assert_tenant_access(principal, row, None).is_ok())
            .collect();

        tracing::debug!(
            "Listed {} of {} {} records ({} hidden by tenant scope)",
            visible.len(),
            total,
            self.entity,
            total - visible.len()
        );

        Ok(visible)
    }

    /// Shallow-merge `patch` into an existing row.
    ///
    /// A patch cannot clear the row's organization; a null or empty
    /// `organization_id` in the patch is ignored. An unscoped row edited by a
    /// scoped principal is stamped with the principal's organization.
    pub async fn update<P>(
        &self,
        principal: &P,
        id: Uuid,
        mut patch: Payload,
    ) -> Result<Payload, RepositoryError>
    where
        P: TenantScoped + ?Sized + Sync,
    {
        reject_system_fields(&patch)?;

        let mut record = self.fetch_authorized(Operation::Update, principal, id).await?;

        if patch.organization_id().is_none() {
            patch.remove(ORGANIZATION_ID_FIELD);
        } else if let Err(err) = assert_tenant_access(principal, &patch, None) {
            self.log_denied(Operation::Update, Some(id), &err);
            return Err(err.into());
        }

        record.extend(patch);
        let mut record = attach_tenant_scope(&record, principal);
        record.insert("updated_at".to_string(), Value::String(Utc::now().to_rfc3339()));

        self.store.replace(&self.entity, id, record.clone()).await?;
        tracing::debug!("Updated {} record {}", self.entity, id);

        Ok(record)
    }

    pub async fn delete<P>(&self, principal: &P, id: Uuid) -> Result<Payload, RepositoryError>
    where
        P: TenantScoped + ?Sized + Sync,
    {
        self.fetch_authorized(Operation::Delete, principal, id).await?;

        let removed = self
            .store
            .remove(&self.entity, id)
            .await?
            .ok_or(RepositoryError::NotFound(id))?;
        tracing::debug!("Deleted {} record {}", self.entity, id);

        Ok(removed)
    }

    async fn fetch_authorized<P>(
        &self,
        operation: Operation,
        principal: &P,
        id: Uuid,
    ) -> Result<Payload, RepositoryError>
    where
        P: TenantScoped + ?Sized + Sync,
    {
        let record = self
            .store
            .fetch(&self.entity, id)
            .await?
            .ok_or(RepositoryError::NotFound(id))?;

        match assert_tenant_access(principal, &record, None) {
            Ok(_) => Ok(record),
            Err(err) => {
                self.log_denied(operation, Some(id), &err);
                if self.settings.conceal_mismatch {
                    Err(RepositoryError::NotFound(id))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    fn log_denied(&self, operation: Operation, id: Option<Uuid>, err: &TenantError) {
        let TenantError::Mismatch { principal_org, resource_org, .. } = err;
        tracing::warn!(
            entity = %self.entity,
            %operation,
            record_id = ?id,
            principal_org = %principal_org,
            resource_org = %resource_org,
            "tenant access denied"
        );
    }
}

fn reject_system_fields(payload: &Payload) -> Result<(), RepositoryError> {
    match SYSTEM_FIELDS.iter().find(|field| payload.contains_key(**field)) {
        Some(field) => Err(RepositoryError::SystemField(field.to_string())),
        None => Ok(()),
    }
}
