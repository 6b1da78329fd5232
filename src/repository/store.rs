use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository::error::RepositoryError;
use crate::types::Payload;

/// Raw row storage, unaware of tenants. ScopedRepository layers the checks on top.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, entity: &str, id: Uuid, record: Payload) -> Result<(), RepositoryError>;

    async fn fetch(&self, entity: &str, id: Uuid) -> Result<Option<Payload>, RepositoryError>;

    async fn replace(&self, entity: &str, id: Uuid, record: Payload) -> Result<(), RepositoryError>;

    async fn remove(&self, entity: &str, id: Uuid) -> Result<Option<Payload>, RepositoryError>;

    /// All rows of an entity in insertion order
    async fn scan(&self, entity: &str) -> Result<Vec<Payload>, RepositoryError>;
}

/// In-process store, one insertion-ordered table per entity
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, Vec<(Uuid, Payload)>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows exactly as given, bypassing tenant scoping. For fixtures and imports.
    pub async fn seed(&self, entity: &str, rows: impl IntoIterator<Item = (Uuid, Payload)>) {
        let mut tables = self.tables.write().await;
        tables.entry(entity.to_string()).or_default().extend(rows);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, entity: &str, id: Uuid, record: Payload) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(entity.to_string()).or_default();

        if table.iter().any(|(existing, _)| *existing == id) {
            return Err(RepositoryError::Store(format!("duplicate id {} in '{}'", id, entity)));
        }

        table.push((id, record));
        Ok(())
    }

    async fn fetch(&self, entity: &str, id: Uuid) -> Result<Option<Payload>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(entity)
            .and_then(|table| table.iter().find(|(existing, _)| *existing == id))
            .map(|(_, record)| record.clone()))
    }

    async fn replace(
        &self,
        entity: &str,
        id: Uuid,
        record: Payload,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .get_mut(entity)
            .and_then(|table| table.iter_mut().find(|(existing, _)| *existing == id))
            .ok_or(RepositoryError::NotFound(id))?;

        slot.1 = record;
        Ok(())
    }

    async fn remove(&self, entity: &str, id: Uuid) -> Result<Option<Payload>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(entity) else {
            return Ok(None);
        };

        Ok(table
            .iter()
            .position(|(existing, _)| *existing == id)
            .map(|index| table.remove(index).1))
    }

    async fn scan(&self, entity: &str) -> Result<Vec<Payload>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(entity)
            .map(|table| table.iter().map(|(_, record)| record.clone()).collect())
            .unwrap_or_default())
    }
}
