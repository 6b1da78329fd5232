use thiserror::Error;
use uuid::Uuid;

use crate::tenant::TenantError;

/// Errors from ScopedRepository and its backing store
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("System field '{0}' cannot be set via input")]
    SystemField(String),

    #[error(transparent)]
    Tenant(#[from] TenantError),

    #[error("Store error: {0}")]
    Store(String),
}
