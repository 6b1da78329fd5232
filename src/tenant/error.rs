use thiserror::Error;

/// The only way a tenant check can fail
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TenantError {
    #[error("{message}")]
    Mismatch {
        message: String,
        principal_org: String,
        resource_org: String,
    },
}

impl TenantError {
    pub fn message(&self) -> &str {
        match self {
            TenantError::Mismatch { message, .. } => message,
        }
    }
}
