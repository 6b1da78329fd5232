pub mod automation;
pub mod cli;
pub mod config;
pub mod error;
pub mod repository;
pub mod tenant;
pub mod types;

pub use error::ApiError;
pub use tenant::{
    assert_tenant_access, attach_tenant_scope, retain_for_tenant,
    should_run_automation_for_tenant, Principal, TenantAccess, TenantError, TenantScoped,
};
pub use types::{Operation, Payload, ORGANIZATION_ID_FIELD};
