//! Row-level tenant isolation.
//!
//! Fail open when either side has no organization, fail closed on an explicit mismatch.

pub mod error;
pub mod guard;
pub mod scope;

pub use error::TenantError;
pub use guard::{
    assert_tenant_access, attach_tenant_scope, retain_for_tenant,
    should_run_automation_for_tenant, TenantAccess,
};
pub use scope::{Principal, TenantScoped};
