use serde_json::Value;

use crate::config::config;
use crate::tenant::error::TenantError;
use crate::tenant::scope::TenantScoped;
use crate::types::{Payload, ORGANIZATION_ID_FIELD};

/// Why a tenant check let the caller through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantAccess {
    /// Both sides carry the same organization
    SameTenant,
    /// At least one side has no organization, so there is nothing to enforce
    Unscoped,
}

impl TenantAccess {
    pub fn is_scoped(&self) -> bool {
        matches!(self, TenantAccess::SameTenant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TenantAccess::SameTenant => "same-tenant",
            TenantAccess::Unscoped => "unscoped",
        }
    }
}

/// Ensure `principal` may touch `resource`.
///
/// Fails only when both sides name an organization and the two differ.
/// A missing organization on either side is allowed. `failure_message`
/// overrides the configured mismatch message.
pub fn assert_tenant_access<P, R>(
    principal: &P,
    resource: &R,
    failure_message: Option<&str>,
) -> Result<TenantAccess, TenantError>
where
    P: TenantScoped + ?Sized,
    R: TenantScoped + ?Sized,
{
    let (user_org, resource_org) = match (principal.organization_id(), resource.organization_id()) {
        (Some(user_org), Some(resource_org)) => (user_org, resource_org),
        _ => {
            trace_decision(TenantAccess::Unscoped.as_str());
            return Ok(TenantAccess::Unscoped);
        }
    };

    if user_org != resource_org {
        trace_decision("mismatch");
        return Err(TenantError::Mismatch {
            message: failure_message
                .map(str::to_string)
                .unwrap_or_else(|| config().guard.mismatch_message.clone()),
            principal_org: user_org.into_owned(),
            resource_org: resource_org.into_owned(),
        });
    }

    trace_decision(TenantAccess::SameTenant.as_str());
    Ok(TenantAccess::SameTenant)
}

/// Copy `payload`, stamping the organization it should be persisted under.
///
/// The payload's own organization wins, then the principal's, else `null`.
/// Pass `&None::<Principal>` (or any unscoped principal) when there is no actor.
pub fn attach_tenant_scope<P>(payload: &Payload, principal: &P) -> Payload
where
    P: TenantScoped + ?Sized,
{
    let mut scoped = payload.clone();

    if payload.organization_id().is_none() {
        let inherited = principal
            .organization_id()
            .map(|org| Value::String(org.into_owned()))
            .unwrap_or(Value::Null);
        scoped.insert(ORGANIZATION_ID_FIELD.to_string(), inherited);
    }

    scoped
}

/// Whether automation acting as `principal` may run against `row`.
pub fn should_run_automation_for_tenant<R, P>(row: &R, principal: &P) -> bool
where
    R: TenantScoped + ?Sized,
    P: TenantScoped + ?Sized,
{
    match (principal.organization_id(), row.organization_id()) {
        (Some(principal_org), Some(row_org)) => principal_org == row_org,
        _ => true,
    }
}

/// Keep the rows automation acting as `principal` may run against, in order
pub fn retain_for_tenant<R, P>(rows: Vec<R>, principal: &P) -> Vec<R>
where
    R: TenantScoped,
    P: TenantScoped + ?Sized,
{
    rows.into_iter()
        .filter(|row| should_run_automation_for_tenant(row, principal))
        .collect()
}

fn trace_decision(decision: &str) {
    if config().guard.trace_decisions {
        tracing::debug!(decision, "tenant access evaluated");
    }
}
