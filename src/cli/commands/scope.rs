use serde_json::Value;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::tenant::attach_tenant_scope;
use crate::types::Payload;

pub fn handle(
    payload: &str,
    principal: Option<&str>,
    output_format: &OutputFormat,
) -> anyhow::Result<Payload> {
    let payload = read_object(payload, "payload")?;
    let principal = match principal {
        Some(arg) => read_principal(arg)?,
        None => None,
    };

    let scoped = attach_tenant_scope(&payload, &principal);
    output_document(output_format, "payload", Value::Object(scoped.clone()))?;

    Ok(scoped)
}
