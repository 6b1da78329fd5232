use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::error::ApiError;
use crate::tenant::assert_tenant_access;

pub fn handle(
    principal: &str,
    resource: &str,
    message: Option<&str>,
    output_format: &OutputFormat,
) -> anyhow::Result<bool> {
    let principal = read_principal(principal)?;
    let resource = read_document(resource)?;

    match assert_tenant_access(&principal, &resource, message) {
        Ok(access) => {
            output_success(
                output_format,
                &format!("allowed ({})", access.as_str()),
                Some(json!({ "access": access.as_str() })),
            )?;
            Ok(true)
        }
        Err(err) => {
            tracing::debug!(?err, "tenant check denied");
            output_error(output_format, &ApiError::from(err))?;
            Ok(false)
        }
    }
}
