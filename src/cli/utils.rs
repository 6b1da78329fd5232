use anyhow::Context;
use serde_json::{json, Value};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::error::ApiError;
use crate::tenant::Principal;
use crate::types::Payload;

/// Read a document argument: inline JSON, or `@path` to a JSON/YAML file
pub fn read_document(arg: &str) -> anyhow::Result<Value> {
    match arg.strip_prefix('@') {
        Some(path) => read_document_file(Path::new(path)),
        None => serde_json::from_str(arg).context("argument is not valid JSON"),
    }
}

fn read_document_file(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("{} is not valid YAML", path.display())),
        _ => serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", path.display())),
    }
}

/// Read a principal document; JSON `null` means no principal
pub fn read_principal(arg: &str) -> anyhow::Result<Option<Principal>> {
    match read_document(arg)? {
        Value::Null => Ok(None),
        value => serde_json::from_value(value)
            .map(Some)
            .context("principal must be an object with an optional organization_id"),
    }
}

/// Read a document that must be a JSON object
pub fn read_object(arg: &str, what: &str) -> anyhow::Result<Payload> {
    match read_document(arg)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow::anyhow!("{} must be an object, got {}", what, other)),
    }
}

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a caller-facing error in the appropriate format
pub fn output_error(output_format: &OutputFormat, error: &ApiError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&error.to_json())?);
        }
        OutputFormat::Text => {
            eprintln!("✗ {} ({} {})", error.message(), error.status_code(), error.error_code());
        }
    }
    Ok(())
}

/// Output a document, pretty-printed in both formats
pub fn output_document(
    output_format: &OutputFormat,
    key: &str,
    document: Value,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ key: document }))?);
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_json_document() {
        let doc = read_document(r#"{"organization_id":"o1"}"#).unwrap();
        assert_eq!(doc["organization_id"], "o1");
    }

    #[test]
    fn test_yaml_file_document() {
        let path = std::env::temp_dir().join(format!("tenant-guard-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "name: Site walk\norganization_id: o4\n").unwrap();

        let doc = read_document(&format!("@{}", path.display())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(doc["name"], "Site walk");
        assert_eq!(doc["organization_id"], "o4");
    }

    #[test]
    fn test_null_principal_is_absent() {
        assert_eq!(read_principal("null").unwrap(), None);
        let principal = read_principal(r#"{"organization_id":"o1"}"#).unwrap();
        assert_eq!(principal, Some(Principal::member("o1")));
    }

    #[test]
    fn test_read_object_rejects_arrays() {
        assert!(read_object("[]", "payload").is_err());
        assert!(read_document("not json").is_err());
    }
}
