use serde_json::{json, Value};

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::tenant::retain_for_tenant;

/// Returns the eligible rows and how many were skipped
pub fn handle(
    principal: &str,
    rows: &str,
    output_format: &OutputFormat,
) -> anyhow::Result<(Vec<Value>, usize)> {
    let principal = read_principal(principal)?;
    let rows = match read_document(rows)? {
        Value::Array(rows) => rows,
        other => return Err(anyhow::anyhow!("rows must be an array, got {}", other)),
    };

    let total = rows.len();
    let kept = retain_for_tenant(rows, &principal);
    let skipped = total - kept.len();

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "rows": kept, "skipped": skipped }))?
            );
        }
        OutputFormat::Text => {
            println!("{} of {} rows eligible, {} skipped", kept.len(), total, skipped);
            for row in &kept {
                println!("{}", row);
            }
        }
    }

    Ok((kept, skipped))
}
