/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field carrying the owning tenant on principals, rows and payloads
pub const ORGANIZATION_ID_FIELD: &str = "organization_id";

/// Arbitrary row or write payload, keyed by field name
pub type Payload = Map<String, Value>;

/// Data-access operations guarded by the tenant checks
/// Used by the repository layer and in denial logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Select,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Select => "select",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}
