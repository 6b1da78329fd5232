#![allow(dead_code)]

use serde_json::{json, Value};
use tenant_guard::{Payload, Principal};

/// Route guard/repository logs to the test harness output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("tenant_guard=debug")
        .try_init();
}

pub fn member(org: &str) -> Principal {
    Principal::member(org).with_user(format!("user-of-{}", org))
}

pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {}", other),
    }
}

pub fn project(name: &str, org: Option<&str>) -> Payload {
    let mut row = payload(json!({ "name": name, "status": "bidding" }));
    if let Some(org) = org {
        row.insert("organization_id".to_string(), json!(org));
    }
    row
}

/// Organization ids used by the exhaustive checks, including the unscoped forms
pub fn org_variants() -> Vec<Value> {
    vec![
        Value::Null,
        json!(""),
        json!("o1"),
        json!("o2"),
        json!("org-ACME-builders"),
    ]
}

pub fn is_present(org: &Value) -> bool {
    matches!(org, Value::String(s) if !s.is_empty())
}
