use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::types::ORGANIZATION_ID_FIELD;

/// Anything that may belong to an organization: principals, rows, payloads.
///
/// `None` means unscoped. Implementations treat `null` and the empty string
/// as unscoped as well, so a blank form field never pins a row to a tenant.
pub trait TenantScoped {
    fn organization_id(&self) -> Option<Cow<'_, str>>;
}

/// The acting user or session context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_organization_id")]
    pub organization_id: Option<String>,
}

// Same reading as row payloads: numbers become their decimal text, null and "" are absent.
fn deserialize_organization_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "organization_id must be a string or number, got {}",
            other
        ))),
    }
}

impl Principal {
    /// Principal acting on behalf of an organization
    pub fn member(organization_id: impl Into<String>) -> Self {
        Self {
            user_id: None,
            organization_id: Some(organization_id.into()),
        }
    }

    /// System or legacy actor with no organization
    pub fn unscoped() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

impl TenantScoped for Principal {
    fn organization_id(&self) -> Option<Cow<'_, str>> {
        self.organization_id
            .as_deref()
            .filter(|org| !org.is_empty())
            .map(Cow::Borrowed)
    }
}

impl TenantScoped for Map<String, Value> {
    fn organization_id(&self) -> Option<Cow<'_, str>> {
        self.get(ORGANIZATION_ID_FIELD).and_then(identifier_from_value)
    }
}

impl TenantScoped for Value {
    fn organization_id(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Object(map) => map.organization_id(),
            _ => None,
        }
    }
}

impl<T: TenantScoped> TenantScoped for Option<T> {
    fn organization_id(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|inner| inner.organization_id())
    }
}

impl<T: TenantScoped + ?Sized> TenantScoped for &T {
    fn organization_id(&self) -> Option<Cow<'_, str>> {
        (**self).organization_id()
    }
}

// Numeric ids compare by their decimal text; any other shape is kept as raw JSON and stays scoped.
fn identifier_from_value(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}
