use async_trait::async_trait;
use std::time::Duration;

use crate::automation::error::AutomationError;
use crate::tenant::Principal;
use crate::types::Payload;

/// What an automation sees for a single row
#[derive(Debug, Clone, Copy)]
pub struct AutomationContext<'a> {
    pub entity: &'a str,
    pub row: &'a Payload,
    pub principal: &'a Principal,
}

/// Side-effecting logic triggered per row (notifications, follow-up tasks, syncs)
#[async_trait]
pub trait Automation: Send + Sync {
    /// Automation name for logging and failure reports
    fn name(&self) -> &'static str;

    /// Check if automation applies to this entity
    fn applies_to(&self, _entity: &str) -> bool {
        true
    }

    /// Execution timeout; `None` uses the dispatcher default
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Lower numbers execute first
    fn priority(&self) -> u8 {
        50
    }

    async fn execute(&self, ctx: &AutomationContext<'_>) -> Result<(), AutomationError>;
}
