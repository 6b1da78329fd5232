use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomationError {
    #[error("Automation '{automation}' failed: {message}")]
    Failed { automation: String, message: String },

    #[error("Automation '{automation}' timed out after {after:?}")]
    Timeout { automation: String, after: Duration },
}

impl AutomationError {
    pub fn failed(automation: &str, message: impl Into<String>) -> Self {
        AutomationError::Failed {
            automation: automation.to_string(),
            message: message.into(),
        }
    }
}

/// One automation that did not complete for one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationFailure {
    pub automation: String,
    pub row_id: Option<String>,
    pub error: AutomationError,
}
