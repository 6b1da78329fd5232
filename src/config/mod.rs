use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub guard: GuardConfig,
    pub repository: RepositoryConfig,
    pub automation: AutomationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Message carried by a tenant mismatch when the caller supplies none
    pub mismatch_message: String,
    pub trace_decisions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Report cross-tenant rows as missing instead of forbidden
    pub conceal_mismatch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationConfig {
    pub timeout_ms: u64,
    pub stop_on_error: bool,
}

pub const DEFAULT_MISMATCH_MESSAGE: &str = "Tenant scope mismatch";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Guard overrides
        if let Ok(v) = env::var("GUARD_MISMATCH_MESSAGE") {
            if !v.trim().is_empty() {
                self.guard.mismatch_message = v;
            }
        }
        if let Ok(v) = env::var("GUARD_TRACE_DECISIONS") {
            self.guard.trace_decisions = v.parse().unwrap_or(self.guard.trace_decisions);
        }

        // Repository overrides
        if let Ok(v) = env::var("REPOSITORY_CONCEAL_MISMATCH") {
            self.repository.conceal_mismatch =
                v.parse().unwrap_or(self.repository.conceal_mismatch);
        }

        // Automation overrides
        if let Ok(v) = env::var("AUTOMATION_TIMEOUT_MS") {
            self.automation.timeout_ms = v.parse().unwrap_or(self.automation.timeout_ms);
        }
        if let Ok(v) = env::var("AUTOMATION_STOP_ON_ERROR") {
            self.automation.stop_on_error = v.parse().unwrap_or(self.automation.stop_on_error);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            guard: GuardConfig {
                mismatch_message: DEFAULT_MISMATCH_MESSAGE.to_string(),
                trace_decisions: true,
            },
            repository: RepositoryConfig {
                conceal_mismatch: false,
            },
            automation: AutomationConfig {
                timeout_ms: 5_000,
                stop_on_error: false,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            guard: GuardConfig {
                mismatch_message: DEFAULT_MISMATCH_MESSAGE.to_string(),
                trace_decisions: false,
            },
            repository: RepositoryConfig {
                conceal_mismatch: true,
            },
            automation: AutomationConfig {
                timeout_ms: 5_000,
                stop_on_error: false,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            guard: GuardConfig {
                mismatch_message: DEFAULT_MISMATCH_MESSAGE.to_string(),
                trace_decisions: false,
            },
            repository: RepositoryConfig {
                conceal_mismatch: true,
            },
            automation: AutomationConfig {
                timeout_ms: 2_000,
                stop_on_error: false,
            },
        }
    }
}

// Global singleton config - initialized once at first use
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
