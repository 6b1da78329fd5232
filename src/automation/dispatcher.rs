use futures::future::join_all;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::automation::error::{AutomationError, AutomationFailure};
use crate::automation::traits::{Automation, AutomationContext};
use crate::config::config;
use crate::tenant::{should_run_automation_for_tenant, Principal};
use crate::types::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomationSettings {
    /// Applied to automations that don't declare their own timeout
    pub timeout: Duration,
    /// Skip a row's remaining automations after its first failure
    pub stop_on_error: bool,
}

impl AutomationSettings {
    pub fn from_config() -> Self {
        let automation = &config().automation;
        Self {
            timeout: Duration::from_millis(automation.timeout_ms),
            stop_on_error: automation.stop_on_error,
        }
    }
}

/// Outcome of one dispatch over a batch of rows
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    /// Automation executions that completed
    pub executed: usize,
    /// Rows left out because they belong to another tenant
    pub skipped: usize,
    pub failures: Vec<AutomationFailure>,
    pub elapsed: Duration,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// First failure as an error, for callers that treat any failure as fatal
    pub fn into_result(self) -> Result<Self, AutomationError> {
        match self.failures.first() {
            Some(failure) => Err(failure.error.clone()),
            None => Ok(self),
        }
    }
}

#[derive(Default)]
struct RowOutcome {
    executed: usize,
    failures: Vec<AutomationFailure>,
}

/// Runs registered automations over a batch, gated per row by tenant
pub struct AutomationDispatcher {
    // Kept sorted by priority
    automations: Vec<Box<dyn Automation>>,
    settings: AutomationSettings,
}

impl AutomationDispatcher {
    pub fn new() -> Self {
        Self::with_settings(AutomationSettings::from_config())
    }

    pub fn with_settings(settings: AutomationSettings) -> Self {
        Self {
            automations: Vec::new(),
            settings,
        }
    }

    pub fn register(&mut self, automation: Box<dyn Automation>) {
        tracing::debug!(
            "Registered automation '{}' with priority {}",
            automation.name(),
            automation.priority()
        );
        self.automations.push(automation);
        // Stable sort keeps registration order within a priority
        self.automations.sort_by_key(|automation| automation.priority());
    }

    pub fn len(&self) -> usize {
        self.automations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.automations.is_empty()
    }

    /// Run every applicable automation on each row `principal` may automate.
    ///
    /// Rows run concurrently; automations on a row run in priority order.
    /// Failures are collected into the report, never returned.
    pub async fn dispatch(
        &self,
        entity: &str,
        principal: &Principal,
        rows: &[Payload],
    ) -> DispatchReport {
        let start_time = Instant::now();

        let applicable: Vec<&dyn Automation> = self
            .automations
            .iter()
            .filter(|automation| automation.applies_to(entity))
            .map(|automation| automation.as_ref())
            .collect();

        let (eligible, skipped): (Vec<&Payload>, Vec<&Payload>) = rows
            .iter()
            .partition(|row| should_run_automation_for_tenant(*row, principal));

        tracing::info!(
            "Automation dispatch starting: entity={}, automations={}, rows={}, skipped={}",
            entity,
            applicable.len(),
            eligible.len(),
            skipped.len()
        );

        let mut report = DispatchReport {
            skipped: skipped.len(),
            ..Default::default()
        };

        if !applicable.is_empty() {
            let outcomes = join_all(
                eligible
                    .iter()
                    .map(|row| self.run_row(entity, principal, row, &applicable)),
            )
            .await;

            for outcome in outcomes {
                report.executed += outcome.executed;
                report.failures.extend(outcome.failures);
            }
        }

        report.elapsed = start_time.elapsed();

        tracing::info!(
            "Automation dispatch finished: entity={}, executed={}, failures={}, elapsed={:?}",
            entity,
            report.executed,
            report.failures.len(),
            report.elapsed
        );

        report
    }

    async fn run_row(
        &self,
        entity: &str,
        principal: &Principal,
        row: &Payload,
        automations: &[&dyn Automation],
    ) -> RowOutcome {
        let ctx = AutomationContext { entity, row, principal };
        let row_id = row.get("id").and_then(Value::as_str).map(str::to_string);
        let mut outcome = RowOutcome::default();

        for automation in automations {
            let limit = automation.timeout().unwrap_or(self.settings.timeout);
            let automation_start = Instant::now();

            let error = match timeout(limit, automation.execute(&ctx)).await {
                Ok(Ok(())) => {
                    tracing::debug!(
                        "Automation: {} completed in {:?}",
                        automation.name(),
                        automation_start.elapsed()
                    );
                    outcome.executed += 1;
                    continue;
                }
                Ok(Err(error)) => {
                    tracing::warn!(
                        "Automation: {} failed for row {:?}: {}",
                        automation.name(),
                        row_id,
                        error
                    );
                    error
                }
                Err(_elapsed) => {
                    tracing::error!(
                        "Automation: {} timed out after {:?} for row {:?}",
                        automation.name(),
                        limit,
                        row_id
                    );
                    AutomationError::Timeout {
                        automation: automation.name().to_string(),
                        after: limit,
                    }
                }
            };

            outcome.failures.push(AutomationFailure {
                automation: automation.name().to_string(),
                row_id: row_id.clone(),
                error,
            });

            if self.settings.stop_on_error {
                break;
            }
        }

        outcome
    }
}

impl Default for AutomationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
