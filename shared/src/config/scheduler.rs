//! Background scheduler configuration

use serde::{Deserialize, Serialize};

/// Name of the dispatch-and-reconcile job
pub const SMS_JOB_NAME: &str = "sms";

/// Scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Master switch for every job
    #[serde(default)]
    pub enable: bool,

    /// Started messages sent per tick
    #[serde(default = "default_dispatch_limit")]
    pub dispatch_limit: u32,

    /// Pending messages polled per tick
    #[serde(default = "default_reconcile_limit")]
    pub reconcile_limit: u32,

    /// Backlog size from which batch queries replace per-message queries
    #[serde(default = "default_batch_threshold")]
    pub batch_threshold: usize,

    #[serde(default = "default_jobs")]
    pub items: Vec<SchedulerJobConfig>,
}

/// A named job and its cron expression
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerJobConfig {
    pub name: String,

    #[serde(default = "default_job_enable")]
    pub enable: bool,

    /// Cron expression, seconds field optional
    #[serde(default = "default_expression")]
    pub expression: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enable: false,
            dispatch_limit: default_dispatch_limit(),
            reconcile_limit: default_reconcile_limit(),
            batch_threshold: default_batch_threshold(),
            items: default_jobs(),
        }
    }
}

impl SchedulerConfig {
    /// Look up a job by name
    pub fn job(&self, name: &str) -> Option<&SchedulerJobConfig> {
        self.items.iter().find(|job| job.name == name)
    }

    /// The job, only if both the scheduler and the job are enabled
    pub fn enabled_job(&self, name: &str) -> Option<&SchedulerJobConfig> {
        if !self.enable {
            return None;
        }
        self.job(name).filter(|job| job.enable)
    }
}

impl SchedulerJobConfig {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enable: true,
            expression: expression.into(),
        }
    }
}

fn default_dispatch_limit() -> u32 {
    10
}

fn default_reconcile_limit() -> u32 {
    100
}

fn default_batch_threshold() -> usize {
    10
}

fn default_job_enable() -> bool {
    true
}

fn default_expression() -> String {
    String::from("*/1 * * * * *")
}

fn default_jobs() -> Vec<SchedulerJobConfig> {
    vec![SchedulerJobConfig::new(SMS_JOB_NAME, default_expression())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_scheduler_hides_jobs() {
        let config = SchedulerConfig::default();
        assert!(config.job(SMS_JOB_NAME).is_some());
        assert!(config.enabled_job(SMS_JOB_NAME).is_none());
    }

    #[test]
    fn test_enabled_job_lookup() {
        let mut config = SchedulerConfig {
            enable: true,
            ..Default::default()
        };
        assert_eq!(
            config.enabled_job(SMS_JOB_NAME).map(|j| j.expression.as_str()),
            Some("*/1 * * * * *")
        );

        config.items[0].enable = false;
        assert!(config.enabled_job(SMS_JOB_NAME).is_none());
        assert!(config.enabled_job("unknown").is_none());
    }
}
