//! Environment configuration for the audit job
//!
//! All configuration is resolved once at process start; a missing or empty
//! variable aborts before the runtime begins serving invocations.

use anyhow::{bail, Context, Result};

/// Maximum number of items requested per listing page.
pub const PAGE_SIZE: i32 = 100;

/// Instance lifecycle states included in the scan. Terminated and
/// shutting-down instances cannot be tagged retroactively, so they are
/// filtered out server-side.
pub const INSTANCE_STATES: &[&str] = &["running", "stopped"];

/// Snapshot ownership scope: only snapshots owned by this account.
pub const SNAPSHOT_OWNER: &str = "self";

/// Configuration resolved from the process environment at startup.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// AWS region all service clients are bound to.
    pub region: String,
    /// SNS topic that receives the audit notification.
    pub topic_arn: String,
}

impl EnvConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            region: require_var("REGION")?,
            topic_arn: require_var("TOPIC_ARN")?,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    let value = std::env::var(name).with_context(|| format!("{name} must be set"))?;
    if value.trim().is_empty() {
        bail!("{name} must not be empty");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_names_itself() {
        let err = require_var("TAGSWEEP_TEST_UNSET").unwrap_err();
        assert!(err.to_string().contains("TAGSWEEP_TEST_UNSET"));
    }

    #[test]
    fn empty_variable_is_rejected() {
        std::env::set_var("TAGSWEEP_TEST_EMPTY", "  ");
        let err = require_var("TAGSWEEP_TEST_EMPTY").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn present_variable_is_returned() {
        std::env::set_var("TAGSWEEP_TEST_SET", "us-east-2");
        assert_eq!(require_var("TAGSWEEP_TEST_SET").unwrap(), "us-east-2");
    }
}
