//! Configuration for a covscout run
//!
//! Configuration is an explicit struct constructed once at process start
//! and passed by reference into the components that need it; there is no
//! ambient mutable state. `Default` loads from environment variables with
//! sensible fallbacks, and CLI flags override on top of that.
//!
//! # Environment Variables
//!
//! - `COVSCOUT_TIMEOUT`: build timeout in seconds - default: "300"
//! - `COVSCOUT_OUTPUT_DIR`: directory for exported file lists - default: "jacoco_results"
//! - `COVSCOUT_FORCE`: re-run builds even when a report exists (true|false) - default: "false"
//! - `COVSCOUT_MAVEN_OPTS`: MAVEN_OPTS passed to Maven invocations - default: "-Xmx2g"
//! - `COVSCOUT_LOG_LEVEL`: logging level - default: "info"

use crate::build::DEFAULT_TIMEOUT_SECS;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OUTPUT_DIR: &str = "jacoco_results";
const DEFAULT_MAVEN_OPTS: &str = "-Xmx2g";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Main configuration structure for covscout.
#[derive(Debug, Clone)]
pub struct CovscoutConfig {
    /// Bound on a single build-tool invocation.
    pub timeout: Duration,

    /// Directory the exported coverage file lists are written to.
    pub output_dir: PathBuf,

    /// Re-run builds even when a JaCoCo report already exists.
    pub force: bool,

    /// MAVEN_OPTS value for Maven invocations.
    pub maven_opts: String,
}

impl Default for CovscoutConfig {
    /// Loads configuration from COVSCOUT_* environment variables with
    /// defaults for any missing value.
    fn default() -> Self {
        let timeout_secs = env::var("COVSCOUT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let output_dir = env::var("COVSCOUT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let force = env::var("COVSCOUT_FORCE")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let maven_opts =
            env::var("COVSCOUT_MAVEN_OPTS").unwrap_or_else(|_| DEFAULT_MAVEN_OPTS.to_string());

        Self {
            timeout: Duration::from_secs(timeout_secs),
            output_dir,
            force,
            maven_opts,
        }
    }
}

impl CovscoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "build timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
