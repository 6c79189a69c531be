//! Build-tool invocation with ordered fallback strategies
//!
//! Each build system gets a prioritized list of invocation strategies. A
//! strategy is accepted only when its process exits with status zero AND
//! the expected JaCoCo report shows up on disk; the first accepted
//! strategy short-circuits the rest. Every invocation is bounded by the
//! configured timeout, and a timed-out or failed strategy never aborts the
//! run, the next one is simply attempted.

use crate::discovery::Module;
use crate::probe::BuildSystem;
use crate::report;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default bound on a single build-tool invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// One build-tool invocation: program, arguments, and extra environment.
#[derive(Debug, Clone)]
pub struct BuildStrategy {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub label: String,
}

impl BuildStrategy {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            env: Vec::new(),
            label: format!("{} {}", program, args.join(" ")),
        }
    }

    fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

fn maven_launcher() -> &'static str {
    if cfg!(windows) {
        "mvn.cmd"
    } else {
        "mvn"
    }
}

fn gradle_wrapper() -> &'static str {
    if cfg!(windows) {
        "./gradlew.bat"
    } else {
        "./gradlew"
    }
}

fn gradle_launcher() -> &'static str {
    if cfg!(windows) {
        "gradle.bat"
    } else {
        "gradle"
    }
}

/// Maven strategy table: full test run first, then a compile-only report
/// when tests cannot run, then a run that tolerates projects without any
/// tests.
pub fn maven_strategies(maven_opts: &str) -> Vec<BuildStrategy> {
    let mvn = maven_launcher();
    vec![
        BuildStrategy::new(mvn, &["clean", "test", "jacoco:report", "-q"]),
        BuildStrategy::new(
            mvn,
            &[
                "clean",
                "compile",
                "test-compile",
                "jacoco:report",
                "-DskipTests=true",
                "-q",
            ],
        ),
        BuildStrategy::new(
            mvn,
            &["clean", "test", "jacoco:report", "-DfailIfNoTests=false", "-q"],
        ),
    ]
    .into_iter()
    .map(|s| s.with_env("MAVEN_OPTS", maven_opts))
    .collect()
}

/// Gradle strategy table: the module-local wrapper script first, then a
/// globally installed Gradle.
pub fn gradle_strategies() -> Vec<BuildStrategy> {
    vec![
        BuildStrategy::new(gradle_wrapper(), &["test", "jacocoTestReport"]),
        BuildStrategy::new(gradle_launcher(), &["test", "jacocoTestReport"]),
    ]
}

/// Drives the strategy table for a module until a report is produced.
///
/// Returns false when every strategy is exhausted; build failures are
/// logged, never raised.
pub async fn run(module: &Module, timeout: Duration, maven_opts: &str) -> bool {
    let strategies = match module.build_system {
        BuildSystem::Maven => maven_strategies(maven_opts),
        BuildSystem::Gradle => gradle_strategies(),
    };

    run_strategies(&module.path, &strategies, timeout, || {
        report::find_report(&module.path, module.build_system).is_some()
    })
    .await
}

/// Tries each strategy in order; accepts the first whose process exits
/// zero and whose `report_present` predicate holds afterwards.
pub async fn run_strategies(
    module_path: &Path,
    strategies: &[BuildStrategy],
    timeout: Duration,
    report_present: impl Fn() -> bool,
) -> bool {
    for strategy in strategies {
        debug!("Trying: {}", strategy.label);

        if !run_one(module_path, strategy, timeout).await {
            continue;
        }

        if report_present() {
            debug!("Strategy succeeded: {}", strategy.label);
            return true;
        }
        debug!(
            "Strategy exited cleanly but produced no report: {}",
            strategy.label
        );
    }

    false
}

/// Runs a single strategy to completion within the timeout. True means
/// the process exited with status zero.
async fn run_one(module_path: &Path, strategy: &BuildStrategy, timeout: Duration) -> bool {
    let mut command = Command::new(&strategy.program);
    command
        .args(&strategy.args)
        .current_dir(module_path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    for (key, value) in &strategy.env {
        command.env(key, value);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            debug!("Failed to spawn '{}': {}", strategy.label, e);
            return false;
        }
    };

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) if status.success() => true,
        Ok(Ok(status)) => {
            debug!("'{}' exited with {}", strategy.label, status);
            false
        }
        Ok(Err(e)) => {
            debug!("Failed to wait for '{}': {}", strategy.label, e);
            false
        }
        Err(_) => {
            warn!(
                "'{}' timed out after {:?} in {}",
                strategy.label,
                timeout,
                module_path.display()
            );
            if let Err(e) = child.kill().await {
                debug!("Failed to kill timed-out build: {}", e);
            }
            false
        }
    }
}
