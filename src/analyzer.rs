//! Repository analysis orchestration
//!
//! Drives the full pipeline per discovered module: probe → instrument →
//! build → parse → resolve, accumulating fully-covered file lists. Any
//! single module's failure (unwritable descriptor, exhausted build
//! strategies, unparseable report) is logged and isolated; sibling
//! modules and sibling repositories always keep processing. The only
//! error that crosses this boundary is an invalid clone root, where there
//! is nothing left to continue with.

use crate::config::CovscoutConfig;
use crate::discovery::{self, Module};
use crate::instrument::{self, InstrumentOutcome};
use crate::probe;
use crate::{build, report, resolve};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Module name → sorted list of fully-covered source paths.
pub type ModuleResults = BTreeMap<String, Vec<PathBuf>>;

/// Repository name → per-module results.
pub type AnalysisResults = BTreeMap<String, ModuleResults>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Clone root does not exist: {0}")]
    CloneRootNotFound(PathBuf),
    #[error("Clone root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to list clone root {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub struct Analyzer<'a> {
    config: &'a CovscoutConfig,
}

impl<'a> Analyzer<'a> {
    pub fn new(config: &'a CovscoutConfig) -> Self {
        Self { config }
    }

    /// Analyzes one repository, returning fully-covered files per module.
    ///
    /// A repository without Java sources, or where every module fails,
    /// yields an empty map; that is an answer, not an error.
    pub async fn analyze_repository(&self, repo_path: &Path) -> ModuleResults {
        if !repo_path.exists() {
            warn!("Repository path does not exist: {}", repo_path.display());
            return ModuleResults::new();
        }

        if !probe::has_java_files(repo_path) {
            info!("No Java files found in {}", repo_path.display());
            return ModuleResults::new();
        }

        let modules = discovery::discover(repo_path);
        info!(
            "Found {} module(s) in {}",
            modules.len(),
            repo_path.display()
        );

        let mut results = ModuleResults::new();
        for module in &modules {
            info!("Processing module: {}", module.name);

            if !self.ensure_report(module).await {
                warn!("JaCoCo analysis failed for module: {}", module.name);
                continue;
            }

            let files = self.collect_covered_files(module);
            if files.is_empty() {
                debug!("No fully covered files in {}", module.name);
                continue;
            }

            info!(
                "Found {} file(s) with 100% coverage in {}",
                files.len(),
                module.name
            );
            results.insert(module.name.clone(), files);
        }

        results
    }

    /// Makes sure a JaCoCo report exists for the module, instrumenting
    /// and building when needed. False means no coverage data could be
    /// produced.
    async fn ensure_report(&self, module: &Module) -> bool {
        if !self.config.force && report::find_report(&module.path, module.build_system).is_some() {
            debug!("JaCoCo report already exists for {}", module.name);
            return true;
        }

        match instrument::instrument(module) {
            Ok(InstrumentOutcome::Added) => {
                debug!("Instrumented {}", module.name);
            }
            Ok(InstrumentOutcome::AlreadyConfigured) => {}
            Err(e) => {
                warn!("Instrumentation failed for {}: {}", module.name, e);
                return false;
            }
        }

        build::run(module, self.config.timeout, &self.config.maven_opts).await
    }

    /// Parses the module's report and resolves every qualifying entry to
    /// a path on disk; unresolvable entries are dropped individually.
    fn collect_covered_files(&self, module: &Module) -> Vec<PathBuf> {
        let sources = report::fully_covered_sources(&module.path, module.build_system);

        let mut files: Vec<PathBuf> = sources
            .iter()
            .filter_map(|source| {
                let resolved = resolve::resolve(&module.path, &source.package, &source.file_name);
                if resolved.is_none() {
                    debug!(
                        "Dropping {}.{}: coverage reported but source not found",
                        source.package, source.file_name
                    );
                }
                resolved
            })
            .collect();

        files.sort();
        files.dedup();
        files
    }

    /// Analyzes every repository under the clone root.
    ///
    /// Repositories are the non-hidden subdirectories of `clone_root`,
    /// processed sequentially; repositories with no results are omitted.
    pub async fn analyze_all(&self, clone_root: &Path) -> Result<AnalysisResults, AnalyzerError> {
        if !clone_root.exists() {
            return Err(AnalyzerError::CloneRootNotFound(clone_root.to_path_buf()));
        }
        if !clone_root.is_dir() {
            return Err(AnalyzerError::NotADirectory(clone_root.to_path_buf()));
        }

        let mut repo_dirs: Vec<PathBuf> = std::fs::read_dir(clone_root)
            .map_err(|source| AnalyzerError::Io {
                path: clone_root.to_path_buf(),
                source,
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_dir()
                    && !path
                        .file_name()
                        .map(|n| n.to_string_lossy().starts_with('.'))
                        .unwrap_or(true)
            })
            .collect();
        repo_dirs.sort();

        let mut results = AnalysisResults::new();
        for repo_dir in repo_dirs {
            let repo_name = repo_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| repo_dir.display().to_string());

            info!("Analyzing repository: {}", repo_name);
            let repo_results = self.analyze_repository(&repo_dir).await;
            if !repo_results.is_empty() {
                results.insert(repo_name, repo_results);
            }
        }

        Ok(results)
    }
}
