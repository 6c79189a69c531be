//! covscout - coverage-driven module discovery and build orchestration
//!
//! Given a clone root full of Java repositories of unknown shape, covscout
//! finds every buildable Maven/Gradle module, injects JaCoCo
//! instrumentation into the build descriptors idempotently, drives the
//! build tool through an ordered list of fallback strategies under a
//! timeout, parses the JaCoCo XML reports, and maps the fully-covered
//! sources back to concrete paths on disk.
//!
//! # Pipeline
//!
//! Per repository, per module:
//! probe → instrument → build → parse report → resolve paths, with every
//! per-module failure isolated from its siblings. Results aggregate into
//! `{repository → {module → [file paths]}}` and export as plain-text file
//! lists for downstream consumers.
//!
//! # Project Structure
//!
//! - [`probe`]: build descriptor and Java source detection for a directory
//! - [`discovery`]: repository-wide module discovery
//! - [`instrument`]: idempotent JaCoCo injection into pom.xml / build.gradle
//! - [`build`]: strategy-based build-tool invocation under a timeout
//! - [`report`]: JaCoCo XML report location and parsing
//! - [`resolve`]: mapping reported sources to files on disk
//! - [`analyzer`]: orchestration and failure isolation
//! - [`export`]: plain-text result export

pub mod analyzer;
pub mod build;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod export;
pub mod instrument;
pub mod probe;
pub mod report;
pub mod resolve;
pub mod util;

pub use analyzer::{AnalysisResults, Analyzer, AnalyzerError, ModuleResults};
pub use config::{ConfigError, CovscoutConfig};
pub use discovery::Module;
pub use export::export_results;
pub use instrument::{InstrumentError, InstrumentOutcome};
pub use probe::{BuildFiles, BuildSystem};
pub use report::{CoveredSource, ReportError};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
