//! Idempotent JaCoCo instrumentation of build descriptors
//!
//! Build descriptors in the wild are frequently hand-edited and sometimes
//! malformed, so instrumentation works on the descriptor text with
//! conservative anchor-based insertion instead of a structural XML/DSL
//! model. Idempotency is a coarse substring guard: any mention of `jacoco`
//! in the descriptor means the module is treated as already configured.

mod gradle;
mod maven;

use crate::discovery::Module;
use crate::probe::BuildSystem;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// JaCoCo version pinned into every descriptor we touch.
pub const JACOCO_VERSION: &str = "0.8.11";

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("Failed to read or write descriptor {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("No build descriptor found in {0}")]
    MissingDescriptor(PathBuf),
}

/// What instrumentation did to the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentOutcome {
    /// The JaCoCo configuration was injected in this call.
    Added,
    /// The descriptor already mentioned JaCoCo; nothing was written.
    AlreadyConfigured,
}

/// Injects JaCoCo configuration into the module's build descriptor.
///
/// A second call on the same descriptor is a byte-for-byte no-op.
pub fn instrument(module: &Module) -> Result<InstrumentOutcome, InstrumentError> {
    match module.build_system {
        BuildSystem::Maven => maven::instrument(&module.path),
        BuildSystem::Gradle => gradle::instrument(&module.path),
    }
}
