//! Module discovery across a repository tree
//!
//! A repository of unknown shape may hold a single build at its root, a
//! multi-module Maven/Gradle build, or several unrelated builds nested in
//! subdirectories. Discovery walks the whole tree and returns every
//! directory that is independently buildable.

use crate::probe::{self, BuildSystem};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const MAVEN_DESCRIPTOR: &str = "pom.xml";
const GRADLE_DESCRIPTORS: [&str; 2] = ["build.gradle", "build.gradle.kts"];

/// An independently buildable directory within a repository.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Module {
    /// Absolute or repository-relative directory of the module.
    pub path: PathBuf,
    /// Which build tool drives this module.
    pub build_system: BuildSystem,
    /// Display name: the repository directory name for the root module,
    /// otherwise the path relative to the repository root.
    pub name: String,
}

/// Finds all buildable modules under `repo_root`.
///
/// The root itself qualifies when it carries a build descriptor. Any nested
/// directory owning a `pom.xml` or `build.gradle[.kts]` qualifies only when
/// it also contains Java sources of its own; descriptor-only aggregator
/// directories are not modules. The result is deduplicated by directory and
/// sorted by path so one run's logs are reproducible.
pub fn discover(repo_root: &Path) -> Vec<Module> {
    let mut seen: BTreeSet<PathBuf> = BTreeSet::new();

    let root_files = probe::probe(repo_root);
    if root_files.has_descriptor() {
        seen.insert(repo_root.to_path_buf());
    }

    for entry in WalkDir::new(repo_root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if file_name != MAVEN_DESCRIPTOR && !GRADLE_DESCRIPTORS.contains(&file_name.as_ref()) {
            continue;
        }

        let module_dir = match entry.path().parent() {
            Some(parent) => parent.to_path_buf(),
            None => continue,
        };
        if module_dir == repo_root || seen.contains(&module_dir) {
            continue;
        }
        if !probe::has_java_files(&module_dir) {
            debug!(
                "Skipping {}: descriptor without Java sources",
                module_dir.display()
            );
            continue;
        }
        seen.insert(module_dir);
    }

    let modules: Vec<Module> = seen
        .into_iter()
        .filter_map(|path| {
            let build_system = probe::probe(&path).build_system()?;
            let name = module_name(repo_root, &path);
            Some(Module {
                path,
                build_system,
                name,
            })
        })
        .collect();

    if modules.is_empty() {
        info!("No buildable modules found in {}", repo_root.display());
    }

    modules
}

/// Readable module name: the repository name for the root, the
/// slash-separated relative path for nested modules.
fn module_name(repo_root: &Path, module_path: &Path) -> String {
    if module_path == repo_root {
        return repo_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| repo_root.display().to_string());
    }

    match module_path.strip_prefix(repo_root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => module_path.display().to_string(),
    }
}
