//! Build descriptor probing for a single directory
//!
//! Answers three questions about a directory without side effects: does it
//! carry a Maven descriptor, does it carry a Gradle descriptor, and does it
//! contain any Java sources (recursively)? Absence is a valid answer, never
//! an error.

use std::path::Path;
use walkdir::WalkDir;

/// Build system owning a module's descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    Maven,
    Gradle,
}

impl std::fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildSystem::Maven => write!(f, "maven"),
            BuildSystem::Gradle => write!(f, "gradle"),
        }
    }
}

/// Result of probing a directory for build descriptors and sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildFiles {
    pub maven: bool,
    pub gradle: bool,
    pub has_java: bool,
}

impl BuildFiles {
    /// True if the directory carries any build descriptor at all.
    pub fn has_descriptor(&self) -> bool {
        self.maven || self.gradle
    }

    /// Build system to drive for this directory.
    ///
    /// Maven wins when both descriptors are present; the pom is the
    /// authoritative descriptor in mixed checkouts.
    pub fn build_system(&self) -> Option<BuildSystem> {
        if self.maven {
            Some(BuildSystem::Maven)
        } else if self.gradle {
            Some(BuildSystem::Gradle)
        } else {
            None
        }
    }
}

/// Probes a directory for build descriptors and Java sources.
pub fn probe(dir: &Path) -> BuildFiles {
    BuildFiles {
        maven: dir.join("pom.xml").is_file(),
        gradle: dir.join("build.gradle").is_file() || dir.join("build.gradle.kts").is_file(),
        has_java: has_java_files(dir),
    }
}

/// Checks whether any `.java` file exists anywhere under `dir`.
///
/// Unreadable entries are skipped rather than treated as failures.
pub fn has_java_files(dir: &Path) -> bool {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "java")
                    .unwrap_or(false)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let files = probe(dir.path());
        assert!(!files.maven);
        assert!(!files.gradle);
        assert!(!files.has_java);
        assert!(files.build_system().is_none());
    }

    #[test]
    fn test_maven_descriptor() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();

        let files = probe(dir.path());
        assert!(files.maven);
        assert!(!files.gradle);
        assert_eq!(files.build_system(), Some(BuildSystem::Maven));
    }

    #[test]
    fn test_gradle_descriptor_both_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.gradle"), "").unwrap();
        assert_eq!(probe(dir.path()).build_system(), Some(BuildSystem::Gradle));

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.gradle.kts"), "").unwrap();
        assert_eq!(probe(dir.path()).build_system(), Some(BuildSystem::Gradle));
    }

    #[test]
    fn test_maven_preferred_over_gradle() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        fs::write(dir.path().join("build.gradle"), "").unwrap();

        assert_eq!(probe(dir.path()).build_system(), Some(BuildSystem::Maven));
    }

    #[test]
    fn test_java_files_found_recursively() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src/main/java/com/example");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("App.java"), "class App {}").unwrap();

        assert!(has_java_files(dir.path()));
        assert!(probe(dir.path()).has_java);
    }

    #[test]
    fn test_non_java_sources_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.kt"), "fun main() {}").unwrap();
        fs::write(dir.path().join("notes.javax"), "").unwrap();

        assert!(!has_java_files(dir.path()));
    }
}
