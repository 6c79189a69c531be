//! Mapping reported sources back to files on disk
//!
//! JaCoCo identifies a source file by package and file name only. The
//! resolver probes the conventional Maven/Gradle source roots first and
//! falls back to an unconstrained search under the module when a project
//! uses a non-standard layout.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const SOURCE_ROOTS: [&str; 3] = ["src/main/java", "src/test/java", "src"];

/// Resolves a reported (package, filename) pair to a concrete path.
///
/// Returns `None` when no match exists anywhere under the module root;
/// the caller drops that single entry rather than failing the module.
pub fn resolve(module_root: &Path, package: &str, file_name: &str) -> Option<PathBuf> {
    let package_path: PathBuf = package.split('.').filter(|s| !s.is_empty()).collect();

    for source_root in SOURCE_ROOTS {
        let candidate = module_root
            .join(source_root)
            .join(&package_path)
            .join(file_name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    // Non-standard layout; take the first name match anywhere under the
    // module.
    let found = WalkDir::new(module_root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| {
            entry.file_type().is_file() && entry.file_name().to_string_lossy() == file_name
        })
        .map(|entry| entry.into_path());

    if found.is_none() {
        debug!(
            "Source {}/{} not found under {}",
            package,
            file_name,
            module_root.display()
        );
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_main_source_root() {
        let module = TempDir::new().unwrap();
        let dir = module.path().join("src/main/java/com/example");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("App.java"), "class App {}").unwrap();

        let resolved = resolve(module.path(), "com.example", "App.java").unwrap();
        assert_eq!(resolved, dir.join("App.java"));
    }

    #[test]
    fn test_resolves_test_source_root() {
        let module = TempDir::new().unwrap();
        let dir = module.path().join("src/test/java/com/example");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("AppTest.java"), "class AppTest {}").unwrap();

        let resolved = resolve(module.path(), "com.example", "AppTest.java").unwrap();
        assert_eq!(resolved, dir.join("AppTest.java"));
    }

    #[test]
    fn test_main_root_preferred_over_bare_src() {
        let module = TempDir::new().unwrap();
        let main = module.path().join("src/main/java/com/example");
        let bare = module.path().join("src/com/example");
        fs::create_dir_all(&main).unwrap();
        fs::create_dir_all(&bare).unwrap();
        fs::write(main.join("App.java"), "").unwrap();
        fs::write(bare.join("App.java"), "").unwrap();

        let resolved = resolve(module.path(), "com.example", "App.java").unwrap();
        assert_eq!(resolved, main.join("App.java"));
    }

    #[test]
    fn test_empty_package() {
        let module = TempDir::new().unwrap();
        let dir = module.path().join("src/main/java");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Main.java"), "").unwrap();

        let resolved = resolve(module.path(), "", "Main.java").unwrap();
        assert_eq!(resolved, dir.join("Main.java"));
    }

    #[test]
    fn test_fallback_search_for_unconventional_layout() {
        let module = TempDir::new().unwrap();
        let odd = module.path().join("code/generated");
        fs::create_dir_all(&odd).unwrap();
        fs::write(odd.join("Weird.java"), "").unwrap();

        let resolved = resolve(module.path(), "com.example", "Weird.java").unwrap();
        assert_eq!(resolved, odd.join("Weird.java"));
    }

    #[test]
    fn test_miss_returns_none() {
        let module = TempDir::new().unwrap();
        assert!(resolve(module.path(), "com.example", "Ghost.java").is_none());
    }
}
