//! Export of coverage results as plain-text file lists
//!
//! One file per repository plus one combined, deduplicated list. The
//! lists are what the downstream consumers read; they carry one resolved
//! path per line, sorted.

use crate::analyzer::AnalysisResults;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the combined, deduplicated list.
pub const COMBINED_FILE_NAME: &str = "all_100_percent_coverage_files.txt";

/// Writes per-repository and combined file lists under `output_dir`.
///
/// Returns the combined list's path, or `None` when no repository
/// produced any fully-covered file.
pub fn export_results(
    results: &AnalysisResults,
    output_dir: &Path,
) -> io::Result<Option<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut all_files: BTreeSet<PathBuf> = BTreeSet::new();

    for (repo_name, repo_results) in results {
        let mut repo_files: Vec<PathBuf> =
            repo_results.values().flatten().cloned().collect();
        if repo_files.is_empty() {
            continue;
        }
        repo_files.sort();

        let repo_list = output_dir.join(format!("{repo_name}_100_percent_coverage.txt"));
        write_file_list(&repo_list, repo_files.iter())?;
        info!("Exported {} file(s) for {}", repo_files.len(), repo_name);

        all_files.extend(repo_files);
    }

    if all_files.is_empty() {
        info!("No files with 100% coverage found across all repositories");
        return Ok(None);
    }

    let combined = output_dir.join(COMBINED_FILE_NAME);
    write_file_list(&combined, all_files.iter())?;
    info!(
        "Exported {} total file(s) with 100% coverage",
        all_files.len()
    );
    Ok(Some(combined))
}

fn write_file_list<'a>(
    path: &Path,
    files: impl Iterator<Item = &'a PathBuf>,
) -> io::Result<()> {
    let mut content = String::new();
    for file in files {
        content.push_str(&file.display().to_string());
        content.push('\n');
    }
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ModuleResults;
    use tempfile::TempDir;

    fn results_with(repo: &str, module: &str, files: &[&str]) -> AnalysisResults {
        let mut modules = ModuleResults::new();
        modules.insert(
            module.to_string(),
            files.iter().map(PathBuf::from).collect(),
        );
        let mut results = AnalysisResults::new();
        results.insert(repo.to_string(), modules);
        results
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_per_repo_file_sorted() {
        let dir = TempDir::new().unwrap();
        let results = results_with("demo", "demo", &["/b/B.java", "/a/A.java"]);

        let combined = export_results(&results, dir.path()).unwrap().unwrap();

        let repo_list = dir.path().join("demo_100_percent_coverage.txt");
        assert_eq!(read_lines(&repo_list), vec!["/a/A.java", "/b/B.java"]);
        assert_eq!(combined, dir.path().join(COMBINED_FILE_NAME));
    }

    #[test]
    fn test_combined_file_deduplicated_across_repos() {
        let dir = TempDir::new().unwrap();
        let mut results = results_with("one", "one", &["/shared/X.java", "/one/A.java"]);
        results.extend(results_with("two", "two", &["/shared/X.java", "/two/B.java"]));

        let combined = export_results(&results, dir.path()).unwrap().unwrap();
        assert_eq!(
            read_lines(&combined),
            vec!["/one/A.java", "/shared/X.java", "/two/B.java"]
        );
    }

    #[test]
    fn test_empty_results_produce_no_combined_file() {
        let dir = TempDir::new().unwrap();
        let results = AnalysisResults::new();

        assert!(export_results(&results, dir.path()).unwrap().is_none());
        assert!(!dir.path().join(COMBINED_FILE_NAME).exists());
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let dir = TempDir::new().unwrap();
        let results = results_with(
            "demo",
            "demo",
            &["/src/C.java", "/src/A.java", "/src/B.java"],
        );

        let combined = export_results(&results, dir.path()).unwrap().unwrap();
        let read_back: Vec<PathBuf> =
            read_lines(&combined).into_iter().map(PathBuf::from).collect();

        let mut expected: Vec<PathBuf> = results["demo"]["demo"].clone();
        expected.sort();
        expected.dedup();
        assert_eq!(read_back, expected);
    }
}
