//! JaCoCo XML report location and parsing
//!
//! The report schema consumed is
//! `<report><package name=..><sourcefile name=..><counter type="LINE"
//! missed=.. covered=../></sourcefile></package></report>`. A source file
//! qualifies as fully covered iff it has at least one covered line and no
//! missed lines; a file with zero covered lines was never exercised and is
//! deliberately not "100% covered" even though `missed == 0` holds.

use crate::probe::BuildSystem;
use roxmltree::{Document, ParsingOptions};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid report XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Invalid {attr} value '{value}' on LINE counter")]
    BadCounter { attr: &'static str, value: String },
}

/// A source file identity as reported by JaCoCo: dotted package plus the
/// bare file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveredSource {
    pub package: String,
    pub file_name: String,
}

/// Conventional report locations, in probe order, for a module of the
/// given build system.
pub fn report_candidates(module_path: &Path, build_system: BuildSystem) -> Vec<PathBuf> {
    match build_system {
        BuildSystem::Maven => vec![module_path.join("target/site/jacoco/jacoco.xml")],
        BuildSystem::Gradle => vec![
            module_path.join("build/reports/jacoco/test/jacocoTestReport.xml"),
            module_path.join("build/jacoco/jacoco.xml"),
        ],
    }
}

/// First existing report file among the conventional candidates.
pub fn find_report(module_path: &Path, build_system: BuildSystem) -> Option<PathBuf> {
    report_candidates(module_path, build_system)
        .into_iter()
        .find(|path| path.is_file())
}

/// Extracts the fully-covered source files for a module.
///
/// Returns an empty list when no report exists at any candidate location
/// or when the report cannot be read or parsed; both are logged, neither
/// is an error for the caller.
pub fn fully_covered_sources(module_path: &Path, build_system: BuildSystem) -> Vec<CoveredSource> {
    let report_path = match find_report(module_path, build_system) {
        Some(path) => path,
        None => {
            debug!("No JaCoCo report found for {}", module_path.display());
            return Vec::new();
        }
    };

    let xml = match fs::read_to_string(&report_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read JaCoCo report {}: {}", report_path.display(), e);
            return Vec::new();
        }
    };

    match parse_report(&xml) {
        Ok(sources) => sources,
        Err(e) => {
            warn!("Failed to parse JaCoCo report {}: {}", report_path.display(), e);
            Vec::new()
        }
    }
}

/// Parses report XML and selects sourcefiles with `covered > 0` and
/// `missed == 0` on their LINE counter.
pub fn parse_report(xml: &str) -> Result<Vec<CoveredSource>, ReportError> {
    // JaCoCo reports declare a DOCTYPE, which roxmltree rejects by default.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(xml, options)?;

    let mut covered_sources = Vec::new();

    for package in document
        .descendants()
        .filter(|node| node.has_tag_name("package"))
    {
        let package_name = package.attribute("name").unwrap_or("").replace('/', ".");

        for sourcefile in package
            .children()
            .filter(|node| node.has_tag_name("sourcefile"))
        {
            let file_name = match sourcefile.attribute("name") {
                Some(name) if name.ends_with(".java") => name,
                _ => continue,
            };

            let Some((missed, covered)) = line_counter(&sourcefile)? else {
                continue;
            };

            if covered > 0 && missed == 0 {
                covered_sources.push(CoveredSource {
                    package: package_name.clone(),
                    file_name: file_name.to_string(),
                });
            }
        }
    }

    Ok(covered_sources)
}

/// (missed, covered) from the sourcefile's LINE counter, if present.
///
/// A missing attribute counts as zero; an attribute that is present but
/// not a number is malformed report content and fails the whole parse,
/// it must never qualify a file as covered.
fn line_counter(sourcefile: &roxmltree::Node) -> Result<Option<(u64, u64)>, ReportError> {
    let counter = match sourcefile
        .children()
        .find(|node| node.has_tag_name("counter") && node.attribute("type") == Some("LINE"))
    {
        Some(counter) => counter,
        None => return Ok(None),
    };

    let parse = |attr: &'static str| match counter.attribute(attr) {
        None => Ok(0),
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| ReportError::BadCounter {
                attr,
                value: value.to_string(),
            }),
    };
    Ok(Some((parse("missed")?, parse("covered")?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_xml(sourcefiles: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE report PUBLIC "-//JACOCO//DTD Report 1.1//EN" "report.dtd">
<report name="demo">
    <package name="com/example/app">
{sourcefiles}
    </package>
</report>"#
        )
    }

    #[test]
    fn test_fully_covered_selection() {
        let xml = report_xml(
            r#"        <sourcefile name="A.java">
            <counter type="LINE" missed="0" covered="10"/>
        </sourcefile>
        <sourcefile name="B.java">
            <counter type="LINE" missed="0" covered="0"/>
        </sourcefile>
        <sourcefile name="C.java">
            <counter type="LINE" missed="2" covered="8"/>
        </sourcefile>"#,
        );

        let sources = parse_report(&xml).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].package, "com.example.app");
        assert_eq!(sources[0].file_name, "A.java");
    }

    #[test]
    fn test_zero_coverage_is_not_fully_covered() {
        // missed == 0 holds trivially; a never-exercised file still fails
        let xml = report_xml(
            r#"        <sourcefile name="Dead.java">
            <counter type="LINE" missed="0" covered="0"/>
        </sourcefile>"#,
        );
        assert!(parse_report(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_non_java_sourcefiles_skipped() {
        let xml = report_xml(
            r#"        <sourcefile name="Service.kt">
            <counter type="LINE" missed="0" covered="5"/>
        </sourcefile>"#,
        );
        assert!(parse_report(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_other_counter_types_ignored() {
        let xml = report_xml(
            r#"        <sourcefile name="A.java">
            <counter type="BRANCH" missed="0" covered="4"/>
            <counter type="LINE" missed="1" covered="9"/>
        </sourcefile>"#,
        );
        assert!(parse_report(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_sourcefile_without_line_counter_skipped() {
        let xml = report_xml(
            r#"        <sourcefile name="A.java">
            <counter type="BRANCH" missed="0" covered="4"/>
        </sourcefile>"#,
        );
        assert!(parse_report(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse_report("<report><package").is_err());
    }

    #[test]
    fn test_non_numeric_counter_attribute_is_an_error() {
        // a corrupt "missed" value must never collapse to zero and qualify
        // the file as fully covered
        let xml = report_xml(
            r#"        <sourcefile name="Bad.java">
            <counter type="LINE" missed="garbage" covered="5"/>
        </sourcefile>"#,
        );
        assert!(matches!(
            parse_report(&xml),
            Err(ReportError::BadCounter { attr: "missed", .. })
        ));
    }

    #[test]
    fn test_missing_counter_attribute_defaults_to_zero() {
        let xml = report_xml(
            r#"        <sourcefile name="A.java">
            <counter type="LINE" covered="5"/>
        </sourcefile>"#,
        );
        let sources = parse_report(&xml).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].file_name, "A.java");
    }

    #[test]
    fn test_doctype_is_tolerated() {
        // the fixture includes the DOCTYPE JaCoCo always writes
        let xml = report_xml("");
        assert!(parse_report(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_report_candidates_per_build_system() {
        let module = Path::new("/work/mod");

        let maven = report_candidates(module, BuildSystem::Maven);
        assert_eq!(maven, vec![PathBuf::from("/work/mod/target/site/jacoco/jacoco.xml")]);

        let gradle = report_candidates(module, BuildSystem::Gradle);
        assert_eq!(
            gradle,
            vec![
                PathBuf::from("/work/mod/build/reports/jacoco/test/jacocoTestReport.xml"),
                PathBuf::from("/work/mod/build/jacoco/jacoco.xml"),
            ]
        );
    }

    #[test]
    fn test_missing_report_yields_empty_list() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(fully_covered_sources(dir.path(), BuildSystem::Maven).is_empty());
        assert!(fully_covered_sources(dir.path(), BuildSystem::Gradle).is_empty());
    }

    #[test]
    fn test_corrupt_counter_in_report_file_yields_empty_list() {
        let dir = tempfile::TempDir::new().unwrap();
        let report_dir = dir.path().join("target/site/jacoco");
        std::fs::create_dir_all(&report_dir).unwrap();
        std::fs::write(
            report_dir.join("jacoco.xml"),
            report_xml(
                r#"        <sourcefile name="Bad.java">
            <counter type="LINE" missed="garbage" covered="5"/>
        </sourcefile>"#,
            ),
        )
        .unwrap();

        assert!(fully_covered_sources(dir.path(), BuildSystem::Maven).is_empty());
    }

    #[test]
    fn test_unparseable_report_yields_empty_list() {
        let dir = tempfile::TempDir::new().unwrap();
        let report_dir = dir.path().join("target/site/jacoco");
        std::fs::create_dir_all(&report_dir).unwrap();
        std::fs::write(report_dir.join("jacoco.xml"), "not xml at all <<<").unwrap();

        assert!(fully_covered_sources(dir.path(), BuildSystem::Maven).is_empty());
    }
}
