//! JaCoCo injection into Gradle build scripts
//!
//! Gradle scripts are arbitrary Groovy/Kotlin DSL, so the configuration is
//! appended to the end of the script rather than inserted mid-file;
//! appending cannot corrupt existing syntax.

use super::{InstrumentError, InstrumentOutcome, JACOCO_VERSION};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn jacoco_block() -> String {
    format!(
        r#"
apply plugin: 'jacoco'

jacoco {{
    toolVersion = "{JACOCO_VERSION}"
}}

jacocoTestReport {{
    reports {{
        xml.required = true
        html.required = true
    }}
}}

test.finalizedBy jacocoTestReport
"#
    )
}

/// The descriptor to mutate: `build.gradle` wins over `build.gradle.kts`
/// when both exist.
fn find_build_script(module_path: &Path) -> Option<PathBuf> {
    ["build.gradle", "build.gradle.kts"]
        .iter()
        .map(|name| module_path.join(name))
        .find(|path| path.is_file())
}

pub fn instrument(module_path: &Path) -> Result<InstrumentOutcome, InstrumentError> {
    let build_file = find_build_script(module_path)
        .ok_or_else(|| InstrumentError::MissingDescriptor(module_path.to_path_buf()))?;

    let content = fs::read_to_string(&build_file).map_err(|source| InstrumentError::Io {
        path: build_file.clone(),
        source,
    })?;

    if content.to_lowercase().contains("jacoco") {
        debug!("JaCoCo already configured in {}", build_file.display());
        return Ok(InstrumentOutcome::AlreadyConfigured);
    }

    let updated = format!("{content}{}", jacoco_block());

    fs::write(&build_file, updated).map_err(|source| InstrumentError::Io {
        path: build_file.clone(),
        source,
    })?;
    debug!("JaCoCo configuration appended to {}", build_file.display());
    Ok(InstrumentOutcome::Added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_to_groovy_script() {
        let dir = TempDir::new().unwrap();
        let original = "plugins {\n    id 'java'\n}\n";
        fs::write(dir.path().join("build.gradle"), original).unwrap();

        let outcome = instrument(dir.path()).unwrap();
        assert_eq!(outcome, InstrumentOutcome::Added);

        let content = fs::read_to_string(dir.path().join("build.gradle")).unwrap();
        // appended, original prefix preserved verbatim
        assert!(content.starts_with(original));
        assert!(content.contains("apply plugin: 'jacoco'"));
        assert!(content.contains("toolVersion = \"0.8.11\""));
        assert!(content.contains("test.finalizedBy jacocoTestReport"));
    }

    #[test]
    fn test_idempotent_second_call() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.gradle"), "plugins { id 'java' }\n").unwrap();

        assert_eq!(instrument(dir.path()).unwrap(), InstrumentOutcome::Added);
        let after_first = fs::read_to_string(dir.path().join("build.gradle")).unwrap();

        assert_eq!(
            instrument(dir.path()).unwrap(),
            InstrumentOutcome::AlreadyConfigured
        );
        let after_second = fs::read_to_string(dir.path().join("build.gradle")).unwrap();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_case_insensitive_guard() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("build.gradle"),
            "jacoco {\n    toolVersion = \"0.8.8\"\n}\n",
        )
        .unwrap();

        assert_eq!(
            instrument(dir.path()).unwrap(),
            InstrumentOutcome::AlreadyConfigured
        );

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.gradle"), "// JaCoCo set up elsewhere\n").unwrap();
        assert_eq!(
            instrument(dir.path()).unwrap(),
            InstrumentOutcome::AlreadyConfigured
        );
    }

    #[test]
    fn test_kotlin_script_used_when_groovy_absent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.gradle.kts"), "plugins {\n}\n").unwrap();

        assert_eq!(instrument(dir.path()).unwrap(), InstrumentOutcome::Added);
        let content = fs::read_to_string(dir.path().join("build.gradle.kts")).unwrap();
        assert!(content.contains("jacocoTestReport"));
    }

    #[test]
    fn test_missing_descriptor() {
        let dir = TempDir::new().unwrap();
        let err = instrument(dir.path()).unwrap_err();
        assert!(matches!(err, InstrumentError::MissingDescriptor(_)));
    }
}
