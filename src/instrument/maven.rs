//! JaCoCo injection into Maven pom.xml files

use super::{InstrumentError, InstrumentOutcome, JACOCO_VERSION};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Plugin block bound to prepare the agent before tests and emit the
/// report after the test phase.
fn plugin_block() -> String {
    format!(
        r#"
            <plugin>
                <groupId>org.jacoco</groupId>
                <artifactId>jacoco-maven-plugin</artifactId>
                <version>{JACOCO_VERSION}</version>
                <executions>
                    <execution>
                        <goals>
                            <goal>prepare-agent</goal>
                        </goals>
                    </execution>
                    <execution>
                        <id>report</id>
                        <phase>test</phase>
                        <goals>
                            <goal>report</goal>
                        </goals>
                    </execution>
                </executions>
            </plugin>"#
    )
}

pub fn instrument(module_path: &Path) -> Result<InstrumentOutcome, InstrumentError> {
    let pom_file = module_path.join("pom.xml");

    let content = fs::read_to_string(&pom_file).map_err(|source| InstrumentError::Io {
        path: pom_file.clone(),
        source,
    })?;

    if content.contains("jacoco") {
        debug!("JaCoCo already configured in {}", pom_file.display());
        return Ok(InstrumentOutcome::AlreadyConfigured);
    }

    let updated = inject_plugin(&content);

    fs::write(&pom_file, updated).map_err(|source| InstrumentError::Io {
        path: pom_file.clone(),
        source,
    })?;
    debug!("JaCoCo plugin added to {}", pom_file.display());
    Ok(InstrumentOutcome::Added)
}

/// Inserts the plugin block at the best available anchor, leaving all
/// unrelated content untouched:
///
/// 1. as the first child of an existing `<build><plugins>` section;
/// 2. wrapped in a new `<plugins>` section inside an existing `<build>`;
/// 3. as a whole `<build><plugins>...</plugins></build>` block right
///    before the closing `</project>` tag.
fn inject_plugin(content: &str) -> String {
    let plugin = plugin_block();

    if let Some(build_start) = content.find("<build>") {
        let build_end = content[build_start..]
            .find("</build>")
            .map(|offset| build_start + offset)
            .unwrap_or(content.len());

        if let Some(plugins_offset) = plugins_anchor(&content[build_start..build_end]) {
            let insertion_point = build_start + plugins_offset + "<plugins>".len();
            let mut updated = String::with_capacity(content.len() + plugin.len());
            updated.push_str(&content[..insertion_point]);
            updated.push_str(&plugin);
            updated.push_str(&content[insertion_point..]);
            return updated;
        }

        let plugins_section = format!("\n        <plugins>{plugin}\n        </plugins>\n    ");
        let mut updated = String::with_capacity(content.len() + plugins_section.len());
        updated.push_str(&content[..build_end]);
        updated.push_str(&plugins_section);
        updated.push_str(&content[build_end..]);
        return updated;
    }

    let build_section = format!(
        "\n    <build>\n        <plugins>{plugin}\n        </plugins>\n    </build>\n"
    );
    match content.rfind("</project>") {
        Some(project_close) => {
            let mut updated = String::with_capacity(content.len() + build_section.len());
            updated.push_str(&content[..project_close]);
            updated.push_str(&build_section);
            updated.push_str(&content[project_close..]);
            updated
        }
        // No closing root tag to anchor on; append and let the build tool
        // report the pre-existing malformation.
        None => format!("{content}{build_section}"),
    }
}

/// First `<plugins>` opening tag in the build section that belongs to the
/// build itself. A `<plugins>` inside `<pluginManagement>` only declares
/// plugin defaults and never executes them, so it is skipped.
fn plugins_anchor(build_section: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(relative) = build_section[search_from..].find("<plugins>") {
        let offset = search_from + relative;
        if !inside_plugin_management(build_section, offset) {
            return Some(offset);
        }
        search_from = offset + "<plugins>".len();
    }
    None
}

fn inside_plugin_management(section: &str, offset: usize) -> bool {
    let before = &section[..offset];
    match before.rfind("<pluginManagement>") {
        Some(open) => !before[open..].contains("</pluginManagement>"),
        None => false,
    }
}
