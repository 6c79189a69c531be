//! Subcommand handlers
//!
//! Each handler returns a process exit code. Failures inside individual
//! modules or repositories never surface here; the only hard failures are
//! an invalid clone root and export I/O errors.

use crate::analyzer::{AnalysisResults, Analyzer};
use crate::cli::commands::{AnalyzeArgs, ModulesArgs, OutputFormatArg};
use crate::config::CovscoutConfig;
use crate::{discovery, export};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

pub async fn handle_analyze(args: &AnalyzeArgs, quiet: bool) -> i32 {
    info!("Starting coverage analysis");

    let default_config = CovscoutConfig::default();
    let config = CovscoutConfig {
        timeout: args
            .timeout
            .map(Duration::from_secs)
            .unwrap_or(default_config.timeout),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or(default_config.output_dir),
        force: args.force || default_config.force,
        ..default_config
    };

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return 1;
    }
    debug!("Configuration: {:?}", config);

    let analyzer = Analyzer::new(&config);
    let results = match analyzer.analyze_all(&args.clone_root).await {
        Ok(results) => results,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return 1;
        }
    };

    let combined = match export::export_results(&results, &config.output_dir) {
        Ok(combined) => combined,
        Err(e) => {
            error!("Export failed: {}", e);
            return 1;
        }
    };

    match args.format {
        OutputFormatArg::Json => match render_json(&results) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                error!("Failed to format output: {}", e);
                return 1;
            }
        },
        OutputFormatArg::Human => {
            if !quiet {
                print_summary(&results, combined.as_deref());
            }
        }
    }

    0
}

fn render_json(results: &AnalysisResults) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

fn print_summary(results: &AnalysisResults, combined: Option<&Path>) {
    println!("\n{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));

    let mut total_files = 0;
    for (repo_name, repo_results) in results {
        let repo_total: usize = repo_results.values().map(Vec::len).sum();
        total_files += repo_total;
        println!("{}: {} files with 100% coverage", repo_name, repo_total);

        if repo_results.len() > 1 {
            for (module_name, files) in repo_results {
                println!("  {}: {} files", module_name, files.len());
            }
        }
    }

    match combined {
        Some(path) => {
            println!("\nTotal files with 100% coverage: {}", total_files);
            println!("File list: {}", path.display());
        }
        None => println!("\nNo files with 100% coverage found"),
    }
}

pub async fn handle_modules(args: &ModulesArgs) -> i32 {
    let repo_path = &args.repository_path;
    if !repo_path.is_dir() {
        error!("Repository path is not a directory: {}", repo_path.display());
        return 1;
    }

    let modules = discovery::discover(repo_path);

    match args.format {
        OutputFormatArg::Json => match serde_json::to_string_pretty(&modules) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                error!("Failed to format output: {}", e);
                return 1;
            }
        },
        OutputFormatArg::Human => {
            if modules.is_empty() {
                println!("No buildable modules found");
            } else {
                for module in &modules {
                    println!(
                        "{}\t{}\t{}",
                        module.name,
                        module.build_system,
                        module.path.display()
                    );
                }
            }
        }
    }

    0
}
