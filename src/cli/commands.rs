use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Coverage-driven module discovery and JaCoCo build orchestration
#[derive(Parser, Debug)]
#[command(
    name = "covscout",
    about = "Find fully test-covered Java sources across cloned repositories",
    version,
    long_about = "covscout discovers every buildable Maven/Gradle module under a clone \
                  root, injects JaCoCo instrumentation into the build descriptors, drives \
                  the builds with fallback strategies under a timeout, and exports the \
                  list of source files with 100% line coverage."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run coverage analysis over every repository under a clone root",
        long_about = "Discovers modules, instruments and builds them, and exports per-repository \
                      and combined lists of files with 100% line coverage.\n\n\
                      Examples:\n  \
                      covscout analyze clones\n  \
                      covscout analyze clones --force --timeout 600\n  \
                      covscout analyze clones --output-dir results --format json"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "List the buildable modules discovered in one repository",
        long_about = "Discovery-only pass for debugging repository layout; no descriptor is \
                      touched and no build is run.\n\n\
                      Examples:\n  \
                      covscout modules /path/to/repo\n  \
                      covscout modules /path/to/repo --format json"
    )]
    Modules(ModulesArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(
        value_name = "CLONE_ROOT",
        help = "Directory containing one subdirectory per cloned repository"
    )]
    pub clone_root: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory for exported file lists (default: jacoco_results)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Build timeout per invocation in seconds (default: 300)"
    )]
    pub timeout: Option<u64>,

    #[arg(long, help = "Re-run builds even when a JaCoCo report already exists")]
    pub force: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ModulesArgs {
    #[arg(value_name = "REPO_PATH", help = "Path to one repository")]
    pub repository_path: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Human,
    Json,
}
