pub mod commands;
pub mod handlers;

pub use commands::{AnalyzeArgs, CliArgs, Commands, ModulesArgs, OutputFormatArg};
pub use handlers::{handle_analyze, handle_modules};
