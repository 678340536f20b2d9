//! Jewel AI CLI
//!
//! Command-line front end for the structured output pipeline in
//! `jewel-ai-core`.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Show the schema the model is asked to follow
//! jewel-ai schema --task design_suggestion
//!
//! # Preview the compiled prompts for an input file
//! jewel-ai prompt --task profile_analysis --input answers.json --language zh-CN
//!
//! # Replay a stored model reply
//! jewel-ai replay --task energy_image_analysis --response reply.txt --format json
//!
//! # Run a live generation
//! jewel-ai generate --task inspiration_analysis --input image.yaml --config jewel-ai.toml
//! ```

pub mod cli;
pub mod error;

pub use cli::{Commands, ExitCode, JewelCli, OutputFormat};
pub use error::CliError;

/// Run the CLI and map failures to exit codes
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use jewel_ai_cli::{run_cli, JewelCli};
///
/// #[tokio::main]
/// async fn main() {
///     let cli = JewelCli::parse();
///     let exit_code = run_cli(cli).await;
///     std::process::exit(exit_code.into());
/// }
/// ```
pub async fn run_cli(cli: JewelCli) -> ExitCode {
    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from_error(&e)
        }
    }
}
