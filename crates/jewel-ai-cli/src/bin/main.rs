//! Jewel AI CLI
//!
//! # Usage
//!
//! ```bash
//! jewel-ai schema --task design_suggestion
//! jewel-ai replay --task design_suggestion --response reply.txt --language zh
//! JEWEL_AI_ENDPOINT=http://llm:8080/v1/generate jewel-ai generate --task profile_analysis --input answers.json
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success - the model's reply was used
//! - 1: A fallback record was produced
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 6: The generation service failed
//! - 10: Internal error

use clap::Parser;
use jewel_ai_cli::{run_cli, JewelCli};
use tracing::Level;

#[tokio::main]
async fn main() {
    let cli = JewelCli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}
