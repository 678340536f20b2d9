//! CLI module for Jewel AI
//!
//! Inspect task contracts, preview compiled prompts, replay stored model
//! replies through the pipeline, and run live generations.

pub mod commands;
pub mod output;

pub use commands::{Commands, JewelCli};
pub use output::{OutcomeOutput, OutputFormat};

use crate::error::{CliError, Result};

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution; a generated record was produced
    Success = 0,
    /// A fallback record was produced
    Fallback = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// The generation service failed
    TransportError = 6,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from an outcome's provenance
    pub fn from_outcome(is_fallback: bool) -> Self {
        if is_fallback {
            ExitCode::Fallback
        } else {
            ExitCode::Success
        }
    }

    /// Determine exit code for a failed command
    pub fn from_error(error: &CliError) -> Self {
        if error.is_transport() {
            ExitCode::TransportError
        } else if error.is_file_error() {
            ExitCode::FileError
        } else if error.is_user_error() {
            ExitCode::InvalidInput
        } else {
            ExitCode::InternalError
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub async fn run(cli: JewelCli) -> Result<ExitCode> {
    match cli.command {
        Commands::Schema { task, format } => commands::execute_schema(task, format),
        Commands::Prompt {
            task,
            input,
            language,
            format,
        } => commands::execute_prompt(task, input, &language, format),
        Commands::Replay {
            task,
            response,
            language,
            format,
        } => commands::execute_replay(task, response, &language, format),
        Commands::Generate {
            task,
            input,
            language,
            config,
            endpoint,
            format,
        } => commands::execute_generate(task, input, &language, config, endpoint, format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jewel_ai_core::{ConfigError, Language, PipelineError, TransportError};

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Fallback), 1);
        assert_eq!(i32::from(ExitCode::InvalidInput), 3);
        assert_eq!(i32::from(ExitCode::FileError), 4);
        assert_eq!(i32::from(ExitCode::TransportError), 6);
        assert_eq!(i32::from(ExitCode::InternalError), 10);
    }

    #[test]
    fn test_exit_code_from_outcome() {
        assert_eq!(ExitCode::from_outcome(false), ExitCode::Success);
        assert_eq!(ExitCode::from_outcome(true), ExitCode::Fallback);
    }

    #[test]
    fn test_exit_code_from_error() {
        let transport = CliError::from(PipelineError::Transport {
            language: Language::Zh,
            source: TransportError::Connection("refused".to_string()),
        });
        assert_eq!(ExitCode::from_error(&transport), ExitCode::TransportError);
        assert_eq!(
            ExitCode::from_error(&CliError::file_error("missing")),
            ExitCode::FileError
        );
        assert_eq!(
            ExitCode::from_error(&CliError::from(ConfigError::invalid("k", "bad"))),
            ExitCode::InvalidInput
        );
        assert_eq!(
            ExitCode::from_error(&CliError::from(PipelineError::from(ConfigError::invalid(
                "generation.temperature",
                "1.5 is outside [0, 1]"
            )))),
            ExitCode::InvalidInput
        );
        assert_eq!(
            ExitCode::from_error(&CliError::InternalError("x".to_string())),
            ExitCode::InternalError
        );
    }
}
