//! Integration tests for the Jewel AI CLI

use clap::Parser;
use jewel_ai_cli::{run_cli, Commands, ExitCode, JewelCli, OutputFormat};
use jewel_ai_core::TaskKind;
use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn parse(args: &[&str]) -> JewelCli {
    JewelCli::try_parse_from(std::iter::once("jewel-ai").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_parse_replay_command() {
    let cli = parse(&[
        "-vv",
        "replay",
        "--task",
        "design-suggestion",
        "--response",
        "reply.txt",
        "--language",
        "zh-CN",
        "--format",
        "json",
    ]);
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Replay {
            task,
            language,
            format,
            ..
        } => {
            assert_eq!(task, TaskKind::DesignSuggestion);
            assert_eq!(language, "zh-CN");
            assert_eq!(format, Some(OutputFormat::Json));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_unknown_task_is_rejected() {
    let result = JewelCli::try_parse_from(["jewel-ai", "schema", "--task", "horoscope"]);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_schema_command_succeeds() {
    let cli = parse(&["schema", "--task", "profile_analysis", "--format", "json"]);
    assert_eq!(run_cli(cli).await, ExitCode::Success);
}

#[tokio::test]
async fn test_prompt_command_reads_yaml_input() {
    let input = temp_file(".yaml", "occasion: anniversary\nmetals:\n  - rose gold\n");
    let path = input.path().to_str().unwrap();
    let cli = parse(&["prompt", "--task", "design_suggestion", "--input", path, "--language", "zh"]);
    assert_eq!(run_cli(cli).await, ExitCode::Success);
}

#[tokio::test]
async fn test_replay_valid_reply_exits_success() {
    let reply = temp_file(
        ".txt",
        r##"Here you go:
{"summary": " Balanced ", "personalityTraits": ["calm"], "styleKeywords": [],
 "recommendedStyles": ["classic"], "recommendedMaterials": ["silver"],
 "colorPalette": ["#C0C0C0"], "confidence": 0.7,
 "styleProfile": {"primaryStyle": "classic", "description": "Understated"}}"##,
    );
    let path = reply.path().to_str().unwrap();
    let cli = parse(&["replay", "--task", "profile_analysis", "--response", path, "--format", "yaml"]);
    assert_eq!(run_cli(cli).await, ExitCode::Success);
}

#[tokio::test]
async fn test_replay_refusal_exits_fallback() {
    let reply = temp_file(".txt", "I cannot help with that.");
    let path = reply.path().to_str().unwrap();
    let cli = parse(&["replay", "--task", "energy_image_analysis", "--response", path]);
    assert_eq!(run_cli(cli).await, ExitCode::Fallback);
}

#[tokio::test]
async fn test_missing_response_file_exits_file_error() {
    let cli = parse(&[
        "replay",
        "--task",
        "design_suggestion",
        "--response",
        "/nonexistent/reply.txt",
    ]);
    assert_eq!(run_cli(cli).await, ExitCode::FileError);
}

#[tokio::test]
async fn test_malformed_input_exits_invalid_input() {
    let input = temp_file(".json", "{not json");
    let path = input.path().to_str().unwrap();
    let cli = parse(&["prompt", "--task", "design_suggestion", "--input", path]);
    assert_eq!(run_cli(cli).await, ExitCode::InvalidInput);
}

#[tokio::test]
async fn test_invalid_config_exits_invalid_input() {
    let config = temp_file(".toml", "[generation]\ntemperature = 7.5\n");
    let path = config.path().to_str().unwrap();
    let cli = parse(&["generate", "--task", "design_suggestion", "--config", path]);
    assert_eq!(run_cli(cli).await, ExitCode::InvalidInput);
}

#[tokio::test]
async fn test_unreachable_service_exits_transport_error() {
    let config = temp_file(
        ".toml",
        "[client]\nendpoint = \"http://127.0.0.1:9/v1/generate\"\nmax_retries = 0\ntimeout_ms = 500\n",
    );
    let path = config.path().to_str().unwrap();
    let cli = parse(&["generate", "--task", "inspiration_analysis", "--config", path]);
    assert_eq!(run_cli(cli).await, ExitCode::TransportError);
}
