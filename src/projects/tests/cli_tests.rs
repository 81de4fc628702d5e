//! Tests for CLI command parsing and config loading.

use super::{Command, get_command, load_config};
use crate::compiler_frontend::compiler_errors::ErrorType;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn no_arguments_start_the_repl() {
    let command = get_command(&[]).expect("command should parse");
    assert_eq!(command, Command::Repl { config_path: None });
}

#[test]
fn repl_accepts_a_config_path() {
    let command =
        get_command(&args(&["repl", "--config", "my.toml"])).expect("command should parse");
    assert_eq!(
        command,
        Command::Repl {
            config_path: Some(PathBuf::from("my.toml"))
        }
    );

    // Options alone also mean the REPL
    let command = get_command(&args(&["--config", "my.toml"])).expect("command should parse");
    assert_eq!(
        command,
        Command::Repl {
            config_path: Some(PathBuf::from("my.toml"))
        }
    );
}

#[test]
fn run_takes_one_file_and_options_in_any_order() {
    let command = get_command(&args(&["run", "--config", "c.toml", "main.kal"]))
        .expect("command should parse");
    assert_eq!(
        command,
        Command::Run {
            path: PathBuf::from("main.kal"),
            config_path: Some(PathBuf::from("c.toml")),
        }
    );
}

#[test]
fn run_without_a_file_fails() {
    let error = get_command(&args(&["run"])).expect_err("missing file");
    assert!(error.contains("Missing file for run"));

    let error = get_command(&args(&["run", "a.kal", "b.kal"])).expect_err("two files");
    assert!(error.contains("exactly one file"));
}

#[test]
fn flag_errors_are_reported() {
    let error = get_command(&args(&["repl", "--config"])).expect_err("missing value");
    assert!(error.contains("Missing value for --config"));

    let error = get_command(&args(&["run", "main.kal", "--jit"])).expect_err("unknown flag");
    assert!(error.contains("Unknown flag"));
}

#[test]
fn unknown_commands_fail() {
    let error = get_command(&args(&["dev"])).expect_err("not a command");
    assert!(error.contains("Invalid command: 'dev'"));
}

#[test]
fn help_is_a_command() {
    assert_eq!(get_command(&args(&["help"])), Ok(Command::Help));
}

#[test]
fn explicit_config_paths_are_loaded() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("custom.toml");
    fs::write(&path, "prompt = \"> \"\nresult_precision = 2\n").expect("write config");

    let config = load_config(Some(&path)).expect("config loads");
    assert_eq!(config.prompt, "> ");
    assert_eq!(config.result_precision, Some(2));

    let error = load_config(Some(&dir.path().join("absent.toml"))).expect_err("missing file");
    assert_eq!(error.error_type, ErrorType::File);
}
