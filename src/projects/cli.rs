//! Command-line entrypoints for kaleido.
//!
//! Parses the command and its options, loads the session config, then hands off
//! to an interactive session or a file run.

use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::display_messages::print_formatted_error;
use crate::projects::repl;
use crate::settings::{FILE_EXTENSION, ReplConfig};
use saying::say;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    // Interactive session, also the default with no arguments
    Repl { config_path: Option<PathBuf> },

    // Runs every statement in a file
    Run {
        path: PathBuf,
        config_path: Option<PathBuf>,
    },

    Help,
}

pub fn start_cli() {
    let compiler_args: Vec<String> = env::args().collect();

    let command = match get_command(compiler_args.get(1..).unwrap_or_default()) {
        Ok(command) => command,
        Err(e) => {
            say!(Red e);
            print_help(true);
            return;
        }
    };

    match command {
        Command::Help => {
            print_help(false);
        }

        Command::Repl { config_path } => {
            let result = load_config(config_path.as_deref()).and_then(repl::start_repl_session);
            if let Err(e) = result {
                print_formatted_error(&e, None);
            }
        }

        Command::Run { path, config_path } => {
            let result = load_config(config_path.as_deref())
                .and_then(|config| repl::run_file(&path, config));

            match result {
                Ok(0) => {}
                Ok(failures) => {
                    say!(Yellow "\n", Bright { failures }, " statement(s) failed");
                }
                Err(e) => print_formatted_error(&e, None),
            }
        }
    }
}

fn get_command(args: &[String]) -> Result<Command, String> {
    let command = args.first().map(String::as_str);

    match command {
        None => Ok(Command::Repl { config_path: None }),

        Some("help") | Some("--help") => Ok(Command::Help),

        Some("repl") => {
            let (config_path, positional) = parse_options(&args[1..])?;
            if let Some(extra) = positional.first() {
                return Err(format!("Unexpected argument for repl: '{extra}'"));
            }

            Ok(Command::Repl { config_path })
        }

        Some("run") => {
            let (config_path, positional) = parse_options(&args[1..])?;
            let path = match positional.as_slice() {
                [path] => PathBuf::from(path),
                [] => {
                    return Err(format!(
                        "Missing file for run (try 'kal run main.{FILE_EXTENSION}')"
                    ));
                }
                _ => return Err(String::from("Run command accepts exactly one file path.")),
            };

            Ok(Command::Run { path, config_path })
        }

        // Only options, so start the REPL with them
        Some(arg) if arg.starts_with("--") => {
            let (config_path, positional) = parse_options(args)?;
            if let Some(extra) = positional.first() {
                return Err(format!("Invalid command: '{extra}'"));
            }

            Ok(Command::Repl { config_path })
        }

        Some(other) => Err(format!("Invalid command: '{other}'")),
    }
}

/// Splits out `--config <path>` and returns the remaining positional arguments
fn parse_options(args: &[String]) -> Result<(Option<PathBuf>, Vec<String>), String> {
    let mut config_path = None;
    let mut positional = Vec::new();
    let mut index = 0usize;

    while let Some(arg) = args.get(index) {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args.get(index + 1) else {
                    return Err(String::from("Missing value for --config"));
                };
                if path.starts_with("--") {
                    return Err(String::from("Missing value for --config"));
                }
                config_path = Some(PathBuf::from(path));
                index += 2;
            }
            _ if arg.starts_with("--") => {
                return Err(format!(
                    "Unknown flag: '{arg}'. The only supported flag is --config <path>."
                ));
            }
            _ => {
                positional.push(arg.to_owned());
                index += 1;
            }
        }
    }

    Ok((config_path, positional))
}

/// An explicit config path must exist, otherwise the current directory is checked
fn load_config(config_path: Option<&Path>) -> Result<ReplConfig, CompilerError> {
    match config_path {
        Some(path) => ReplConfig::load(path),
        None => {
            let current_dir = env::current_dir().map_err(|e| {
                CompilerError::file_error(Path::new("."), format!("Can't read current directory: {e}"))
            })?;
            ReplConfig::load_or_default(&current_dir)
        }
    }
}

fn print_help(commands_only: bool) {
    if !commands_only {
        say!(Bright Black "------------------------------------");
        say!(Green Bold "kaleido: a tiny numeric language, JIT compiled one statement at a time");
        say!("Usage: kal ", Bold "<command>", " ", Italic "<args>");
    }
    say!(Green Bold "\nCommands:");
    say!("  repl              - Starts an interactive session (default)");
    say!("  run <path>        - Runs every statement in a .kal file");
    say!("  help              - Shows this message");

    say!(Green Bold "\nFlags:");
    say!("  --config <path>   (default: ./kaleido.toml if it exists)");
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
