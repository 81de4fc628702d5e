use crate::compiler_frontend::compiler_errors::CompilerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const FILE_EXTENSION: &str = "kal";
pub const CONFIG_FILE_NAME: &str = "kaleido.toml";
pub const STATEMENT_END_CHAR: char = ';';
pub const COMMENT_CHAR: char = '#';

// Every unit is one wasm module, its calls to other units import from here
pub const IMPORT_MODULE: &str = "env";

// Identifiers are alphanumeric only, so no user function can collide with this
pub const ANON_EXPR_PREFIX: &str = "__anon_expr";

// This is a guess about how much should be initially allocated for the token vec.
// Just a heuristic based on small snippets of code.
pub const SRC_TO_TOKEN_RATIO: usize = 3;

pub const DEFAULT_PROMPT: &str = "ready> ";

// Shown while a statement is still missing its terminator
pub const CONTINUATION_PROMPT: &str = "...> ";

/// Settings for an interactive or file session.
/// Read from kaleido.toml in the current directory, or from the path given with --config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    pub prompt: String,

    // Decimal places printed for evaluated results, None prints the shortest exact form
    pub result_precision: Option<usize>,

    // Host functions registered with the engine before the first statement
    pub host_functions: Vec<String>,

    // Print each unit's IR before it is finalized
    pub show_unit_ir: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: String::from(DEFAULT_PROMPT),
            result_precision: None,
            host_functions: vec![String::from("putchard"), String::from("printd")],
            show_unit_ir: false,
        }
    }
}

impl ReplConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, CompilerError> {
        toml::from_str(source).map_err(|e| {
            CompilerError::config_error(format!("Could not parse {CONFIG_FILE_NAME}: {e}"))
        })
    }

    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let source = fs::read_to_string(path)
            .map_err(|e| CompilerError::file_error(path, e.to_string()))?;

        Self::from_toml_str(&source)
    }

    /// Uses the config file in the given directory if there is one, otherwise the defaults
    pub fn load_or_default(dir: &Path) -> Result<Self, CompilerError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(ReplConfig::default());
        }

        Self::load(&path)
    }

    pub fn format_result(&self, value: f64) -> String {
        match self.result_precision {
            Some(precision) => format!("{value:.precision$}"),
            None => value.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
