// Interactive sessions and whole-file runs.
//
// Both read `;` separated statements and push each one through the unit manager.
// A failed statement is reported and the next one carries on from a fresh unit.

use crate::backends::ir::unit::CompilationUnit;
use crate::compiler_frontend::ast::parser::parse_statements;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::display_messages::print_formatted_error;
use crate::projects::unit_manager::{SessionContext, StatementOutcome, UnitManager};
use crate::runtime::engine::HostCallback;
use crate::runtime::host_functions::{register_builtin_host_functions, register_host_function};
use crate::runtime::jit::WasmerEngine;
use crate::settings::{COMMENT_CHAR, CONTINUATION_PROMPT, ReplConfig, STATEMENT_END_CHAR};
use crate::{ast_log, timer_log};
use saying::say;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

/// A live engine plus the unit manager feeding it
pub struct ReplSession {
    config: ReplConfig,
    context: SessionContext<WasmerEngine>,
    manager: UnitManager,
}

impl ReplSession {
    /// Starts the engine and registers the host functions the config asks for
    pub fn new(config: ReplConfig) -> Result<Self, CompilerError> {
        let mut context = SessionContext::new(WasmerEngine::new());
        register_builtin_host_functions(
            &mut context.engine,
            &mut context.registry,
            &config.host_functions,
        )?;

        let manager = UnitManager::new().with_unit_ir_display(config.show_unit_ir);

        Ok(ReplSession {
            config,
            context,
            manager,
        })
    }

    pub fn config(&self) -> &ReplConfig {
        &self.config
    }

    pub fn current_unit(&self) -> &CompilationUnit {
        self.manager.current_unit()
    }

    /// Makes an extra native function callable from later statements
    pub fn register_host_function(
        &mut self,
        name: &str,
        arity: usize,
        callback: HostCallback,
    ) -> Result<(), CompilerError> {
        register_host_function(
            &mut self.context.engine,
            &mut self.context.registry,
            name,
            arity,
            callback,
        )
    }

    /// One result per statement, in source order.
    /// Syntax errors leave the open unit alone, every other failure replaces it.
    pub fn process_source(&mut self, source_code: &str) -> Vec<Result<StatementOutcome, CompilerError>> {
        let _time = Instant::now();
        let mut outcomes = Vec::new();

        for statement in parse_statements(source_code) {
            let outcome = match statement {
                Ok(statement) => {
                    ast_log!(Green "Statement: ", Bright { statement.to_string() });
                    self.manager.process(&mut self.context, &statement)
                }
                Err(e) => Err(e),
            };
            outcomes.push(outcome);
        }

        timer_log!(_time, "Source processed in: ");
        outcomes
    }

    /// Processes the source and prints every result or error
    pub fn run_and_report(&mut self, source_code: &str) -> usize {
        let outcomes = self.process_source(source_code);
        let mut failures = 0;

        for outcome in outcomes {
            match outcome {
                Ok(outcome) => self.print_outcome(&outcome),
                Err(e) => {
                    failures += 1;
                    print_formatted_error(&e, Some(source_code));
                }
            }
        }

        failures
    }

    fn print_outcome(&self, outcome: &StatementOutcome) {
        match outcome {
            StatementOutcome::Evaluated { value } => {
                say!("Evaluated to: ", Bright { self.config.format_result(*value) });
            }
            StatementOutcome::Defined { name } => {
                say!(Bright Black "Defined ", name);
            }
            StatementOutcome::Declared { name } => {
                say!(Bright Black "Declared extern ", name);
            }
        }
    }

    /// Names of every function the engine can call, in the order they became resident
    pub fn resident_symbols(&self) -> Vec<&str> {
        self.context.engine.symbol_names().collect()
    }

    fn show_session(&self) {
        let unit = self.current_unit();
        if unit.is_empty() {
            say!(Bright Black "The open unit is empty");
        } else {
            say!(Dark Magenta { unit.to_string() });
        }

        let engine = &self.context.engine;
        say!(
            Bright Black "Resident: ",
            Bright { engine.symbol_count() },
            Bright Black " functions from ",
            Bright { engine.finalized_unit_count() },
            Bright Black " finalized units"
        );
        say!(Bright Black { self.resident_symbols().join(", ") });
    }
}

/// Holds input lines until they end a statement.
/// A statement may span lines, and a line may hold several statements.
#[derive(Debug, Default)]
pub struct StatementBuffer {
    pending: String,
}

impl StatementBuffer {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns every complete statement once the buffer holds a terminator outside a comment.
    /// Text after the last terminator waits for the next line.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        self.pending.push_str(line);
        if !line.ends_with('\n') {
            self.pending.push('\n');
        }

        let complete = last_statement_end(&self.pending).map(|end| {
            let rest = self.pending.split_off(end + STATEMENT_END_CHAR.len_utf8());
            std::mem::replace(&mut self.pending, rest)
        });

        if !has_code(&self.pending) {
            self.pending.clear();
        }

        complete
    }

    /// Whatever is left once the input ends
    pub fn take_rest(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        has_code(&rest).then_some(rest)
    }
}

fn last_statement_end(source: &str) -> Option<usize> {
    let mut in_comment = false;
    let mut last_end = None;

    for (index, ch) in source.char_indices() {
        if ch == '\n' {
            in_comment = false;
        } else if in_comment {
            continue;
        } else if ch == COMMENT_CHAR {
            in_comment = true;
        } else if ch == STATEMENT_END_CHAR {
            last_end = Some(index);
        }
    }

    last_end
}

fn has_code(source: &str) -> bool {
    source.lines().any(|line| {
        let code = match line.split_once(COMMENT_CHAR) {
            Some((code, _)) => code,
            None => line,
        };
        !code.trim().is_empty()
    })
}

pub fn start_repl_session(config: ReplConfig) -> Result<(), CompilerError> {
    let mut session = ReplSession::new(config)?;

    say!(Green "Kaleido REPL");
    say!(Bright Black "Statements end with ';' and may span lines. Type 'show' to see the open unit and 'exit' to quit.\n");

    run_repl_loop(&mut session, io::stdin().lock());

    say!(Bright Black "Closing REPL session.");
    Ok(())
}

/// Reads lines until the input ends or 'exit' is typed. Returns how many statements failed.
/// Commands are only recognised between statements.
pub fn run_repl_loop<R: BufRead>(session: &mut ReplSession, mut input: R) -> usize {
    let mut buffer = StatementBuffer::default();
    let mut line = String::new();
    let mut failures = 0;

    loop {
        if buffer.is_empty() {
            print!("{}", session.config().prompt);
        } else {
            print!("{CONTINUATION_PROMPT}");
        }
        // The prompt is only cosmetic, a failed flush can be ignored
        let _ = io::stdout().flush();

        line.clear();
        match input.read_line(&mut line) {
            // End of input
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                say!(Red "Error reading input: ", e);
                break;
            }
        }

        if buffer.is_empty() {
            let command = line.trim();
            if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
                break;
            }

            if command.eq_ignore_ascii_case("show") {
                session.show_session();
                continue;
            }
        }

        if let Some(statements) = buffer.push_line(&line) {
            failures += session.run_and_report(&statements);
        }
    }

    // An unterminated last statement still runs
    if let Some(rest) = buffer.take_rest() {
        failures += session.run_and_report(&rest);
    }

    failures
}

/// Runs every statement in a file. Returns how many statements failed.
pub fn run_file(path: &Path, config: ReplConfig) -> Result<usize, CompilerError> {
    let source_code =
        fs::read_to_string(path).map_err(|e| CompilerError::file_error(path, e.to_string()))?;

    let mut session = ReplSession::new(config)?;
    Ok(session.run_and_report(&source_code))
}

#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod tests;
