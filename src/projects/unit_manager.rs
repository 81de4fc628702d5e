//! Drives one statement at a time through lowering and, for bare expressions, execution.
//!
//! Definitions and externs accumulate in the open unit. A bare expression closes it:
//! the whole unit is handed to the engine, the expression's wrapper is run, and a fresh
//! unit is opened whether or not that worked. A lowering failure throws the open unit
//! away, along with any definitions it held.

use crate::backends::function_registry::FunctionRegistry;
use crate::backends::ir::unit::CompilationUnit;
use crate::compiler_frontend::ast::ast_nodes::TopLevel;
use crate::compiler_frontend::codegen::lower_functions::{LoweredStatement, UnitLowering};
use crate::compiler_frontend::codegen::named_values::NamedValues;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::eval_log;
use crate::runtime::engine::ExecutionEngine;
use crate::settings::ANON_EXPR_PREFIX;
use saying::say;
use std::mem;

/// State that lives for the whole session and only ever grows
pub struct SessionContext<E: ExecutionEngine> {
    pub engine: E,
    pub registry: FunctionRegistry,
}

impl<E: ExecutionEngine> SessionContext<E> {
    pub fn new(engine: E) -> Self {
        SessionContext {
            engine,
            registry: FunctionRegistry::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    Defined { name: String },
    Declared { name: String },
    Evaluated { value: f64 },
}

pub struct UnitManager {
    unit: CompilationUnit,
    named_values: NamedValues,
    next_unit_id: u64,
    next_anon_id: u64,
    show_unit_ir: bool,
}

impl Default for UnitManager {
    fn default() -> Self {
        UnitManager::new()
    }
}

impl UnitManager {
    pub fn new() -> Self {
        UnitManager {
            unit: CompilationUnit::new(0),
            named_values: NamedValues::new(),
            next_unit_id: 1,
            next_anon_id: 0,
            show_unit_ir: false,
        }
    }

    /// Prints each unit's IR just before it is finalized
    pub fn with_unit_ir_display(mut self, show_unit_ir: bool) -> Self {
        self.show_unit_ir = show_unit_ir;
        self
    }

    /// The unit still collecting definitions
    pub fn current_unit(&self) -> &CompilationUnit {
        &self.unit
    }

    pub fn process<E: ExecutionEngine>(
        &mut self,
        context: &mut SessionContext<E>,
        statement: &TopLevel,
    ) -> Result<StatementOutcome, CompilerError> {
        let anonymous_name = format!("{ANON_EXPR_PREFIX}_{}", self.next_anon_id);

        let lowered = UnitLowering {
            unit: &mut self.unit,
            named_values: &mut self.named_values,
            registry: &mut context.registry,
            engine: &context.engine,
        }
        .lower_top_level(statement, &anonymous_name);

        match lowered {
            Ok(LoweredStatement::Definition { name }) => Ok(StatementOutcome::Defined { name }),
            Ok(LoweredStatement::Extern { name }) => Ok(StatementOutcome::Declared { name }),
            Ok(LoweredStatement::Anonymous { name }) => {
                self.next_anon_id += 1;
                self.execute(context, &name)
            }
            Err(e) => {
                eval_log!(Yellow "Abandoning unit ", Bright {self.unit.id});
                self.take_unit();
                Err(e)
            }
        }
    }

    /// Finalizes the open unit and runs its anonymous wrapper.
    /// A fresh unit is already open by the time any engine error comes back.
    fn execute<E: ExecutionEngine>(
        &mut self,
        context: &mut SessionContext<E>,
        anonymous_name: &str,
    ) -> Result<StatementOutcome, CompilerError> {
        let unit = self.take_unit();

        if self.show_unit_ir {
            say!(Dark Magenta { unit.to_string() });
        }

        context.engine.finalize(unit)?;

        let Some(address) = context.engine.lookup(anonymous_name) else {
            return Err(CompilerError::lookup_error(anonymous_name));
        };

        let value = context.engine.invoke(address, &[])?;
        eval_log!(Green "Evaluated ", anonymous_name, " to ", Bright { value });

        Ok(StatementOutcome::Evaluated { value })
    }

    /// Swaps in an empty unit and clears the environment, returning the old unit
    fn take_unit(&mut self) -> CompilationUnit {
        let fresh = CompilationUnit::new(self.next_unit_id);
        self.next_unit_id += 1;
        self.named_values.clear_all();

        mem::replace(&mut self.unit, fresh)
    }
}

#[cfg(test)]
#[path = "tests/unit_manager_tests.rs"]
mod tests;
