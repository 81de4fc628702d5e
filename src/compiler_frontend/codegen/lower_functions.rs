//! Lowering of top level statements.
//!
//! Definitions and the anonymous wrapper around a bare expression each become one
//! IrFunction in the current unit. Externs only add a declaration.

use crate::backends::function_registry::FunctionRegistry;
use crate::backends::ir::function_builder::FunctionBuilder;
use crate::backends::ir::ir_nodes::IrFunction;
use crate::backends::ir::unit::CompilationUnit;
use crate::compiler_frontend::ast::ast_nodes::{Expr, FunctionDef, Prototype, TopLevel};
use crate::compiler_frontend::codegen::lower_expression::FunctionLowerer;
use crate::compiler_frontend::codegen::named_values::NamedValues;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::runtime::engine::ExecutionEngine;
use crate::{codegen_log, return_codegen_error, return_compiler_error};

/// What a successfully lowered statement added to the unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoweredStatement {
    Definition { name: String },
    Extern { name: String },

    // The wrapper must be finalized and run straight away
    Anonymous { name: String },
}

/// Everything lowering reads or changes while a statement goes into the current unit
pub struct UnitLowering<'a> {
    pub unit: &'a mut CompilationUnit,
    pub named_values: &'a mut NamedValues,
    pub registry: &'a mut FunctionRegistry,
    pub engine: &'a dyn ExecutionEngine,
}

impl UnitLowering<'_> {
    /// `anonymous_name` is used if the statement is a bare expression
    pub fn lower_top_level(
        &mut self,
        statement: &TopLevel,
        anonymous_name: &str,
    ) -> Result<LoweredStatement, CompilerError> {
        match statement {
            TopLevel::Definition(definition) => self.lower_definition(definition),
            TopLevel::Extern(prototype) => self.lower_extern(prototype),
            TopLevel::Expression(expr) => self.lower_anonymous(expr, anonymous_name),
        }
    }

    fn lower_definition(&mut self, definition: &FunctionDef) -> Result<LoweredStatement, CompilerError> {
        let prototype = &definition.prototype;
        let name = prototype.name.as_str();

        if self.unit.declared_arity(name).is_some() || self.engine.lookup(name).is_some() {
            return_codegen_error!(
                FunctionRedefinition,
                format!("Function '{name}' is already defined"),
                prototype.location,
                {
                    FunctionName => name,
                    CompilationStage => "Lowering",
                    PrimarySuggestion => "Functions can't be redefined, pick a new name",
                }
            );
        }

        // Recorded before the body so recursive calls can see it.
        // A different old arity can only come from a unit that was abandoned before finalize.
        self.registry.record(name, prototype.arity());

        let function = self.lower_function(name, &prototype.parameters, &definition.body)?;
        self.unit.add_function(function)?;

        Ok(LoweredStatement::Definition {
            name: name.to_owned(),
        })
    }

    /// An extern names a function that is already resident, and gives its arity
    fn lower_extern(&mut self, prototype: &Prototype) -> Result<LoweredStatement, CompilerError> {
        let name = prototype.name.as_str();
        let arity = prototype.arity();

        let known_arity = match self.unit.declared_arity(name) {
            Some(declared) => Some(declared),
            None => {
                if self.engine.lookup(name).is_none() {
                    return_codegen_error!(
                        UnknownFunction,
                        format!("extern '{name}' does not match any defined or host function"),
                        prototype.location,
                        {
                            FunctionName => name,
                            CompilationStage => "Lowering",
                        }
                    );
                }
                self.registry.arity_of(name)
            }
        };

        if let Some(expected) = known_arity {
            if expected != arity {
                return_codegen_error!(
                    ArityMismatch,
                    format!("extern '{name}' has {arity} parameters, but it was defined with {expected}"),
                    prototype.location,
                    {
                        FunctionName => name,
                        ExpectedArity => expected,
                        FoundArity => arity,
                        CompilationStage => "Lowering",
                    }
                );
            }
        }

        self.registry.record(name, arity);
        if !self.unit.defines(name) {
            self.unit.declare_external(name, arity)?;
        }

        Ok(LoweredStatement::Extern {
            name: name.to_owned(),
        })
    }

    fn lower_anonymous(&mut self, expr: &Expr, name: &str) -> Result<LoweredStatement, CompilerError> {
        if self.unit.declared_arity(name).is_some() || self.engine.lookup(name).is_some() {
            return_compiler_error!("Anonymous function name '{}' was reused", name);
        }

        let function = self.lower_function(name, &[], expr)?;
        self.unit.add_function(function)?;

        Ok(LoweredStatement::Anonymous {
            name: name.to_owned(),
        })
    }

    /// Parameters become the first slots and start out bound, the environment is otherwise empty
    fn lower_function(
        &mut self,
        name: &str,
        parameters: &[String],
        body: &Expr,
    ) -> Result<IrFunction, CompilerError> {
        self.named_values.clear_all();

        let mut lowerer = FunctionLowerer::new(
            self.unit,
            self.named_values,
            self.registry,
            self.engine,
            FunctionBuilder::new(name, parameters),
        );
        lowerer.bind_parameters(parameters);
        lowerer.lower_expression(body)?;

        let function = lowerer.finish()?;
        codegen_log!(Green "Lowered ", Dark Magenta { function.to_string() });

        Ok(function)
    }
}

#[cfg(test)]
#[path = "tests/lower_functions_tests.rs"]
mod tests;
