//! Expression lowering.
//!
//! Every lowering call either leaves exactly one number on the operand stack of the
//! function being built, or returns the first failure it hit. A failure means the
//! statement is abandoned, so nothing emitted after it matters.

use crate::backends::function_registry::FunctionRegistry;
use crate::backends::ir::function_builder::FunctionBuilder;
use crate::backends::ir::ir_nodes::{IrFunction, IrInst};
use crate::backends::ir::unit::CompilationUnit;
use crate::compiler_frontend::ast::ast_nodes::{Expr, ExprKind, VarBinding};
use crate::compiler_frontend::codegen::named_values::NamedValues;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::return_codegen_error;
use crate::runtime::engine::ExecutionEngine;

/// Lowers the body of one function into the current unit
pub struct FunctionLowerer<'a> {
    pub(crate) unit: &'a mut CompilationUnit,
    pub(crate) named_values: &'a mut NamedValues,
    pub(crate) registry: &'a FunctionRegistry,
    pub(crate) engine: &'a dyn ExecutionEngine,
    pub(crate) builder: FunctionBuilder,
}

impl<'a> FunctionLowerer<'a> {
    pub fn new(
        unit: &'a mut CompilationUnit,
        named_values: &'a mut NamedValues,
        registry: &'a FunctionRegistry,
        engine: &'a dyn ExecutionEngine,
        builder: FunctionBuilder,
    ) -> Self {
        FunctionLowerer {
            unit,
            named_values,
            registry,
            engine,
            builder,
        }
    }

    /// Binds each parameter name to its slot
    pub fn bind_parameters(&mut self, parameters: &[String]) {
        for (index, parameter) in parameters.iter().enumerate() {
            if let Some(slot) = self.builder.parameter_slot(index) {
                self.named_values.bind(parameter, slot);
            }
        }
    }

    pub fn finish(self) -> Result<IrFunction, CompilerError> {
        self.builder.finish()
    }

    pub fn lower_expression(&mut self, expr: &Expr) -> Result<(), CompilerError> {
        match &expr.kind {
            ExprKind::Number(value) => {
                self.builder.emit(IrInst::Const(*value));
                Ok(())
            }

            ExprKind::Variable(name) => self.lower_variable(name, expr.location),

            ExprKind::Binary { operator, lhs, rhs } => {
                self.lower_binary(*operator, lhs, rhs, expr.location)
            }

            ExprKind::Call { callee, arguments } => {
                self.lower_call(callee, arguments, expr.location)
            }

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.lower_if(condition, then_branch, else_branch),

            ExprKind::For {
                var_name,
                start,
                end,
                step,
                body,
            } => self.lower_for(var_name, start, end, step.as_deref(), body),

            ExprKind::VarIn { bindings, body } => self.lower_var_in(bindings, body),
        }
    }

    fn lower_variable(&mut self, name: &str, location: TextLocation) -> Result<(), CompilerError> {
        let Some(slot) = self.named_values.lookup(name) else {
            return_codegen_error!(
                UnknownIdentifier,
                format!("Unknown variable name '{name}'"),
                location,
                {
                    VariableName => name,
                    CompilationStage => "Lowering",
                }
            )
        };

        self.builder.emit(IrInst::LoadSlot(slot));
        Ok(())
    }

    fn lower_binary(
        &mut self,
        operator: char,
        lhs: &Expr,
        rhs: &Expr,
        location: TextLocation,
    ) -> Result<(), CompilerError> {
        match operator {
            '=' => return self.lower_assignment(lhs, rhs, location),
            '>' => return self.lower_greater_than(lhs, rhs),
            _ => {}
        }

        self.lower_expression(lhs)?;
        self.lower_expression(rhs)?;

        match operator {
            '+' => self.builder.emit(IrInst::Add),
            '-' => self.builder.emit(IrInst::Sub),
            '*' => self.builder.emit(IrInst::Mul),
            '<' => {
                self.builder.emit(IrInst::LessThanUnordered);
                self.builder.emit(IrInst::BoolToNumber);
            }
            _ => return_codegen_error!(
                UnknownOperator,
                format!("Unknown binary operator '{operator}'"),
                location,
                {
                    OperatorSymbol => operator,
                    CompilationStage => "Lowering",
                }
            ),
        }

        Ok(())
    }

    /// Assignment is an expression, its value is the value written
    fn lower_assignment(
        &mut self,
        target: &Expr,
        value: &Expr,
        location: TextLocation,
    ) -> Result<(), CompilerError> {
        let ExprKind::Variable(name) = &target.kind else {
            return_codegen_error!(
                InvalidAssignmentTarget,
                format!("Destination of '=' must be a variable, found '{target}'"),
                location,
                {
                    OperatorSymbol => '=',
                    CompilationStage => "Lowering",
                    PrimarySuggestion => "Only a variable name can appear on the left of '='",
                }
            )
        };

        self.lower_expression(value)?;

        let Some(slot) = self.named_values.lookup(name) else {
            return_codegen_error!(
                UnknownIdentifier,
                format!("Unknown variable name '{name}'"),
                target.location,
                {
                    VariableName => name,
                    CompilationStage => "Lowering",
                }
            )
        };

        self.builder.emit(IrInst::TeeSlot(slot));
        Ok(())
    }

    /// a > b is b < a through the same unordered comparison.
    /// The lhs still runs first, so it is parked in a scratch slot while the rhs runs.
    fn lower_greater_than(&mut self, lhs: &Expr, rhs: &Expr) -> Result<(), CompilerError> {
        self.lower_expression(lhs)?;
        let scratch = self.builder.create_slot();
        self.builder.emit(IrInst::StoreSlot(scratch));

        self.lower_expression(rhs)?;
        self.builder.emit(IrInst::LoadSlot(scratch));

        self.builder.emit(IrInst::LessThanUnordered);
        self.builder.emit(IrInst::BoolToNumber);
        Ok(())
    }

    fn lower_call(
        &mut self,
        callee: &str,
        arguments: &[Expr],
        location: TextLocation,
    ) -> Result<(), CompilerError> {
        let arity = self.resolve_callee(callee, location)?;

        for argument in arguments {
            self.lower_expression(argument)?;
        }

        if arity != arguments.len() {
            return_codegen_error!(
                ArityMismatch,
                format!(
                    "'{callee}' takes {arity} arguments, but {} were passed",
                    arguments.len()
                ),
                location,
                {
                    FunctionName => callee,
                    ExpectedArity => arity,
                    FoundArity => arguments.len(),
                    CompilationStage => "Lowering",
                }
            );
        }

        self.builder.emit(IrInst::Call {
            callee: callee.to_owned(),
            argument_count: arity,
        });
        Ok(())
    }

    /// Finds the arity of a callee, declaring it in this unit if it lives in the engine.
    ///
    /// Order: this unit (including the function being built), then the engine's resident
    /// symbols, whose arity has to come from the registry since the engine only knows addresses.
    fn resolve_callee(&mut self, callee: &str, location: TextLocation) -> Result<usize, CompilerError> {
        if callee == self.builder.name() {
            return Ok(self.builder.arity());
        }

        if let Some(arity) = self.unit.declared_arity(callee) {
            return Ok(arity);
        }

        if self.engine.lookup(callee).is_none() {
            return_codegen_error!(
                UnknownFunction,
                format!("Unknown function referenced: '{callee}'"),
                location,
                {
                    FunctionName => callee,
                    CompilationStage => "Lowering",
                    PrimarySuggestion => "Define the function with 'def' before calling it",
                }
            );
        }

        let Some(arity) = self.registry.arity_of(callee) else {
            return_codegen_error!(
                ArityUnknown,
                format!("'{callee}' is resident in the engine but its parameter count was never recorded"),
                location,
                {
                    FunctionName => callee,
                    CompilationStage => "Lowering",
                    PrimarySuggestion => "Declare it with 'extern' to give its parameters",
                }
            )
        };

        self.unit.declare_external(callee, arity)?;
        Ok(arity)
    }

    fn lower_if(
        &mut self,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
    ) -> Result<(), CompilerError> {
        self.lower_expression(condition)?;
        self.builder.emit(IrInst::NumberToBool);

        self.builder.begin_if();
        self.lower_expression(then_branch)?;
        self.builder.begin_else()?;
        self.lower_expression(else_branch)?;
        self.builder.end_if()
    }

    /// var a = 1, b in body
    /// Each initializer runs before its own name is bound, uninitialized names start at 0.
    fn lower_var_in(&mut self, bindings: &[VarBinding], body: &Expr) -> Result<(), CompilerError> {
        let mut shadowed = Vec::with_capacity(bindings.len());

        for binding in bindings {
            match &binding.initializer {
                Some(initializer) => self.lower_expression(initializer)?,
                None => self.builder.emit(IrInst::Const(0.0)),
            }

            let slot = self.builder.create_slot();
            self.builder.emit(IrInst::StoreSlot(slot));
            shadowed.push((binding.name.as_str(), self.named_values.bind(&binding.name, slot)));
        }

        self.lower_expression(body)?;

        // Unwind in reverse so a name bound twice in one var ends up as it started
        for (name, prior) in shadowed.into_iter().rev() {
            self.named_values.restore(name, prior);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lower_expression_tests.rs"]
mod tests;
