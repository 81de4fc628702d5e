use crate::backends::ir::ir_nodes::IrInst;
use crate::compiler_frontend::ast::ast_nodes::Expr;
use crate::compiler_frontend::codegen::lower_expression::FunctionLowerer;
use crate::compiler_frontend::compiler_errors::CompilerError;

impl FunctionLowerer<'_> {
    /// for var = start, end, step in body
    ///
    /// The loop variable lives in its own slot and is stepped in place. The exit test runs
    /// after the step, against the stepped value, so the body always runs for `start`
    /// and never runs for the value that reaches `end`. The loop's own value is always 0.
    pub(crate) fn lower_for(
        &mut self,
        var_name: &str,
        start: &Expr,
        end: &Expr,
        step: Option<&Expr>,
        body: &Expr,
    ) -> Result<(), CompilerError> {
        let loop_slot = self.builder.create_slot();
        self.lower_expression(start)?;
        self.builder.emit(IrInst::StoreSlot(loop_slot));

        // The step is evaluated once, before the loop variable comes into scope
        let step_slot = match step {
            Some(step) => {
                self.lower_expression(step)?;
                let slot = self.builder.create_slot();
                self.builder.emit(IrInst::StoreSlot(slot));
                Some(slot)
            }
            None => None,
        };

        self.builder.begin_loop();
        let shadowed = self.named_values.bind(var_name, loop_slot);

        self.lower_expression(body)?;
        self.builder.emit(IrInst::Drop);

        // var = var + step, keeping the new value for the exit test
        self.builder.emit(IrInst::LoadSlot(loop_slot));
        match step_slot {
            Some(slot) => self.builder.emit(IrInst::LoadSlot(slot)),
            None => self.builder.emit(IrInst::Const(1.0)),
        }
        self.builder.emit(IrInst::Add);
        self.builder.emit(IrInst::TeeSlot(loop_slot));

        self.lower_expression(end)?;
        self.builder.emit(IrInst::LessThanUnordered);
        self.builder.emit(IrInst::ContinueIf);
        self.builder.end_loop()?;

        self.named_values.restore(var_name, shadowed);

        self.builder.emit(IrInst::Const(0.0));
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lower_loops_tests.rs"]
mod tests;
