use crate::backends::function_registry::FunctionRegistry;
use crate::backends::ir::function_builder::FunctionBuilder;
use crate::backends::ir::ir_nodes::{IrInst, SlotId};
use crate::backends::ir::unit::CompilationUnit;
use crate::compiler_frontend::ast::ast_nodes::Expr;
use crate::compiler_frontend::codegen::lower_expression::FunctionLowerer;
use crate::compiler_frontend::codegen::named_values::NamedValues;
use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorType};
use crate::runtime::engine::{ExecutionEngine, HostCallback, SymbolAddress};

struct NoSymbols;

impl ExecutionEngine for NoSymbols {
    fn declare_external(&mut self, _: &str, _: usize, _: HostCallback) -> Result<(), CompilerError> {
        Ok(())
    }

    fn finalize(&mut self, _: CompilationUnit) -> Result<(), CompilerError> {
        Ok(())
    }

    fn lookup(&self, _: &str) -> Option<SymbolAddress> {
        None
    }

    fn invoke(&mut self, _: SymbolAddress, _: &[f64]) -> Result<f64, CompilerError> {
        Ok(0.0)
    }
}

fn lower_with_parameters(
    parameters: &[&str],
    expr: &Expr,
    named_values: &mut NamedValues,
) -> Result<Vec<IrInst>, CompilerError> {
    let parameters: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
    let mut unit = CompilationUnit::new(0);
    let registry = FunctionRegistry::new();

    let mut lowerer = FunctionLowerer::new(
        &mut unit,
        named_values,
        &registry,
        &NoSymbols,
        FunctionBuilder::new("loop_test", &parameters),
    );
    lowerer.bind_parameters(&parameters);
    lowerer.lower_expression(expr)?;
    Ok(lowerer.finish()?.body)
}

#[test]
fn loop_steps_in_place_and_tests_the_stepped_value() {
    let mut named_values = NamedValues::new();
    let for_loop = Expr::for_loop(
        "i",
        Expr::number(1.0),
        Expr::number(3.0),
        None,
        Expr::variable("i"),
    );

    let body = lower_with_parameters(&[], &for_loop, &mut named_values).expect("lowers");

    let loop_slot = SlotId(0);
    assert_eq!(
        body,
        vec![
            IrInst::Const(1.0),
            IrInst::StoreSlot(loop_slot),
            IrInst::Loop(vec![
                IrInst::LoadSlot(loop_slot),
                IrInst::Drop,
                IrInst::LoadSlot(loop_slot),
                IrInst::Const(1.0),
                IrInst::Add,
                IrInst::TeeSlot(loop_slot),
                IrInst::Const(3.0),
                IrInst::LessThanUnordered,
                IrInst::ContinueIf,
            ]),
            IrInst::Const(0.0),
        ]
    );
}

#[test]
fn explicit_step_is_evaluated_once_before_the_loop() {
    let mut named_values = NamedValues::new();
    let for_loop = Expr::for_loop(
        "i",
        Expr::number(0.0),
        Expr::number(10.0),
        Some(Expr::number(2.0)),
        Expr::number(0.0),
    );

    let body = lower_with_parameters(&[], &for_loop, &mut named_values).expect("lowers");

    assert_eq!(body[2], IrInst::Const(2.0));
    assert_eq!(body[3], IrInst::StoreSlot(SlotId(1)));
    let IrInst::Loop(loop_body) = &body[4] else {
        panic!("expected the loop after the step, got {:?}", body[4]);
    };
    assert!(loop_body.contains(&IrInst::LoadSlot(SlotId(1))));
    assert!(!loop_body.contains(&IrInst::Const(2.0)));
}

#[test]
fn loop_variable_shadows_a_parameter_and_is_restored() {
    let mut named_values = NamedValues::new();
    let for_loop = Expr::for_loop(
        "x",
        Expr::variable("x"),
        Expr::number(5.0),
        None,
        Expr::variable("x"),
    );

    let body = lower_with_parameters(&["x"], &for_loop, &mut named_values).expect("lowers");

    // The start value reads the parameter, the body reads the loop slot
    assert_eq!(body[0], IrInst::LoadSlot(SlotId(0)));
    assert_eq!(body[1], IrInst::StoreSlot(SlotId(1)));
    let IrInst::Loop(loop_body) = &body[2] else {
        panic!("expected a loop, got {:?}", body[2]);
    };
    assert_eq!(loop_body[0], IrInst::LoadSlot(SlotId(1)));

    assert_eq!(named_values.lookup("x"), Some(SlotId(0)));
}

#[test]
fn loop_variable_is_unbound_after_the_loop() {
    let mut named_values = NamedValues::new();
    let for_loop = Expr::for_loop(
        "i",
        Expr::number(0.0),
        Expr::number(1.0),
        None,
        Expr::number(0.0),
    );

    lower_with_parameters(&[], &for_loop, &mut named_values).expect("lowers");
    assert_eq!(named_values.lookup("i"), None);
}

#[test]
fn failure_in_the_body_propagates() {
    let mut named_values = NamedValues::new();
    let for_loop = Expr::for_loop(
        "i",
        Expr::number(0.0),
        Expr::number(1.0),
        None,
        Expr::variable("missing"),
    );

    let error = lower_with_parameters(&[], &for_loop, &mut named_values).expect_err("unbound");
    assert_eq!(error.error_type, ErrorType::UnknownIdentifier);
}
