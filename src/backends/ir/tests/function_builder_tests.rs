use super::FunctionBuilder;
use crate::backends::ir::ir_nodes::{IrInst, SlotId};
use crate::compiler_frontend::compiler_errors::ErrorType;

fn params(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn parameters_take_the_first_slots() {
    let mut builder = FunctionBuilder::new("f", &params(&["a", "b"]));
    assert_eq!(builder.parameter_slot(1), Some(SlotId(1)));
    assert_eq!(builder.parameter_slot(2), None);
    assert_eq!(builder.create_slot(), SlotId(2));

    let function = builder.finish().expect("no open regions");
    assert_eq!(function.slot_count, 3);
    assert_eq!(function.local_count(), 1);
}

#[test]
fn loop_instructions_nest_inside_the_loop() {
    let mut builder = FunctionBuilder::new("f", &[]);
    builder.emit(IrInst::Const(1.0));
    builder.begin_loop();
    builder.emit(IrInst::Const(2.0));
    builder.emit(IrInst::ContinueIf);
    builder.end_loop().expect("loop is open");

    let function = builder.finish().expect("no open regions");
    assert_eq!(
        function.body,
        vec![
            IrInst::Const(1.0),
            IrInst::Loop(vec![IrInst::Const(2.0), IrInst::ContinueIf]),
        ]
    );
}

#[test]
fn if_else_collects_both_blocks() {
    let mut builder = FunctionBuilder::new("f", &[]);
    builder.begin_if();
    builder.emit(IrInst::Const(1.0));
    builder.begin_else().expect("then block is open");
    builder.emit(IrInst::Const(2.0));
    builder.end_if().expect("else block is open");

    let function = builder.finish().expect("no open regions");
    assert_eq!(
        function.body,
        vec![IrInst::IfElse {
            then_block: vec![IrInst::Const(1.0)],
            else_block: vec![IrInst::Const(2.0)],
        }]
    );
}

#[test]
fn mismatched_region_close_is_a_compiler_bug() {
    let mut builder = FunctionBuilder::new("f", &[]);
    builder.begin_loop();
    let error = builder.end_if().expect_err("a loop is open, not an else block");
    assert_eq!(error.error_type, ErrorType::Compiler);
}

#[test]
fn unclosed_regions_fail_finish() {
    let mut builder = FunctionBuilder::new("f", &[]);
    builder.begin_loop();
    assert!(builder.finish().is_err());

    let mut builder = FunctionBuilder::new("g", &[]);
    assert!(builder.end_loop().is_err());
}
