use super::encode_unit;
use crate::backends::ir::ir_nodes::{IrFunction, IrInst, SlotId};
use crate::backends::ir::unit::CompilationUnit;
use crate::compiler_frontend::compiler_errors::ErrorType;
use wasmparser::{Parser, Payload};

fn function(name: &str, parameters: &[&str], slot_count: u32, body: Vec<IrInst>) -> IrFunction {
    IrFunction {
        name: name.to_owned(),
        parameters: parameters.iter().map(|p| p.to_string()).collect(),
        slot_count,
        body,
    }
}

/// Export names, read back from the module bytes
fn exported_names(bytes: &[u8]) -> Vec<String> {
    let mut exports = Vec::new();

    for payload in Parser::new(0).parse_all(bytes) {
        if let Payload::ExportSection(reader) = payload.expect("valid payload") {
            for export in reader {
                exports.push(export.expect("valid export").name.to_string());
            }
        }
    }

    exports
}

#[test]
fn externals_are_imported_and_definitions_exported() {
    let mut unit = CompilationUnit::new(1);
    unit.declare_external("printd", 1).expect("declaration");
    unit.add_function(function(
        "twice",
        &["x"],
        1,
        vec![
            IrInst::LoadSlot(SlotId(0)),
            IrInst::Const(2.0),
            IrInst::Mul,
        ],
    ))
    .expect("definition");
    unit.add_function(function(
        "__anon_expr_1",
        &[],
        0,
        vec![
            IrInst::Const(4.0),
            IrInst::Call {
                callee: String::from("twice"),
                argument_count: 1,
            },
            IrInst::Call {
                callee: String::from("printd"),
                argument_count: 1,
            },
        ],
    ))
    .expect("definition");

    let encoded = encode_unit(&unit).expect("unit encodes");
    assert_eq!(encoded.imports, vec![(String::from("printd"), 1)]);
    assert_eq!(encoded.exports, vec!["twice", "__anon_expr_1"]);

    assert_eq!(exported_names(&encoded.bytes), vec!["twice", "__anon_expr_1"]);
}

#[test]
fn loops_and_conditionals_encode_to_a_valid_module() {
    let mut unit = CompilationUnit::new(2);
    unit.add_function(function(
        "count",
        &["n"],
        2,
        vec![
            IrInst::Const(0.0),
            IrInst::StoreSlot(SlotId(1)),
            IrInst::Loop(vec![
                IrInst::LoadSlot(SlotId(0)),
                IrInst::NumberToBool,
                IrInst::IfElse {
                    then_block: vec![IrInst::Const(1.0)],
                    else_block: vec![IrInst::Const(0.0)],
                },
                IrInst::Drop,
                IrInst::LoadSlot(SlotId(1)),
                IrInst::Const(1.0),
                IrInst::Add,
                IrInst::TeeSlot(SlotId(1)),
                IrInst::LoadSlot(SlotId(0)),
                IrInst::LessThanUnordered,
                IrInst::ContinueIf,
            ]),
            IrInst::LoadSlot(SlotId(1)),
        ],
    ))
    .expect("definition");

    encode_unit(&unit).expect("validates");
}

#[test]
fn continue_if_inside_an_if_targets_the_enclosing_loop() {
    let mut unit = CompilationUnit::new(3);
    unit.add_function(function(
        "nested",
        &[],
        0,
        vec![
            IrInst::Loop(vec![
                IrInst::Const(0.0),
                IrInst::NumberToBool,
                IrInst::IfElse {
                    then_block: vec![
                        IrInst::Const(0.0),
                        IrInst::NumberToBool,
                        IrInst::ContinueIf,
                        IrInst::Const(1.0),
                    ],
                    else_block: vec![IrInst::Const(2.0)],
                },
                IrInst::Drop,
            ]),
            IrInst::Const(0.0),
        ],
    ))
    .expect("definition");

    encode_unit(&unit).expect("br_if depth 1 is valid");
}

#[test]
fn call_to_an_undeclared_name_is_a_compiler_bug() {
    let mut unit = CompilationUnit::new(4);
    unit.add_function(function(
        "f",
        &[],
        0,
        vec![IrInst::Call {
            callee: String::from("ghost"),
            argument_count: 0,
        }],
    ))
    .expect("definition");

    let error = encode_unit(&unit).expect_err("ghost is not declared");
    assert_eq!(error.error_type, ErrorType::Compiler);
}

#[test]
fn continue_if_outside_a_loop_is_a_compiler_bug() {
    let mut unit = CompilationUnit::new(5);
    unit.add_function(function(
        "f",
        &[],
        0,
        vec![
            IrInst::Const(1.0),
            IrInst::NumberToBool,
            IrInst::ContinueIf,
            IrInst::Const(0.0),
        ],
    ))
    .expect("definition");

    assert!(encode_unit(&unit).is_err());
}
