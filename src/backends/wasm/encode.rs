//! Unit to Wasm encoder.
//!
//! Each unit becomes one standalone module:
//! - one function type per arity (every parameter and result is f64)
//! - an `env` import for every external declaration, in declaration order
//! - every defined function, exported under its own name
//!
//! Calls in the IR are by name, so they are only turned into function indices here.

use crate::backends::ir::ir_nodes::{IrFunction, IrInst};
use crate::backends::ir::unit::CompilationUnit;
use crate::backends::wasm::validator::validate_unit_module;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::settings::IMPORT_MODULE;
use crate::{codegen_log, return_compiler_error};
use rustc_hash::FxHashMap;
use wasm_encoder::{
    BlockType, CodeSection, EntityType, ExportKind, ExportSection, Function, FunctionSection,
    Ieee64, ImportSection, Instruction, Module, TypeSection, ValType,
};

/// Validated module bytes plus what the engine needs to link them
#[derive(Debug, Clone)]
pub struct EncodedUnit {
    pub bytes: Vec<u8>,

    // (name, arity) of each import, in import index order
    pub imports: Vec<(String, usize)>,
    pub exports: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct CallTarget {
    index: u32,
    arity: usize,
}

// Open structured blocks while encoding a body, innermost last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Loop,
    If,
}

pub fn encode_unit(unit: &CompilationUnit) -> Result<EncodedUnit, CompilerError> {
    let mut types = TypeSection::new();
    let mut type_indices: FxHashMap<usize, u32> = FxHashMap::default();
    let mut type_for_arity = |arity: usize| -> u32 {
        let next_index = type_indices.len() as u32;
        *type_indices.entry(arity).or_insert_with(|| {
            types.ty().function(vec![ValType::F64; arity], vec![ValType::F64]);
            next_index
        })
    };

    let mut call_targets: FxHashMap<&str, CallTarget> = FxHashMap::default();

    // Imports take the first function indices
    let mut imports = ImportSection::new();
    for (index, external) in unit.externals().iter().enumerate() {
        let type_index = type_for_arity(external.arity);
        imports.import(
            IMPORT_MODULE,
            &external.name,
            EntityType::Function(type_index),
        );
        call_targets.insert(
            &external.name,
            CallTarget {
                index: index as u32,
                arity: external.arity,
            },
        );
    }

    let import_count = unit.externals().len() as u32;
    let mut functions = FunctionSection::new();
    let mut exports = ExportSection::new();
    for (offset, function) in unit.functions().iter().enumerate() {
        let index = import_count + offset as u32;
        functions.function(type_for_arity(function.arity()));
        exports.export(&function.name, ExportKind::Func, index);
        call_targets.insert(
            &function.name,
            CallTarget {
                index,
                arity: function.arity(),
            },
        );
    }

    let mut code = CodeSection::new();
    for function in unit.functions() {
        code.function(&encode_function(function, &call_targets)?);
    }

    // Section order matters: Type, Import, Function, Export, Code
    let mut module = Module::new();
    module.section(&types);
    module.section(&imports);
    module.section(&functions);
    module.section(&exports);
    module.section(&code);

    let bytes = module.finish();
    validate_unit_module(&bytes, unit.id)?;

    codegen_log!(Green "Encoded unit ", Bright {unit.id}, " into ", Bright {bytes.len()}, " bytes");

    Ok(EncodedUnit {
        bytes,
        imports: unit
            .externals()
            .iter()
            .map(|external| (external.name.to_owned(), external.arity))
            .collect(),
        exports: unit
            .functions()
            .iter()
            .map(|function| function.name.to_owned())
            .collect(),
    })
}

fn encode_function(
    function: &IrFunction,
    call_targets: &FxHashMap<&str, CallTarget>,
) -> Result<Function, CompilerError> {
    let locals = match function.local_count() {
        0 => Vec::new(),
        count => vec![(count, ValType::F64)],
    };

    let mut wasm_function = Function::new(locals);
    let mut labels: Vec<Label> = Vec::new();
    encode_block(
        &function.body,
        &function.name,
        &mut wasm_function,
        &mut labels,
        call_targets,
    )?;
    wasm_function.instruction(&Instruction::End);

    Ok(wasm_function)
}

fn encode_block(
    block: &[IrInst],
    function_name: &str,
    wasm_function: &mut Function,
    labels: &mut Vec<Label>,
    call_targets: &FxHashMap<&str, CallTarget>,
) -> Result<(), CompilerError> {
    for instruction in block {
        match instruction {
            IrInst::Const(value) => {
                wasm_function.instruction(&Instruction::F64Const(Ieee64::from(*value)));
            }
            IrInst::LoadSlot(slot) => {
                wasm_function.instruction(&Instruction::LocalGet(slot.0));
            }
            IrInst::StoreSlot(slot) => {
                wasm_function.instruction(&Instruction::LocalSet(slot.0));
            }
            IrInst::TeeSlot(slot) => {
                wasm_function.instruction(&Instruction::LocalTee(slot.0));
            }

            IrInst::Add => {
                wasm_function.instruction(&Instruction::F64Add);
            }
            IrInst::Sub => {
                wasm_function.instruction(&Instruction::F64Sub);
            }
            IrInst::Mul => {
                wasm_function.instruction(&Instruction::F64Mul);
            }

            // f64.lt is ordered, so unordered-less-than is "not greater or equal"
            IrInst::LessThanUnordered => {
                wasm_function.instruction(&Instruction::F64Ge);
                wasm_function.instruction(&Instruction::I32Eqz);
            }
            IrInst::BoolToNumber => {
                wasm_function.instruction(&Instruction::F64ConvertI32U);
            }

            // |x| > 0 is false for zero, negative zero and NaN
            IrInst::NumberToBool => {
                wasm_function.instruction(&Instruction::F64Abs);
                wasm_function.instruction(&Instruction::F64Const(Ieee64::from(0.0_f64)));
                wasm_function.instruction(&Instruction::F64Gt);
            }

            IrInst::Call {
                callee,
                argument_count,
            } => {
                let Some(target) = call_targets.get(callee.as_str()) else {
                    return_compiler_error!(
                        "'{}' calls '{}', which its unit never declared",
                        function_name,
                        callee
                    );
                };

                if target.arity != *argument_count {
                    return_compiler_error!(
                        "'{}' calls '{}' with {} arguments, but it takes {}",
                        function_name,
                        callee,
                        argument_count,
                        target.arity
                    );
                }

                wasm_function.instruction(&Instruction::Call(target.index));
            }

            IrInst::Drop => {
                wasm_function.instruction(&Instruction::Drop);
            }

            IrInst::Loop(body) => {
                wasm_function.instruction(&Instruction::Loop(BlockType::Empty));
                labels.push(Label::Loop);
                encode_block(body, function_name, wasm_function, labels, call_targets)?;
                labels.pop();
                wasm_function.instruction(&Instruction::End);
            }

            IrInst::ContinueIf => {
                // Branch depth counts outwards from the innermost open block
                let Some(depth) = labels.iter().rev().position(|label| *label == Label::Loop)
                else {
                    return_compiler_error!("continue_if outside of a loop in '{}'", function_name);
                };

                wasm_function.instruction(&Instruction::BrIf(depth as u32));
            }

            IrInst::IfElse {
                then_block,
                else_block,
            } => {
                wasm_function.instruction(&Instruction::If(BlockType::Result(ValType::F64)));
                labels.push(Label::If);
                encode_block(then_block, function_name, wasm_function, labels, call_targets)?;
                wasm_function.instruction(&Instruction::Else);
                encode_block(else_block, function_name, wasm_function, labels, call_targets)?;
                labels.pop();
                wasm_function.instruction(&Instruction::End);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/encode_tests.rs"]
mod tests;
