//! Text rendering of the IR, used by the REPL 'show' command and codegen logging.

use crate::backends::ir::ir_nodes::{IrFunction, IrInst, SlotId};
use crate::backends::ir::unit::CompilationUnit;
use std::fmt::{Display, Formatter, Result as FmtResult};

const INDENT: &str = "    ";

impl Display for SlotId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "%{}", self.0)
    }
}

impl Display for IrFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "fn {}(", self.name)?;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: %{index}", parameter)?;
        }
        writeln!(f, ") locals {} {{", self.local_count())?;
        write_block(f, &self.body, 1)?;
        writeln!(f, "}}")
    }
}

impl Display for CompilationUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "; unit {}", self.id)?;
        for external in self.externals() {
            writeln!(f, "extern {}/{}", external.name, external.arity)?;
        }
        for function in self.functions() {
            write!(f, "{function}")?;
        }
        Ok(())
    }
}

fn write_block(f: &mut Formatter<'_>, block: &[IrInst], depth: usize) -> FmtResult {
    for instruction in block {
        write_instruction(f, instruction, depth)?;
    }
    Ok(())
}

fn write_instruction(f: &mut Formatter<'_>, instruction: &IrInst, depth: usize) -> FmtResult {
    let indent = INDENT.repeat(depth);

    match instruction {
        IrInst::Const(value) => writeln!(f, "{indent}const {value}"),
        IrInst::LoadSlot(slot) => writeln!(f, "{indent}load {slot}"),
        IrInst::StoreSlot(slot) => writeln!(f, "{indent}store {slot}"),
        IrInst::TeeSlot(slot) => writeln!(f, "{indent}tee {slot}"),
        IrInst::Add => writeln!(f, "{indent}add"),
        IrInst::Sub => writeln!(f, "{indent}sub"),
        IrInst::Mul => writeln!(f, "{indent}mul"),
        IrInst::LessThanUnordered => writeln!(f, "{indent}lt.unordered"),
        IrInst::BoolToNumber => writeln!(f, "{indent}bool_to_number"),
        IrInst::NumberToBool => writeln!(f, "{indent}number_to_bool"),
        IrInst::Call {
            callee,
            argument_count,
        } => writeln!(f, "{indent}call {callee}/{argument_count}"),
        IrInst::Drop => writeln!(f, "{indent}drop"),
        IrInst::ContinueIf => writeln!(f, "{indent}continue_if"),
        IrInst::Loop(body) => {
            writeln!(f, "{indent}loop {{")?;
            write_block(f, body, depth + 1)?;
            writeln!(f, "{indent}}}")
        }
        IrInst::IfElse {
            then_block,
            else_block,
        } => {
            writeln!(f, "{indent}if {{")?;
            write_block(f, then_block, depth + 1)?;
            writeln!(f, "{indent}}} else {{")?;
            write_block(f, else_block, depth + 1)?;
            writeln!(f, "{indent}}}")
        }
    }
}
