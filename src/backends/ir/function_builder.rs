use crate::backends::ir::ir_nodes::{IrFunction, IrInst, SlotId};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::return_compiler_error;

#[derive(Debug)]
enum RegionKind {
    Body,
    Loop,
    Then,
    Else { then_block: Vec<IrInst> },
}

#[derive(Debug)]
struct OpenRegion {
    kind: RegionKind,
    instructions: Vec<IrInst>,
}

/// Builds one IrFunction.
/// Instructions always go into the innermost open region (the insertion point).
/// Slots can be created at any time and belong to the whole function.
#[derive(Debug)]
pub struct FunctionBuilder {
    name: String,
    parameters: Vec<String>,
    slot_count: u32,
    regions: Vec<OpenRegion>,
}

impl FunctionBuilder {
    pub fn new(name: &str, parameters: &[String]) -> Self {
        FunctionBuilder {
            name: name.to_owned(),
            parameters: parameters.to_vec(),
            slot_count: parameters.len() as u32,
            regions: vec![OpenRegion {
                kind: RegionKind::Body,
                instructions: Vec::new(),
            }],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter_slot(&self, index: usize) -> Option<SlotId> {
        (index < self.parameters.len()).then_some(SlotId(index as u32))
    }

    pub fn create_slot(&mut self) -> SlotId {
        let slot = SlotId(self.slot_count);
        self.slot_count += 1;
        slot
    }

    pub fn emit(&mut self, instruction: IrInst) {
        // There is always at least the body region until finish() consumes the builder
        if let Some(region) = self.regions.last_mut() {
            region.instructions.push(instruction);
        }
    }

    pub fn begin_loop(&mut self) {
        self.open(RegionKind::Loop);
    }

    pub fn end_loop(&mut self) -> Result<(), CompilerError> {
        match self.close()? {
            (RegionKind::Loop, body) => {
                self.emit(IrInst::Loop(body));
                Ok(())
            }
            (kind, _) => return_compiler_error!(
                "end_loop called in '{}' while a {:?} region was open",
                self.name,
                kind
            ),
        }
    }

    /// Pops the condition, starts the then block
    pub fn begin_if(&mut self) {
        self.open(RegionKind::Then);
    }

    pub fn begin_else(&mut self) -> Result<(), CompilerError> {
        match self.close()? {
            (RegionKind::Then, then_block) => {
                self.open(RegionKind::Else { then_block });
                Ok(())
            }
            (kind, _) => return_compiler_error!(
                "begin_else called in '{}' while a {:?} region was open",
                self.name,
                kind
            ),
        }
    }

    pub fn end_if(&mut self) -> Result<(), CompilerError> {
        match self.close()? {
            (RegionKind::Else { then_block }, else_block) => {
                self.emit(IrInst::IfElse {
                    then_block,
                    else_block,
                });
                Ok(())
            }
            (kind, _) => return_compiler_error!(
                "end_if called in '{}' while a {:?} region was open",
                self.name,
                kind
            ),
        }
    }

    pub fn finish(mut self) -> Result<IrFunction, CompilerError> {
        if self.regions.len() != 1 {
            return_compiler_error!(
                "Function '{}' finished with {} unclosed regions",
                self.name,
                self.regions.len() - 1
            );
        }

        let body = match self.regions.pop() {
            Some(region) => region.instructions,
            None => Vec::new(),
        };

        Ok(IrFunction {
            name: self.name,
            parameters: self.parameters,
            slot_count: self.slot_count,
            body,
        })
    }

    fn open(&mut self, kind: RegionKind) {
        self.regions.push(OpenRegion {
            kind,
            instructions: Vec::new(),
        });
    }

    fn close(&mut self) -> Result<(RegionKind, Vec<IrInst>), CompilerError> {
        // The body region is only closed by finish()
        if self.regions.len() < 2 {
            return_compiler_error!("No open region to close in '{}'", self.name);
        }

        match self.regions.pop() {
            Some(region) => Ok((region.kind, region.instructions)),
            None => return_compiler_error!("No open region to close in '{}'", self.name),
        }
    }
}

#[cfg(test)]
#[path = "tests/function_builder_tests.rs"]
mod tests;
