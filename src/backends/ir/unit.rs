use crate::backends::ir::ir_nodes::{ExternalDecl, IrFunction};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::return_compiler_error;

/// One self-contained batch of IR.
/// Holds every function defined since the last finalize, and a declaration for each
/// resident engine symbol those functions call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilationUnit {
    pub id: u64,
    externals: Vec<ExternalDecl>,
    functions: Vec<IrFunction>,
}

impl CompilationUnit {
    pub fn new(id: u64) -> Self {
        CompilationUnit {
            id,
            externals: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.externals.is_empty() && self.functions.is_empty()
    }

    pub fn externals(&self) -> &[ExternalDecl] {
        &self.externals
    }

    pub fn functions(&self) -> &[IrFunction] {
        &self.functions
    }

    pub fn function(&self, name: &str) -> Option<&IrFunction> {
        self.functions.iter().find(|function| function.name == name)
    }

    pub fn defines(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    /// Arity of a name this unit can call without asking the engine
    pub fn declared_arity(&self, name: &str) -> Option<usize> {
        if let Some(function) = self.function(name) {
            return Some(function.arity());
        }

        self.externals
            .iter()
            .find(|external| external.name == name)
            .map(|external| external.arity)
    }

    /// Declaring the same name twice with the same arity is a no-op
    pub fn declare_external(&mut self, name: &str, arity: usize) -> Result<(), CompilerError> {
        match self.declared_arity(name) {
            Some(existing) if existing == arity => Ok(()),
            Some(existing) => return_compiler_error!(
                "'{}' is already declared in unit {} with {} parameters, not {}",
                name,
                self.id,
                existing,
                arity
            ),
            None => {
                self.externals.push(ExternalDecl {
                    name: name.to_owned(),
                    arity,
                });
                Ok(())
            }
        }
    }

    pub fn add_function(&mut self, function: IrFunction) -> Result<(), CompilerError> {
        if self.declared_arity(&function.name).is_some() {
            return_compiler_error!(
                "'{}' is already declared in unit {}",
                function.name,
                self.id
            );
        }

        self.functions.push(function);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/unit_tests.rs"]
mod tests;
