//! The boundary between lowering and execution.
//!
//! An engine turns finalized units into callable code and keeps every symbol it has
//! ever published. Nothing is removed or replaced once it is resident.

use crate::backends::ir::unit::CompilationUnit;
use crate::compiler_frontend::compiler_errors::CompilerError;
use std::sync::Arc;

/// Opaque handle to a resident function, only meaningful to the engine that returned it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolAddress(pub usize);

/// A natively implemented function callable from lowered code.
/// Receives exactly as many arguments as it was declared with.
pub type HostCallback = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

pub trait ExecutionEngine {
    /// Makes a host function resident under `name` before any unit references it
    fn declare_external(
        &mut self,
        name: &str,
        arity: usize,
        callback: HostCallback,
    ) -> Result<(), CompilerError>;

    /// Links and compiles a whole unit, then publishes every function it defines.
    /// All or nothing: on failure none of the unit's symbols become resident.
    fn finalize(&mut self, unit: CompilationUnit) -> Result<(), CompilerError>;

    fn lookup(&self, name: &str) -> Option<SymbolAddress>;

    fn invoke(&mut self, address: SymbolAddress, arguments: &[f64]) -> Result<f64, CompilerError>;
}
