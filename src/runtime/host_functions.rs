// Native functions lowered code can call.
//
// A session registers the ones its config names before the first statement, so they are
// resident (and their arity is known) exactly like functions from a finalized unit.

use crate::backends::function_registry::FunctionRegistry;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::eval_log;
use crate::runtime::engine::{ExecutionEngine, HostCallback};
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct BuiltinHostFunction {
    pub name: &'static str,
    pub arity: usize,
    pub implementation: fn(&[f64]) -> f64,
}

pub const BUILTIN_HOST_FUNCTIONS: &[BuiltinHostFunction] = &[
    BuiltinHostFunction {
        name: "putchard",
        arity: 1,
        implementation: putchard,
    },
    BuiltinHostFunction {
        name: "printd",
        arity: 1,
        implementation: printd,
    },
];

pub fn builtin_host_function(name: &str) -> Option<&'static BuiltinHostFunction> {
    BUILTIN_HOST_FUNCTIONS
        .iter()
        .find(|builtin| builtin.name == name)
}

/// Writes the argument, truncated to a byte, to stdout. Returns 0.
pub fn putchard(args: &[f64]) -> f64 {
    let byte = args.first().copied().unwrap_or_default() as u8;

    let mut stdout = io::stdout().lock();
    // Nothing useful can be done with a failed write from inside lowered code
    let _ = stdout.write_all(&[byte]);
    let _ = stdout.flush();

    0.0
}

/// Prints the argument on its own line. Returns 0.
pub fn printd(args: &[f64]) -> f64 {
    let value = args.first().copied().unwrap_or_default();
    println!("{value:.6}");

    0.0
}

/// Makes one host function resident and records its arity
pub fn register_host_function<E: ExecutionEngine + ?Sized>(
    engine: &mut E,
    registry: &mut FunctionRegistry,
    name: &str,
    arity: usize,
    callback: HostCallback,
) -> Result<(), CompilerError> {
    engine.declare_external(name, arity, callback)?;
    registry.record(name, arity);

    Ok(())
}

/// Registers each named builtin. Unknown names are a config error.
pub fn register_builtin_host_functions<E: ExecutionEngine + ?Sized>(
    engine: &mut E,
    registry: &mut FunctionRegistry,
    names: &[String],
) -> Result<(), CompilerError> {
    for name in names {
        let Some(builtin) = builtin_host_function(name) else {
            let available: Vec<&str> = BUILTIN_HOST_FUNCTIONS.iter().map(|b| b.name).collect();
            return Err(CompilerError::config_error(format!(
                "Unknown host function '{name}'. Available host functions: {}",
                available.join(", ")
            )));
        };

        register_host_function(
            engine,
            registry,
            builtin.name,
            builtin.arity,
            Arc::new(builtin.implementation),
        )?;

        eval_log!(Green "Registered builtin ", Bright {builtin.name});
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/host_functions_tests.rs"]
mod tests;
