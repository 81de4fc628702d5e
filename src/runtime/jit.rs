// Incremental JIT execution on Wasmer
//
// Every finalized unit is compiled and instantiated in one long-lived store.
// Its exports join an append-only symbol table, and later units import them
// from there, so code from old units stays callable for the whole session.

use crate::backends::ir::unit::CompilationUnit;
use crate::backends::wasm::encode::encode_unit;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::eval_log;
use crate::runtime::engine::{ExecutionEngine, HostCallback, SymbolAddress};
use crate::settings::IMPORT_MODULE;
use rustc_hash::FxHashMap;
use wasmer::{Function, FunctionType, Imports, Instance, Module, Store, Type, Value};

struct ResidentFunction {
    name: String,
    arity: usize,
    function: Function,
}

pub struct WasmerEngine {
    store: Store,
    symbols: FxHashMap<String, SymbolAddress>,

    // Indexed by SymbolAddress
    functions: Vec<ResidentFunction>,

    // Kept so every instance outlives the functions it exported
    instances: Vec<Instance>,
}

impl Default for WasmerEngine {
    fn default() -> Self {
        WasmerEngine::new()
    }
}

impl WasmerEngine {
    pub fn new() -> Self {
        WasmerEngine {
            store: Store::default(),
            symbols: FxHashMap::default(),
            functions: Vec::new(),
            instances: Vec::new(),
        }
    }

    pub fn symbol_count(&self) -> usize {
        self.functions.len()
    }

    pub fn finalized_unit_count(&self) -> usize {
        self.instances.len()
    }

    /// Resident symbol names in the order they were published
    pub fn symbol_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|resident| resident.name.as_str())
    }

    fn publish(&mut self, resident: ResidentFunction) -> SymbolAddress {
        let address = SymbolAddress(self.functions.len());
        self.symbols.insert(resident.name.to_owned(), address);
        self.functions.push(resident);
        address
    }

    fn resolve_imports(&self, imports: &[(String, usize)]) -> Result<Imports, CompilerError> {
        let mut import_object = Imports::new();

        for (name, arity) in imports {
            let resident = self
                .symbols
                .get(name)
                .and_then(|address| self.functions.get(address.0));

            let Some(resident) = resident else {
                return Err(CompilerError::link_error(format!(
                    "Unresolved symbol '{name}': nothing resident in the engine provides it"
                )));
            };

            if resident.arity != *arity {
                return Err(CompilerError::link_error(format!(
                    "'{name}' is resident with {} parameters, but the unit imports it with {arity}",
                    resident.arity
                )));
            }

            import_object.define(IMPORT_MODULE, name, resident.function.clone());
        }

        Ok(import_object)
    }
}

impl ExecutionEngine for WasmerEngine {
    fn declare_external(
        &mut self,
        name: &str,
        arity: usize,
        callback: HostCallback,
    ) -> Result<(), CompilerError> {
        if self.symbols.contains_key(name) {
            return Err(CompilerError::link_error(format!(
                "Host function '{name}' is already resident"
            )));
        }

        let signature = FunctionType::new(vec![Type::F64; arity], vec![Type::F64]);
        let host_function = Function::new(&mut self.store, signature, move |args: &[Value]| {
            let numbers: Vec<f64> = args
                .iter()
                .map(|value| match value {
                    Value::F64(number) => *number,
                    _ => f64::NAN,
                })
                .collect();

            Ok(vec![Value::F64(callback(&numbers))])
        });

        self.publish(ResidentFunction {
            name: name.to_owned(),
            arity,
            function: host_function,
        });

        eval_log!(Green "Declared host function ", name);
        Ok(())
    }

    fn finalize(&mut self, unit: CompilationUnit) -> Result<(), CompilerError> {
        let encoded = encode_unit(&unit)?;

        // Resident symbols are never replaced
        if let Some(name) = encoded.exports.iter().find(|name| self.symbols.contains_key(*name)) {
            return Err(CompilerError::link_error(format!(
                "Unit {} defines '{name}', which is already resident",
                unit.id
            )));
        }

        let module = Module::new(&self.store, &encoded.bytes).map_err(|e| {
            CompilerError::link_error(format!("Failed to compile unit {}: {e}", unit.id))
        })?;

        let import_object = self.resolve_imports(&encoded.imports)?;

        let instance = Instance::new(&mut self.store, &module, &import_object).map_err(|e| {
            CompilerError::link_error(format!("Failed to instantiate unit {}: {e}", unit.id))
        })?;

        // Collect every export before publishing any, so a failure leaves nothing behind
        let mut exported = Vec::with_capacity(encoded.exports.len());
        for name in &encoded.exports {
            let function = instance.exports.get_function(name).map_err(|e| {
                CompilerError::link_error(format!(
                    "Unit {} did not export '{name}' after instantiation: {e}",
                    unit.id
                ))
            })?;

            exported.push(ResidentFunction {
                name: name.to_owned(),
                arity: function.ty(&self.store).params().len(),
                function: function.clone(),
            });
        }

        for resident in exported {
            self.publish(resident);
        }
        self.instances.push(instance);

        eval_log!(Green "Finalized unit ", Bright {unit.id}, " with ", Bright {encoded.exports.len()}, " exports");
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<SymbolAddress> {
        self.symbols.get(name).copied()
    }

    fn invoke(&mut self, address: SymbolAddress, arguments: &[f64]) -> Result<f64, CompilerError> {
        let Some(resident) = self.functions.get(address.0) else {
            return Err(CompilerError::compiler_error(format!(
                "No resident function at address {}",
                address.0
            )));
        };

        if resident.arity != arguments.len() {
            return Err(CompilerError::runtime_error(format!(
                "'{}' takes {} arguments, but {} were passed",
                resident.name,
                resident.arity,
                arguments.len()
            )));
        }

        let params: Vec<Value> = arguments.iter().map(|argument| Value::F64(*argument)).collect();
        let results = resident
            .function
            .call(&mut self.store, &params)
            .map_err(|e| CompilerError::runtime_error(format!("'{}' trapped: {e}", resident.name)))?;

        match results.first() {
            Some(Value::F64(value)) => Ok(*value),
            other => Err(CompilerError::runtime_error(format!(
                "'{}' returned {other:?} instead of a number",
                resident.name
            ))),
        }
    }
}

#[cfg(test)]
#[path = "tests/jit_tests.rs"]
mod tests;
