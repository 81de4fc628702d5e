//! Wasm module validation.
//!
//! Every encoded unit goes through wasmparser before an engine sees it, so a
//! malformed module is reported as a compiler bug rather than a link failure.

use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey};

pub fn validate_unit_module(wasm_bytes: &[u8], unit_id: u64) -> Result<(), CompilerError> {
    match wasmparser::validate(wasm_bytes) {
        Ok(_) => Ok(()),
        Err(e) => Err(CompilerError::compiler_error(format!(
            "Unit {unit_id} encoded to an invalid Wasm module at offset {}: {}",
            e.offset(),
            e.message()
        ))
        .with_metadata(ErrorMetaDataKey::CompilationStage, "Wasm Validation")),
    }
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
