//! # Wasm backend
//!
//! Turns a finalized compilation unit into a validated Wasm module.
//!
//! ```text
//! CompilationUnit → encode_unit → wasmparser validation → EncodedUnit (bytes, imports, exports)
//! ```
//!
//! Every value is an f64, so the only types in a module are one function type per arity.
//! Functions from earlier units are imported from the `env` module and resolved by the
//! engine at instantiation, which is what lets a fresh unit call into older ones.

pub mod encode;
pub mod validator;
