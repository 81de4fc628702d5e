pub mod function_registry;
pub mod ir;
pub mod wasm;
