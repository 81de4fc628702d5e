pub mod engine;
pub mod host_functions;
pub mod jit;
