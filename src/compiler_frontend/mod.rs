//! Text to IR: tokenizing, parsing and lowering statements into compilation units.

pub mod ast;
pub mod tokenizer {
    pub mod tokenizer;
    pub mod tokens;
}

pub mod compiler_messages {
    pub mod compiler_dev_logging;
    pub mod compiler_errors;
    pub mod display_messages;
}
pub use compiler_messages::compiler_errors;
pub use compiler_messages::display_messages;

pub mod codegen {
    pub mod lower_expression;
    pub mod lower_functions;
    pub mod lower_loops;
    pub mod named_values;
}
