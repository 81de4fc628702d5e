pub mod ast_nodes;
pub mod parser;
