pub mod function_builder;
pub mod ir_display;
pub mod ir_nodes;
pub mod unit;
