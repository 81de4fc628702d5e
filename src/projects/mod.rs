//! # Drivers that turn statements into results
//! The unit manager is the core loop. The REPL and the CLI are thin layers on top of it.

// The basic CLI for starting a session or running a file
pub mod cli;

pub mod repl;
pub mod unit_manager;
