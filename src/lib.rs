pub mod backends;
pub mod compiler_frontend;
pub mod projects;
pub mod runtime;
pub mod settings;
