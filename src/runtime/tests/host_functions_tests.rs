use super::{builtin_host_function, printd, putchard, register_builtin_host_functions};
use crate::backends::function_registry::FunctionRegistry;
use crate::compiler_frontend::compiler_errors::ErrorType;
use crate::runtime::engine::ExecutionEngine;
use crate::runtime::jit::WasmerEngine;

#[test]
fn builtins_return_zero() {
    assert_eq!(printd(&[3.5]), 0.0);
    assert_eq!(putchard(&[10.0]), 0.0);
}

#[test]
fn builtins_are_found_by_name() {
    let printd = builtin_host_function("printd").expect("printd is a builtin");
    assert_eq!(printd.arity, 1);
    assert!(builtin_host_function("sin").is_none());
}

#[test]
fn registering_makes_builtins_resident_with_a_known_arity() {
    let mut engine = WasmerEngine::new();
    let mut registry = FunctionRegistry::new();

    register_builtin_host_functions(
        &mut engine,
        &mut registry,
        &[String::from("putchard"), String::from("printd")],
    )
    .expect("both are builtins");

    assert!(engine.lookup("putchard").is_some());
    assert!(engine.lookup("printd").is_some());
    assert_eq!(registry.arity_of("printd"), Some(1));
}

#[test]
fn unknown_builtin_is_a_config_error() {
    let mut engine = WasmerEngine::new();
    let mut registry = FunctionRegistry::new();

    let error = register_builtin_host_functions(&mut engine, &mut registry, &[String::from("sin")])
        .expect_err("sin is not a builtin");

    assert_eq!(error.error_type, ErrorType::Config);
    assert!(error.msg.contains("putchard"));
    assert!(registry.is_empty());
}

#[test]
fn registering_the_same_builtin_twice_fails() {
    let mut engine = WasmerEngine::new();
    let mut registry = FunctionRegistry::new();
    let names = [String::from("printd"), String::from("printd")];

    let error = register_builtin_host_functions(&mut engine, &mut registry, &names)
        .expect_err("printd would be declared twice");
    assert_eq!(error.error_type, ErrorType::Link);
}
