use super::FunctionRegistry;

#[test]
fn records_and_recalls_arity() {
    let mut registry = FunctionRegistry::new();
    assert_eq!(registry.arity_of("f"), None);

    assert_eq!(registry.record("f", 2), None);
    assert_eq!(registry.arity_of("f"), Some(2));
    assert_eq!(registry.len(), 1);
}

#[test]
fn recording_the_same_arity_again_is_quiet() {
    let mut registry = FunctionRegistry::new();
    registry.record("f", 1);
    assert_eq!(registry.record("f", 1), None);
}

#[test]
fn a_changed_arity_reports_the_old_one() {
    let mut registry = FunctionRegistry::new();
    registry.record("f", 1);
    assert_eq!(registry.record("f", 3), Some(1));
    assert_eq!(registry.arity_of("f"), Some(3));
}
