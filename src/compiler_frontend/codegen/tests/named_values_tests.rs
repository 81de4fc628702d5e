use super::NamedValues;
use crate::backends::ir::ir_nodes::SlotId;
use proptest::prelude::*;

#[test]
fn lookup_finds_only_bound_names() {
    let mut env = NamedValues::new();
    assert_eq!(env.lookup("x"), None);

    env.bind("x", SlotId(0));
    assert_eq!(env.lookup("x"), Some(SlotId(0)));

    env.unbind("x");
    assert_eq!(env.lookup("x"), None);
}

#[test]
fn shadowing_restores_the_outer_binding() {
    let mut env = NamedValues::new();
    env.bind("i", SlotId(0));

    let prior = env.bind("i", SlotId(4));
    assert_eq!(prior, Some(SlotId(0)));
    assert_eq!(env.lookup("i"), Some(SlotId(4)));

    env.restore("i", prior);
    assert_eq!(env.lookup("i"), Some(SlotId(0)));
}

#[test]
fn restoring_an_absent_binding_unbinds() {
    let mut env = NamedValues::new();
    let prior = env.bind("i", SlotId(2));
    env.restore("i", prior);
    assert!(env.is_empty());
}

#[test]
fn clear_all_forgets_everything() {
    let mut env = NamedValues::new();
    env.bind("a", SlotId(0));
    env.bind("b", SlotId(1));
    assert_eq!(env.len(), 2);

    env.clear_all();
    assert!(env.is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Any nesting of shadowing binds, unwound in reverse, leaves the environment as it started
    #[test]
    fn nested_shadowing_unwinds_to_the_original_state(
        initial in proptest::collection::vec(("[a-d]", 0u32..8), 0..4),
        nested in proptest::collection::vec(("[a-d]", 8u32..16), 0..8),
    ) {
        let mut env = NamedValues::new();
        for (name, slot) in &initial {
            env.bind(name, SlotId(*slot));
        }
        let before: Vec<_> = ["a", "b", "c", "d"].iter().map(|name| env.lookup(name)).collect();

        let mut saved = Vec::new();
        for (name, slot) in &nested {
            saved.push((name.clone(), env.bind(name, SlotId(*slot))));
        }
        while let Some((name, prior)) = saved.pop() {
            env.restore(&name, prior);
        }

        let after: Vec<_> = ["a", "b", "c", "d"].iter().map(|name| env.lookup(name)).collect();
        prop_assert_eq!(before, after);
    }
}
