use rustc_hash::FxHashMap;

/// Remembers the parameter count of every function ever defined or declared.
///
/// An engine lookup only gives back an address, so this is how a fresh unit
/// rebuilds a correctly typed declaration for a function finalized earlier.
/// Lives for the whole session and never forgets a name.
#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry {
    arities: FxHashMap<String, usize>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        FunctionRegistry::default()
    }

    /// Returns the arity this name was previously recorded with, if different
    pub fn record(&mut self, name: &str, arity: usize) -> Option<usize> {
        match self.arities.insert(name.to_owned(), arity) {
            Some(previous) if previous != arity => Some(previous),
            _ => None,
        }
    }

    pub fn arity_of(&self, name: &str) -> Option<usize> {
        self.arities.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.arities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arities.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/function_registry_tests.rs"]
mod tests;
