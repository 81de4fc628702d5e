use crate::backends::ir::ir_nodes::SlotId;
use rustc_hash::FxHashMap;

/// Maps variable names to the slots of the function currently being lowered.
/// At most one slot is visible per name. Shadowing saves the old binding with
/// `bind` and puts it back with `restore` once the nested construct is lowered.
#[derive(Debug, Default)]
pub struct NamedValues {
    slots: FxHashMap<String, SlotId>,
}

impl NamedValues {
    pub fn new() -> Self {
        NamedValues::default()
    }

    pub fn lookup(&self, name: &str) -> Option<SlotId> {
        self.slots.get(name).copied()
    }

    /// Returns the binding this one replaces, if there was one
    pub fn bind(&mut self, name: &str, slot: SlotId) -> Option<SlotId> {
        self.slots.insert(name.to_owned(), slot)
    }

    pub fn unbind(&mut self, name: &str) {
        self.slots.remove(name);
    }

    /// Puts back a binding saved from `bind`, or removes the name if there wasn't one
    pub fn restore(&mut self, name: &str, prior: Option<SlotId>) {
        match prior {
            Some(slot) => {
                self.bind(name, slot);
            }
            None => self.unbind(name),
        }
    }

    pub fn clear_all(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/named_values_tests.rs"]
mod tests;
