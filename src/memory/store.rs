//! Variable store
//!
//! Maps variable names to non-negative integers. Variables come into
//! existence on first use and are never removed. Every mutating accessor
//! treats an unseen variable as 0, so `incr` on one leaves it at 1.
//!
//! Lookups go through `get_mut` first; the name is only copied into the map
//! when the variable is declared.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    vars: FxHashMap<String, u64>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, without declaring the variable
    pub fn get(&self, name: &str) -> Option<u64> {
        self.vars.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Value of `name`, declaring it as 0 first if unseen
    pub fn read_or_zero(&mut self, name: &str) -> u64 {
        if let Some(value) = self.vars.get(name) {
            return *value;
        }
        self.vars.insert(name.to_string(), 0);
        0
    }

    pub fn set(&mut self, name: &str, value: u64) {
        match self.vars.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.vars.insert(name.to_string(), value);
            }
        }
    }

    pub fn clear(&mut self, name: &str) {
        self.set(name, 0);
    }

    /// Add one. Returns the new value, or `None` if it would overflow.
    pub fn increment(&mut self, name: &str) -> Option<u64> {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = slot.checked_add(1)?;
                Some(*slot)
            }
            None => {
                self.vars.insert(name.to_string(), 1);
                Some(1)
            }
        }
    }

    /// Subtract one, saturating at zero. Returns the new value.
    pub fn decrement(&mut self, name: &str) -> u64 {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = slot.saturating_sub(1);
                *slot
            }
            None => {
                self.vars.insert(name.to_string(), 0);
                0
            }
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// All variables ordered by name
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.vars.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// `Memory:` followed by one `name <- value` line per variable
    pub fn dump(&self) -> String {
        let mut out = String::from("Memory:");
        for (name, value) in self.sorted() {
            out.push_str(&format!("\n{} <- {}", name, value));
        }
        out
    }
}
