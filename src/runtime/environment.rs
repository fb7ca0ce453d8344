//! Variable environment for one interpreter run.
//!
//! A flat identifier → [`Value`] store. Block scoping is not modelled except
//! for loop variables, which the loop driver removes explicitly when the loop
//! that declared them finishes.

use super::value::Value;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: FxHashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any previous binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.bindings.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebinding_replaces_value() {
        let mut env = Environment::new();
        env.set("x", Value::Int(1));
        env.set("x", Value::text("one"));
        assert_eq!(env.get("x"), Some(&Value::text("one")));
    }

    #[test]
    fn test_in_place_mutation() {
        let mut env = Environment::new();
        env.set("items", Value::empty_list());
        if let Some(items) = env.get_mut("items") {
            items.list_push(Value::Int(7));
        }
        assert_eq!(env.get("items").map(ToString::to_string).as_deref(), Some("[7]"));
    }
}
