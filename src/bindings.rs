use std::fmt::Display;

use rustc_hash::FxHashMap;

/// Maps variable names to the last value stored to them.
/// Lookups go through a hash index, but iteration and display follow the order names were first bound in.
#[derive(Debug, Default, Clone)]
pub struct Bindings {
    index: FxHashMap<String, usize>,
    entries: Vec<(String, i32)>,
}

impl Bindings {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, overwriting any previous value but keeping its original position.
    pub fn set(&mut self, name: &str, value: i32) {
        match self.index.get(name) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value));
            }
        }
    }

    /// The value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<i32> {
        self.index.get(name).map(|&slot| self.entries[slot].1)
    }

    /// Whether `name` has been bound.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is bound yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// One `name: value` line per binding.
impl Display for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{}: {}", name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_overwrite_keeps_position() {
        let mut bindings = Bindings::new();
        assert!(bindings.is_empty());
        bindings.set("x", 30);
        bindings.set("y", 20);
        bindings.set("z", 10);
        bindings.set("x", -1);

        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings.get("x"), Some(-1));
        assert_eq!(bindings.get("w"), None);
        assert!(bindings.contains("z"));
        assert_eq!(bindings.to_string(), "x: -1\ny: 20\nz: 10\n");
    }

    #[test]
    fn test_empty_display() {
        assert_eq!(Bindings::new().to_string(), "");
    }
}
