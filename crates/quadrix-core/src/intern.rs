//! Interning of symbol names.

use std::hash::Hash;

use hashbrown::HashMap;

/// Maps values to dense `u32` ids, storing each distinct value once.
#[derive(Debug, Clone)]
pub struct InternTable<T> {
    ids: HashMap<T, u32>,
    values: Vec<T>,
}

impl<T: Clone + Eq + Hash> Default for InternTable<T> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            values: Vec::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> InternTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `value`, assigning the next free id if it is new.
    pub fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.ids.get(&value) {
            return id;
        }
        let id = u32::try_from(self.values.len()).unwrap_or(u32::MAX);
        self.ids.insert(value.clone(), id);
        self.values.push(value);
        id
    }

    /// Returns the value with the given id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&T> {
        self.values.get(id as usize)
    }

    /// Returns the id of `value` without interning it.
    #[must_use]
    pub fn lookup<Q>(&self, value: &Q) -> Option<u32>
    where
        T: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.get(value).copied()
    }

    /// Number of interned values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_symbols() {
        let mut table: InternTable<String> = InternTable::new();
        let x = table.intern("x".to_string());
        let y = table.intern("y".to_string());
        assert_eq!(table.intern("x".to_string()), x);
        assert_ne!(x, y);
        assert_eq!(table.lookup("y"), Some(y));
        assert_eq!(table.lookup("z"), None);
        assert_eq!(table.get(x).map(String::as_str), Some("x"));
        assert_eq!(table.len(), 2);
    }
}
