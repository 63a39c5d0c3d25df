//! Name Lookup
//!
//! Bidirectional mapping between object names and graph offsets.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_offset: Vec<String>,
    by_name: IndexMap<String, usize>,
}

impl NameIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_offset: Vec::with_capacity(capacity),
            by_name: IndexMap::with_capacity(capacity),
        }
    }

    /// Register `name` at the next offset.
    ///
    /// Returns the offset already holding `name` if it is taken.
    pub fn insert(&mut self, name: &str) -> Result<usize, usize> {
        if let Some(&existing) = self.by_name.get(name) {
            return Err(existing);
        }
        let offset = self.by_offset.len();
        self.by_offset.push(name.to_string());
        self.by_name.insert(name.to_string(), offset);
        Ok(offset)
    }

    pub fn offset(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, offset: usize) -> Option<&str> {
        self.by_offset.get(offset).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_offset.len()
    }
}
