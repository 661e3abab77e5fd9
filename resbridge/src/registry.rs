//! Key registry: every key observed during import, per resource kind.
//!
//! Importers record keys while the registry is open. [`KeyRegistry::finalize`]
//! turns it into [`FinalizedKeys`], the sorted iteration order shared by all
//! writers and by the accessor surface.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::ResourceKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRegistry {
    strings: BTreeSet<String>,
    arrays: BTreeSet<String>,
    plurals: BTreeSet<String>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` under `kind`. Returns `false` if it was already known.
    pub fn record(&mut self, kind: ResourceKind, key: &str) -> bool {
        let set = self.set_mut(kind);
        if set.contains(key) {
            return false;
        }
        set.insert(key.to_string())
    }

    pub fn contains(&self, kind: ResourceKind, key: &str) -> bool {
        match kind {
            ResourceKind::Strings => self.strings.contains(key),
            ResourceKind::Arrays => self.arrays.contains(key),
            ResourceKind::Plurals => self.plurals.contains(key),
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len() + self.arrays.len() + self.plurals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freezes the registry into sorted key sequences.
    pub fn finalize(self) -> FinalizedKeys {
        FinalizedKeys {
            strings: self.strings.into_iter().collect(),
            arrays: self.arrays.into_iter().collect(),
            plurals: self.plurals.into_iter().collect(),
        }
    }

    fn set_mut(&mut self, kind: ResourceKind) -> &mut BTreeSet<String> {
        match kind {
            ResourceKind::Strings => &mut self.strings,
            ResourceKind::Arrays => &mut self.arrays,
            ResourceKind::Plurals => &mut self.plurals,
        }
    }
}

/// Read-only, lexically sorted keys per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinalizedKeys {
    strings: Vec<String>,
    arrays: Vec<String>,
    plurals: Vec<String>,
}

impl FinalizedKeys {
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn arrays(&self) -> &[String] {
        &self.arrays
    }

    pub fn plurals(&self) -> &[String] {
        &self.plurals
    }

    pub fn of(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::Strings => &self.strings,
            ResourceKind::Arrays => &self.arrays,
            ResourceKind::Plurals => &self.plurals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ignores_duplicates() {
        let mut registry = KeyRegistry::new();
        assert!(registry.record(ResourceKind::Strings, "hello"));
        assert!(!registry.record(ResourceKind::Strings, "hello"));
        assert!(registry.record(ResourceKind::Arrays, "hello"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_finalize_sorts_each_kind() {
        let mut registry = KeyRegistry::new();
        for key in ["zeta", "alpha", "mid", "alpha"] {
            registry.record(ResourceKind::Strings, key);
        }
        registry.record(ResourceKind::Plurals, "b_items");
        registry.record(ResourceKind::Plurals, "a_items");

        let keys = registry.finalize();
        assert_eq!(keys.strings(), ["alpha", "mid", "zeta"]);
        assert_eq!(keys.plurals(), ["a_items", "b_items"]);
        assert!(keys.arrays().is_empty());
        assert_eq!(keys.of(ResourceKind::Strings), keys.strings());
    }
}
