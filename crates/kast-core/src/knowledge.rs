//! # Knowledge Module
//!
//! Single named knowledge entries and the per-tier stores that own them.
//!
//! - An entry tracks the kind of its last assigned value
//! - Updating with a different kind raises a type-drift diagnostic
//! - The first real assignment after `Unset` never counts as drift
//! - Stores never remove entries

use crate::diagnostic::Diagnostic;
use crate::types::{Frame, Tier, Value, ValueKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// KNOWLEDGE ENTRY
// =============================================================================

/// A single named, typed, mutable datapoint of knowledge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Knowledge {
    label: Tier,
    name: String,
    value: Value,
    observed: ValueKind,
}

impl Knowledge {
    /// Create an entry with no value yet.
    #[must_use]
    pub fn new(label: Tier, name: impl Into<String>) -> Self {
        Self::with_value(label, name, Value::Unset)
    }

    /// Create an entry holding an initial value.
    #[must_use]
    pub fn with_value(label: Tier, name: impl Into<String>, value: Value) -> Self {
        Self {
            label,
            name: name.into(),
            observed: value.kind(),
            value,
        }
    }

    /// Assign a new value.
    ///
    /// Always succeeds. Returns (and logs) a type-drift diagnostic when the
    /// entry already held a real value of a different kind. The new kind
    /// becomes the baseline either way.
    pub fn update(&mut self, value: Value) -> Option<Diagnostic> {
        let kind = value.kind();
        let drift = (self.observed != ValueKind::Unset && kind != self.observed).then(|| {
            Diagnostic::TypeDrift {
                tier: self.label,
                name: self.name.clone(),
                from: self.observed,
                to: kind,
            }
        });
        if let Some(diag) = &drift {
            diag.emit();
        }

        self.observed = kind;
        self.value = value;
        drift
    }

    #[must_use]
    pub fn label(&self) -> Tier {
        self.label
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Kind of the most recently assigned value.
    #[must_use]
    pub fn observed_kind(&self) -> ValueKind {
        self.observed
    }
}

impl fmt::Display for Knowledge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {})", self.name, self.value)
    }
}

// =============================================================================
// KNOWLEDGE STORE
// =============================================================================

/// A mapping from name to knowledge entry for one tier.
///
/// Uses BTreeMap for deterministic iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeStore {
    tier: Tier,
    entries: BTreeMap<String, Knowledge>,
}

impl KnowledgeStore {
    /// Create an empty store for a tier.
    #[must_use]
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            entries: BTreeMap::new(),
        }
    }

    /// Get the entry for `name`, creating an unset one if it does not exist.
    pub fn declare(&mut self, name: &str) -> &mut Knowledge {
        let tier = self.tier;
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| Knowledge::new(tier, name))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Knowledge> {
        self.entries.get(name)
    }

    /// Current value of `name`, if declared.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(Knowledge::value)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Declared names in deterministic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy out the current name → value mapping.
    #[must_use]
    pub fn snapshot(&self) -> Frame {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.value().clone()))
            .collect()
    }
}

impl fmt::Display for KnowledgeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, entry) in self.entries.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str("]")
    }
}

// =============================================================================
// TESTS
// =============================================================================
