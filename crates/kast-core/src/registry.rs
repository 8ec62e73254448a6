//! # Transform Registry
//!
//! Name → transform lookup used to turn declarative Kaster specs into
//! definitions.
//!
//! The host registers every callable it wants to expose at startup. Specs
//! then refer to transforms by method name only; nothing is ever loaded from
//! a path at run time.

use crate::kaster::{KasterDefinition, Transform};
use crate::types::KastError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A declarative Kaster: which method to run and on which names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KasterSpec {
    /// Registered transform name.
    pub method: String,
    /// Low-level input names, in order.
    pub inputs: Vec<String>,
    /// High-level output names, in order.
    pub outputs: Vec<String>,
}

/// Registry of named transforms.
#[derive(Default, Clone)]
pub struct TransformRegistry {
    methods: BTreeMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform under `name`, replacing any previous one.
    pub fn register<T: Transform + 'static>(&mut self, name: impl Into<String>, transform: T) {
        self.methods.insert(name.into(), Arc::new(transform));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with<T: Transform + 'static>(mut self, name: impl Into<String>, transform: T) -> Self {
        self.register(name, transform);
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered method names in deterministic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Resolve one spec into a definition.
    pub fn resolve(&self, spec: &KasterSpec) -> Result<KasterDefinition, KastError> {
        let transform = self
            .methods
            .get(&spec.method)
            .ok_or_else(|| KastError::UnknownTransform(spec.method.clone()))?;

        Ok(KasterDefinition {
            name: spec.method.clone(),
            inputs: spec.inputs.clone(),
            outputs: spec.outputs.clone(),
            transform: Arc::clone(transform),
        })
    }

    /// Resolve every spec, failing on the first unknown method.
    pub fn resolve_all(&self, specs: &[KasterSpec]) -> Result<Vec<KasterDefinition>, KastError> {
        specs.iter().map(|spec| self.resolve(spec)).collect()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.methods.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kaster::{Params, TransformError};
    use crate::types::Frame;

    fn noop(_: &Params<'_>) -> Result<Frame, TransformError> {
        Ok(Frame::new())
    }

    fn spec(method: &str) -> KasterSpec {
        KasterSpec {
            method: method.to_string(),
            inputs: vec!["a".to_string()],
            outputs: vec!["b".to_string()],
        }
    }

    #[test]
    fn resolves_registered_method() {
        let registry = TransformRegistry::new().with("noop", noop);

        let def = registry.resolve(&spec("noop")).expect("resolve");
        assert_eq!(def.name, "noop");
        assert_eq!(def.inputs, vec!["a".to_string()]);
        assert_eq!(def.outputs, vec!["b".to_string()]);
    }

    #[test]
    fn unknown_method_is_a_configuration_error() {
        let registry = TransformRegistry::new().with("noop", noop);

        let result = registry.resolve_all(&[spec("noop"), spec("missing")]);
        assert!(matches!(result, Err(KastError::UnknownTransform(name)) if name == "missing"));
    }

    #[test]
    fn names_are_sorted() {
        let registry = TransformRegistry::new().with("b", noop).with("a", noop);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(registry.contains("a"));
    }
}
