//! # Kaster Module
//!
//! Transformation rules from low-level inputs to high-level outputs.
//!
//! A Kaster declares the low-level names it reads, the high-level names it
//! writes and the transform that maps one to the other. The transform must
//! return exactly its declared outputs, keyed by name.

use crate::types::{Frame, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// TRANSFORM ERRORS
// =============================================================================

/// Failure raised from inside a transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A parameter the transform needs was not supplied.
    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    /// A parameter could not be interpreted.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Any other transform failure.
    #[error("{0}")]
    Failed(String),
}

impl TransformError {
    /// Build an `InvalidParameter` error.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// PARAMS
// =============================================================================

/// The parameter set handed to a transform.
///
/// Holds the current low-level value of every input, in the Kaster's
/// declared input order, and the output names the transform must produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Params<'a> {
    inputs: Vec<(&'a str, &'a Value)>,
    outputs: &'a [String],
}

impl<'a> Params<'a> {
    /// Build a parameter set.
    #[must_use]
    pub fn new(inputs: Vec<(&'a str, &'a Value)>, outputs: &'a [String]) -> Self {
        Self { inputs, outputs }
    }

    /// Value of the named input.
    pub fn get(&self, name: &str) -> Result<&'a Value, TransformError> {
        self.inputs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| TransformError::MissingParameter(name.to_string()))
    }

    /// Text value of the named input.
    pub fn text(&self, name: &str) -> Result<&'a str, TransformError> {
        self.get(name)?
            .as_str()
            .ok_or_else(|| TransformError::invalid(name, "expected text"))
    }

    /// Numeric value of the named input; text is parsed as a float.
    pub fn number(&self, name: &str) -> Result<f64, TransformError> {
        let value = self.get(name)?;
        if let Some(x) = value.as_f64() {
            return Ok(x);
        }
        value
            .as_str()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| TransformError::invalid(name, format!("'{}' is not a number", value)))
    }

    /// Input names and values in declared order.
    pub fn inputs(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + '_ {
        self.inputs.iter().copied()
    }

    /// Output names the transform must produce, in declared order.
    #[must_use]
    pub fn outputs(&self) -> &'a [String] {
        self.outputs
    }
}

// =============================================================================
// TRANSFORM TRAIT
// =============================================================================

/// A transformation from a parameter set to a name-keyed result set.
///
/// Implemented for every matching closure or function, so hosts normally
/// register plain functions.
pub trait Transform: Send + Sync {
    fn apply(&self, params: &Params<'_>) -> Result<Frame, TransformError>;
}

impl<F> Transform for F
where
    F: Fn(&Params<'_>) -> Result<Frame, TransformError> + Send + Sync,
{
    fn apply(&self, params: &Params<'_>) -> Result<Frame, TransformError> {
        self(params)
    }
}

/// Pin a closure to the transform signature.
///
/// Closures passed straight to a `T: Transform` bound cannot infer the
/// higher-ranked parameter lifetime; routing them through here can.
pub fn transform_fn<F>(f: F) -> F
where
    F: Fn(&Params<'_>) -> Result<Frame, TransformError> + Send + Sync,
{
    f
}

// =============================================================================
// KASTER DEFINITION
// =============================================================================

/// A Kaster definition as supplied by the host at construction.
#[derive(Clone)]
pub struct KasterDefinition {
    /// Label used in errors and diagnostics (usually the method name).
    pub name: String,
    /// Low-level names the transform reads, in order.
    pub inputs: Vec<String>,
    /// High-level names the transform writes, in order.
    pub outputs: Vec<String>,
    pub transform: Arc<dyn Transform>,
}

impl KasterDefinition {
    /// Create a definition from any transform.
    pub fn new<I, O, T>(name: impl Into<String>, inputs: I, outputs: O, transform: T) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
        T: Transform + 'static,
    {
        Self {
            name: name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            transform: Arc::new(transform),
        }
    }
}

impl fmt::Debug for KasterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KasterDefinition")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

// =============================================================================
// KASTER
// =============================================================================

/// A registered transformation rule. Immutable once registered.
#[derive(Clone)]
pub struct Kaster {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    transform: Arc<dyn Transform>,
}

impl Kaster {
    pub(crate) fn from_definition(def: KasterDefinition) -> Self {
        Self {
            name: def.name,
            inputs: def.inputs,
            outputs: def.outputs,
            transform: def.transform,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn input_vars(&self) -> &[String] {
        &self.inputs
    }

    #[must_use]
    pub fn output_vars(&self) -> &[String] {
        &self.outputs
    }

    /// Run the transform on a parameter set.
    pub fn apply(&self, params: &Params<'_>) -> Result<Frame, TransformError> {
        self.transform.apply(params)
    }
}

impl fmt::Debug for Kaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kaster")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

impl fmt::Display for Kaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] -> [{}]",
            self.name,
            self.inputs.join(", "),
            self.outputs.join(", ")
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn doubled(params: &Params<'_>) -> Result<Frame, TransformError> {
        let x = params.number("x")?;
        Ok(Frame::from([("y".to_string(), Value::Float(x * 2.0))]))
    }

    #[test]
    fn params_lookup_by_name() {
        let x = Value::Int(3);
        let label = Value::from("4.5");
        let outputs = vec!["y".to_string()];
        let params = Params::new(vec![("x", &x), ("label", &label)], &outputs);

        assert_eq!(params.get("x"), Ok(&Value::Int(3)));
        assert_eq!(params.number("label"), Ok(4.5));
        assert_eq!(params.text("label"), Ok("4.5"));
        assert_eq!(
            params.get("missing"),
            Err(TransformError::MissingParameter("missing".to_string()))
        );
        assert!(params.text("x").is_err());
        assert_eq!(params.outputs(), ["y".to_string()]);
    }

    #[test]
    fn function_is_a_transform() {
        let def = KasterDefinition::new("doubled", ["x"], ["y"], doubled);
        let kaster = Kaster::from_definition(def);

        let x = Value::Float(1.5);
        let outputs = kaster.output_vars().to_vec();
        let result = kaster
            .apply(&Params::new(vec![("x", &x)], &outputs))
            .expect("apply");

        assert_eq!(result.get("y"), Some(&Value::Float(3.0)));
    }

    #[test]
    fn display_lists_variables() {
        let kaster = Kaster::from_definition(KasterDefinition::new(
            "pose_to_position",
            ["pose"],
            ["posx", "posy"],
            doubled,
        ));
        assert_eq!(kaster.to_string(), "pose_to_position: [pose] -> [posx, posy]");
    }
}
