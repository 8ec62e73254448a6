//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the KAST engine:
//! - Knowledge payloads (`Value`, `ValueKind`)
//! - Knowledge tiers (`Tier`)
//! - Frame and state maps (`Frame`, `State`)
//! - Error types (`KastError`)
//!
//! ## Determinism Guarantees
//!
//! All maps in this module are `BTreeMap`s, so iteration order is stable
//! across runs and identical inputs render identically.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::kaster::TransformError;

// =============================================================================
// FRAMES & STATE
// =============================================================================

/// One frame of named values: a low-level data frame going in, or the
/// result set a transform hands back.
pub type Frame = BTreeMap<String, Value>;

/// Boolean world state: predicate name to truth value.
pub type State = BTreeMap<String, bool>;

// =============================================================================
// TIER
// =============================================================================

/// Provenance label of a piece of knowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Sub-symbolic data as received from instrumentation.
    Low,
    /// Symbolic data derived by Kasters.
    High,
}

impl Tier {
    /// Get the tier label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::High => "high",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// A knowledge payload.
///
/// Untagged on the wire so that config and JSON literals map directly:
/// `1` is an `Int`, `0.5` a `Float`, `"[0,0,1]"` a `Text`, `[1, 2]` a
/// `List` and `null` is `Unset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// No value has been assigned yet.
    #[default]
    Unset,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

/// The runtime type of a [`Value`], tracked by knowledge entries for
/// type-drift detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Unset,
    Bool,
    Int,
    Float,
    Text,
    List,
}

impl ValueKind {
    /// Get the kind name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Unset => "unset",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::List => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Get the runtime kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unset => ValueKind::Unset,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::List(_) => ValueKind::List,
        }
    }

    /// Check whether this is the unset sentinel.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    /// Numeric view of the value (`Int` and `Float` only).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Text view of the value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Order two values.
    ///
    /// Returns `None` for pairs that have no meaningful order: mixed kinds
    /// (other than `Int` with `Float`), `Unset`, or a NaN.
    #[must_use]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => {
                let (a, b) = (self.as_f64()?, other.as_f64()?);
                a.partial_cmp(&b)
            }
        }
    }

    /// Equality with numeric coercion between `Int` and `Float`.
    ///
    /// Unlike [`Value::compare`] this is total: mismatched kinds are simply
    /// unequal.
    #[must_use]
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
            }
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.compare(other) == Some(Ordering::Equal)
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unset => f.write_str("None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the KAST engine.
///
/// Configuration errors (`MissingInput` through `DuplicatePredicate`) are
/// raised while building an engine and leave no engine behind.
/// `Transform` and `OutputMismatch` abort the current `kast()` pass only.
#[derive(Debug, Error)]
pub enum KastError {
    /// A Kaster requires low-level inputs that are not declared.
    #[error("Kaster '{kaster}' input variables {missing:?} were not found in the available low level knowledge")]
    MissingInput { kaster: String, missing: Vec<String> },

    /// Two Kasters claim the same high-level output.
    #[error("Kaster '{kaster}' output '{output}' is already produced by Kaster '{owner}'")]
    DuplicateOutput {
        kaster: String,
        output: String,
        owner: String,
    },

    /// A Kaster references a transform method that was never registered.
    #[error("Unknown transform method: {0}")]
    UnknownTransform(String),

    /// A predicate uses an operator symbol outside the comparison table.
    #[error("Given operator '{0}' is not contained in the binary operator mappings. Check syntax.")]
    UnknownOperator(String),

    /// A predicate's reference, operator and expected lists differ in length.
    #[error(
        "Predicate '{predicate}' has {references} reference variables, {operators} operators and {expected} expected values"
    )]
    ArityMismatch {
        predicate: String,
        references: usize,
        operators: usize,
        expected: usize,
    },

    /// Two predicates share a name.
    #[error("Predicate '{0}' is defined more than once")]
    DuplicatePredicate(String),

    /// A Kaster's transform failed.
    #[error("Kaster '{kaster}' transform failed: {source}")]
    Transform {
        kaster: String,
        #[source]
        source: TransformError,
    },

    /// A transform returned a key set different from its declared outputs.
    #[error("Kaster '{kaster}' returned {actual:?}, expected outputs {expected:?}")]
    OutputMismatch {
        kaster: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A data source failed to deliver a frame.
    #[error("Data source error: {0}")]
    Source(String),

    /// Invalid configuration outside the categories above.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
