//! # Diagnostics
//!
//! Non-fatal events raised while processing a step.
//!
//! A diagnostic never interrupts the step loop. Every operation that can
//! raise one both logs it (`tracing` at `warn`) and returns it, so drivers
//! can surface them and tests can count them.

use crate::types::{Tier, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal engine event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A knowledge entry was updated with a value of a different type.
    TypeDrift {
        tier: Tier,
        name: String,
        from: ValueKind,
        to: ValueKind,
    },

    /// A predicate references a name absent from high-level knowledge.
    MissingReference { predicate: String, variable: String },

    /// A predicate compared values that have no ordering.
    Incomparable {
        predicate: String,
        variable: String,
        found: ValueKind,
        expected: ValueKind,
    },
}

impl Diagnostic {
    /// Log the diagnostic on the warn channel.
    pub fn emit(&self) {
        match self {
            Diagnostic::TypeDrift {
                tier,
                name,
                from,
                to,
            } => tracing::warn!(
                tier = %tier,
                name = %name,
                from = %from,
                to = %to,
                "knowledge updated with new type"
            ),
            Diagnostic::MissingReference {
                predicate,
                variable,
            } => tracing::warn!(
                predicate = %predicate,
                variable = %variable,
                "predicate reference not found in high level knowledge"
            ),
            Diagnostic::Incomparable {
                predicate,
                variable,
                found,
                expected,
            } => tracing::warn!(
                predicate = %predicate,
                variable = %variable,
                found = %found,
                expected = %expected,
                "predicate compared incomparable values"
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TypeDrift {
                tier,
                name,
                from,
                to,
            } => write!(
                f,
                "{} level knowledge '{}' is being updated with new type; changing {} to {}",
                tier, name, from, to
            ),
            Diagnostic::MissingReference {
                predicate,
                variable,
            } => write!(
                f,
                "{} cannot find {} in high level knowledge",
                predicate, variable
            ),
            Diagnostic::Incomparable {
                predicate,
                variable,
                found,
                expected,
            } => write!(
                f,
                "{} cannot order {} ({}) against a {} value",
                predicate, variable, found, expected
            ),
        }
    }
}
