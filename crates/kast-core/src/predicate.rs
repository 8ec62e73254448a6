//! # Predicate Module
//!
//! Declarative boolean tests over high-level knowledge.
//!
//! A predicate is one or more clauses of the form
//! `reference_variable operator expected_value`. Clauses are built from a
//! definition whose reference, operator and expected lists must line up.

use crate::operator::{Comparison, binary_op_mappings};
use crate::types::{KastError, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ONE OR MANY
// =============================================================================

/// A field that accepts either a single item or a list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into a list.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_string())
    }
}

impl From<String> for OneOrMany<String> {
    fn from(s: String) -> Self {
        OneOrMany::One(s)
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(items: Vec<&str>) -> Self {
        OneOrMany::Many(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for OneOrMany<String> {
    fn from(items: Vec<String>) -> Self {
        OneOrMany::Many(items)
    }
}

// =============================================================================
// PREDICATE DEFINITION
// =============================================================================

/// A predicate as written in configuration.
///
/// With a single `reference`, `operator` must name one comparison and
/// `expected` is taken whole (a list literal stays a list value). With a
/// list of references, `operator` and `expected` must be lists of the same
/// length; a one-item reference list also accepts a scalar `expected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateDefinition {
    pub name: String,
    pub reference: OneOrMany<String>,
    pub operator: OneOrMany<String>,
    pub expected: Value,
}

impl PredicateDefinition {
    /// Create a definition.
    pub fn new(
        name: impl Into<String>,
        reference: impl Into<OneOrMany<String>>,
        operator: impl Into<OneOrMany<String>>,
        expected: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            operator: operator.into(),
            expected: expected.into(),
        }
    }

    /// Resolve into a predicate.
    ///
    /// # Errors
    /// `UnknownOperator` for a symbol outside the table, `ArityMismatch`
    /// when the lists do not line up (or are empty).
    pub fn build(&self) -> Result<Predicate, KastError> {
        let references = self.reference.clone().into_vec();
        let symbols = self.operator.clone().into_vec();
        let expected = match (&self.reference, &self.expected) {
            (OneOrMany::One(_), value) => vec![value.clone()],
            (OneOrMany::Many(_), Value::List(items)) => items.clone(),
            (OneOrMany::Many(refs), value) if refs.len() == 1 => vec![value.clone()],
            (OneOrMany::Many(_), _) => Vec::new(),
        };

        if references.is_empty()
            || references.len() != symbols.len()
            || references.len() != expected.len()
        {
            return Err(KastError::ArityMismatch {
                predicate: self.name.clone(),
                references: references.len(),
                operators: symbols.len(),
                expected: expected.len(),
            });
        }

        let comparisons = binary_op_mappings(&symbols)?;
        let clauses = references
            .into_iter()
            .zip(comparisons)
            .zip(expected)
            .map(|((reference, comparison), expected)| Clause {
                reference,
                comparison,
                expected,
            })
            .collect();

        Ok(Predicate {
            name: self.name.clone(),
            clauses,
        })
    }
}

// =============================================================================
// PREDICATE
// =============================================================================

/// One comparison inside a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// High-level knowledge name compared.
    pub reference: String,
    pub comparison: Comparison,
    pub expected: Value,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.reference, self.comparison, self.expected)
    }
}

/// A named conjunction of clauses. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    name: String,
    clauses: Vec<Clause>,
}

impl Predicate {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:", self.name)?;
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" and")?;
            }
            write!(f, " {}", clause)?;
        }
        f.write_str(")")
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_reference_has_arity_one() {
        let pred = PredicateDefinition::new("atHome", "posz", "<", 1)
            .build()
            .expect("build");

        assert_eq!(pred.name(), "atHome");
        assert_eq!(pred.clauses().len(), 1);
        assert_eq!(pred.clauses()[0].comparison, Comparison::Lt);
        assert_eq!(pred.to_string(), "(atHome: posz < 1)");
    }

    #[test]
    fn single_reference_keeps_list_expectation_whole() {
        let pred = PredicateDefinition::new("origin", "position", "==", vec![0, 0, 0])
            .build()
            .expect("build");

        assert_eq!(pred.clauses().len(), 1);
        assert_eq!(pred.clauses()[0].expected, Value::from(vec![0, 0, 0]));
    }

    #[test]
    fn compound_definition_zips_lists() {
        let pred = PredicateDefinition::new(
            "inBox",
            vec!["posx", "posy"],
            vec![">=", "<"],
            vec![Value::Int(0), Value::Float(2.5)],
        )
        .build()
        .expect("build");

        assert_eq!(pred.to_string(), "(inBox: posx >= 0 and posy < 2.5)");
    }

    #[test]
    fn one_item_reference_list_accepts_scalar_expectation() {
        let pred = PredicateDefinition::new("low", vec!["lvl"], vec!["<"], 1)
            .build()
            .expect("build");

        assert_eq!(pred.clauses().len(), 1);
        assert_eq!(pred.clauses()[0].expected, Value::Int(1));
        assert_eq!(pred.to_string(), "(low: lvl < 1)");
    }

    #[test]
    fn mismatched_lists_are_rejected() {
        let def = PredicateDefinition::new("bad", vec!["a", "b"], vec!["<"], vec![1, 2]);
        assert!(matches!(
            def.build(),
            Err(KastError::ArityMismatch {
                references: 2,
                operators: 1,
                expected: 2,
                ..
            })
        ));

        let scalar = PredicateDefinition::new("bad", vec!["a", "b"], vec!["<", "<"], 1);
        assert!(scalar.build().is_err());

        let empty = PredicateDefinition::new("bad", Vec::<String>::new(), Vec::<String>::new(), Vec::<Value>::new());
        assert!(empty.build().is_err());
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let def = PredicateDefinition::new("bad", "a", "=>", 1);
        assert!(matches!(def.build(), Err(KastError::UnknownOperator(ref s)) if s == "=>"));
    }

    #[test]
    fn definition_deserializes_both_forms() {
        let single: PredicateDefinition = serde_json::from_str(
            r#"{"name":"atHome","reference":"posz","operator":"<","expected":1}"#,
        )
        .expect("single");
        assert_eq!(single.reference, OneOrMany::One("posz".to_string()));

        let many: PredicateDefinition = serde_json::from_str(
            r#"{"name":"inBox","reference":["x","y"],"operator":["<","<"],"expected":[1,2]}"#,
        )
        .expect("many");
        assert_eq!(many.build().expect("build").clauses().len(), 2);
    }
}
