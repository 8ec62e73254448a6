//! # Operator Mapping
//!
//! The closed table of binary comparisons usable in predicates.
//!
//! Predicates store the tagged [`Comparison`], not a function pointer, so
//! they stay serializable; the strategy is picked at evaluation time.

use crate::types::{KastError, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A binary comparison between a current value and an expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

impl Comparison {
    /// All comparisons, in symbol-table order.
    pub const ALL: [Comparison; 6] = [
        Comparison::Lt,
        Comparison::Le,
        Comparison::Eq,
        Comparison::Ne,
        Comparison::Gt,
        Comparison::Ge,
    ];

    /// Get the operator symbol.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    /// Compare `current` against `expected`.
    ///
    /// Returns `None` when an ordering comparison meets values with no
    /// ordering between them. `==` and `!=` are always decided.
    #[must_use]
    pub fn evaluate(&self, current: &Value, expected: &Value) -> Option<bool> {
        match self {
            Comparison::Eq => Some(current.loosely_equals(expected)),
            Comparison::Ne => Some(!current.loosely_equals(expected)),
            ordering => {
                let ord = current.compare(expected)?;
                Some(match ordering {
                    Comparison::Lt => ord == Ordering::Less,
                    Comparison::Le => ord != Ordering::Greater,
                    Comparison::Gt => ord == Ordering::Greater,
                    _ => ord != Ordering::Less,
                })
            }
        }
    }
}

/// Resolve a list of operator symbols, failing on the first unknown one.
pub fn binary_op_mappings<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<Comparison>, KastError> {
    symbols.iter().map(|s| s.as_ref().parse()).collect()
}

impl FromStr for Comparison {
    type Err = KastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparison::ALL
            .into_iter()
            .find(|c| c.symbol() == s)
            .ok_or_else(|| KastError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::OPERATOR_SYMBOLS;

    #[test]
    fn every_table_symbol_resolves_and_round_trips() {
        for symbol in OPERATOR_SYMBOLS {
            let comparison: Comparison = symbol.parse().expect("known symbol");
            assert_eq!(comparison.symbol(), symbol);
        }
    }

    #[test]
    fn unknown_symbol_names_the_symbol() {
        let err = "=<".parse::<Comparison>().expect_err("unknown");
        assert!(matches!(err, KastError::UnknownOperator(ref s) if s == "=<"));

        assert!(binary_op_mappings(&["<", "~"]).is_err());
        assert_eq!(
            binary_op_mappings(&["<", ">="]).expect("known"),
            vec![Comparison::Lt, Comparison::Ge]
        );
    }

    #[test]
    fn greater_or_equal_includes_equality() {
        let five = Value::Float(5.0);
        assert_eq!(Comparison::Ge.evaluate(&five, &Value::Int(5)), Some(true));
        assert_eq!(Comparison::Ge.evaluate(&five, &Value::Int(6)), Some(false));
        assert_eq!(Comparison::Gt.evaluate(&five, &Value::Int(5)), Some(false));
    }

    #[test]
    fn ordering_table() {
        let (lo, hi) = (Value::Float(0.5), Value::Int(1));
        assert_eq!(Comparison::Lt.evaluate(&lo, &hi), Some(true));
        assert_eq!(Comparison::Le.evaluate(&hi, &hi), Some(true));
        assert_eq!(Comparison::Eq.evaluate(&lo, &hi), Some(false));
        assert_eq!(Comparison::Ne.evaluate(&lo, &hi), Some(true));
        assert_eq!(Comparison::Gt.evaluate(&lo, &hi), Some(false));
    }

    #[test]
    fn incomparable_values_only_undecide_orderings() {
        let text = Value::from("high");
        let one = Value::Int(1);
        assert_eq!(Comparison::Lt.evaluate(&text, &one), None);
        assert_eq!(Comparison::Eq.evaluate(&text, &one), Some(false));
        assert_eq!(Comparison::Ne.evaluate(&Value::Unset, &one), Some(true));
    }

    #[test]
    fn serializes_as_symbol() {
        let json = serde_json::to_string(&Comparison::Le).expect("serialize");
        assert_eq!(json, "\"<=\"");
        let parsed: Comparison = serde_json::from_str("\"!=\"").expect("parse");
        assert_eq!(parsed, Comparison::Ne);
    }
}
