//! # PDDL Spellbook
//!
//! A [`Spellbook`] extended with predicates, producing the boolean state a
//! planner consumes.
//!
//! Evaluation is a pure snapshot: each pass recomputes every predicate from
//! current high-level knowledge and replaces the previous state wholesale.

use crate::diagnostic::Diagnostic;
use crate::kaster::KasterDefinition;
use crate::knowledge::KnowledgeStore;
use crate::predicate::{Predicate, PredicateDefinition};
use crate::spellbook::Spellbook;
use crate::types::{Frame, KastError, State};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only copy of everything a printer or API needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub low: Frame,
    pub high: Frame,
    pub state: State,
}

/// Spellbook plus predicate evaluator.
#[derive(Debug, Clone)]
pub struct PddlSpellbook {
    spellbook: Spellbook,
    predicates: BTreeMap<String, Predicate>,
    state: State,
}

impl PddlSpellbook {
    /// Build the spellbook, then register predicates.
    ///
    /// # Errors
    /// Any Kaster registration error, then any predicate error.
    pub fn new<I>(
        low_level_headers: I,
        definitions: Vec<KasterDefinition>,
        predicate_definitions: &[PredicateDefinition],
    ) -> Result<Self, KastError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self::from_spellbook(Spellbook::new(low_level_headers, definitions)?, predicate_definitions)
    }

    /// Attach predicates to an existing spellbook.
    pub fn from_spellbook(
        spellbook: Spellbook,
        predicate_definitions: &[PredicateDefinition],
    ) -> Result<Self, KastError> {
        let mut book = Self {
            spellbook,
            predicates: BTreeMap::new(),
            state: State::new(),
        };
        book.register_predicates(predicate_definitions)?;
        Ok(book)
    }

    /// Register predicates.
    ///
    /// All definitions are resolved before any is stored, so a bad operator
    /// or duplicate name leaves the registered set untouched.
    pub fn register_predicates(&mut self, definitions: &[PredicateDefinition]) -> Result<(), KastError> {
        let mut staged: BTreeMap<String, Predicate> = BTreeMap::new();
        for def in definitions {
            let predicate = def.build()?;
            if self.predicates.contains_key(&def.name) || staged.contains_key(&def.name) {
                return Err(KastError::DuplicatePredicate(def.name.clone()));
            }
            staged.insert(def.name.clone(), predicate);
        }

        tracing::debug!(count = staged.len(), "predicates registered");
        self.predicates.append(&mut staged);
        Ok(())
    }

    /// Evaluate every predicate against current high-level knowledge.
    ///
    /// Clause rules:
    /// - reference missing from high-level knowledge → `MissingReference`,
    ///   clause skipped
    /// - values with no ordering → `Incomparable`, clause is false
    ///
    /// A predicate is the AND of its evaluated clauses, and false when no
    /// clause could be evaluated.
    pub fn evaluate_predicates(&mut self) -> Vec<Diagnostic> {
        let high = self.spellbook.high_level_knowledge();
        let mut diagnostics = Vec::new();
        let mut state = State::new();

        for predicate in self.predicates.values() {
            let mut evaluated = 0usize;
            let mut holds = true;

            for clause in predicate.clauses() {
                let Some(current) = high.value(&clause.reference) else {
                    diagnostics.push(Diagnostic::MissingReference {
                        predicate: predicate.name().to_string(),
                        variable: clause.reference.clone(),
                    });
                    continue;
                };

                evaluated += 1;
                let result = clause
                    .comparison
                    .evaluate(current, &clause.expected)
                    .unwrap_or_else(|| {
                        diagnostics.push(Diagnostic::Incomparable {
                            predicate: predicate.name().to_string(),
                            variable: clause.reference.clone(),
                            found: current.kind(),
                            expected: clause.expected.kind(),
                        });
                        false
                    });
                holds &= result;
            }

            state.insert(predicate.name().to_string(), evaluated > 0 && holds);
        }

        for diag in &diagnostics {
            diag.emit();
        }
        self.state = state;
        diagnostics
    }

    /// Forward to [`Spellbook::update_low_level_knowledge`].
    pub fn update_low_level_knowledge(&mut self, frame: &Frame) -> Vec<Diagnostic> {
        self.spellbook.update_low_level_knowledge(frame)
    }

    /// Forward to [`Spellbook::kast`].
    pub fn kast(&mut self) -> Result<Vec<Diagnostic>, KastError> {
        self.spellbook.kast()
    }

    /// State produced by the last evaluation.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Registered predicates by name.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.values()
    }

    #[must_use]
    pub fn spellbook(&self) -> &Spellbook {
        &self.spellbook
    }

    #[must_use]
    pub fn low_level_knowledge(&self) -> &KnowledgeStore {
        self.spellbook.low_level_knowledge()
    }

    #[must_use]
    pub fn high_level_knowledge(&self) -> &KnowledgeStore {
        self.spellbook.high_level_knowledge()
    }

    /// Copy out both tiers and the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            low: self.low_level_knowledge().snapshot(),
            high: self.high_level_knowledge().snapshot(),
            state: self.state.clone(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
