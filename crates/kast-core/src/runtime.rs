//! # Runtime Module
//!
//! The step loop: frame in, knowledge and state out.
//!
//! One step is `update_low_level_knowledge` → `kast` → `evaluate_predicates`
//! and always runs to completion before the next one starts. Callers that
//! share a runtime across threads must hold one lock around a whole step.

use crate::diagnostic::Diagnostic;
use crate::pddl::{PddlSpellbook, Snapshot};
use crate::source::DataSource;
use crate::types::{Frame, KastError, State};
use serde::{Deserialize, Serialize};

/// What one step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// 1-based step number.
    pub step: u64,
    /// Non-fatal diagnostics raised during the step, in order.
    pub diagnostics: Vec<Diagnostic>,
    /// State after the step.
    pub state: State,
}

/// Snapshot tagged with the step that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    pub step: u64,
    #[serde(flatten)]
    pub knowledge: Snapshot,
}

/// Drives a [`PddlSpellbook`] one frame at a time.
#[derive(Debug, Clone)]
pub struct Runtime {
    book: PddlSpellbook,
    step: u64,
}

impl Runtime {
    /// Wrap a spellbook; no step has run yet.
    #[must_use]
    pub fn new(book: PddlSpellbook) -> Self {
        Self { book, step: 0 }
    }

    /// Number of steps completed or attempted.
    #[must_use]
    pub fn step(&self) -> u64 {
        self.step
    }

    #[must_use]
    pub fn spellbook(&self) -> &PddlSpellbook {
        &self.book
    }

    /// Apply one frame.
    ///
    /// The step counter advances even when the step fails, so step numbers
    /// line up with frames consumed.
    ///
    /// # Errors
    /// Transform failures from `kast()`; low-level knowledge has already
    /// absorbed the frame by then and the state is left as it was.
    pub fn run_step(&mut self, frame: &Frame) -> Result<StepReport, KastError> {
        self.step = self.step.saturating_add(1);
        let step = self.step;

        let mut diagnostics = self.book.update_low_level_knowledge(frame);
        diagnostics.extend(self.book.kast()?);
        diagnostics.extend(self.book.evaluate_predicates());

        tracing::debug!(step, diagnostics = diagnostics.len(), "step complete");
        Ok(StepReport {
            step,
            diagnostics,
            state: self.book.state().clone(),
        })
    }

    /// Pull one frame from `source` and apply it.
    ///
    /// Returns `Ok(None)` once the source reports no more frames.
    pub fn poll<S: DataSource + ?Sized>(&mut self, source: &mut S) -> Result<Option<StepReport>, KastError> {
        if !source.has_more() {
            return Ok(None);
        }
        let frame = source.get_new_information()?;
        self.run_step(&frame).map(Some)
    }

    /// Run until `source` is exhausted, calling `on_step` after every step.
    ///
    /// Returns the number of steps run.
    pub fn execute<S, F>(&mut self, source: &mut S, mut on_step: F) -> Result<u64, KastError>
    where
        S: DataSource + ?Sized,
        F: FnMut(&StepReport, &PddlSpellbook),
    {
        let mut count = 0u64;
        while let Some(report) = self.poll(source)? {
            count += 1;
            on_step(&report, &self.book);
        }
        tracing::info!(steps = count, "run complete");
        Ok(count)
    }

    /// Copy out knowledge and state, tagged with the current step.
    #[must_use]
    pub fn snapshot(&self) -> StepSnapshot {
        StepSnapshot {
            step: self.step,
            knowledge: self.book.snapshot(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kaster::{KasterDefinition, Params, TransformError};
    use crate::predicate::PredicateDefinition;
    use crate::source::ReplaySource;
    use crate::types::Value;

    fn level(params: &Params<'_>) -> Result<Frame, TransformError> {
        let x = params.number("raw")?;
        Ok(Frame::from([("level".to_string(), Value::Float(x))]))
    }

    fn runtime() -> Runtime {
        let kaster = KasterDefinition::new("level", ["raw"], ["level"], level);
        let pred = PredicateDefinition::new("full", "level", ">=", 10);
        Runtime::new(PddlSpellbook::new(["raw"], vec![kaster], &[pred]).expect("init"))
    }

    fn raw(v: &str) -> Frame {
        Frame::from([("raw".to_string(), Value::from(v))])
    }

    #[test]
    fn run_step_counts_and_reports_state() {
        let mut rt = runtime();

        let report = rt.run_step(&raw("12")).expect("step");
        assert_eq!(report.step, 1);
        assert_eq!(report.state.get("full"), Some(&true));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn execute_drains_source() {
        let mut rt = runtime();
        let mut source = ReplaySource::new(["raw"], vec![raw("1"), raw("20"), raw("3")]);

        let mut seen = Vec::new();
        let steps = rt
            .execute(&mut source, |report, _| {
                seen.push(report.state.get("full").copied());
            })
            .expect("execute");

        assert_eq!(steps, 3);
        assert_eq!(seen, vec![Some(false), Some(true), Some(false)]);
        assert_eq!(rt.step(), 3);
        assert!(rt.poll(&mut source).expect("poll").is_none());
    }

    #[test]
    fn failing_step_propagates_and_keeps_state() {
        let mut rt = runtime();
        rt.run_step(&raw("11")).expect("step");

        let err = rt.run_step(&raw("not a number")).expect_err("transform failure");
        assert!(matches!(err, KastError::Transform { .. }));
        assert_eq!(rt.step(), 2);
        assert_eq!(rt.spellbook().state().get("full"), Some(&true));
        assert_eq!(
            rt.snapshot().knowledge.low.get("raw"),
            Some(&Value::from("not a number"))
        );
    }
}
