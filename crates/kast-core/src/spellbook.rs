//! # Spellbook Module
//!
//! The orchestrator owning both knowledge tiers and the Kaster rule set.
//!
//! - Kasters are validated against the low-level store at registration
//! - Registration is fail-fast; a rejected Kaster leaves nothing behind
//! - `kast()` reads a fully updated low-level snapshot, never a partial one
//! - Kasters read low-level knowledge only; they never chain

use crate::diagnostic::Diagnostic;
use crate::kaster::{Kaster, KasterDefinition, Params};
use crate::knowledge::KnowledgeStore;
use crate::types::{Frame, KastError, Tier};
use std::collections::BTreeMap;

/// Knowledge stores plus the ordered rule set that connects them.
#[derive(Debug, Clone)]
pub struct Spellbook {
    low: KnowledgeStore,
    high: KnowledgeStore,
    kasters: Vec<Kaster>,
    /// Output name → index of the Kaster producing it.
    producers: BTreeMap<String, usize>,
}

impl Spellbook {
    /// Build a spellbook from low-level headers and Kaster definitions.
    ///
    /// 1. Declares one unset low-level entry per header.
    /// 2. Registers every Kaster in order, stopping at the first invalid one.
    /// 3. Declares one high-level entry per distinct output.
    ///
    /// # Errors
    /// `MissingInput` or `DuplicateOutput` for the first invalid definition.
    pub fn new<I>(low_level_headers: I, definitions: Vec<KasterDefinition>) -> Result<Self, KastError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut low = KnowledgeStore::new(Tier::Low);
        for name in low_level_headers {
            low.declare(name.as_ref());
        }

        let mut book = Self {
            low,
            high: KnowledgeStore::new(Tier::High),
            kasters: Vec::with_capacity(definitions.len()),
            producers: BTreeMap::new(),
        };
        for def in definitions {
            book.register_kaster(def)?;
        }

        tracing::debug!(
            low = book.low.len(),
            high = book.high.len(),
            kasters = book.kasters.len(),
            "spellbook initialized"
        );
        Ok(book)
    }

    /// Register one more Kaster.
    ///
    /// Every input must already be declared in low-level knowledge and no
    /// output may belong to another Kaster. On error nothing is registered.
    pub fn register_kaster(&mut self, def: KasterDefinition) -> Result<(), KastError> {
        let missing: Vec<String> = def
            .inputs
            .iter()
            .filter(|name| !self.low.contains(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(KastError::MissingInput {
                kaster: def.name,
                missing,
            });
        }

        for (i, output) in def.outputs.iter().enumerate() {
            let owner = self
                .producers
                .get(output)
                .map(|&idx| self.kasters[idx].name().to_string())
                .or_else(|| {
                    def.outputs[..i]
                        .contains(output)
                        .then(|| def.name.clone())
                });
            if let Some(owner) = owner {
                return Err(KastError::DuplicateOutput {
                    kaster: def.name,
                    output: output.clone(),
                    owner,
                });
            }
        }

        let index = self.kasters.len();
        for output in &def.outputs {
            self.high.declare(output);
            self.producers.insert(output.clone(), index);
        }
        self.kasters.push(Kaster::from_definition(def));
        Ok(())
    }

    /// Fold a new low-level frame into knowledge.
    ///
    /// Unknown names are declared on first sight. Names absent from the
    /// frame keep their previous value.
    pub fn update_low_level_knowledge(&mut self, frame: &Frame) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (name, value) in frame {
            if !self.low.contains(name) {
                tracing::debug!(name = %name, "new low level knowledge");
            }
            if let Some(diag) = self.low.declare(name).update(value.clone()) {
                diagnostics.push(diag);
            }
        }
        diagnostics
    }

    /// Apply every Kaster in registration order.
    ///
    /// # Errors
    /// Aborts on the first failing transform (`Transform`) or result set that
    /// differs from the declared outputs (`OutputMismatch`). High-level values
    /// written by earlier Kasters in this pass are kept; the failing Kaster
    /// writes nothing.
    pub fn kast(&mut self) -> Result<Vec<Diagnostic>, KastError> {
        let mut diagnostics = Vec::new();

        for kaster in &self.kasters {
            let inputs = kaster
                .input_vars()
                .iter()
                .filter_map(|name| {
                    self.low
                        .get(name)
                        .map(|entry| (name.as_str(), entry.value()))
                })
                .collect();
            let params = Params::new(inputs, kaster.output_vars());

            let mut results = kaster.apply(&params).map_err(|source| KastError::Transform {
                kaster: kaster.name().to_string(),
                source,
            })?;

            let declared = kaster.output_vars();
            if results.len() != declared.len() || !declared.iter().all(|o| results.contains_key(o)) {
                return Err(KastError::OutputMismatch {
                    kaster: kaster.name().to_string(),
                    expected: declared.to_vec(),
                    actual: results.into_keys().collect(),
                });
            }

            for output in declared {
                if let Some(value) = results.remove(output) {
                    if let Some(diag) = self.high.declare(output).update(value) {
                        diagnostics.push(diag);
                    }
                }
            }
        }

        Ok(diagnostics)
    }

    /// Low-level knowledge, read-only.
    #[must_use]
    pub fn low_level_knowledge(&self) -> &KnowledgeStore {
        &self.low
    }

    /// High-level knowledge, read-only.
    #[must_use]
    pub fn high_level_knowledge(&self) -> &KnowledgeStore {
        &self.high
    }

    /// Registered Kasters in registration order.
    #[must_use]
    pub fn kasters(&self) -> &[Kaster] {
        &self.kasters
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kaster::{TransformError, transform_fn};
    use crate::primitives::{MAX_FRAME_WIDTH, check_frame_limits};
    use crate::types::{Value, ValueKind};

    fn third_element(params: &Params<'_>) -> Result<Frame, TransformError> {
        let pose = params.text("pose")?;
        let z = pose
            .trim_matches(['[', ']'])
            .split(',')
            .nth(2)
            .ok_or_else(|| TransformError::invalid("pose", "fewer than three components"))?;
        let z: f64 = z
            .trim()
            .parse()
            .map_err(|_| TransformError::invalid("pose", "not a number"))?;
        Ok(Frame::from([("posz".to_string(), Value::Float(z))]))
    }

    fn posz_kaster() -> KasterDefinition {
        KasterDefinition::new("third_element", ["pose"], ["posz"], third_element)
    }

    fn frame(pairs: &[(&str, Value)]) -> Frame {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn init_declares_both_tiers() {
        let book = Spellbook::new(["pose", "rpy"], vec![posz_kaster()]).expect("init");

        assert_eq!(book.low_level_knowledge().names().collect::<Vec<_>>(), vec!["pose", "rpy"]);
        assert_eq!(book.high_level_knowledge().names().collect::<Vec<_>>(), vec!["posz"]);
        assert_eq!(book.kasters().len(), 1);
        assert_eq!(
            book.high_level_knowledge().get("posz").map(|k| k.observed_kind()),
            Some(ValueKind::Unset)
        );
    }

    #[test]
    fn missing_input_names_every_absent_variable() {
        let def = KasterDefinition::new("needs_more", ["pose", "rpy", "vel"], ["x"], third_element);
        let err = Spellbook::new(["pose"], vec![def]).expect_err("missing input");

        match err {
            KastError::MissingInput { kaster, missing } => {
                assert_eq!(kaster, "needs_more");
                assert_eq!(missing, vec!["rpy".to_string(), "vel".to_string()]);
            }
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failed_registration_adds_nothing() {
        let mut book = Spellbook::new(["pose"], vec![posz_kaster()]).expect("init");
        let bad = KasterDefinition::new("bad", ["absent"], ["other"], third_element);

        assert!(book.register_kaster(bad).is_err());
        assert_eq!(book.kasters().len(), 1);
        assert!(!book.high_level_knowledge().contains("other"));
    }

    #[test]
    fn registration_stops_at_first_invalid_definition() {
        let mut book = Spellbook::new(["pose"], Vec::new()).expect("init");
        let defs = vec![
            posz_kaster(),
            KasterDefinition::new("bad", ["absent"], ["b"], third_element),
            KasterDefinition::new("after", ["pose"], ["c"], third_element),
        ];

        let result: Result<(), KastError> = defs.into_iter().try_for_each(|d| book.register_kaster(d));
        assert!(result.is_err());
        assert_eq!(book.kasters().len(), 1);
        assert!(!book.high_level_knowledge().contains("c"));
    }

    #[test]
    fn duplicate_outputs_are_rejected() {
        let again = KasterDefinition::new("again", ["pose"], ["posz"], third_element);
        let err = Spellbook::new(["pose"], vec![posz_kaster(), again]).expect_err("duplicate");
        assert!(matches!(
            err,
            KastError::DuplicateOutput { ref output, ref owner, .. } if output == "posz" && owner == "third_element"
        ));

        let twice = KasterDefinition::new("twice", ["pose"], ["a", "a"], third_element);
        assert!(Spellbook::new(["pose"], vec![twice]).is_err());
    }

    #[test]
    fn update_grows_schema_and_keeps_omitted_values() {
        let mut book = Spellbook::new(["pose"], vec![posz_kaster()]).expect("init");

        book.update_low_level_knowledge(&frame(&[("pose", Value::from("[0,0,1]"))]));
        let diags = book.update_low_level_knowledge(&frame(&[("battery", Value::Float(0.9))]));

        assert!(diags.is_empty());
        let low = book.low_level_knowledge();
        assert_eq!(low.value("pose"), Some(&Value::from("[0,0,1]")));
        assert_eq!(low.value("battery"), Some(&Value::Float(0.9)));
    }

    #[test]
    fn narrow_frames_still_grow_the_store() {
        let mut book = Spellbook::new(["pose"], Vec::new()).expect("init");

        for i in 0..(MAX_FRAME_WIDTH + 10) {
            let update = frame(&[(format!("v{}", i).as_str(), Value::Int(1))]);
            assert!(check_frame_limits(update.keys()).is_ok());
            book.update_low_level_knowledge(&update);
        }

        assert_eq!(book.low_level_knowledge().len(), MAX_FRAME_WIDTH + 11);
    }

    #[test]
    fn update_reports_type_drift() {
        let mut book = Spellbook::new(["pose"], Vec::new()).expect("init");

        book.update_low_level_knowledge(&frame(&[("pose", Value::from("[0,0,1]"))]));
        let diags = book.update_low_level_knowledge(&frame(&[("pose", Value::Int(7))]));

        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn kast_writes_high_level_outputs() {
        let mut book = Spellbook::new(["pose"], vec![posz_kaster()]).expect("init");

        book.update_low_level_knowledge(&frame(&[("pose", Value::from("[0,0,0.5]"))]));
        book.kast().expect("kast");

        assert_eq!(book.high_level_knowledge().value("posz"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn kast_rejects_result_sets_that_differ_from_outputs() {
        let extra = transform_fn(|_| {
            Ok(Frame::from([
                ("a".to_string(), Value::Int(1)),
                ("b".to_string(), Value::Int(2)),
            ]))
        });
        let def = KasterDefinition::new("extra", ["pose"], ["a"], extra);
        let mut book = Spellbook::new(["pose"], vec![def]).expect("init");

        let err = book.kast().expect_err("mismatch");
        assert!(matches!(err, KastError::OutputMismatch { .. }));
        assert_eq!(book.high_level_knowledge().value("a"), Some(&Value::Unset));
    }

    #[test]
    fn failing_transform_keeps_earlier_outputs() {
        let ok = transform_fn(|_| Ok(Frame::from([("first".to_string(), Value::Int(1))])));
        let fail = transform_fn(|_| Err(TransformError::Failed("boom".to_string())));
        let never = transform_fn(|_| Ok(Frame::from([("third".to_string(), Value::Int(3))])));

        let mut book = Spellbook::new(
            ["pose"],
            vec![
                KasterDefinition::new("ok", ["pose"], ["first"], ok),
                KasterDefinition::new("fail", ["pose"], ["second"], fail),
                KasterDefinition::new("never", ["pose"], ["third"], never),
            ],
        )
        .expect("init");

        let err = book.kast().expect_err("transform failure");
        assert!(matches!(err, KastError::Transform { ref kaster, .. } if kaster == "fail"));

        let high = book.high_level_knowledge();
        assert_eq!(high.value("first"), Some(&Value::Int(1)));
        assert_eq!(high.value("second"), Some(&Value::Unset));
        assert_eq!(high.value("third"), Some(&Value::Unset));
    }

    #[test]
    fn transform_sees_inputs_in_declared_order() {
        let order = transform_fn(|params| {
            let names: Vec<Value> = params.inputs().map(|(n, _)| Value::from(n)).collect();
            Ok(Frame::from([("order".to_string(), Value::List(names))]))
        });
        let def = KasterDefinition::new("order", ["b", "a"], ["order"], order);
        let mut book = Spellbook::new(["a", "b"], vec![def]).expect("init");

        book.kast().expect("kast");
        assert_eq!(
            book.high_level_knowledge().value("order"),
            Some(&Value::from(vec!["b", "a"]))
        );
    }
}
