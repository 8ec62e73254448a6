//! # Step Rendering
//!
//! Text and JSON views of a spellbook, used by the `check`, `run` and `live`
//! commands.

use clap::ValueEnum;
use kast_core::{PddlSpellbook, StepReport};
use serde_json::json;
use std::fmt::Write as _;

/// What to print after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum IoMode {
    /// Low-level knowledge.
    Low,
    /// High-level knowledge.
    High,
    /// Both knowledge tiers.
    Both,
    /// Predicate state.
    #[default]
    State,
    /// Nothing but the step banner.
    Quiet,
}

impl IoMode {
    fn shows_low(self) -> bool {
        matches!(self, Self::Low | Self::Both)
    }

    fn shows_high(self) -> bool {
        matches!(self, Self::High | Self::Both)
    }
}

/// Banner printed when a run starts.
#[must_use]
pub fn run_header() -> String {
    [
        "*************************************************",
        "************    KAST INITIALIZED     ************",
        "*************************************************",
    ]
    .join("\n")
}

/// Banner printed when a run ends.
#[must_use]
pub fn run_footer(steps: u64) -> String {
    format!(
        "*************************************************\n\
         ***************     COMPLETE     ****************\n\
         *************************************************\n\
         {} steps",
        steps
    )
}

/// Text view of one step.
#[must_use]
pub fn step_text(report: &StepReport, book: &PddlSpellbook, io: IoMode) -> String {
    let mut out = format!("\n--------------------- STEP {} ---------------------\n", report.step);

    if io.shows_low() {
        let _ = write!(out, "\nLow Level Knowledge Values\n{}\n", book.low_level_knowledge());
    }
    if io.shows_high() {
        let _ = write!(out, "\nHigh Level Knowledge Values\n{}\n", book.high_level_knowledge());
    }
    if io == IoMode::State {
        out.push_str("\nState\n");
        for (name, holds) in &report.state {
            let _ = writeln!(out, "  {:<24} {}", name, holds);
        }
    }
    out
}

/// JSON view of one step; one object per line in `--json-mode`.
#[must_use]
pub fn step_json(report: &StepReport, book: &PddlSpellbook, io: IoMode) -> serde_json::Value {
    let mut value = json!({
        "step": report.step,
        "diagnostics": report.diagnostics,
        "state": report.state,
    });
    if io.shows_low() {
        value["low"] = json!(book.low_level_knowledge().snapshot());
    }
    if io.shows_high() {
        value["high"] = json!(book.high_level_knowledge().snapshot());
    }
    value
}

/// Text description of an initialized engine.
#[must_use]
pub fn describe_text(book: &PddlSpellbook) -> String {
    let mut out = String::new();

    let low: Vec<&str> = book.low_level_knowledge().names().collect();
    let _ = writeln!(out, "Low level knowledge ({}): {}", low.len(), low.join(", "));

    let _ = writeln!(out, "Kasters ({}):", book.spellbook().kasters().len());
    for kaster in book.spellbook().kasters() {
        let _ = writeln!(out, "  {}", kaster);
    }

    let high: Vec<&str> = book.high_level_knowledge().names().collect();
    let _ = writeln!(out, "High level knowledge ({}): {}", high.len(), high.join(", "));

    let predicates: Vec<String> = book.predicates().map(ToString::to_string).collect();
    let _ = writeln!(out, "Predicates ({}):", predicates.len());
    for predicate in predicates {
        let _ = writeln!(out, "  {}", predicate);
    }
    out
}

/// JSON description of an initialized engine.
#[must_use]
pub fn describe_json(book: &PddlSpellbook) -> serde_json::Value {
    json!({
        "low": book.low_level_knowledge().names().collect::<Vec<_>>(),
        "high": book.high_level_knowledge().names().collect::<Vec<_>>(),
        "kasters": book
            .spellbook()
            .kasters()
            .iter()
            .map(|k| json!({
                "method": k.name(),
                "inputs": k.input_vars(),
                "outputs": k.output_vars(),
            }))
            .collect::<Vec<_>>(),
        "predicates": book.predicates().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::builtin_registry;
    use kast_core::{Frame, KasterSpec, PredicateDefinition, Runtime, Value};

    fn stepped() -> (Runtime, StepReport) {
        let spec = KasterSpec {
            method: "pose_to_posz".to_string(),
            inputs: vec!["pose".to_string()],
            outputs: vec!["posz".to_string()],
        };
        let defs = builtin_registry().resolve_all(&[spec]).expect("resolve");
        let book = PddlSpellbook::new(
            ["pose"],
            defs,
            &[PredicateDefinition::new("atHome", "posz", "<", 1)],
        )
        .expect("init");

        let mut runtime = Runtime::new(book);
        let frame = Frame::from([("pose".to_string(), Value::from("[0,0,0.5]"))]);
        let report = runtime.run_step(&frame).expect("step");
        (runtime, report)
    }

    #[test]
    fn text_modes_select_tiers() {
        let (runtime, report) = stepped();
        let book = runtime.spellbook();

        let both = step_text(&report, book, IoMode::Both);
        assert!(both.contains("STEP 1"));
        assert!(both.contains("[(pose: [0,0,0.5])]"));
        assert!(both.contains("[(posz: 0.5)]"));

        let state = step_text(&report, book, IoMode::State);
        assert!(state.contains("atHome"));
        assert!(!state.contains("Low Level"));

        let quiet = step_text(&report, book, IoMode::Quiet);
        assert!(!quiet.contains("atHome"));
    }

    #[test]
    fn json_view_carries_state_and_tiers() {
        let (runtime, report) = stepped();
        let value = step_json(&report, runtime.spellbook(), IoMode::High);

        assert_eq!(value["step"], 1);
        assert_eq!(value["state"]["atHome"], true);
        assert_eq!(value["high"]["posz"], 0.5);
        assert!(value.get("low").is_none());
    }

    #[test]
    fn describe_lists_rules_and_predicates() {
        let (runtime, _) = stepped();
        let text = describe_text(runtime.spellbook());

        assert!(text.contains("pose_to_posz: [pose] -> [posz]"));
        assert!(text.contains("(atHome: posz < 1)"));

        let json = describe_json(runtime.spellbook());
        assert_eq!(json["kasters"][0]["method"], "pose_to_posz");
    }
}
