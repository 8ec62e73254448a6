//! # kast-core
//!
//! The knowledge synthesis engine for KAST - THE LOGIC.
//!
//! Low-level data frames go in, Kasters turn them into high-level knowledge,
//! and predicates turn high-level knowledge into a boolean world state:
//!
//! ```text
//! frame ─► low-level store ─► Kasters ─► high-level store ─► predicates ─► state
//! ```
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network dependencies
//! - Deterministic: BTreeMap only; identical input renders identically
//! - Closed: transforms are host-registered callables, never loaded by path
//! - Single writer: every mutation goes through `&mut self`
//!
//! ## Example
//!
//! ```
//! use kast_core::{
//!     Frame, KasterDefinition, Params, PddlSpellbook, PredicateDefinition, TransformError,
//!     Value,
//! };
//!
//! fn posz(params: &Params<'_>) -> Result<Frame, TransformError> {
//!     let pose = params.text("pose")?;
//!     let z = pose
//!         .trim_matches(['[', ']'])
//!         .split(',')
//!         .nth(2)
//!         .and_then(|z| z.trim().parse::<f64>().ok())
//!         .ok_or_else(|| TransformError::invalid("pose", "expected [x,y,z]"))?;
//!     Ok(Frame::from([("posz".to_string(), Value::Float(z))]))
//! }
//!
//! let mut book = PddlSpellbook::new(
//!     ["pose"],
//!     vec![KasterDefinition::new("posz", ["pose"], ["posz"], posz)],
//!     &[PredicateDefinition::new("atHome", "posz", "<", 1)],
//! )
//! .expect("valid configuration");
//!
//! book.update_low_level_knowledge(&Frame::from([("pose".to_string(), Value::from("[0,0,0.5]"))]));
//! book.kast().expect("transform");
//! book.evaluate_predicates();
//!
//! assert_eq!(book.state().get("atHome"), Some(&true));
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod diagnostic;
pub mod kaster;
pub mod knowledge;
pub mod operator;
pub mod pddl;
pub mod predicate;
pub mod primitives;
pub mod registry;
pub mod runtime;
pub mod source;
pub mod spellbook;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{Frame, KastError, State, Tier, Value, ValueKind};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use diagnostic::Diagnostic;
pub use kaster::{Kaster, KasterDefinition, Params, Transform, TransformError, transform_fn};
pub use knowledge::{Knowledge, KnowledgeStore};
pub use operator::Comparison;
pub use pddl::{PddlSpellbook, Snapshot};
pub use predicate::{Clause, OneOrMany, Predicate, PredicateDefinition};
pub use registry::{KasterSpec, TransformRegistry};
pub use runtime::{Runtime, StepReport, StepSnapshot};
pub use source::{DataSource, ReplaySource};
pub use spellbook::Spellbook;
