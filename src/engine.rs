//! Parsing and resolution engine.
//!
//! Parsing an input string is a pipeline:
//!
//! ```text
//! rules (all)  ──┐
//!               │  CompiledRules::new           (compiled_rules.rs)
//!               └───────────────┬──────────────
//!                               │
//! input ── TriggerInfo::scan ───┼─ select active rules (buckets + phrases)
//!         (trigger.rs)          │
//!                               v
//!                     Parser::saturate (parser.rs)
//!                       - seed matches (regex-first)
//!                       - iterate to fixpoint
//!                       - add nodes to stash
//!                       - dedup via NodeKey (dedup.rs)
//!                               │
//!                               v
//!                     resolve_node (resolve.rs)
//!                       - per-dimension resolve
//!                       - option filtering
//!                               │
//!                               v
//!                        Vec<ResolvedToken>
//! ```
//!
//! The engine leans on **saturation**: apply rules until an iteration
//! produces no new nodes. One rule's output feeds another's predicates, which
//! is how "quatre vingt" becomes a multiplier for "mille", and a month lexeme
//! plus a numeral becomes a date.
//!
//! - `compiled_rules.rs`: `CompiledRules`, bucket index and per-rule metadata.
//! - `trigger.rs`: coarse buckets and key phrases scanned from the input.
//! - `parser.rs`: matching + saturation over a `Stash`, then resolution and
//!   filtering.
//! - `dedup.rs`: dedup keys that keep saturation finite.
//! - `resolve.rs`: per-dimension canonical values.
//! - `metrics.rs`: timings and per-pass traces.
//!
//! A new rule family goes under `src/rules/**` and is added to
//! `crate::rules::get`. A new dimension also needs a `DimensionSet` bit, a
//! `NodeKindKey` variant and a branch in `resolve.rs`.
//!
//! Traces go through the `log` facade at debug and trace level.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/trigger.rs"]
mod trigger;

#[allow(unused_imports)]
pub use compiled_rules::{BucketMask, CompiledRules, DimensionSet, RuleIndex, RuleMeta};
#[allow(unused_imports)]
pub use metrics::{PassMetrics, RunMetrics, RunResult, SaturationMetrics};
pub use parser::Parser;
#[allow(unused_imports)]
pub use trigger::TriggerInfo;
