//! Engine run metrics.
//!
//! `Parser::run` is the normal path; `Parser::run_with_metrics` also returns
//! per-pass timings, and the node lists when the parser was built with
//! `with_pass_nodes` (or debug logging is on).

use crate::{Node, ResolvedToken};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`Parser::run_with_metrics`].
    pub total: Duration,
    pub saturation: SaturationMetrics,
    /// Time spent resolving tokens after saturation.
    pub resolve: Duration,
}

/// Timings for the saturation phase.
#[derive(Debug, Default, Clone)]
pub struct SaturationMetrics {
    /// Initial regex pass plus all iterations.
    pub total: Duration,
    pub initial_regex: PassMetrics,
    pub iterations: Vec<PassMetrics>,
}

/// Timing and discovery counts for a single pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    pub duration: Duration,
    /// New nodes added to the stash during the pass.
    pub produced: usize,
    /// New nodes, when collected.
    pub nodes: Vec<Node>,
    pub rules_considered: usize,
    /// Rules with at least one first-pattern match.
    pub rules_seeded: usize,
}

/// Parser output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Every resolved candidate, before subsumption filtering.
    pub all_tokens: Vec<ResolvedToken>,
    /// Candidates left after dropping spans a larger match of the same
    /// dimension covers.
    pub tokens: Vec<ResolvedToken>,
    pub metrics: RunMetrics,
}
