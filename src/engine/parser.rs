//! Matching and saturation parser.
//!
//! - Select the rules plausible for the input (bucket + phrase gating; see
//!   `compiled_rules.rs` and `trigger.rs`).
//! - Repeatedly apply them to grow a `Stash` of `Node`s.
//! - Deduplicate produced nodes to keep saturation finite (see `dedup.rs`).
//! - Resolve the final nodes (see `resolve.rs`), then drop same-value
//!   duplicates and spans subsumed by a larger match of the same dimension.
//!
//! ## Key concepts
//!
//! - **Rule** (`crate::Rule`): a sequence of `Pattern`s with a production.
//! - **Node** (`crate::Node`): a token with the span (`Range`) it covers.
//! - **Stash** (`crate::Stash`): the growing set of discovered nodes.
//! - **Saturation**: apply rules until an iteration produces no new node.
//!
//! ```text
//! (0) trigger scan         -> buckets + phrases
//! (1) initial regex pass   -> seed from raw input
//! (2) iterative passes     -> predicate + regex rules as the stash grows
//! (3) resolve + filter     -> ResolvedToken output
//! ```
//!
//! Output is deterministic for a given input, rule set and context.
//!
//! ## Debugging
//!
//! Activation, seeding, productions and resolution are logged through `log`
//! at debug level under the `dictee::engine` target.

use super::compiled_rules::{BUCKETS, CompiledRules, DimensionSet, RuleId};
use super::dedup::NodeKey;
use super::metrics::{PassMetrics, RunMetrics, RunResult, SaturationMetrics};
use super::resolve::resolve_node;
use super::trigger::TriggerInfo;
use crate::{Context, Dimension, Node, Options, Pattern, Range, ResolvedToken, Rule, Stash, Token, TokenKind};
use log::{Level, debug, log_enabled, trace};
use regex::Captures;
use std::collections::HashSet;
use std::time::Instant;

const LOG_TARGET: &str = "dictee::engine";

/// A partially matched rule as the engine advances through its pattern.
/// `route` holds the matched `Node`s so far.
///
/// ```text
/// pattern: [Regex("il y a "), Predicate(is_day_count), Regex(" jours")]
///                              ^ next_idx once the first item is consumed
///
/// route: [ Node(range:0..7, dim:RegexMatch) ]
/// position points to the end of the last consumed node (here: 7)
/// ```
struct PartialMatch<'a> {
    rule: &'a Rule,
    next_idx: usize,
    position: usize,
    route: Vec<Node>,
}

/// Output of one pass over a rule subset.
struct PassOutput {
    discovered: Vec<Node>,
    rules_considered: usize,
    rules_seeded: usize,
}

/// Parser orchestrates applying `Rule`s against an input string.
///
/// Usage: create with `Parser::new(input, &rules)` then call `run(context, options)`.
///
/// ```text
/// new() -> saturate() -> resolve_filtered()
///            │             └─ drop duplicates and subsumed nodes
///            └─ repeatedly grow stash using rules
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a str,
    stash: Stash,
    /// Keys of nodes already added, so rules can't re-add them.
    seen: HashSet<NodeKey>,
    compiled: CompiledRules<'a>,
    /// Active rules whose first pattern is a `Regex`.
    regex_rules: Vec<&'a Rule>,
    /// Active rules whose first pattern is a `Predicate`.
    predicate_rules: Vec<&'a Rule>,
    /// Keep the nodes each pass produced in the metrics.
    collect_nodes: bool,
}

impl<'a> Parser<'a> {
    /// Create a new `Parser` for `input` using pre-compiled rules.
    pub fn new_compiled(input: &'a str, compiled: CompiledRules<'a>) -> Self {
        let trigger_info = TriggerInfo::scan(input);
        debug!(target: LOG_TARGET, "[trigger_scan] buckets={:?} phrases={:?}", trigger_info.buckets, trigger_info.phrases);

        let mut active_rule_ids: HashSet<RuleId> = compiled.index.always_on.iter().copied().collect();
        for (bit, slot) in BUCKETS {
            if trigger_info.buckets.contains(bit) {
                active_rule_ids.extend(&compiled.index.by_bucket[slot]);
            }
        }

        // Phrase gating: required phrases are ANDed, optional ones ORed.
        let mut phrase_filtered = 0;
        active_rule_ids.retain(|&id| {
            let meta = &compiled.metas[id];
            let required_ok = meta.required_phrases.iter().all(|&phrase| trigger_info.phrases.contains(phrase));
            let optional_ok = meta.optional_phrases.is_empty()
                || meta.optional_phrases.iter().any(|&phrase| trigger_info.phrases.contains(phrase));
            if !(required_ok && optional_ok) {
                phrase_filtered += 1;
                return false;
            }
            true
        });

        debug!(
            target: LOG_TARGET,
            "[active_rules] {}/{} rules active (phrase-filtered: {})",
            active_rule_ids.len(),
            compiled.rules.len(),
            phrase_filtered
        );

        let active_with_first = |want_regex: bool| -> Vec<&'a Rule> {
            compiled
                .rules
                .iter()
                .enumerate()
                .filter(|(id, _)| active_rule_ids.contains(id))
                .filter(|(_, r)| match r.pattern.first() {
                    Some(Pattern::Regex(_)) => want_regex,
                    Some(Pattern::Predicate(_)) => !want_regex,
                    None => false,
                })
                .map(|(_, r)| *r)
                .collect()
        };
        let regex_rules = active_with_first(true);
        let predicate_rules = active_with_first(false);

        debug!(
            target: LOG_TARGET,
            "[regex_rules] {} regex rules, {} predicate rules",
            regex_rules.len(),
            predicate_rules.len()
        );
        for rule in &regex_rules {
            trace!(target: LOG_TARGET, "[regex_rules]  - {}", rule.name);
        }

        Parser {
            input,
            stash: Stash::empty(),
            seen: HashSet::new(),
            compiled,
            regex_rules,
            predicate_rules,
            collect_nodes: log_enabled!(target: LOG_TARGET, Level::Debug),
        }
    }

    /// Create a new `Parser` for `input` using `rules`.
    ///
    /// Builds a temporary `CompiledRules`; callers that reuse a rule set can
    /// use [`new_compiled`](Self::new_compiled). Rules are split by the kind
    /// of their first pattern so [`saturate`](Self::saturate) can seed from
    /// the raw input before predicate rules look at the stash.
    pub fn new(input: &'a str, rules: &'a [Rule]) -> Self {
        Self::new_compiled(input, CompiledRules::new(rules))
    }

    /// Record the nodes of every pass in the run metrics.
    pub fn with_pass_nodes(mut self) -> Self {
        self.collect_nodes = true;
        self
    }

    pub(crate) fn active_rule_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.regex_rules.iter().chain(self.predicate_rules.iter()).map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    fn regex_node(caps: &Captures) -> Option<Node> {
        let m = caps.get(0)?;
        // Unmatched optional groups are skipped, so rules only use groups
        // that always participate.
        let groups: Vec<String> = caps.iter().flatten().map(|g| g.as_str().to_lowercase()).collect();
        Some(Node {
            range: Range { start: m.start(), end: m.end() },
            token: Token { dim: crate::Dimension::RegexMatch, kind: TokenKind::RegexMatch(groups) },
            rule_name: "<regex>",
            evidence: Vec::new(),
        })
    }

    /// Find nodes that match `pat` and start exactly at `position`.
    ///
    /// ```text
    /// input: "dans 5 jours"
    /// position: 5 (start of "5")
    /// Pattern::Predicate(is_day_count) -> nodes pulled from the stash at 5
    /// Pattern::Regex(" jours")         -> node at 6..12 when position is 6
    /// ```
    fn lookup_item(&self, pat: &Pattern, position: usize) -> Vec<Node> {
        match pat {
            Pattern::Regex(re) => re
                .captures_iter(self.input)
                .filter(|caps| caps.get(0).is_some_and(|m| m.start() == position))
                .filter_map(|caps| Self::regex_node(&caps))
                .collect(),
            Pattern::Predicate(pred) => self
                .stash
                .to_pos_ordered_list_from(position)
                .into_iter()
                .filter(|n| n.range.start == position && pred(&n.token))
                .collect(),
        }
    }

    /// Find nodes that match `pat` anywhere in the input.
    ///
    /// Seeds partial matches: the regex branch scans the raw input, the
    /// predicate branch every node already in the stash.
    fn lookup_item_anywhere(&self, pat: &Pattern) -> Vec<Node> {
        match pat {
            Pattern::Regex(re) => re.captures_iter(self.input).filter_map(|caps| Self::regex_node(&caps)).collect(),
            Pattern::Predicate(pred) => {
                self.stash.to_pos_ordered_list().into_iter().filter(|n| pred(&n.token)).collect()
            }
        }
    }

    /// Match a rule's first pattern anywhere and return one `PartialMatch`
    /// per hit.
    fn seed_first_pattern_anywhere(&self, rule: &'a Rule) -> Vec<PartialMatch<'a>> {
        let Some(first) = rule.pattern.first() else {
            return Vec::new();
        };
        self.lookup_item_anywhere(first)
            .into_iter()
            .map(|node| PartialMatch { rule, next_idx: 1, position: node.range.end, route: vec![node] })
            .collect()
    }

    /// Depth-first expansion of `PartialMatch`es until each rule pattern is
    /// complete. Uses an explicit stack instead of recursion.
    ///
    /// ```text
    /// [m0] --Regex--> [m1] --Predicate--> [m2]
    ///   │                           │
    ///   └─ (backtracks)             └─ success -> collected
    /// ```
    fn match_all(&self, input_matches: Vec<PartialMatch<'a>>) -> Vec<PartialMatch<'a>> {
        let mut results = Vec::new();
        let mut stack: Vec<PartialMatch<'a>> = input_matches;

        while let Some(m) = stack.pop() {
            if m.next_idx >= m.rule.pattern.len() {
                results.push(m);
                continue;
            }

            let pat = &m.rule.pattern[m.next_idx];
            let nodes = self.lookup_item(pat, m.position);

            // Reverse so the stack explores them in forward order.
            for node in nodes.into_iter().rev() {
                let mut new_route = m.route.clone();
                let position = node.range.end;
                new_route.push(node);
                stack.push(PartialMatch { rule: m.rule, next_idx: m.next_idx + 1, position, route: new_route });
            }
        }

        results
    }

    /// Run the rule's production over a completed match.
    ///
    /// ```text
    /// route tokens ──> production closure ──> Token ──> Node spanning route
    /// ```
    fn produce_node(&self, m: &PartialMatch) -> Option<Node> {
        if m.next_idx < m.rule.pattern.len() {
            return None;
        }
        let (first, last) = (m.route.first()?, m.route.last()?);
        let tokens: Vec<Token> = m.route.iter().map(|n| n.token.clone()).collect();

        let Some(tok) = (m.rule.production)(&tokens) else {
            trace!(target: LOG_TARGET, "[rule:production_none] name=\"{}\" route={:?}", m.rule.name, m.route);
            return None;
        };

        let (start, end) = (first.range.start, last.range.end);
        debug!(
            target: LOG_TARGET,
            "[rule:production_ok] name=\"{}\" span={}..{} text=\"{}\" token={:?}",
            m.rule.name,
            start,
            end,
            self.input.get(start..end).unwrap_or(""),
            tok,
        );

        // Evidence: rule names along the route plus their own evidence.
        let mut evidence = Vec::new();
        for node in &m.route {
            evidence.push(node.rule_name);
            evidence.extend_from_slice(&node.evidence);
        }
        Some(Node { range: Range { start, end }, token: tok, rule_name: m.rule.name, evidence })
    }

    /// Apply an ordered set of rules once and return the nodes produced.
    fn apply_rules_once(&self, rule_set: &[&'a Rule]) -> PassOutput {
        let mut out = PassOutput { discovered: Vec::new(), rules_considered: rule_set.len(), rules_seeded: 0 };

        for &rule in rule_set {
            let starts = self.seed_first_pattern_anywhere(rule);
            if starts.is_empty() {
                continue;
            }
            out.rules_seeded += 1;
            trace!(target: LOG_TARGET, "[rule:seed] name=\"{}\" initial_matches={}", rule.name, starts.len());

            let full = self.match_all(starts);
            if !full.is_empty() {
                trace!(target: LOG_TARGET, "[rule:full_matches] name=\"{}\" count={}", rule.name, full.len());
            }
            out.discovered.extend(full.iter().filter_map(|m| self.produce_node(m)));
        }
        out
    }

    fn dimensions_in_stash(&self) -> DimensionSet {
        self.stash.get_nodes().iter().fold(DimensionSet::empty(), |acc, n| acc | DimensionSet::from(n.token.dim))
    }

    /// Rules with no deps always run; others wait for their dimensions.
    fn deps_satisfied(rule: &Rule, dims_in_stash: DimensionSet) -> bool {
        rule.deps.iter().all(|&dep| dims_in_stash.contains(DimensionSet::from(dep)))
    }

    /// Add unseen nodes to the stash and record the pass.
    fn absorb(&mut self, out: PassOutput, started: Instant) -> PassMetrics {
        let mut newly_added = Stash::empty();
        let mut produced = 0;
        for node in out.discovered {
            if self.seen.insert(NodeKey::from_node(&node)) {
                newly_added.insert(node);
                produced += 1;
            }
        }
        let nodes = if self.collect_nodes { newly_added.get_nodes() } else { Vec::new() };
        if !newly_added.null() {
            self.stash = self.stash.union(&newly_added);
        }
        PassMetrics {
            duration: started.elapsed(),
            produced,
            nodes,
            rules_considered: out.rules_considered,
            rules_seeded: out.rules_seeded,
        }
    }

    /// Saturate the stash by repeatedly applying rules until a fixpoint.
    ///
    /// ```text
    /// regex_rules pass
    ///      │
    ///      ▼
    ///  stash grows ──┐
    ///                │ predicate + regex passes
    ///                └── repeat until fixed point
    /// ```
    fn saturate(&mut self) -> SaturationMetrics {
        let mut metrics = SaturationMetrics::default();
        let saturation_start = Instant::now();

        let regex_start = Instant::now();
        let regex_rules = self.regex_rules.clone();
        let out = self.apply_rules_once(&regex_rules);
        metrics.initial_regex = self.absorb(out, regex_start);
        if metrics.initial_regex.produced == 0 {
            metrics.total = saturation_start.elapsed();
            return metrics;
        }

        let all_saturate_rules: Vec<&'a Rule> =
            self.predicate_rules.iter().chain(self.regex_rules.iter()).copied().collect();

        loop {
            let iteration_start = Instant::now();
            let dims_in_stash = self.dimensions_in_stash();
            let saturate_rules: Vec<&'a Rule> =
                all_saturate_rules.iter().filter(|rule| Self::deps_satisfied(rule, dims_in_stash)).copied().collect();

            let out = self.apply_rules_once(&saturate_rules);
            let pass = self.absorb(out, iteration_start);
            let done = pass.produced == 0;
            metrics.iterations.push(pass);
            if done {
                break;
            }
        }

        metrics.total = saturation_start.elapsed();
        metrics
    }

    /// Resolve every node, then drop duplicates and subsumed spans.
    ///
    /// Returns `(all, filtered)`. `all` keeps one candidate per span,
    /// dimension and value; `filtered` also drops spans fully inside a larger
    /// match of the same dimension. A node that fails to resolve (an
    /// impossible date) still covers its span: "trente et un avril" yields no
    /// date rather than the "un avril" inside it.
    fn resolve_filtered(&self, context: &Context, options: &Options) -> (Vec<ResolvedToken>, Vec<ResolvedToken>) {
        let mut resolved: Vec<ResolvedToken> = Vec::new();
        let mut rejected: Vec<(Dimension, Range)> = Vec::new();
        for node in self.stash.get_nodes() {
            let (dim, range) = (node.token.dim, node.range.clone());
            match resolve_node(context, options, node) {
                Ok(Some(rt)) => resolved.push(rt),
                Ok(None) => {}
                Err(_) => rejected.push((dim, range)),
            }
        }

        resolved.sort_by(|a, b| {
            (a.node.token.dim as u8)
                .cmp(&(b.node.token.dim as u8))
                .then(a.node.range.start.cmp(&b.node.range.start))
                .then(b.node.range.end.cmp(&a.node.range.end))
                .then(a.node.rule_name.cmp(b.node.rule_name))
                .then(a.value.cmp(&b.value))
        });

        // Two derivations of the same value over the same span are one result.
        let mut seen_values = HashSet::new();
        resolved.retain(|rt| seen_values.insert((rt.node.token.dim, rt.node.range.start, rt.node.range.end, rt.value.clone())));

        let mut filtered: Vec<ResolvedToken> = Vec::new();
        let mut last_kept_dim = None;
        let mut last_kept_range: Option<Range> = None;

        for rt in &resolved {
            if last_kept_dim != Some(rt.node.token.dim) {
                last_kept_dim = Some(rt.node.token.dim);
                last_kept_range = None;
            }

            let is_subsumed = last_kept_range.as_ref().is_some_and(|range| strictly_covers(range, &rt.node.range));
            let is_blocked = rejected.iter().any(|(dim, range)| *dim == rt.node.token.dim && strictly_covers(range, &rt.node.range));
            if is_blocked {
                debug!(
                    target: LOG_TARGET,
                    "[filter] rule=\"{}\" span={}..{} inside an unresolvable match",
                    rt.node.rule_name,
                    rt.node.range.start,
                    rt.node.range.end
                );
            }

            if !is_subsumed && !is_blocked {
                last_kept_range = Some(rt.node.range.clone());
                filtered.push(rt.clone());
            }
        }

        (resolved, filtered)
    }

    /// Saturate, resolve and return timing details.
    pub fn run_with_metrics(mut self, context: &Context, options: &Options) -> RunResult {
        let total_start = Instant::now();
        let saturation = self.saturate();
        let resolve_start = Instant::now();
        let (all_tokens, tokens) = self.resolve_filtered(context, options);
        let resolve = resolve_start.elapsed();
        let total = total_start.elapsed();

        RunResult { all_tokens, tokens, metrics: RunMetrics { total, saturation, resolve } }
    }

    /// Saturate and resolve, discarding timing details. Use
    /// [`run_with_metrics`](Self::run_with_metrics) to inspect passes.
    pub fn run(self, context: &Context, options: &Options) -> Vec<ResolvedToken> {
        self.run_with_metrics(context, options).tokens
    }
}

/// `outer` covers `inner` and is larger than it.
fn strictly_covers(outer: &Range, inner: &Range) -> bool {
    outer.start <= inner.start && outer.end >= inner.end && (outer.start != inner.start || outer.end != inner.end)
}
