use crate::engine;
use crate::{Dimension, ResolvedToken, Rule, TokenKind};
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Duration;

static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(crate::rules::get);

/// Parsing context.
///
/// Holds the date relative phrases ("demain", "lundi dernier") and year-less
/// dates are resolved against.
#[derive(Debug, Clone)]
pub struct Context {
    pub today: NaiveDate,
}

impl Context {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

/// Today's local date.
impl Default for Context {
    fn default() -> Self {
        Self { today: Local::now().date_naive() }
    }
}

/// Options that affect resolution.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Dimension names to keep (`"numeral"`, `"digits"`, `"date"`, `"time"`,
    /// `"characters"`). Empty keeps all of them.
    pub dimensions: Vec<String>,
}

impl Options {
    pub(crate) fn wants(&self, dim: Dimension) -> bool {
        self.dimensions.is_empty() || self.dimensions.iter().any(|d| d.eq_ignore_ascii_case(dimension_name(dim)))
    }
}

/// A resolved entity found in input.
///
/// `start`/`end` are byte offsets into the original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Name of the dimension, e.g. `"date"` or `"numeral"`.
    pub name: String,
    /// Slice of the original input that matched.
    pub body: String,
    /// Resolved value: an integer, `YYYY-MM-DD`, `HH:MM` or plain text.
    pub value: String,
    pub start: usize,
    /// End byte index of the match (exclusive).
    pub end: usize,
    pub latent: bool,
    /// Name of the rule that produced this entity.
    pub rule: String,
}

/// Result from [`parse`] and [`parse_with`].
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    pub text: String,
    pub results: Vec<Entity>,
    /// Total elapsed time spent parsing + resolving.
    #[serde(skip)]
    pub elapsed: Duration,
}

/// A compact per-pass saturation trace.
#[derive(Debug, Clone)]
pub struct SaturationPass {
    pub pass: usize,
    pub duration: Duration,
    pub produced: usize,
    pub rules_considered: usize,
    pub rules_seeded: usize,
    pub samples: Vec<NodeSummary>,
}

/// A compact node summary used in verbose traces.
#[derive(Debug, Clone)]
pub struct NodeSummary {
    pub start: usize,
    pub end: usize,
    pub rule: String,
    pub preview: String,
}

/// Additional details returned by [`parse_verbose`] and [`parse_verbose_with`].
///
/// Meant for debugging rules and timing, not for dumping the whole stash.
#[derive(Debug, Clone)]
pub struct ParseDetails {
    pub total: Duration,
    /// Time spent in saturation (rule application) + per-pass trace.
    pub saturation_total: Duration,
    pub saturation: Vec<SaturationPass>,
    /// Time spent resolving and filtering candidates.
    pub resolve: Duration,
    /// Names of rules that were active for this input.
    pub active_rules: Vec<String>,
    /// Every resolved candidate, including ones a larger match subsumes.
    pub all_candidates: Vec<Entity>,
}

/// Result from [`parse_verbose`] and [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose {
    pub text: String,
    pub results: Vec<Entity>,
    pub elapsed: Duration,
    pub details: ParseDetails,
}

/// Parse `text` using the default ruleset and a default [`Context`].
///
/// # Example
/// ```
/// use dictee::parse;
///
/// let out = parse("deux mille quinze");
/// let n = out.results.iter().find(|e| e.name == "numeral").unwrap();
/// assert_eq!(n.value, "2015");
/// ```
pub fn parse(text: &str) -> ParseResult {
    parse_with(text, &Context::default(), &Options::default())
}

/// Parse `text` using the default ruleset and the provided `context`/`options`.
///
/// Pass an explicit [`Context`] for reproducible dates.
pub fn parse_with(text: &str, context: &Context, options: &Options) -> ParseResult {
    let parser = engine::Parser::new(text, &DEFAULT_RULES);
    let run = parser.run_with_metrics(context, options);

    ParseResult {
        text: text.to_string(),
        results: run.tokens.iter().map(|rt| resolved_to_entity(text, rt)).collect(),
        elapsed: run.metrics.total,
    }
}

pub fn parse_verbose(text: &str) -> ParseResultVerbose {
    parse_verbose_with(text, &Context::default(), &Options::default())
}

/// Parse `text` with `context`/`options` and return extra (compact) debug details.
///
/// The default [`parse_with`] path does not allocate these traces.
pub fn parse_verbose_with(text: &str, context: &Context, options: &Options) -> ParseResultVerbose {
    let parser = engine::Parser::new(text, &DEFAULT_RULES).with_pass_nodes();
    let active_rules = parser.active_rule_names().into_iter().map(|s| s.to_string()).collect();

    let run = parser.run_with_metrics(context, options);

    let results: Vec<Entity> = run.tokens.iter().map(|rt| resolved_to_entity(text, rt)).collect();
    let all_candidates: Vec<Entity> = run.all_tokens.iter().map(|rt| resolved_to_entity(text, rt)).collect();

    let passes = std::iter::once(&run.metrics.saturation.initial_regex).chain(&run.metrics.saturation.iterations);
    let saturation = passes
        .enumerate()
        .map(|(idx, pass)| SaturationPass {
            pass: idx,
            duration: pass.duration,
            produced: pass.produced,
            rules_considered: pass.rules_considered,
            rules_seeded: pass.rules_seeded,
            samples: pass.nodes.iter().take(8).map(node_to_summary).collect(),
        })
        .collect();

    let details = ParseDetails {
        total: run.metrics.total,
        saturation_total: run.metrics.saturation.total,
        saturation,
        resolve: run.metrics.resolve,
        active_rules,
        all_candidates,
    };

    ParseResultVerbose { text: text.to_string(), results, elapsed: run.metrics.total, details }
}

fn resolved_to_entity(input: &str, rt: &ResolvedToken) -> Entity {
    let start = rt.node.range.start;
    let end = rt.node.range.end;
    let body = input.get(start..end).unwrap_or("").to_string();

    Entity {
        name: dimension_name(rt.node.token.dim).to_string(),
        body,
        value: rt.value.clone(),
        start,
        end,
        latent: rt.latent,
        rule: rt.node.rule_name.to_string(),
    }
}

pub(crate) fn dimension_name(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Numeral => "numeral",
        Dimension::Digits => "digits",
        Dimension::Date => "date",
        Dimension::Time => "time",
        Dimension::Characters => "characters",
        Dimension::Lexeme => "lexeme",
        Dimension::RegexMatch => "regex",
    }
}

fn node_to_summary(node: &crate::Node) -> NodeSummary {
    NodeSummary {
        start: node.range.start,
        end: node.range.end,
        rule: node.rule_name.to_string(),
        preview: format_token_preview(&node.token.kind),
    }
}

fn format_token_preview(kind: &TokenKind) -> String {
    let s = match kind {
        TokenKind::Numeral(n) => format!("({}) {:?}", n.value, n.builder),
        TokenKind::Digits(d) => format!("digits {}", d.0),
        TokenKind::Date(expr) => format!("{expr:?}"),
        TokenKind::Time(t) => t.0.format("%H:%M").to_string(),
        TokenKind::Characters(c) => format!("{:?} x{}", c.text, c.count),
        TokenKind::Lexeme(l) => format!("{l:?}"),
        TokenKind::RegexMatch(groups) => groups.first().cloned().unwrap_or_default(),
    };
    s.chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn friday() -> Context {
        Context::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn parse_with_returns_entities() {
        let res = parse_with("rendez-vous demain", &friday(), &Options::default());

        assert_eq!(res.text, "rendez-vous demain");
        let date = res.results.iter().find(|e| e.name == "date").unwrap();
        assert_eq!(date.body, "demain");
        assert_eq!(date.start, 12);
        assert_eq!(date.end, 18);
        assert_eq!(date.value, "2024-03-16");
        assert_eq!(date.rule, "demain");
    }

    #[test]
    fn options_filter_dimensions() {
        let only_time = Options { dimensions: vec!["time".into()] };
        let res = parse_with("quinze heures trente", &friday(), &only_time);
        assert!(!res.results.is_empty());
        assert!(res.results.iter().all(|e| e.name == "time"));
        assert!(res.results.iter().any(|e| e.value == "15:30" && e.body == "quinze heures trente"));
    }

    #[test]
    fn internal_dimensions_never_surface() {
        let res = parse_with("quinze mars deux mille vingt quatre", &friday(), &Options::default());
        assert!(res.results.iter().all(|e| e.name != "regex" && e.name != "lexeme"));
        assert!(res.results.iter().any(|e| e.name == "date" && e.value == "2024-03-15"));
    }

    #[test]
    fn entities_serialize_to_json() {
        let res = parse_with("alpha bravo", &friday(), &Options { dimensions: vec!["characters".into()] });
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["text"], "alpha bravo");
        let values: Vec<&str> = json["results"].as_array().unwrap().iter().filter_map(|e| e["value"].as_str()).collect();
        assert_eq!(values, vec!["ab"]);
    }

    #[test]
    fn impossible_dates_yield_no_date() {
        for text in ["trente et un avril", "le trente et un avril deux mille vingt quatre"] {
            let res = parse_with(text, &friday(), &Options::default());
            assert!(res.results.iter().all(|e| e.name != "date"), "{text}: {:?}", res.results);
            assert!(res.results.iter().any(|e| e.name == "numeral" && e.value == "31"));
        }
    }

    #[test]
    fn hundreds_yield_no_time() {
        let res = parse_with("deux cent mille", &friday(), &Options::default());
        let names: Vec<(&str, &str)> = res.results.iter().map(|e| (e.name.as_str(), e.value.as_str())).collect();
        assert_eq!(names, vec![("numeral", "200000")]);
    }

    #[test]
    fn parse_verbose_includes_metrics_and_rules() {
        let res = parse_verbose_with("lundi dernier", &friday(), &Options::default());

        assert_eq!(res.text, "lundi dernier");
        assert_eq!(res.elapsed, res.details.total);
        assert!(res.details.saturation_total <= res.details.total);
        assert!(res.details.active_rules.iter().any(|r| r == "<day> dernier"));
        assert!(res.details.saturation[0].produced > 0);
        assert!(!res.details.saturation[0].samples.is_empty());
    }
}
