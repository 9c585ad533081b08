//! French spoken-phrase resolution.
//!
//! `dictee` turns French number, date, time and spelling phrases ("deux mille
//! quinze", "lundi dernier", "quinze zero cinq", "majuscule alpha bravo") into
//! typed values. The resolvers themselves are pure functions exposed under
//! [`number`], [`calendar`] and [`characters`]; [`parse`] and friends run them
//! over free text through a small saturation engine.
//!
//! ```
//! use chrono::NaiveDate;
//! use dictee::{Context, Options, parse_with};
//!
//! let ctx = Context::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
//! let out = parse_with("lundi dernier", &ctx, &Options::default());
//! let date = out.results.iter().find(|e| e.name == "date").unwrap();
//! assert_eq!(date.value, "2024-03-11");
//! ```

extern crate self as dictee;

use regex::Regex;

#[macro_use]
mod macros;
mod api;
mod engine;
pub mod error;
pub mod phrase;
mod rules;

pub use api::{
    Context, Entity, NodeSummary, Options, ParseDetails, ParseResult, ParseResultVerbose, SaturationPass, parse,
    parse_verbose, parse_verbose_with, parse_with,
};
pub use error::{DicteeError, Result};

/// Integer grammar: word tables, magnitude rules and their resolvers.
pub mod number {
    pub use crate::rules::numeral::magnitude::{
        AND_UNDER_100, CollectionRule, HUNDREDS, HUNDREDS_BIG, INTEGER_BUILDERS, IntBuilder, MILLIONS, MagnitudeRule,
        TENS, THOUSANDS, compose_vigesimal,
    };
    pub use crate::rules::numeral::tables::{
        DIGIT_NAMES, DIGITS_MAX, TEENS_WORDS, TENS_WORDS, UNITS_WORDS, VIGESIMAL_BASES, WordTable, ZERO_WORDS,
        resolve_digits,
    };
}

/// Dates and times: month/day tables, offset rules and their resolvers.
pub mod calendar {
    pub use crate::rules::calendar::resolve::{
        DateExpr, MinutePhrase, OffsetKind, infer_year, resolve_absolute, resolve_date, resolve_military_time,
        resolve_relative, resolve_year, weekday_offset,
    };
    pub use crate::rules::calendar::tables::{
        ABSOLUTE_DATE_SPEC, DAY_NAMES, DAY_OFFSETS, DateOffsetRule, HEURES_TIME_SPEC, MILITARY_TIME_SPEC, MONTH_NAMES,
        WEEKDAY_OFFSETS, day_index, month_number,
    };
}

/// Spelled letters, digits and symbols.
pub mod characters {
    pub use crate::rules::characters::tables::{
        CharPhrase, DIGIT_CHARS, LETTER_NAMES, SERIES_MAX, SERIES_MIN, SYMBOL_NAMES, UPPERCASE_PREFIX, letter_series,
        resolve_char, resolve_series,
    };
}

// --- Internal types ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Dimension {
    Numeral,
    Digits,
    Date,
    Time,
    Characters,
    /// Month names and years: building blocks for dates, never surfaced.
    Lexeme,
    RegexMatch,
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub dim: Dimension,
    pub kind: TokenKind,
}

/// An integer together with the grammar element that produced it.
///
/// Magnitude rules accept sub-values by element, not only by value, so
/// "deux cent mille" and "cent mille" compose but "dix neuf cent mille" does
/// not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumeralData {
    pub value: i64,
    pub builder: number::IntBuilder,
}

/// Spoken digit sequence ("un deux trois" => "123").
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DigitsData(pub String);

/// Spelled characters. `count` is the number of spoken items joined so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CharData {
    pub text: String,
    pub count: usize,
    pub letter: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Lexeme {
    Month(u32),
    Year(i32),
}

/// Time of day as produced by time rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeOfDay(pub chrono::NaiveTime);

#[derive(Debug, Clone)]
pub(crate) enum TokenKind {
    Numeral(NumeralData),
    Digits(DigitsData),
    Date(calendar::DateExpr),
    Time(TimeOfDay),
    Characters(CharData),
    Lexeme(Lexeme),
    RegexMatch(Vec<String>),
}

// Trait to convert rule production results into tokens
pub(crate) trait IntoToken {
    fn into_token(self) -> Option<Token>;
}

impl IntoToken for NumeralData {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Numeral, kind: TokenKind::Numeral(self) })
    }
}

impl IntoToken for DigitsData {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Digits, kind: TokenKind::Digits(self) })
    }
}

impl IntoToken for calendar::DateExpr {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Date, kind: TokenKind::Date(self) })
    }
}

impl IntoToken for TimeOfDay {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Time, kind: TokenKind::Time(self) })
    }
}

impl IntoToken for CharData {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Characters, kind: TokenKind::Characters(self) })
    }
}

impl IntoToken for Lexeme {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Lexeme, kind: TokenKind::Lexeme(self) })
    }
}

// Pattern items used by rules: either a Regex to match text, or a Predicate
// that matches an existing token in the stash.
#[derive(Debug)]
pub(crate) enum Pattern {
    /// Match a regular expression against the original input. The `Regex`
    /// is a static reference, either from the `regex!` macro in
    /// `src/macros.rs` or from a lazily compiled vocabulary table.
    Regex(&'static Regex),

    /// Match an already-discovered `Token` using a predicate function. This
    /// allows rules to combine previously found tokens (from the `Stash`).
    Predicate(fn(&Token) -> bool),
}

pub(crate) type Production = Box<dyn Fn(&[Token]) -> Option<Token> + Send + Sync>;

/// A parsing rule: a name, a positional `pattern` (vector of `Pattern` items)
/// and a `production` function that receives the matched tokens and
/// optionally returns a new `Token`.
pub(crate) struct Rule {
    pub name: &'static str,
    pub pattern: Vec<Pattern>,
    pub production: Production,
    /// Required phrases - ALL must appear in input for this rule to activate (AND logic).
    pub required_phrases: &'static [&'static str],
    /// Optional phrases - ANY one must appear in input for this rule to activate (OR logic).
    pub optional_phrases: &'static [&'static str],
    /// Bucket mask - rule only activates if input has matching buckets.
    pub buckets: u32,
    /// Required dimensions in stash before this rule activates.
    pub deps: &'static [Dimension],
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("production", &"<function>")
            .field("buckets", &self.buckets)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Range {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

/// Internal resolved token: a `Node`, its resolved string value, and a
/// `latent` flag. Converted to the public `Entity` by the API layer.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedToken {
    pub node: Node,
    pub value: String,
    pub latent: bool,
}

/// Basic parse tree node produced by rules. `Node` pairs a `Token` with the
/// consumed `Range` from the original input.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub range: Range,
    pub token: Token,
    /// Name of the rule that produced this node.
    pub rule_name: &'static str,
    /// Names of rules that directly contributed to producing this node.
    pub evidence: Vec<&'static str>,
}

// --- Stash: lightweight container for discovered nodes ----------------------

#[derive(Debug, Clone)]
pub(crate) struct Stash {
    nodes: Vec<Node>,
}

impl Stash {
    /// Create an empty `Stash`.
    pub fn empty() -> Self {
        Stash { nodes: Vec::new() }
    }

    /// Return true if the stash is empty.
    pub fn null(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the nodes in this stash.
    pub fn get_nodes(&self) -> Vec<Node> {
        self.nodes.clone()
    }

    /// Return nodes sorted by `(start, end)`.
    pub fn to_pos_ordered_list(&self) -> Vec<Node> {
        let mut v = self.nodes.clone();
        v.sort_by_key(|n| (n.range.start, n.range.end));
        v
    }

    /// Return nodes sorted and filtered to those starting at or after `position`.
    pub fn to_pos_ordered_list_from(&self, position: usize) -> Vec<Node> {
        self.to_pos_ordered_list().into_iter().filter(|n| n.range.start >= position).collect()
    }

    /// Union two stashes; keeps nodes deduplicated by position, dimension,
    /// producing rule and token content.
    pub fn union(&self, other: &Stash) -> Stash {
        let mut combined = self.nodes.clone();
        combined.extend(other.nodes.clone());

        // This must stay in sync with `NodeKey` semantics: distinct
        // derivations of the same span must survive until resolution.
        combined.sort_by_key(|n| (n.range.start, n.range.end));
        combined.dedup_by(|a, b| {
            if a.range.start != b.range.start
                || a.range.end != b.range.end
                || a.token.dim != b.token.dim
                || a.rule_name != b.rule_name
                || a.evidence != b.evidence
            {
                return false;
            }

            match (&a.token.kind, &b.token.kind) {
                (TokenKind::Numeral(da), TokenKind::Numeral(db)) => da == db,
                (TokenKind::Digits(da), TokenKind::Digits(db)) => da == db,
                (TokenKind::Date(ea), TokenKind::Date(eb)) => ea == eb,
                (TokenKind::Time(ta), TokenKind::Time(tb)) => ta == tb,
                (TokenKind::Characters(ca), TokenKind::Characters(cb)) => ca == cb,
                (TokenKind::Lexeme(la), TokenKind::Lexeme(lb)) => la == lb,
                (TokenKind::RegexMatch(ga), TokenKind::RegexMatch(gb)) => ga.first() == gb.first(),
                _ => false,
            }
        });

        Stash { nodes: combined }
    }

    /// Insert a node into the stash (appends to internal vector).
    pub fn insert(&mut self, node: Node) {
        self.nodes.push(node);
    }
}
