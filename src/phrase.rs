//! Phrase pattern language.
//!
//! Vocabulary tables and grammar elements are written as short pattern
//! strings, for example `"(<day> <month> | <month> <day>) [<year>]"` or
//! `"(Paren | Parenthèse) (Gauche | Ouvrante)"`. This module parses those
//! strings and renders them to regular expressions for the rule engine.
//!
//! ```text
//! alternative := sequence ('|' sequence)*
//! sequence    := item+
//! item        := word | '<' slot '>' | '(' alternative ')' | '[' alternative ']'
//! ```
//!
//! Rendered regexes are case-insensitive, tolerate missing French accents
//! ("derniere" matches "dernière"), and accept spaces or hyphens between
//! words ("quatre-vingt"). Slots (`<n>`) name sub-values that are matched by
//! other rules; they either get substituted when rendering
//! ([`PhrasePattern::to_regex_with`]) or split the pattern in two
//! ([`PhrasePattern::split_at_slot`]).

use crate::error::{DicteeError, Result};
use regex::Regex;

/// Separator between two words: whitespace or hyphens.
pub const SEPARATOR: &str = r"[\s\-]+";

/// Placeholder used while splitting a rendered pattern at a slot.
const SLOT_MARKER: char = '\u{1}';

/// Parsed pattern tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Word(String),
    Slot(String),
    Sequence(Vec<Element>),
    Alternative(Vec<Element>),
    Optional(Box<Element>),
}

/// A parsed phrase pattern together with its source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhrasePattern {
    source: String,
    root: Element,
}

/// Regex fragments on either side of a slot.
///
/// `before` ends with the separator leading into the slot, `after` starts
/// with the separator leaving it. Either side is `None` when the slot sits at
/// that end of the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSplit {
    pub before: Option<String>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Open(char),
    Close(char),
    Bar,
    Slot(String),
    Word(String),
}

impl PhrasePattern {
    /// Parse `source` into a pattern tree.
    pub fn parse(source: &str) -> Result<Self> {
        let toks = tokenize(source)?;
        let mut parser = PatternParser { source, toks: &toks, pos: 0 };
        let root = parser.alternative()?;
        if let Some(tok) = toks.get(parser.pos) {
            return Err(malformed(source, format!("unexpected {}", describe(tok))));
        }
        Ok(PhrasePattern { source: source.to_string(), root })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Slot names in order of first appearance.
    pub fn slots(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_slots(&self.root, &mut out);
        out
    }

    /// True when every occurrence of `name` sits inside `[...]`.
    ///
    /// Returns `false` for unknown slots.
    pub fn is_slot_optional(&self, name: &str) -> bool {
        let mut seen = false;
        let mut required = false;
        slot_optionality(&self.root, name, false, &mut seen, &mut required);
        seen && !required
    }

    /// Render to a case-insensitive regex. Fails if the pattern has slots.
    pub fn to_regex(&self) -> Result<String> {
        self.to_regex_with(no_slots)
    }

    /// Render to a regex, substituting each slot with the fragment returned
    /// by `slot`. An unbound slot is an error.
    pub fn to_regex_with(&self, slot: impl Fn(&str) -> Option<String>) -> Result<String> {
        let mut body = String::new();
        render(&self.source, &self.root, &slot, &mut body)?;
        Ok(format!(r"(?i)\b{}\b", body))
    }

    /// Render a regex that must match the whole (trimmed) text.
    pub fn to_anchored_regex(&self) -> Result<String> {
        let mut body = String::new();
        render(&self.source, &self.root, &no_slots, &mut body)?;
        Ok(format!(r"(?i)^(?:{})$", body))
    }

    /// Compile [`to_regex`](Self::to_regex).
    pub fn compile(&self) -> Result<Regex> {
        compile_regex(&self.source, &self.to_regex()?)
    }

    /// Split the rendered pattern around a top-level slot.
    ///
    /// `"il y a <n> jours"` split at `n` gives a regex for `"il y a "` and
    /// one for `" jours"`, so a rule can match them around a numeral token.
    pub fn split_at_slot(&self, name: &str) -> Result<SlotSplit> {
        let top_level = match &self.root {
            Element::Slot(s) => s == name,
            Element::Sequence(items) => items.iter().any(|it| matches!(it, Element::Slot(s) if s == name)),
            _ => false,
        };
        if !top_level {
            return Err(malformed(&self.source, format!("slot <{name}> is not a top-level sequence item")));
        }

        let marker = SLOT_MARKER.to_string();
        let mut body = String::new();
        let bind = |slot: &str| if slot == name { Some(marker.clone()) } else { None };
        render(&self.source, &self.root, &bind, &mut body)?;

        let (left, right) = body
            .split_once(SLOT_MARKER)
            .ok_or_else(|| malformed(&self.source, format!("slot <{name}> vanished while rendering")))?;
        if right.contains(SLOT_MARKER) {
            return Err(malformed(&self.source, format!("slot <{name}> appears more than once")));
        }

        let before = (!left.is_empty()).then(|| format!(r"(?i)\b{left}"));
        let after = (!right.is_empty()).then(|| format!(r"(?i){right}\b"));
        Ok(SlotSplit { before, after })
    }
}

/// Build one regex matching any of `phrases` (each a pattern string).
///
/// Longer phrases are tried first so "dix sept" wins over "dix".
pub fn alternation<'a>(phrases: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let mut phrases: Vec<&str> = phrases.into_iter().collect();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    phrases.dedup();

    let mut bodies = Vec::with_capacity(phrases.len());
    for phrase in phrases {
        let pattern = PhrasePattern::parse(phrase)?;
        let mut body = String::new();
        render(phrase, &pattern.root, &no_slots, &mut body)?;
        bodies.push(body);
    }
    Ok(format!(r"(?i)\b(?:{})\b", bodies.join("|")))
}

/// Compile a rendered pattern, reporting failures against the source string.
pub fn compile_regex(source: &str, rendered: &str) -> Result<Regex> {
    Regex::new(rendered).map_err(|err| malformed(source, err.to_string()))
}

/// Canonical form used for table lookups: lowercase, accents folded,
/// typographic apostrophes straightened, hyphens and whitespace collapsed.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '-' {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(fold_accent(c));
    }
    out
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' => 'i',
        'ô' | 'ö' => 'o',
        'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        '’' => '\'',
        other => other,
    }
}

fn no_slots(_: &str) -> Option<String> {
    None
}

fn word_regex(word: &str) -> String {
    let mut out = String::new();
    for c in word.chars().flat_map(char::to_lowercase) {
        match fold_accent(c) {
            'a' => out.push_str("[aàâä]"),
            'e' => out.push_str("[eéèêë]"),
            'i' => out.push_str("[iîï]"),
            'o' => out.push_str("[oôö]"),
            'u' => out.push_str("[uùûü]"),
            'c' => out.push_str("[cç]"),
            '\'' => out.push_str("['’]"),
            '-' => out.push_str(r"[\s\-]*"),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    out
}

fn render(source: &str, el: &Element, slot: &dyn Fn(&str) -> Option<String>, out: &mut String) -> Result<()> {
    match el {
        Element::Word(w) => out.push_str(&word_regex(w)),
        Element::Slot(name) => {
            let fragment = slot(name).ok_or_else(|| malformed(source, format!("unbound slot <{name}>")))?;
            out.push_str(&fragment);
        }
        Element::Alternative(alts) => {
            out.push_str("(?:");
            for (i, alt) in alts.iter().enumerate() {
                if i > 0 {
                    out.push('|');
                }
                render(source, alt, slot, out)?;
            }
            out.push(')');
        }
        Element::Optional(inner) => {
            out.push_str("(?:");
            render(source, inner, slot, out)?;
            out.push_str(")?");
        }
        Element::Sequence(items) => {
            let n = items.len();
            for (i, item) in items.iter().enumerate() {
                let last = i + 1 == n;
                match item {
                    // Optional words carry their own separator so the
                    // surrounding words don't need two.
                    Element::Optional(inner) if !last => {
                        out.push_str("(?:");
                        render(source, inner, slot, out)?;
                        out.push_str(SEPARATOR);
                        out.push_str(")?");
                    }
                    Element::Optional(inner) if i > 0 => {
                        out.push_str("(?:");
                        out.push_str(SEPARATOR);
                        render(source, inner, slot, out)?;
                        out.push_str(")?");
                    }
                    _ => {
                        render(source, item, slot, out)?;
                        let next_is_trailing_optional =
                            i + 2 == n && matches!(items.get(i + 1), Some(Element::Optional(_)));
                        if !last && !next_is_trailing_optional {
                            out.push_str(SEPARATOR);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn collect_slots<'a>(el: &'a Element, out: &mut Vec<&'a str>) {
    match el {
        Element::Word(_) => {}
        Element::Slot(name) => {
            if !out.contains(&name.as_str()) {
                out.push(name);
            }
        }
        Element::Sequence(items) | Element::Alternative(items) => {
            for item in items {
                collect_slots(item, out);
            }
        }
        Element::Optional(inner) => collect_slots(inner, out),
    }
}

fn slot_optionality(el: &Element, name: &str, optional: bool, seen: &mut bool, required: &mut bool) {
    match el {
        Element::Word(_) => {}
        Element::Slot(s) if s == name => {
            *seen = true;
            if !optional {
                *required = true;
            }
        }
        Element::Slot(_) => {}
        Element::Sequence(items) | Element::Alternative(items) => {
            for item in items {
                slot_optionality(item, name, optional, seen, required);
            }
        }
        Element::Optional(inner) => slot_optionality(inner, name, true, seen, required),
    }
}

fn tokenize(source: &str) -> Result<Vec<Tok>> {
    let mut toks = Vec::new();
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '(' | '[' => toks.push(Tok::Open(c)),
            ')' | ']' => toks.push(Tok::Close(c)),
            '|' => toks.push(Tok::Bar),
            '<' => {
                let mut name = String::new();
                let mut closed = false;
                for n in chars.by_ref() {
                    if n == '>' {
                        closed = true;
                        break;
                    }
                    name.push(n);
                }
                let name = name.trim().to_string();
                if !closed {
                    return Err(malformed(source, "unterminated slot"));
                }
                if name.is_empty() {
                    return Err(malformed(source, "empty slot name"));
                }
                toks.push(Tok::Slot(name));
            }
            '>' => return Err(malformed(source, "unexpected `>`")),
            _ => {
                let mut word = String::from(c);
                while let Some(&n) = chars.peek() {
                    if n.is_whitespace() || "()[]<>|".contains(n) {
                        break;
                    }
                    word.push(n);
                    chars.next();
                }
                toks.push(Tok::Word(word));
            }
        }
    }
    if toks.is_empty() {
        return Err(malformed(source, "empty pattern"));
    }
    Ok(toks)
}

struct PatternParser<'s, 't> {
    source: &'s str,
    toks: &'t [Tok],
    pos: usize,
}

impl PatternParser<'_, '_> {
    fn alternative(&mut self) -> Result<Element> {
        let mut alts = vec![self.sequence()?];
        while self.toks.get(self.pos) == Some(&Tok::Bar) {
            self.pos += 1;
            alts.push(self.sequence()?);
        }
        Ok(if alts.len() == 1 { alts.remove(0) } else { Element::Alternative(alts) })
    }

    fn sequence(&mut self) -> Result<Element> {
        let mut items = Vec::new();
        while let Some(tok) = self.toks.get(self.pos) {
            if matches!(tok, Tok::Bar | Tok::Close(_)) {
                break;
            }
            items.push(self.item()?);
        }
        match items.len() {
            0 => Err(malformed(self.source, "empty alternative")),
            1 => Ok(items.remove(0)),
            _ => Ok(Element::Sequence(items)),
        }
    }

    fn item(&mut self) -> Result<Element> {
        let tok = self.toks.get(self.pos).cloned().ok_or_else(|| malformed(self.source, "unexpected end"))?;
        self.pos += 1;
        match tok {
            Tok::Word(w) => Ok(Element::Word(w)),
            Tok::Slot(s) => Ok(Element::Slot(s)),
            Tok::Open(open) => {
                let inner = self.alternative()?;
                let close = if open == '(' { ')' } else { ']' };
                match self.toks.get(self.pos) {
                    Some(Tok::Close(c)) if *c == close => {
                        self.pos += 1;
                        Ok(if open == '[' { Element::Optional(Box::new(inner)) } else { inner })
                    }
                    Some(tok) => Err(malformed(self.source, format!("expected `{close}`, found {}", describe(tok)))),
                    None => Err(malformed(self.source, format!("unbalanced `{open}`"))),
                }
            }
            Tok::Close(c) => Err(malformed(self.source, format!("unbalanced `{c}`"))),
            Tok::Bar => Err(malformed(self.source, "empty alternative")),
        }
    }
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::Open(c) | Tok::Close(c) => format!("`{c}`"),
        Tok::Bar => "`|`".to_string(),
        Tok::Slot(s) => format!("slot <{s}>"),
        Tok::Word(w) => format!("word `{w}`"),
    }
}

fn malformed(source: &str, reason: impl Into<String>) -> DicteeError {
    DicteeError::Pattern { pattern: source.to_string(), reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compiled(src: &str) -> Regex {
        PhrasePattern::parse(src).unwrap().compile().unwrap()
    }

    #[test]
    fn parses_absolute_date_spec() {
        let p = PhrasePattern::parse("(<day> <month> | <month> <day>) [<year>]").unwrap();
        assert_eq!(p.slots(), vec!["day", "month", "year"]);
        assert!(p.is_slot_optional("year"));
        assert!(!p.is_slot_optional("day"));
        assert!(!p.is_slot_optional("nope"));
    }

    #[test]
    fn magnitude_spec_slots() {
        let p = PhrasePattern::parse("[<multiplier>] cent [<remainder>]").unwrap();
        assert!(p.is_slot_optional("multiplier"));
        assert!(p.is_slot_optional("remainder"));

        let p = PhrasePattern::parse("<multiplier> cent [<remainder>]").unwrap();
        assert!(!p.is_slot_optional("multiplier"));
    }

    #[test]
    fn rejects_unbalanced_patterns() {
        assert!(matches!(PhrasePattern::parse("[accent] circonflexe)"), Err(DicteeError::Pattern { .. })));
        assert!(matches!(PhrasePattern::parse("(a | b"), Err(DicteeError::Pattern { .. })));
        assert!(matches!(PhrasePattern::parse("a | "), Err(DicteeError::Pattern { .. })));
        assert!(matches!(PhrasePattern::parse("<day"), Err(DicteeError::Pattern { .. })));
        assert!(matches!(PhrasePattern::parse("   "), Err(DicteeError::Pattern { .. })));
    }

    #[test]
    fn symbol_pattern_matches_every_spelling() {
        let re = compiled("(Paren | Parenthèse) (Gauche | Ouvrante)");
        assert!(re.is_match("paren gauche"));
        assert!(re.is_match("Parenthèse ouvrante"));
        assert!(re.is_match("parenthese ouvrante"));
        assert!(!re.is_match("parenthèse fermante"));
    }

    #[test]
    fn optional_words_do_not_need_extra_separators() {
        let re = compiled("[Signe] Moins");
        assert!(re.is_match("moins"));
        assert!(re.is_match("signe moins"));

        let re = compiled("Barre [Verticale]");
        let m = re.find("barre verticale").unwrap();
        assert_eq!(m.as_str(), "barre verticale");
        assert!(re.is_match("barre"));
    }

    #[test]
    fn hyphens_and_apostrophes_are_flexible() {
        assert!(compiled("quatre vingt").is_match("quatre-vingt"));
        assert!(compiled("aujourd'hui").is_match("aujourd’hui"));
        assert!(compiled("X-ray").is_match("xray"));
    }

    #[test]
    fn slots_must_be_bound() {
        let p = PhrasePattern::parse("<day> dernier").unwrap();
        assert!(p.to_regex().is_err());
        let re = p.to_regex_with(|s| (s == "day").then(|| "(lundi)".to_string())).unwrap();
        let caps = Regex::new(&re).unwrap().captures("LUNDI dernier").unwrap();
        assert_eq!(&caps[1], "LUNDI");
    }

    #[test]
    fn split_around_count_slot() {
        let split = PhrasePattern::parse("il y a <n> jours").unwrap().split_at_slot("n").unwrap();
        let before = Regex::new(split.before.as_deref().unwrap()).unwrap();
        let after = Regex::new(split.after.as_deref().unwrap()).unwrap();
        assert_eq!(before.find("il y a trois jours").unwrap().as_str(), "il y a ");
        assert_eq!(after.find("trois jours").unwrap().as_str(), " jours");

        let split = PhrasePattern::parse("<day> dernier").unwrap().split_at_slot("day").unwrap();
        assert_eq!(split.before, None);
        assert!(split.after.is_some());
    }

    #[test]
    fn split_rejects_nested_slots() {
        let p = PhrasePattern::parse("(<day> <month> | <month> <day>) [<year>]").unwrap();
        assert!(p.split_at_slot("day").is_err());
    }

    #[test]
    fn alternation_prefers_longer_phrases() {
        let re = Regex::new(&alternation(["dix", "dix sept", "sept"]).unwrap()).unwrap();
        assert_eq!(re.find("dix-sept").unwrap().as_str(), "dix-sept");
    }

    #[test]
    fn normalize_folds_case_accents_and_separators() {
        assert_eq!(normalize("  Quatre-Vingts "), "quatre vingts");
        assert_eq!(normalize("Dernière"), "derniere");
        assert_eq!(normalize("aujourd’hui"), "aujourd'hui");
    }
}
