use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::characters::{CharPhrase, DIGIT_CHARS, LETTER_NAMES, SERIES_MAX, SYMBOL_NAMES, resolve_char};
use crate::engine::BucketMask;
use crate::phrase;
use crate::rules::numeral::helpers::first_match_lower;
use crate::{CharData, Dimension, Pattern, Rule, Token, TokenKind};

fn capture_regex(what: &str, table: &[CharPhrase]) -> Regex {
    let body = phrase::alternation(table.iter().map(|&(pattern, _)| pattern))
        .and_then(|body| phrase::compile_regex(what, &format!("({body})")));
    body.unwrap_or_else(|err| panic!("{err}"))
}

static LETTER_RE: Lazy<Regex> = Lazy::new(|| capture_regex("letter names", LETTER_NAMES));
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| capture_regex("digit names", DIGIT_CHARS));
static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| capture_regex("symbol names", SYMBOL_NAMES));

fn single(phrase: &str, uppercase: bool, letter: bool) -> Option<CharData> {
    match resolve_char(phrase, uppercase) {
        Ok(ch) => Some(CharData { text: ch.to_string(), count: 1, letter }),
        Err(err) => {
            debug!("[characters] {err}");
            None
        }
    }
}

fn chars(t: &Token) -> Option<&CharData> {
    match &t.kind {
        TokenKind::Characters(cd) => Some(cd),
        _ => None,
    }
}

fn is_single_char(t: &Token) -> bool {
    chars(t).is_some_and(|cd| cd.count == 1)
}

fn is_lowercase_letter(t: &Token) -> bool {
    chars(t).is_some_and(|cd| cd.count == 1 && cd.letter && cd.text.chars().all(|c| c.is_ascii_lowercase()))
}

/// A series that can take one more character and stay under the bound.
fn is_open_series(t: &Token) -> bool {
    chars(t).is_some_and(|cd| cd.count + 1 < SERIES_MAX)
}

fn rule_letter() -> Rule {
    rule! {
        name: "<letter>",
        pattern: [Pattern::Regex(&LETTER_RE)],
        buckets: BucketMask::SPELLING.bits(),
        prod: |tokens: &[Token]| -> Option<CharData> {
            single(&first_match_lower(tokens)?, false, true)
        },
    }
}

/// "majuscule bravo"
fn rule_uppercase_letter() -> Rule {
    rule! {
        name: "majuscule <letter>",
        pattern: [re!(r"(?i)\bmajuscule[\s\-]+"), pred!(is_lowercase_letter)],
        required_phrases: ["majuscule"],
        buckets: BucketMask::SPELLING.bits(),
        deps: [Dimension::Characters],
        prod: |tokens: &[Token]| -> Option<CharData> {
            let letter = chars(tokens.get(1)?)?;
            Some(CharData { text: letter.text.to_uppercase(), count: 1, letter: true })
        },
    }
}

/// Digit names are also plain numbers, so they only spell a character
/// next to a letter name ("alpha un").
fn rule_digit_char() -> Rule {
    rule! {
        name: "<digit char>",
        pattern: [Pattern::Regex(&DIGIT_RE)],
        buckets: BucketMask::SPELLING.bits(),
        prod: |tokens: &[Token]| -> Option<CharData> {
            single(&first_match_lower(tokens)?, false, false)
        },
    }
}

fn rule_symbol() -> Rule {
    rule! {
        name: "<symbol>",
        pattern: [Pattern::Regex(&SYMBOL_RE)],
        prod: |tokens: &[Token]| -> Option<CharData> {
            single(&first_match_lower(tokens)?, false, false)
        },
    }
}

/// Grow a series one character at a time: "alpha bravo" + "un".
fn rule_series() -> Rule {
    rule! {
        name: "<chars> <char>",
        pattern: [pred!(is_open_series), re!(r"[\s\-]+"), pred!(is_single_char)],
        deps: [Dimension::Characters],
        prod: |tokens: &[Token]| -> Option<CharData> {
            let head = chars(tokens.first()?)?;
            let next = chars(tokens.get(2)?)?;
            Some(CharData {
                text: format!("{}{}", head.text, next.text),
                count: head.count + next.count,
                letter: head.letter && next.letter,
            })
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_letter(), rule_uppercase_letter(), rule_digit_char(), rule_symbol(), rule_series()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_symbol_wins_at_a_position() {
        let m = SYMBOL_RE.find("point exclamation").unwrap();
        assert_eq!(m.as_str(), "point exclamation");
        let m = SYMBOL_RE.find("parenthèse fermante").unwrap();
        assert_eq!(m.as_str(), "parenthèse fermante");
    }

    #[test]
    fn letters_capture_their_name() {
        let caps = LETTER_RE.captures("un X-ray").unwrap();
        assert_eq!(&caps[1], "X-ray");
        assert!(LETTER_RE.captures("alphabet").is_none());
    }
}
