//! Letter, digit and symbol names.
//!
//! Keys are phrase patterns, so one entry can cover several spoken forms:
//! `"(Paren | Parenthèse) (Gauche | Ouvrante)"` is four phrases for `(`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DicteeError, Result};
use crate::phrase::PhrasePattern;

/// A phrase pattern and the character it spells.
pub type CharPhrase = (&'static str, char);

/// NATO alphabet.
pub static LETTER_NAMES: &[CharPhrase] = &[
    ("Alpha", 'a'),
    ("Bravo", 'b'),
    ("Charlie", 'c'),
    ("Delta", 'd'),
    ("Echo", 'e'),
    ("Foxtrot", 'f'),
    ("Golf", 'g'),
    ("Hotel", 'h'),
    ("India", 'i'),
    ("Juliett", 'j'),
    ("Kilo", 'k'),
    ("Lima", 'l'),
    ("Mike", 'm'),
    ("November", 'n'),
    ("Oscar", 'o'),
    ("Papa", 'p'),
    ("Quebec", 'q'),
    ("Romeo", 'r'),
    ("Sierra", 's'),
    ("Tango", 't'),
    ("Uniform", 'u'),
    ("Victor", 'v'),
    ("Whiskey", 'w'),
    ("X-ray", 'x'),
    ("Yankee", 'y'),
    ("Zulu", 'z'),
];

/// Spoken before a letter name to make it uppercase.
pub const UPPERCASE_PREFIX: &str = "Majuscule";

pub static DIGIT_CHARS: &[CharPhrase] = &[
    ("Zero", '0'),
    ("Un", '1'),
    ("Deux", '2'),
    ("Trois", '3'),
    ("Quatre", '4'),
    ("Cinq", '5'),
    ("Six", '6'),
    ("Sept", '7'),
    ("Huit", '8'),
    ("Neuf", '9'),
];

pub static SYMBOL_NAMES: &[CharPhrase] = &[
    ("Entrée", '\n'),
    ("(Tab | Tabulation)", '\t'),
    ("Espace", ' '),
    ("Point Exclamation", '!'),
    ("At | Arobase", '@'),
    ("(Croisillon | Diese)", '#'),
    ("Dollar", '$'),
    ("(Pourcent | Pour cent)", '%'),
    ("[accent] circonflexe", '^'),
    ("Esperluette", '&'),
    ("(Asterisk | Etoille | Étoile)", '*'),
    ("(Paren | Parenthèse) (Gauche | Ouvrante)", '('),
    ("(Paren | Parenthèse) (Droite | Fermante)", ')'),
    ("[Signe] Moins", '-'),
    ("(Underscore | Tiret du bas)", '_'),
    ("[Signe] Egale", '='),
    ("[Signe] Plus", '+'),
    ("tick", '`'),
    ("Tilde", '~'),
    ("Crochet (Gauche | Ouvrante)", '['),
    ("Crochet (Droite | Fermante)", ']'),
    ("Accolade (Gauche | Ouvrante)", '{'),
    ("Accolade (Droite | Fermante)", '}'),
    ("Backslash", '\\'),
    ("Barre [Verticale]", '|'),
    ("Deux Points", ':'),
    ("Apostrophe", '\''),
    ("Citation", '"'),
    ("Virgule", ','),
    ("Point", '.'),
    ("Slash", '/'),
    ("Inférieur a", '<'),
    ("(Suppérieur | Supérieur) a", '>'),
    ("Point Interrogation", '?'),
];

/// Smallest series of spelled characters.
pub const SERIES_MIN: usize = 1;
/// Exclusive upper bound on the length of a series.
pub const SERIES_MAX: usize = 8;

struct Matcher {
    re: Regex,
    ch: char,
    letter: bool,
}

static MATCHERS: Lazy<Vec<Matcher>> = Lazy::new(|| {
    let letters = LETTER_NAMES.iter().map(|e| (e, true));
    let others = DIGIT_CHARS.iter().chain(SYMBOL_NAMES).map(|e| (e, false));
    letters
        .chain(others)
        .map(|(&(pattern, ch), letter)| {
            let re = PhrasePattern::parse(pattern)
                .and_then(|p| p.to_anchored_regex())
                .and_then(|src| crate::phrase::compile_regex(pattern, &src))
                .unwrap_or_else(|err| panic!("{err}"));
            Matcher { re, ch, letter }
        })
        .collect()
});

/// Character spelled by `phrase`. `uppercase` applies to letters only.
///
/// ```
/// use dictee::characters::resolve_char;
///
/// assert_eq!(resolve_char("x-ray", true).unwrap(), 'X');
/// assert_eq!(resolve_char("parenthèse ouvrante", false).unwrap(), '(');
/// assert!(resolve_char("majuscule", false).is_err());
/// ```
pub fn resolve_char(phrase: &str, uppercase: bool) -> Result<char> {
    let phrase = phrase.trim();
    let found = MATCHERS.iter().find(|m| m.re.is_match(phrase));
    match found {
        Some(m) if m.letter && uppercase => Ok(m.ch.to_ascii_uppercase()),
        Some(m) if m.letter || !uppercase => Ok(m.ch),
        _ if uppercase => Err(DicteeError::UnknownPhrase(format!("{UPPERCASE_PREFIX} {phrase}"))),
        _ => Err(DicteeError::UnknownPhrase(phrase.to_string())),
    }
}

fn check_series_len(len: usize) -> Result<()> {
    if !(SERIES_MIN..SERIES_MAX).contains(&len) {
        return Err(DicteeError::out_of_range("series length", len as i64, SERIES_MIN as i64, SERIES_MAX as i64));
    }
    Ok(())
}

/// Join spelled characters, each with its uppercase flag.
pub fn resolve_series(items: &[(&str, bool)]) -> Result<String> {
    check_series_len(items.len())?;
    items.iter().map(|&(phrase, upper)| resolve_char(phrase, upper)).collect()
}

/// Join lowercase letter names only ("alpha bravo" => "ab").
pub fn letter_series(phrases: &[&str]) -> Result<String> {
    check_series_len(phrases.len())?;
    phrases
        .iter()
        .map(|&phrase| {
            let trimmed = phrase.trim();
            MATCHERS
                .iter()
                .find(|m| m.letter && m.re.is_match(trimmed))
                .map(|m| m.ch)
                .ok_or_else(|| DicteeError::UnknownPhrase(trimmed.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn every_key_parses() {
        for &(pattern, _) in LETTER_NAMES.iter().chain(DIGIT_CHARS).chain(SYMBOL_NAMES) {
            let parsed = PhrasePattern::parse(pattern).unwrap();
            assert!(parsed.slots().is_empty(), "{pattern}");
        }
    }

    #[test]
    fn each_character_is_spelled_once() {
        let mut seen = HashSet::new();
        for &(pattern, ch) in LETTER_NAMES.iter().chain(DIGIT_CHARS).chain(SYMBOL_NAMES) {
            assert!(seen.insert(ch), "{ch:?} spelled twice ({pattern})");
        }
    }

    #[test]
    fn letters() {
        assert_eq!(resolve_char("Alpha", false).unwrap(), 'a');
        assert_eq!(resolve_char("zulu", true).unwrap(), 'Z');
        assert_eq!(resolve_char("x ray", false).unwrap(), 'x');
        assert_eq!(resolve_char("XRAY", false).unwrap(), 'x');
    }

    #[test]
    fn symbols_accept_every_alternative() {
        for phrase in ["paren gauche", "Parenthese ouvrante", "PARENTHÈSE gauche"] {
            assert_eq!(resolve_char(phrase, false).unwrap(), '(', "{phrase}");
        }
        assert_eq!(resolve_char("circonflexe", false).unwrap(), '^');
        assert_eq!(resolve_char("accent circonflexe", false).unwrap(), '^');
        assert_eq!(resolve_char("signe plus", false).unwrap(), '+');
        assert_eq!(resolve_char("plus", false).unwrap(), '+');
        assert_eq!(resolve_char("pour cent", false).unwrap(), '%');
        assert_eq!(resolve_char("tiret du bas", false).unwrap(), '_');
        assert_eq!(resolve_char("entree", false).unwrap(), '\n');
        assert_eq!(resolve_char("deux points", false).unwrap(), ':');
        assert_eq!(resolve_char("deux", false).unwrap(), '2');
    }

    #[test]
    fn uppercase_only_applies_to_letters() {
        assert!(matches!(resolve_char("point", true), Err(DicteeError::UnknownPhrase(_))));
        assert!(matches!(resolve_char("bonjour", false), Err(DicteeError::UnknownPhrase(_))));
    }

    #[test]
    fn series() {
        assert_eq!(resolve_series(&[("majuscule", false)]).ok(), None);
        assert_eq!(resolve_series(&[("alpha", true), ("bravo", false), ("un", false), ("point", false)]).unwrap(), "Ab1.");
        assert!(resolve_series(&[]).is_err());
        let eight = [("alpha", false); 8];
        assert!(matches!(resolve_series(&eight), Err(DicteeError::OutOfRange { .. })));
        assert_eq!(resolve_series(&eight[..7]).unwrap(), "aaaaaaa");
    }

    #[test]
    fn letter_series_rejects_non_letters() {
        assert_eq!(letter_series(&["charlie", "delta"]).unwrap(), "cd");
        assert!(letter_series(&["charlie", "un"]).is_err());
    }
}
