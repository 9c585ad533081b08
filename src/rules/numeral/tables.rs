//! Number word tables.

use crate::error::{DicteeError, Result};
use crate::phrase::{self, normalize};
use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical phrase → value table, looked up case- and accent-insensitively.
#[derive(Debug)]
pub struct WordTable {
    pub name: &'static str,
    pub entries: &'static [(&'static str, i64)],
}

impl WordTable {
    pub fn get(&self, phrase: &str) -> Option<i64> {
        let key = normalize(phrase);
        self.entries.iter().find(|(word, _)| normalize(word) == key).map(|&(_, v)| v)
    }

    pub fn phrases(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(word, _)| word)
    }

    /// Alternation over every phrase, longest first, in one capture group.
    pub(crate) fn capture_regex(&self) -> Result<Regex> {
        let body = phrase::alternation(self.phrases())?;
        phrase::compile_regex(self.name, &format!("({body})"))
    }
}

pub static ZERO_WORDS: WordTable = WordTable { name: "zero", entries: &[("zero", 0), ("zéro", 0)] };

pub static UNITS_WORDS: WordTable = WordTable {
    name: "1..9",
    entries: &[
        ("un", 1),
        ("une", 1),
        ("deux", 2),
        ("trois", 3),
        ("quatre", 4),
        ("cinq", 5),
        ("six", 6),
        ("sept", 7),
        ("huit", 8),
        ("neuf", 9),
    ],
};

pub static TEENS_WORDS: WordTable = WordTable {
    name: "10..19",
    entries: &[
        ("dix", 10),
        ("onze", 11),
        ("douze", 12),
        ("treize", 13),
        ("quatorze", 14),
        ("quinze", 15),
        ("seize", 16),
        ("dix sept", 17),
        ("dix huit", 18),
        ("dix neuf", 19),
    ],
};

/// Tens words as multipliers of ten. Every key maps to exactly one value;
/// 70s and 90s go through [`VIGESIMAL_BASES`].
pub static TENS_WORDS: WordTable = WordTable {
    name: "20..90 by 10",
    entries: &[
        ("vingt", 2),
        ("trente", 3),
        ("quarante", 4),
        ("cinquante", 5),
        ("soixante", 6),
        ("septante", 7),
        ("quatre vingt", 8),
        ("quatre vingts", 8),
        ("huitante", 8),
        ("octante", 8),
        ("nonante", 9),
    ],
};

/// Bases that take a teen instead of a unit: "soixante dix" = 60 + 10.
pub static VIGESIMAL_BASES: WordTable =
    WordTable { name: "vigesimal base", entries: &[("soixante", 60), ("quatre vingt", 80), ("quatre vingts", 80)] };

/// Digit words for spoken digit sequences.
pub static DIGIT_NAMES: WordTable = WordTable {
    name: "digits",
    entries: &[
        ("zero", 0),
        ("zéro", 0),
        ("un", 1),
        ("deux", 2),
        ("trois", 3),
        ("quatre", 4),
        ("cinq", 5),
        ("six", 6),
        ("sept", 7),
        ("huit", 8),
        ("neuf", 9),
    ],
};

/// Longest accepted digit sequence is one less than this.
pub const DIGITS_MAX: usize = 12;

/// Concatenate spoken digit words: `["un", "deux", "trois"]` → `"123"`.
pub fn resolve_digits<'a>(words: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let mut out = String::new();
    for word in words {
        let d = DIGIT_NAMES.get(word).ok_or_else(|| DicteeError::UnknownPhrase(word.to_string()))?;
        out.push_str(&d.to_string());
    }
    if out.is_empty() || out.len() >= DIGITS_MAX {
        return Err(DicteeError::out_of_range("digit count", out.len() as i64, 1, DIGITS_MAX as i64));
    }
    Ok(out)
}

pub(crate) static ZERO_RE: Lazy<Regex> = Lazy::new(|| compiled(&ZERO_WORDS));
pub(crate) static UNITS_RE: Lazy<Regex> = Lazy::new(|| compiled(&UNITS_WORDS));
pub(crate) static TEENS_RE: Lazy<Regex> = Lazy::new(|| compiled(&TEENS_WORDS));
pub(crate) static TENS_RE: Lazy<Regex> = Lazy::new(|| compiled(&TENS_WORDS));
pub(crate) static VIGESIMAL_RE: Lazy<Regex> = Lazy::new(|| compiled(&VIGESIMAL_BASES));
/// Two or more digit words in a row.
pub(crate) static DIGIT_SERIES_RE: Lazy<Regex> = Lazy::new(|| {
    let series = phrase::alternation(DIGIT_NAMES.phrases())
        .and_then(|digit| phrase::compile_regex(DIGIT_NAMES.name, &format!(r"({digit}(?:{}{digit})+)", phrase::SEPARATOR)));
    series.unwrap_or_else(|err| panic!("word table `{}`: {err}", DIGIT_NAMES.name))
});

// Literal tables always render; a failure here is a typo in the table.
fn compiled(table: &WordTable) -> Regex {
    table.capture_regex().unwrap_or_else(|err| panic!("word table `{}`: {err}", table.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case_accents_and_hyphens() {
        assert_eq!(ZERO_WORDS.get("Zéro"), Some(0));
        assert_eq!(TEENS_WORDS.get("dix-sept"), Some(17));
        assert_eq!(TENS_WORDS.get("Quatre-Vingts"), Some(8));
        assert_eq!(UNITS_WORDS.get("vingt"), None);
    }

    #[test]
    fn no_key_maps_to_two_values() {
        for table in [&ZERO_WORDS, &UNITS_WORDS, &TEENS_WORDS, &TENS_WORDS, &VIGESIMAL_BASES, &DIGIT_NAMES] {
            for (word, value) in table.entries {
                assert_eq!(table.get(word), Some(*value), "`{word}` in {}", table.name);
            }
        }
    }

    #[test]
    fn tables_render_to_regexes() {
        assert!(TEENS_RE.is_match("dix-neuf"));
        assert_eq!(&TEENS_RE.captures("dix neuf").unwrap()[1], "dix neuf");
        assert!(!UNITS_RE.is_match("lundi"));
    }

    #[test]
    fn digit_series_needs_two_words() {
        assert_eq!(&DIGIT_SERIES_RE.captures("code un-deux trois").unwrap()[1], "un-deux trois");
        assert!(!DIGIT_SERIES_RE.is_match("sept"));
        assert!(!DIGIT_SERIES_RE.is_match("une deux"));
    }

    #[test]
    fn digit_sequences() {
        assert_eq!(resolve_digits(["un", "deux", "trois"]), Ok("123".to_string()));
        assert_eq!(resolve_digits(["zéro", "cinq"]), Ok("05".to_string()));
        assert!(matches!(resolve_digits(["un", "vingt"]), Err(DicteeError::UnknownPhrase(_))));
        assert!(resolve_digits(std::iter::empty()).is_err());
    }
}
