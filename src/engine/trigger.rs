//! Trigger scanning (input pre-classification).
//!
//! The scan inspects the raw input and produces two coarse signals:
//!
//! - **Buckets** (`BucketMask`): "contains digits", "names a weekday",
//!   "names a month", "has a magnitude word", "spells letters". These enable
//!   bucketed rules via `RuleIndex::by_bucket`.
//! - **Phrases** (`TriggerInfo::phrases`): normalized key words found in the
//!   input ("jours", "heures", "semaine"), used for phrase gating in
//!   `Parser::new_compiled`.
//!
//! This is a heuristic. False positives are fine because the parser still has
//! to match full patterns; false negatives switch rules off, so word lists
//! come from the same tables the rules are built from.

use super::compiled_rules::BucketMask;
use crate::calendar::{DAY_NAMES, MONTH_NAMES};
use crate::characters::{LETTER_NAMES, UPPERCASE_PREFIX};
use crate::phrase::normalize;
use once_cell::sync::Lazy;
use std::collections::HashSet;

const MAGNITUDE_WORDS: &[&str] = &["cent", "cents", "mille", "million", "millions"];

/// Words that rules name in `required_phrases` / `optional_phrases`.
pub(crate) const KEY_PHRASES: &[&str] = &[
    "il y a",
    "dans",
    "jours",
    "dernier",
    "ce",
    "prochain",
    "semaine",
    "premier",
    "1er",
    "heure",
    "heures",
    "cenq",
    "zero",
    "majuscule",
];

fn word_set<'a>(names: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    names.into_iter().flat_map(|name| normalize(name).split(' ').map(str::to_string).collect::<Vec<_>>()).collect()
}

static WEEKDAY_WORDS: Lazy<HashSet<String>> = Lazy::new(|| word_set(DAY_NAMES.iter().map(|&(n, _)| n)));
static MONTH_WORDS: Lazy<HashSet<String>> = Lazy::new(|| word_set(MONTH_NAMES.iter().map(|&(n, _)| n)));
static SPELLING_WORDS: Lazy<HashSet<String>> =
    Lazy::new(|| word_set(LETTER_NAMES.iter().map(|&(n, _)| n).chain([UPPERCASE_PREFIX])));

/// Input characteristics detected from the raw input.
#[derive(Debug, Clone)]
pub struct TriggerInfo {
    pub buckets: BucketMask,
    pub phrases: HashSet<String>,
}

impl TriggerInfo {
    /// Scan `input` for coarse buckets and key phrases.
    ///
    /// Words are compared after [`normalize`], so case, accents and
    /// hyphenation don't matter ("Août", "aout" and "AOUT" all set
    /// `MONTHISH`).
    pub fn scan(input: &str) -> Self {
        let mut buckets = BucketMask::empty();
        let mut phrases = HashSet::new();
        let lower = normalize(input);
        let words: Vec<&str> = lower
            .split(' ')
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|w| !w.is_empty())
            .collect();

        if input.bytes().any(|b| b.is_ascii_digit()) {
            buckets |= BucketMask::HAS_DIGITS;
        }

        let groups: [(BucketMask, &HashSet<String>); 3] = [
            (BucketMask::WEEKDAYISH, &*WEEKDAY_WORDS),
            (BucketMask::MONTHISH, &*MONTH_WORDS),
            (BucketMask::SPELLING, &*SPELLING_WORDS),
        ];
        for (bit, set) in groups {
            if words.iter().any(|w| set.contains(*w)) {
                buckets |= bit;
            }
        }
        if words.iter().any(|w| MAGNITUDE_WORDS.contains(w)) {
            buckets |= BucketMask::MAGNITUDE;
        }

        for &phrase in KEY_PHRASES {
            let found = if phrase.contains(' ') {
                // Multi-word phrases: substring match on the normalized input.
                lower.contains(phrase)
            } else {
                words.contains(&phrase)
            };
            if found {
                phrases.insert(phrase.to_string());
            }
        }

        TriggerInfo { buckets, phrases }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_the_vocabulary() {
        let info = TriggerInfo::scan("Mardi 3 AOÛT");
        assert!(info.buckets.contains(BucketMask::WEEKDAYISH | BucketMask::MONTHISH | BucketMask::HAS_DIGITS));
        assert!(!info.buckets.contains(BucketMask::MAGNITUDE));

        let info = TriggerInfo::scan("deux cents mille");
        assert_eq!(info.buckets, BucketMask::MAGNITUDE);

        let info = TriggerInfo::scan("majuscule x-ray");
        assert_eq!(info.buckets, BucketMask::SPELLING);
    }

    #[test]
    fn key_phrases_are_normalized() {
        let info = TriggerInfo::scan("Il-y-a trois Jours, quinze ZÉRO cinq");
        for phrase in ["il y a", "jours", "zero"] {
            assert!(info.phrases.contains(phrase), "{phrase} missing from {:?}", info.phrases);
        }
        assert!(TriggerInfo::scan("quinze heures").phrases.contains("heures"));
        assert!(!TriggerInfo::scan("dansons").phrases.contains("dans"));
    }
}
