use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::BucketMask;
use crate::number::{
    AND_UNDER_100, HUNDREDS, HUNDREDS_BIG, IntBuilder, MILLIONS, MagnitudeRule, TENS, THOUSANDS, compose_vigesimal,
    resolve_digits,
};
use crate::phrase;
use crate::rules::numeral::helpers::{first_match_lower, make_numeral, numeral};
use crate::rules::numeral::predicates::{
    big_hundreds_multiplier, big_hundreds_remainder, hundreds_multiplier, hundreds_remainder, is_teen, is_units,
    millions_multiplier, millions_remainder, thousands_multiplier, thousands_remainder,
};
use crate::rules::numeral::tables::{
    DIGIT_SERIES_RE, TEENS_RE, TEENS_WORDS, TENS_RE, TENS_WORDS, UNITS_RE, UNITS_WORDS, VIGESIMAL_BASES, VIGESIMAL_RE,
    ZERO_RE,
};
use crate::{DigitsData, NumeralData, Pattern, Rule, Token};

/// Separator plus optional "et" before a sub-100 remainder ("vingt et un").
static AND_LEAD_RE: Lazy<Regex> = Lazy::new(|| {
    let lead = AND_UNDER_100.lead_regex().and_then(|src| phrase::compile_regex(AND_UNDER_100.spec, &src));
    lead.unwrap_or_else(|err| panic!("{err}"))
});

fn compose(magnitude: &MagnitudeRule, multiplier: Option<i64>, remainder: Option<i64>) -> Option<NumeralData> {
    match magnitude.resolve(multiplier, remainder) {
        Ok(value) => Some(make_numeral(value, magnitude.builder)),
        Err(err) => {
            debug!("[numeral] {} rejected: {err}", magnitude.name);
            None
        }
    }
}

fn rule_zero() -> Rule {
    rule! {
        name: "integer 0",
        pattern: [Pattern::Regex(&ZERO_RE)],
        prod: |_tokens: &[Token]| -> Option<NumeralData> {
            Some(make_numeral(0, IntBuilder::Zero))
        },
    }
}

fn rule_units() -> Rule {
    rule! {
        name: "integer (1..9)",
        pattern: [Pattern::Regex(&UNITS_RE)],
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let m = first_match_lower(tokens)?;
            UNITS_WORDS.get(&m).map(|v| make_numeral(v, IntBuilder::Units))
        },
    }
}

fn rule_teens() -> Rule {
    rule! {
        name: "integer (10..19)",
        pattern: [Pattern::Regex(&TEENS_RE)],
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let m = first_match_lower(tokens)?;
            TEENS_WORDS.get(&m).map(|v| make_numeral(v, IntBuilder::Teens))
        },
    }
}

/// "vingt", "quarante", "quatre vingts"
fn rule_tens() -> Rule {
    rule! {
        name: "integer (20..90)",
        pattern: [Pattern::Regex(&TENS_RE)],
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let m = first_match_lower(tokens)?;
            compose(&TENS, Some(TENS_WORDS.get(&m)?), None)
        },
    }
}

/// "vingt et un", "quatre vingt deux", "trente-cinq"
fn rule_composite_tens() -> Rule {
    rule! {
        name: "integer 21..99",
        pattern: [
            Pattern::Regex(&TENS_RE),
            Pattern::Regex(&AND_LEAD_RE),
            pred!(is_units),
        ],
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let m = first_match_lower(tokens)?;
            let units = numeral(tokens.get(2)?)?;
            compose(&TENS, Some(TENS_WORDS.get(&m)?), Some(units.value))
        },
    }
}

/// "soixante et onze", "quatre vingt dix neuf"
fn rule_vigesimal_tens() -> Rule {
    rule! {
        name: "integer 70..79, 90..99",
        pattern: [
            Pattern::Regex(&VIGESIMAL_RE),
            Pattern::Regex(&AND_LEAD_RE),
            pred!(is_teen),
        ],
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let base = VIGESIMAL_BASES.get(&first_match_lower(tokens)?)?;
            let teen = numeral(tokens.get(2)?)?;
            match compose_vigesimal(base, teen.value) {
                Ok(v) => Some(make_numeral(v, IntBuilder::Tens)),
                Err(err) => {
                    debug!("[numeral] vigesimal rejected: {err}");
                    None
                }
            }
        },
    }
}

/// Written-out integers ("2024").
fn rule_integers() -> Rule {
    rule! {
        name: "integer (numeric)",
        pattern: [re!(r"\b(\d{1,10})\b")],
        buckets: BucketMask::HAS_DIGITS.bits(),
        prod: |tokens: &[Token]| -> Option<NumeralData> {
            let value: i64 = first_match_lower(tokens)?.parse().ok()?;
            IntBuilder::classify(value).map(|b| make_numeral(value, b))
        },
    }
}

/// The four shapes of `[<multiplier>] <keyword> [<remainder>]`. Shapes without
/// a multiplier are left out when the pattern requires one.
fn magnitude_rules(
    magnitude: &'static MagnitudeRule,
    keyword: &'static Regex,
    multiplier: fn(&Token) -> bool,
    remainder: fn(&Token) -> bool,
    names: [&'static str; 4],
) -> Vec<Rule> {
    let [bare, multiplied, with_remainder, full] = names;
    let mut rules = vec![
        rule! {
            name: multiplied,
            pattern: [pred!(multiplier), re!(r"[\s\-]+"), Pattern::Regex(keyword)],
            buckets: BucketMask::MAGNITUDE.bits(),
            deps: [crate::Dimension::Numeral],
            prod: |tokens: &[Token]| -> Option<NumeralData> {
                let m = numeral(tokens.first()?)?;
                compose(magnitude, Some(m.value), None)
            },
        },
        rule! {
            name: full,
            pattern: [
                pred!(multiplier),
                re!(r"[\s\-]+"),
                Pattern::Regex(keyword),
                Pattern::Regex(&AND_LEAD_RE),
                pred!(remainder),
            ],
            buckets: BucketMask::MAGNITUDE.bits(),
            deps: [crate::Dimension::Numeral],
            prod: |tokens: &[Token]| -> Option<NumeralData> {
                let m = numeral(tokens.first()?)?;
                let r = numeral(tokens.get(4)?)?;
                compose(magnitude, Some(m.value), Some(r.value))
            },
        },
    ];

    if magnitude.multiplier_optional() {
        rules.push(rule! {
            name: bare,
            pattern: [Pattern::Regex(keyword)],
            buckets: BucketMask::MAGNITUDE.bits(),
            prod: |_tokens: &[Token]| -> Option<NumeralData> {
                compose(magnitude, None, None)
            },
        });
        rules.push(rule! {
            name: with_remainder,
            pattern: [Pattern::Regex(keyword), Pattern::Regex(&AND_LEAD_RE), pred!(remainder)],
            buckets: BucketMask::MAGNITUDE.bits(),
            deps: [crate::Dimension::Numeral],
            prod: |tokens: &[Token]| -> Option<NumeralData> {
                let r = numeral(tokens.get(2)?)?;
                compose(magnitude, None, Some(r.value))
            },
        });
    }

    rules
}

fn rules_hundreds() -> Vec<Rule> {
    magnitude_rules(
        &HUNDREDS,
        regex!(r"(?i)\bcents?\b"),
        hundreds_multiplier,
        hundreds_remainder,
        ["cent", "<1..9> cent", "cent <1..99>", "<1..9> cent <1..99>"],
    )
}

fn rules_big_hundreds() -> Vec<Rule> {
    magnitude_rules(
        &HUNDREDS_BIG,
        regex!(r"(?i)\bcents?\b"),
        big_hundreds_multiplier,
        big_hundreds_remainder,
        ["cent (big)", "<10..99> cent", "cent <1..99> (big)", "<10..99> cent <1..99>"],
    )
}

fn rules_thousands() -> Vec<Rule> {
    magnitude_rules(
        &THOUSANDS,
        regex!(r"(?i)\bmille\b"),
        thousands_multiplier,
        thousands_remainder,
        ["mille", "<1..999> mille", "mille <1..999>", "<1..999> mille <1..999>"],
    )
}

fn rules_millions() -> Vec<Rule> {
    magnitude_rules(
        &MILLIONS,
        regex!(r"(?i)\bmillions?\b"),
        millions_multiplier,
        millions_remainder,
        ["million", "<1..999999> million", "million <1..999999>", "<1..999999> million <1..999999>"],
    )
}

/// "un deux trois" → "123"
fn rule_digit_series() -> Rule {
    rule! {
        name: "digit series",
        pattern: [Pattern::Regex(&DIGIT_SERIES_RE)],
        prod: |tokens: &[Token]| -> Option<DigitsData> {
            let spoken = first_match_lower(tokens)?;
            let words = spoken.split(|c: char| c.is_whitespace() || c == '-').filter(|w| !w.is_empty());
            match resolve_digits(words) {
                Ok(digits) => Some(DigitsData(digits)),
                Err(err) => {
                    debug!("[numeral] digit series rejected: {err}");
                    None
                }
            }
        },
    }
}

pub fn get() -> Vec<Rule> {
    let mut rules = vec![
        rule_zero(),
        rule_units(),
        rule_teens(),
        rule_tens(),
        rule_composite_tens(),
        rule_vigesimal_tens(),
        rule_integers(),
        rule_digit_series(),
    ];
    rules.extend(rules_hundreds());
    rules.extend(rules_big_hundreds());
    rules.extend(rules_thousands());
    rules.extend(rules_millions());
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::numeral::helpers::capture;

    #[test]
    fn big_hundreds_have_no_bare_keyword_rule() {
        let names: Vec<&str> = get().iter().map(|r| r.name).collect();
        assert!(names.contains(&"cent"));
        assert!(!names.contains(&"cent (big)"));
        assert!(names.contains(&"<10..99> cent <1..99>"));
    }

    #[test]
    fn capture_reads_regex_groups() {
        let token = crate::Token {
            dim: crate::Dimension::RegexMatch,
            kind: crate::TokenKind::RegexMatch(vec!["dix sept".into(), "dix sept".into()]),
        };
        assert_eq!(capture(&token, 1).as_deref(), Some("dix sept"));
        assert_eq!(capture(&token, 2), None);
    }
}
