//! Date and time rules.
//!
//! Relative-date rules are generated from [`DAY_OFFSETS`] and
//! [`WEEKDAY_OFFSETS`]: each trigger pattern is rendered once, with `<day>`
//! substituted by a capture of the day names and `<n>` split out so a
//! numeral token can sit in between.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::calendar::{
    DAY_NAMES, DAY_OFFSETS, DateExpr, DateOffsetRule, MONTH_NAMES, MinutePhrase, OffsetKind, WEEKDAY_OFFSETS,
    day_index, month_number, resolve_military_time, resolve_year,
};
use crate::engine::BucketMask;
use crate::error::{DicteeError, Result};
use crate::phrase::{self, PhrasePattern};
use crate::rules::calendar::predicates::*;
use crate::rules::numeral::helpers::{first_match_lower, numeral};
use crate::{Dimension, Lexeme, Pattern, Rule, TimeOfDay, Token, TokenKind};

/// Rendered form of one offset trigger.
enum OffsetRegex {
    Whole(Regex),
    AroundCount { before: Regex, after: Regex },
}

fn day_fragment() -> Result<String> {
    Ok(format!("({})", phrase::alternation(DAY_NAMES.iter().map(|&(name, _)| name))?))
}

fn offset_regex(rule: &DateOffsetRule) -> Result<OffsetRegex> {
    let pattern = PhrasePattern::parse(rule.trigger)?;
    match pattern.slots().as_slice() {
        [] => Ok(OffsetRegex::Whole(pattern.compile()?)),
        ["day"] => {
            let day = day_fragment()?;
            let rendered = pattern.to_regex_with(|slot| (slot == "day").then(|| day.clone()))?;
            Ok(OffsetRegex::Whole(phrase::compile_regex(rule.trigger, &rendered)?))
        }
        ["n"] => {
            let split = pattern.split_at_slot("n")?;
            let (Some(before), Some(after)) = (split.before, split.after) else {
                return Err(DicteeError::Pattern {
                    pattern: rule.trigger.to_string(),
                    reason: "<n> needs words on both sides".to_string(),
                });
            };
            Ok(OffsetRegex::AroundCount {
                before: phrase::compile_regex(rule.trigger, &before)?,
                after: phrase::compile_regex(rule.trigger, &after)?,
            })
        }
        other => Err(DicteeError::Pattern {
            pattern: rule.trigger.to_string(),
            reason: format!("unexpected slots {other:?}"),
        }),
    }
}

fn offset_regexes(table: &[DateOffsetRule]) -> Vec<OffsetRegex> {
    // Literal tables always render; a failure here is a typo in the table.
    table.iter().map(|rule| offset_regex(rule).unwrap_or_else(|err| panic!("{err}"))).collect()
}

static DAY_OFFSET_RES: Lazy<Vec<OffsetRegex>> = Lazy::new(|| offset_regexes(DAY_OFFSETS));
static WEEKDAY_OFFSET_RES: Lazy<Vec<OffsetRegex>> = Lazy::new(|| offset_regexes(WEEKDAY_OFFSETS));

static MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    let body = phrase::alternation(MONTH_NAMES.iter().map(|&(name, _)| name))
        .and_then(|body| phrase::compile_regex("month names", &format!("({body})")));
    body.unwrap_or_else(|err| panic!("{err}"))
});

/// Words an offset trigger can't match without: `(required, optional)`.
fn key_phrases(offset: &DateOffsetRule) -> (&'static [&'static str], &'static [&'static str]) {
    match (offset.kind, offset.parameter) {
        (OffsetKind::NamedDayKeyword, Some(sign)) if sign < 0 => (&["il y a"], &["jours"]),
        (OffsetKind::NamedDayKeyword, _) => (&["dans"], &["jours"]),
        (OffsetKind::WeekdayLastOccurrence, _) => (&["dernier"], &[]),
        (OffsetKind::WeekdayNextOccurrence, _) => (&[], &["ce", "prochain"]),
        (OffsetKind::WeekdayLastWeek | OffsetKind::WeekdayNextWeek, _) => (&["semaine"], &[]),
        (OffsetKind::AbsoluteDayDelta, _) => (&[], &[]),
    }
}

fn relative_date(offset: &DateOffsetRule, parameter: i64) -> Option<DateExpr> {
    Some(DateExpr::Relative { kind: offset.kind, parameter })
}

fn offset_rules(table: &'static [DateOffsetRule], regexes: &'static [OffsetRegex]) -> Vec<Rule> {
    table
        .iter()
        .zip(regexes)
        .map(|(offset, regex)| {
            let mut rule = offset_rule(offset, regex);
            (rule.required_phrases, rule.optional_phrases) = key_phrases(offset);
            rule
        })
        .collect()
}

fn offset_rule(offset: &'static DateOffsetRule, regex: &'static OffsetRegex) -> Rule {
    match regex {
        OffsetRegex::Whole(re) if offset.kind == OffsetKind::AbsoluteDayDelta => rule! {
            name: offset.trigger,
            pattern: [Pattern::Regex(re)],
            prod: |_tokens: &[Token]| -> Option<DateExpr> {
                relative_date(offset, offset.parameter?)
            },
        },
        OffsetRegex::Whole(re) => rule! {
            name: offset.trigger,
            pattern: [Pattern::Regex(re)],
            buckets: BucketMask::WEEKDAYISH.bits(),
            prod: |tokens: &[Token]| -> Option<DateExpr> {
                let day = day_index(&first_match_lower(tokens)?)?;
                relative_date(offset, day as i64)
            },
        },
        OffsetRegex::AroundCount { before, after } => rule! {
            name: offset.trigger,
            pattern: [Pattern::Regex(before), pred!(is_day_count), Pattern::Regex(after)],
            deps: [Dimension::Numeral],
            prod: |tokens: &[Token]| -> Option<DateExpr> {
                let n = numeral(tokens.get(1)?)?;
                relative_date(offset, offset.parameter? * n.value)
            },
        },
    }
}

fn rule_month() -> Rule {
    rule! {
        name: "<month>",
        pattern: [Pattern::Regex(&MONTH_RE)],
        buckets: BucketMask::MONTHISH.bits(),
        prod: |tokens: &[Token]| -> Option<Lexeme> {
            month_number(&first_match_lower(tokens)?).map(Lexeme::Month)
        },
    }
}

fn month_of(t: &Token) -> Option<u32> {
    match t.kind {
        TokenKind::Lexeme(Lexeme::Month(m)) => Some(m),
        _ => None,
    }
}

fn day_of(t: &Token) -> Option<u32> {
    numeral(t).and_then(|n| u32::try_from(n.value).ok())
}

/// "quinze mars"
fn rule_day_month() -> Rule {
    rule! {
        name: "<day> <month>",
        pattern: [pred!(is_day_of_month), re!(r"[\s\-]+"), pred!(is_month)],
        buckets: BucketMask::MONTHISH.bits(),
        deps: [Dimension::Numeral, Dimension::Lexeme],
        prod: |tokens: &[Token]| -> Option<DateExpr> {
            let day = day_of(tokens.first()?)?;
            let month = month_of(tokens.get(2)?)?;
            Some(DateExpr::Absolute { day, month, year: None })
        },
    }
}

/// "mars quinze"
fn rule_month_day() -> Rule {
    rule! {
        name: "<month> <day>",
        pattern: [pred!(is_month), re!(r"[\s\-]+"), pred!(is_day_of_month)],
        buckets: BucketMask::MONTHISH.bits(),
        deps: [Dimension::Numeral, Dimension::Lexeme],
        prod: |tokens: &[Token]| -> Option<DateExpr> {
            let month = month_of(tokens.first()?)?;
            let day = day_of(tokens.get(2)?)?;
            Some(DateExpr::Absolute { day, month, year: None })
        },
    }
}

/// "premier mai", "1er mai"
fn rule_first_of_month() -> Rule {
    rule! {
        name: "premier <month>",
        pattern: [re!(r"(?i)\b(?:premier|1er)[\s\-]+"), pred!(is_month)],
        optional_phrases: ["premier", "1er"],
        buckets: BucketMask::MONTHISH.bits(),
        prod: |tokens: &[Token]| -> Option<DateExpr> {
            let month = month_of(tokens.get(1)?)?;
            Some(DateExpr::Absolute { day: 1, month, year: None })
        },
    }
}

fn rule_date_with_year() -> Rule {
    rule! {
        name: "<date> <year>",
        pattern: [pred!(is_date_without_year), re!(r"[\s\-]+"), pred!(is_year)],
        buckets: BucketMask::MONTHISH.bits(),
        deps: [Dimension::Date, Dimension::Lexeme],
        prod: |tokens: &[Token]| -> Option<DateExpr> {
            let (day, month) = match tokens.first()?.kind {
                TokenKind::Date(DateExpr::Absolute { day, month, year: None }) => (day, month),
                _ => return None,
            };
            let year = match tokens.get(2)?.kind {
                TokenKind::Lexeme(Lexeme::Year(y)) => y,
                _ => return None,
            };
            Some(DateExpr::Absolute { day, month, year: Some(year) })
        },
    }
}

fn year_lexeme(century: Option<i64>, year: i64) -> Option<Lexeme> {
    match resolve_year(century, year) {
        Ok(y) => Some(Lexeme::Year(y)),
        Err(err) => {
            debug!("[calendar] year rejected: {err}");
            None
        }
    }
}

/// "deux mille vingt quatre", "2024"
fn rule_year_number() -> Rule {
    rule! {
        name: "<year>",
        pattern: [pred!(is_year_number)],
        buckets: BucketMask::MONTHISH.bits(),
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<Lexeme> {
            year_lexeme(None, numeral(tokens.first()?)?.value)
        },
    }
}

/// "vingt vingt quatre", "dix neuf quatre vingt dix"
fn rule_year_century() -> Rule {
    rule! {
        name: "<century> <year>",
        pattern: [pred!(is_century), re!(r"[\s\-]+"), pred!(is_century_year)],
        buckets: BucketMask::MONTHISH.bits(),
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<Lexeme> {
            let century = numeral(tokens.first()?)?.value;
            let year = numeral(tokens.get(2)?)?.value;
            year_lexeme(Some(century), year)
        },
    }
}

fn time_of_day(hour: i64, minute: MinutePhrase) -> Option<TimeOfDay> {
    match resolve_military_time(hour, minute) {
        Ok(t) => Some(TimeOfDay(t)),
        Err(err) => {
            debug!("[calendar] time rejected: {err}");
            None
        }
    }
}

/// "quinze cenq" (on the hour)
fn rule_military_on_the_hour() -> Rule {
    rule! {
        name: "<hour> cenq",
        pattern: [pred!(is_hour), re!(r"(?i)[\s\-]+cenq\b")],
        required_phrases: ["cenq"],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TimeOfDay> {
            time_of_day(numeral(tokens.first()?)?.value, MinutePhrase::OnTheHour)
        },
    }
}

/// "quinze zero cinq"
fn rule_military_leading_zero() -> Rule {
    rule! {
        name: "<hour> zero <min_1_10>",
        pattern: [pred!(is_hour), re!(r"(?i)[\s\-]+z[eé]ro[\s\-]+"), pred!(is_minute_1_10)],
        required_phrases: ["zero"],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TimeOfDay> {
            let hour = numeral(tokens.first()?)?.value;
            let minute = numeral(tokens.get(2)?)?.value;
            time_of_day(hour, MinutePhrase::LeadingZero(minute))
        },
    }
}

/// "quinze trente"
fn rule_military_plain() -> Rule {
    rule! {
        name: "<hour> <min_10_60>",
        pattern: [pred!(is_hour), re!(r"[\s\-]+"), pred!(is_minute_10_60)],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TimeOfDay> {
            let hour = numeral(tokens.first()?)?.value;
            let minute = numeral(tokens.get(2)?)?.value;
            time_of_day(hour, MinutePhrase::Plain(minute))
        },
    }
}

fn minute_phrase(minute: i64) -> MinutePhrase {
    match minute {
        0 => MinutePhrase::OnTheHour,
        1..=9 => MinutePhrase::LeadingZero(minute),
        _ => MinutePhrase::Plain(minute),
    }
}

/// "quinze heures"
fn rule_heures() -> Rule {
    rule! {
        name: "<hour> heures",
        pattern: [pred!(is_hour), re!(r"(?i)[\s\-]+heures?\b")],
        optional_phrases: ["heure", "heures"],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TimeOfDay> {
            time_of_day(numeral(tokens.first()?)?.value, MinutePhrase::OnTheHour)
        },
    }
}

/// "quinze heures trente", "huit heures cinq"
fn rule_heures_minutes() -> Rule {
    rule! {
        name: "<hour> heures <minute>",
        pattern: [pred!(is_hour), re!(r"(?i)[\s\-]+heures?[\s\-]+"), pred!(is_minute)],
        optional_phrases: ["heure", "heures"],
        deps: [Dimension::Numeral],
        prod: |tokens: &[Token]| -> Option<TimeOfDay> {
            let hour = numeral(tokens.first()?)?.value;
            let minute = numeral(tokens.get(2)?)?.value;
            time_of_day(hour, minute_phrase(minute))
        },
    }
}

pub fn get() -> Vec<Rule> {
    let mut rules = offset_rules(DAY_OFFSETS, &DAY_OFFSET_RES);
    rules.extend(offset_rules(WEEKDAY_OFFSETS, &WEEKDAY_OFFSET_RES));
    rules.extend([
        rule_month(),
        rule_day_month(),
        rule_month_day(),
        rule_first_of_month(),
        rule_date_with_year(),
        rule_year_number(),
        rule_year_century(),
        rule_military_on_the_hour(),
        rule_military_leading_zero(),
        rule_military_plain(),
        rule_heures(),
        rule_heures_minutes(),
    ]);
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::numeral::helpers::capture;

    #[test]
    fn weekday_triggers_capture_the_day() {
        let OffsetRegex::Whole(re) = &WEEKDAY_OFFSET_RES[3] else { panic!("weekday trigger is not whole") };
        let caps = re.captures("Mardi de la semaine derniere").unwrap();
        assert_eq!(&caps[1], "Mardi");
        assert!(re.is_match("mardi de la semaine dernière"));
    }

    #[test]
    fn count_triggers_split_around_n() {
        let OffsetRegex::AroundCount { before, after } = &DAY_OFFSET_RES[0] else { panic!("not a count trigger") };
        assert_eq!(before.find("il y a 3 jours").unwrap().as_str(), "il y a ");
        assert_eq!(after.find("il y a 3 jours").unwrap().as_str(), " jours");
    }

    #[test]
    fn minute_shapes() {
        assert_eq!(minute_phrase(0), MinutePhrase::OnTheHour);
        assert_eq!(minute_phrase(5), MinutePhrase::LeadingZero(5));
        assert_eq!(minute_phrase(30), MinutePhrase::Plain(30));
    }

    #[test]
    fn capture_helper_reads_month_group() {
        let token = Token { dim: Dimension::RegexMatch, kind: TokenKind::RegexMatch(vec!["mai".into(), "mai".into()]) };
        assert_eq!(capture(&token, 1).and_then(|m| month_number(&m)), Some(5));
    }
}
