//! Month, day and date-offset tables.
//!
//! Keys are phrase patterns (see [`crate::phrase`]); lookups go through
//! [`normalize`] so "Fevrier", "février" and "FÉVRIER" are the same month.

use crate::calendar::OffsetKind;
use crate::phrase::normalize;

pub static MONTH_NAMES: &[(&str, u32)] = &[
    ("Janvier", 1),
    ("Février", 2),
    ("Mars", 3),
    ("Avril", 4),
    ("Mai", 5),
    ("Juin", 6),
    ("Juillet", 7),
    ("Août", 8),
    ("Septembre", 9),
    ("Octobre", 10),
    ("Novembre", 11),
    ("Décembre", 12),
];

/// Monday = 0 … Sunday = 6.
pub static DAY_NAMES: &[(&str, u32)] = &[
    ("Lundi", 0),
    ("Mardi", 1),
    ("Mercredi", 2),
    ("Jeudi", 3),
    ("Vendredi", 4),
    ("Samedi", 5),
    ("Dimanche", 6),
];

pub const ABSOLUTE_DATE_SPEC: &str = "(<day> <month> | <month> <day>) [<year>]";
pub const MILITARY_TIME_SPEC: &str = "<hour> (cenq | zero <min_1_10> | <min_10_60>)";
pub const HEURES_TIME_SPEC: &str = "<hour> (heure | heures) [<minute>]";

pub fn month_number(phrase: &str) -> Option<u32> {
    lookup(MONTH_NAMES, phrase)
}

pub fn day_index(phrase: &str) -> Option<u32> {
    lookup(DAY_NAMES, phrase)
}

fn lookup(table: &[(&str, u32)], phrase: &str) -> Option<u32> {
    let key = normalize(phrase);
    table.iter().find(|(name, _)| normalize(name) == key).map(|&(_, v)| v)
}

/// A relative-date phrase and how to turn it into a day offset.
///
/// `parameter` is the signed day delta for day keywords ("hier" = -1), the
/// sign for counted phrases ("il y a <n> jours" = -1 × n), and `None` for
/// weekday phrases, whose parameter is the weekday named in `<day>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOffsetRule {
    pub trigger: &'static str,
    pub kind: OffsetKind,
    pub parameter: Option<i64>,
}

pub static DAY_OFFSETS: &[DateOffsetRule] = &[
    DateOffsetRule { trigger: "il y a <n> jours", kind: OffsetKind::NamedDayKeyword, parameter: Some(-1) },
    DateOffsetRule { trigger: "hier", kind: OffsetKind::AbsoluteDayDelta, parameter: Some(-1) },
    DateOffsetRule { trigger: "aujourd'hui", kind: OffsetKind::AbsoluteDayDelta, parameter: Some(0) },
    DateOffsetRule { trigger: "demain", kind: OffsetKind::AbsoluteDayDelta, parameter: Some(1) },
    DateOffsetRule { trigger: "dans <n> jours", kind: OffsetKind::NamedDayKeyword, parameter: Some(1) },
];

pub static WEEKDAY_OFFSETS: &[DateOffsetRule] = &[
    DateOffsetRule { trigger: "<day> dernier", kind: OffsetKind::WeekdayLastOccurrence, parameter: None },
    DateOffsetRule { trigger: "(ce | prochain) <day>", kind: OffsetKind::WeekdayNextOccurrence, parameter: None },
    DateOffsetRule { trigger: "<day> prochain", kind: OffsetKind::WeekdayNextOccurrence, parameter: None },
    DateOffsetRule { trigger: "<day> de la semaine dernière", kind: OffsetKind::WeekdayLastWeek, parameter: None },
    DateOffsetRule { trigger: "<day> de la semaine prochaine", kind: OffsetKind::WeekdayNextWeek, parameter: None },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrase::PhrasePattern;

    #[test]
    fn names_match_with_or_without_accents() {
        assert_eq!(month_number("fevrier"), Some(2));
        assert_eq!(month_number("AOÛT"), Some(8));
        assert_eq!(month_number("decembre"), Some(12));
        assert_eq!(day_index("Dimanche"), Some(6));
        assert_eq!(day_index("lundi"), Some(0));
        assert_eq!(day_index("sunday"), None);
    }

    #[test]
    fn offset_triggers_are_valid_patterns() {
        for rule in DAY_OFFSETS.iter().chain(WEEKDAY_OFFSETS) {
            let pattern = PhrasePattern::parse(rule.trigger).unwrap();
            let slots = pattern.slots();
            match rule.kind {
                OffsetKind::AbsoluteDayDelta => assert!(slots.is_empty()),
                OffsetKind::NamedDayKeyword => assert_eq!(slots, vec!["n"]),
                _ => assert_eq!(slots, vec!["day"]),
            }
        }
    }

    #[test]
    fn element_specs_keep_their_slots() {
        let date = PhrasePattern::parse(ABSOLUTE_DATE_SPEC).unwrap();
        assert_eq!(date.slots(), vec!["day", "month", "year"]);
        let time = PhrasePattern::parse(MILITARY_TIME_SPEC).unwrap();
        assert_eq!(time.slots(), vec!["hour", "min_1_10", "min_10_60"]);
        assert!(PhrasePattern::parse(HEURES_TIME_SPEC).unwrap().is_slot_optional("minute"));
    }
}
