//! Date and time resolution.
//!
//! Every function here takes "today" explicitly; nothing reads the clock.
//!
//! Weekday arithmetic uses Monday = 0 … Sunday = 6. With `target` the named
//! weekday and `now` today's weekday:
//!
//! ```text
//! last occurrence   target < now ? target - now     : target - now - 7
//! next occurrence   target < now ? 7 + target - now : target - now
//! last week         target - now - 7
//! next week         target - now + 7
//! ```

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::error::{DicteeError, Result};

/// Category of a relative-date phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetKind {
    /// "hier", "aujourd'hui", "demain": parameter is the day delta.
    AbsoluteDayDelta,
    /// "il y a <n> jours", "dans <n> jours": parameter is the signed count.
    NamedDayKeyword,
    /// "<day> dernier"
    WeekdayLastOccurrence,
    /// "(ce | prochain) <day>", "<day> prochain"
    WeekdayNextOccurrence,
    /// "<day> de la semaine dernière"
    WeekdayLastWeek,
    /// "<day> de la semaine prochaine"
    WeekdayNextWeek,
}

/// A date phrase whose calendar value depends on "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateExpr {
    Absolute { day: u32, month: u32, year: Option<i32> },
    Relative { kind: OffsetKind, parameter: i64 },
}

/// Exclusive upper bound of "<n>" in counted day phrases.
const DAY_COUNT_MAX: i64 = 100;

/// Day offset for a weekday phrase.
pub fn weekday_offset(kind: OffsetKind, target: u32, now: u32) -> Result<i64> {
    for (what, value) in [("weekday", target), ("current weekday", now)] {
        if value > 6 {
            return Err(DicteeError::out_of_range(what, value as i64, 0, 7));
        }
    }
    let (target, now) = (target as i64, now as i64);
    let offset = match kind {
        OffsetKind::WeekdayLastOccurrence => {
            if target < now {
                target - now
            } else {
                target - now - 7
            }
        }
        OffsetKind::WeekdayNextOccurrence => {
            if target < now {
                7 + target - now
            } else {
                target - now
            }
        }
        OffsetKind::WeekdayLastWeek => target - now - 7,
        OffsetKind::WeekdayNextWeek => target - now + 7,
        OffsetKind::AbsoluteDayDelta | OffsetKind::NamedDayKeyword => {
            return Err(DicteeError::UnknownPhrase(format!("{kind:?} is not a weekday phrase")));
        }
    };
    Ok(offset)
}

/// Resolve a relative phrase to a calendar date.
///
/// ```
/// use chrono::NaiveDate;
/// use dictee::calendar::{OffsetKind, resolve_relative};
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(); // a Friday
/// let monday = resolve_relative(OffsetKind::WeekdayLastOccurrence, 0, today).unwrap();
/// assert_eq!(monday, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
/// ```
pub fn resolve_relative(kind: OffsetKind, parameter: i64, today: NaiveDate) -> Result<NaiveDate> {
    let offset = match kind {
        OffsetKind::AbsoluteDayDelta => {
            if !(-1..=1).contains(&parameter) {
                return Err(DicteeError::out_of_range("day delta", parameter, -1, 2));
            }
            parameter
        }
        OffsetKind::NamedDayKeyword => {
            let n = parameter.abs();
            if !(1..DAY_COUNT_MAX).contains(&n) {
                return Err(DicteeError::out_of_range("day count", n, 1, DAY_COUNT_MAX));
            }
            parameter
        }
        _ => {
            if !(0..=6).contains(&parameter) {
                return Err(DicteeError::out_of_range("weekday", parameter, 0, 7));
            }
            weekday_offset(kind, parameter as u32, today.weekday().num_days_from_monday())?
        }
    };
    shift_days(today, offset)
}

fn shift_days(today: NaiveDate, days: i64) -> Result<NaiveDate> {
    today.checked_add_signed(Duration::days(days)).ok_or_else(|| DicteeError::out_of_range("day offset", days, -36_500, 36_500))
}

/// Year for a month spoken without one: the one that keeps the date within
/// six months of today.
pub fn infer_year(month: u32, today: NaiveDate) -> i32 {
    let delta = month as i32 - today.month() as i32;
    if delta > 6 {
        today.year() - 1
    } else if delta < -6 {
        today.year() + 1
    } else {
        today.year()
    }
}

/// Day + month (+ year). Impossible dates fail rather than clamp.
pub fn resolve_absolute(day: u32, month: u32, year: Option<i32>, today: NaiveDate) -> Result<NaiveDate> {
    let year = year.unwrap_or_else(|| infer_year(month, today));
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DicteeError::InvalidDate { year, month, day })
}

/// A spoken year: `2000 ≤ year < 2100` on its own, or "<century> <year>" with
/// century 20 (10 ≤ year < 100) or century 19 (1 ≤ year < 100).
pub fn resolve_year(century: Option<i64>, year: i64) -> Result<i32> {
    let (min, max) = match century {
        None => (2000, 2100),
        Some(20) => (10, 100),
        Some(19) => (1, 100),
        Some(c) => return Err(DicteeError::out_of_range("century", c, 19, 21)),
    };
    if !(min..max).contains(&year) {
        return Err(DicteeError::out_of_range("year", year, min, max));
    }
    let value = century.map_or(year, |c| c * 100 + year);
    i32::try_from(value).map_err(|_| DicteeError::out_of_range("year", value, min, max))
}

pub fn resolve_date(expr: &DateExpr, today: NaiveDate) -> Result<NaiveDate> {
    match *expr {
        DateExpr::Absolute { day, month, year } => resolve_absolute(day, month, year, today),
        DateExpr::Relative { kind, parameter } => resolve_relative(kind, parameter, today),
    }
}

/// Minute part of a military time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinutePhrase {
    /// "cenq": on the hour.
    OnTheHour,
    /// "zero <n>", 1 ≤ n < 10.
    LeadingZero(i64),
    /// 10 ≤ n < 60.
    Plain(i64),
}

/// "quinze zero cinq" → 15:05. Hour 24 is only valid on the hour and means
/// midnight.
pub fn resolve_military_time(hour: i64, minute: MinutePhrase) -> Result<NaiveTime> {
    if !(0..25).contains(&hour) {
        return Err(DicteeError::out_of_range("hour", hour, 0, 25));
    }
    let minute = match minute {
        MinutePhrase::OnTheHour => 0,
        MinutePhrase::LeadingZero(m) if (1..10).contains(&m) => m,
        MinutePhrase::LeadingZero(m) => return Err(DicteeError::out_of_range("minute", m, 1, 10)),
        MinutePhrase::Plain(m) if (10..60).contains(&m) => m,
        MinutePhrase::Plain(m) => return Err(DicteeError::out_of_range("minute", m, 10, 60)),
    };
    let hour = match (hour, minute) {
        (24, 0) => 0,
        (24, _) => return Err(DicteeError::out_of_range("hour", hour, 0, 24)),
        (h, _) => h,
    };
    NaiveTime::from_hms_opt(hour as u32, minute as u32, 0)
        .ok_or(DicteeError::out_of_range("minute", minute, 0, 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // 2024-03-15 is a Friday.
    fn today() -> NaiveDate {
        d(2024, 3, 15)
    }

    #[test]
    fn weekday_phrases_from_a_friday() {
        let t = today();
        assert_eq!(resolve_relative(OffsetKind::WeekdayLastOccurrence, 0, t), Ok(d(2024, 3, 11)));
        assert_eq!(resolve_relative(OffsetKind::WeekdayNextOccurrence, 0, t), Ok(d(2024, 3, 18)));
        assert_eq!(resolve_relative(OffsetKind::WeekdayNextOccurrence, 5, t), Ok(d(2024, 3, 16)));
        assert_eq!(resolve_relative(OffsetKind::WeekdayLastWeek, 2, t), Ok(d(2024, 3, 6)));
        assert_eq!(resolve_relative(OffsetKind::WeekdayNextWeek, 2, t), Ok(d(2024, 3, 20)));
    }

    #[test]
    fn same_weekday_edges() {
        let t = today();
        assert_eq!(resolve_relative(OffsetKind::WeekdayNextOccurrence, 4, t), Ok(t));
        assert_eq!(resolve_relative(OffsetKind::WeekdayLastOccurrence, 4, t), Ok(d(2024, 3, 8)));
    }

    #[test]
    fn day_keywords_and_counts() {
        let t = today();
        assert_eq!(resolve_relative(OffsetKind::AbsoluteDayDelta, -1, t), Ok(d(2024, 3, 14)));
        assert_eq!(resolve_relative(OffsetKind::AbsoluteDayDelta, 0, t), Ok(t));
        assert_eq!(resolve_relative(OffsetKind::NamedDayKeyword, 5, t), Ok(d(2024, 3, 20)));
        assert_eq!(resolve_relative(OffsetKind::NamedDayKeyword, -3, t), Ok(d(2024, 3, 12)));
        assert!(resolve_relative(OffsetKind::NamedDayKeyword, 100, t).is_err());
        assert!(resolve_relative(OffsetKind::NamedDayKeyword, 0, t).is_err());
        assert!(resolve_relative(OffsetKind::AbsoluteDayDelta, 2, t).is_err());
    }

    #[test]
    fn weekday_parameter_out_of_range() {
        assert_eq!(
            resolve_relative(OffsetKind::WeekdayNextWeek, 7, today()),
            Err(DicteeError::OutOfRange { what: "weekday", value: 7, min: 0, max: 7 })
        );
        assert!(weekday_offset(OffsetKind::AbsoluteDayDelta, 1, 1).is_err());
    }

    #[test]
    fn absolute_dates() {
        let t = today();
        assert_eq!(resolve_absolute(15, 9, None, t), Ok(d(2024, 9, 15)));
        assert_eq!(resolve_absolute(1, 10, None, t), Ok(d(2023, 10, 1)));
        assert_eq!(resolve_absolute(1, 12, Some(1999), t), Ok(d(1999, 12, 1)));
        assert_eq!(
            resolve_absolute(31, 4, None, t),
            Err(DicteeError::InvalidDate { year: 2024, month: 4, day: 31 })
        );
        assert!(resolve_absolute(29, 2, Some(2023), t).is_err());
    }

    #[test]
    fn year_forms() {
        assert_eq!(resolve_year(None, 2024), Ok(2024));
        assert_eq!(resolve_year(Some(20), 24), Ok(2024));
        assert_eq!(resolve_year(Some(19), 84), Ok(1984));
        assert_eq!(resolve_year(Some(19), 5), Ok(1905));
        assert!(resolve_year(Some(20), 5).is_err());
        assert!(resolve_year(Some(18), 50).is_err());
        assert!(resolve_year(None, 1999).is_err());
    }

    #[test]
    fn military_times() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(resolve_military_time(15, MinutePhrase::LeadingZero(5)), Ok(t(15, 5)));
        assert_eq!(resolve_military_time(9, MinutePhrase::Plain(45)), Ok(t(9, 45)));
        assert_eq!(resolve_military_time(8, MinutePhrase::OnTheHour), Ok(t(8, 0)));
        assert_eq!(resolve_military_time(24, MinutePhrase::OnTheHour), Ok(t(0, 0)));
        assert!(resolve_military_time(24, MinutePhrase::Plain(30)).is_err());
        assert!(resolve_military_time(25, MinutePhrase::OnTheHour).is_err());
        assert!(resolve_military_time(10, MinutePhrase::LeadingZero(12)).is_err());
        assert!(resolve_military_time(10, MinutePhrase::Plain(7)).is_err());
    }

    proptest! {
        #[test]
        fn inferred_year_stays_within_six_months(
            ordinal in 1u32..=365,
            month in 1u32..=12,
        ) {
            let today = NaiveDate::from_yo_opt(2023, ordinal).unwrap();
            let year = infer_year(month, today);
            let months = (year - today.year()) * 12 + month as i32 - today.month() as i32;
            prop_assert!((-6..=6).contains(&months));
            if (month as i32 - today.month() as i32).abs() == 6 {
                prop_assert_eq!(year, today.year());
            }
        }

        #[test]
        fn explicit_year_round_trips(days in 0i64..40_000) {
            let date = d(1950, 1, 1) + Duration::days(days);
            let text = date.format("%Y-%m-%d").to_string();
            let parsed = NaiveDate::parse_from_str(&text, "%Y-%m-%d").unwrap();
            let again = resolve_absolute(parsed.day(), parsed.month(), Some(parsed.year()), today()).unwrap();
            prop_assert_eq!(again, date);
        }

        #[test]
        fn same_weekday_rules(days in 0i64..3_000) {
            let t = d(2020, 1, 1) + Duration::days(days);
            let now = t.weekday().num_days_from_monday() as i64;
            prop_assert_eq!(resolve_relative(OffsetKind::WeekdayNextOccurrence, now, t).unwrap(), t);
            prop_assert_eq!(resolve_relative(OffsetKind::WeekdayLastOccurrence, now, t).unwrap(), t - Duration::days(7));
        }
    }
}
