use crate::calendar::DateExpr;
use crate::rules::numeral::predicates::number_between;
use crate::{Lexeme, Token, TokenKind};

pub fn is_day_of_month(t: &Token) -> bool {
    number_between::<1, 32>(t)
}

pub fn is_day_count(t: &Token) -> bool {
    number_between::<1, 100>(t)
}

pub fn is_hour(t: &Token) -> bool {
    number_between::<0, 25>(t)
}

pub fn is_minute(t: &Token) -> bool {
    number_between::<0, 60>(t)
}

pub fn is_minute_1_10(t: &Token) -> bool {
    number_between::<1, 10>(t)
}

pub fn is_minute_10_60(t: &Token) -> bool {
    number_between::<10, 60>(t)
}

pub fn is_year_number(t: &Token) -> bool {
    number_between::<2000, 2100>(t)
}

pub fn is_century(t: &Token) -> bool {
    number_between::<19, 21>(t)
}

pub fn is_century_year(t: &Token) -> bool {
    number_between::<1, 100>(t)
}

pub fn is_month(t: &Token) -> bool {
    matches!(t.kind, TokenKind::Lexeme(Lexeme::Month(_)))
}

pub fn is_year(t: &Token) -> bool {
    matches!(t.kind, TokenKind::Lexeme(Lexeme::Year(_)))
}

pub fn is_date_without_year(t: &Token) -> bool {
    matches!(t.kind, TokenKind::Date(DateExpr::Absolute { year: None, .. }))
}
