use crate::number::{AND_UNDER_100, HUNDREDS, HUNDREDS_BIG, IntBuilder, MILLIONS, THOUSANDS};
use crate::{Token, TokenKind};

fn built_by(t: &Token, accept: impl Fn(IntBuilder) -> bool) -> bool {
    matches!(&t.kind, TokenKind::Numeral(nd) if accept(nd.builder))
}

pub fn is_units(t: &Token) -> bool {
    built_by(t, |b| b == IntBuilder::Units)
}

pub fn is_teen(t: &Token) -> bool {
    built_by(t, |b| b == IntBuilder::Teens)
}

/// Returns true when the token is a numeral in `[MIN, MAX)`, whatever built it.
pub fn number_between<const MIN: i64, const MAX: i64>(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Numeral(nd) if nd.value >= MIN && nd.value < MAX)
}

pub fn hundreds_multiplier(t: &Token) -> bool {
    built_by(t, |b| HUNDREDS.accepts_multiplier(b))
}

pub fn hundreds_remainder(t: &Token) -> bool {
    built_by(t, |b| AND_UNDER_100.accepts(b))
}

pub fn big_hundreds_multiplier(t: &Token) -> bool {
    built_by(t, |b| HUNDREDS_BIG.accepts_multiplier(b))
}

pub fn big_hundreds_remainder(t: &Token) -> bool {
    built_by(t, |b| AND_UNDER_100.accepts(b))
}

pub fn thousands_multiplier(t: &Token) -> bool {
    built_by(t, |b| THOUSANDS.accepts_multiplier(b))
}

pub fn thousands_remainder(t: &Token) -> bool {
    built_by(t, |b| THOUSANDS.accepts_remainder(b))
}

pub fn millions_multiplier(t: &Token) -> bool {
    built_by(t, |b| MILLIONS.accepts_multiplier(b))
}

pub fn millions_remainder(t: &Token) -> bool {
    built_by(t, |b| MILLIONS.accepts_remainder(b))
}
