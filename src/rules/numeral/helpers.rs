use crate::number::IntBuilder;
use crate::{NumeralData, Token, TokenKind};

/// Return the first regex capture group from `tokens[0]`.
pub fn first_match_lower(tokens: &[Token]) -> Option<String> {
    capture(tokens.first()?, 1)
}

/// Return capture group `idx` of a regex token (0 is the whole match).
pub fn capture(token: &Token, idx: usize) -> Option<String> {
    match &token.kind {
        // Groups are already lowercased by the parser.
        TokenKind::RegexMatch(groups) => groups.get(idx).cloned(),
        _ => None,
    }
}

pub fn make_numeral(value: i64, builder: IntBuilder) -> NumeralData {
    NumeralData { value, builder }
}

pub fn numeral(token: &Token) -> Option<NumeralData> {
    match &token.kind {
        TokenKind::Numeral(nd) => Some(*nd),
        _ => None,
    }
}
