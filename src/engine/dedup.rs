//! Deduplication keys for saturation.
//!
//! Saturation repeatedly applies rules and adds the produced `Node`s to a
//! stash. Without a stable notion of "already seen", rules re-deriving the
//! same result would loop forever.
//!
//! `NodeKey` combines the span, the dimension, the producing rule name and a
//! dimension-specific `kind_key`. Keeping `rule_name` in the key lets two
//! rules that derive the same value over the same span both survive until
//! resolution; same-value duplicates are dropped there instead.

use crate::calendar::DateExpr;
use crate::{Dimension, Lexeme, Node, TokenKind};
use chrono::NaiveTime;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) dim: Dimension,
    pub(crate) rule_name: &'static str,
    pub(crate) kind_key: NodeKindKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum NodeKindKey {
    Numeral(i64),
    Digits(String),
    Date(DateExpr),
    Time(NaiveTime),
    // Text plus item count: "deux points" is one item, "deux" + "point" two.
    Characters(String, usize),
    Lexeme(Lexeme),
    // Group 0 identifies a regex match.
    RegexMatch(String),
}

impl NodeKey {
    pub(crate) fn from_node(node: &Node) -> Self {
        let kind_key = match &node.token.kind {
            TokenKind::Numeral(d) => NodeKindKey::Numeral(d.value),
            TokenKind::Digits(d) => NodeKindKey::Digits(d.0.clone()),
            TokenKind::Date(expr) => NodeKindKey::Date(*expr),
            TokenKind::Time(t) => NodeKindKey::Time(t.0),
            TokenKind::Characters(c) => NodeKindKey::Characters(c.text.clone(), c.count),
            TokenKind::Lexeme(l) => NodeKindKey::Lexeme(*l),
            TokenKind::RegexMatch(groups) => {
                NodeKindKey::RegexMatch(groups.first().map(|s| s.as_str()).unwrap_or("").to_string())
            }
        };

        NodeKey { start: node.range.start, end: node.range.end, dim: node.token.dim, rule_name: node.rule_name, kind_key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CharData, Range, Token};

    fn node(kind: TokenKind, dim: Dimension) -> Node {
        Node { range: Range { start: 0, end: 4 }, token: Token { dim, kind }, rule_name: "r", evidence: Vec::new() }
    }

    #[test]
    fn series_with_different_counts_are_distinct() {
        let one = CharData { text: ":".into(), count: 1, letter: false };
        let two = CharData { text: ":".into(), count: 2, letter: false };
        let a = NodeKey::from_node(&node(TokenKind::Characters(one.clone()), Dimension::Characters));
        let b = NodeKey::from_node(&node(TokenKind::Characters(two), Dimension::Characters));
        let c = NodeKey::from_node(&node(TokenKind::Characters(one), Dimension::Characters));
        assert_ne!(a, b);
        assert_eq!(a, c);
    }
}
