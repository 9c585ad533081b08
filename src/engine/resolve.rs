//! Token resolution.
//!
//! Saturation produces `Node`s; resolution turns one into a user-facing
//! `ResolvedToken` with a canonical value string:
//!
//! ```text
//! Token ──┬─ Numeral    -> integer ("2015")
//!         ├─ Digits     -> digit string ("0612"), two digits or more
//!         ├─ Date       -> YYYY-MM-DD against Context::today
//!         ├─ Time       -> HH:MM
//!         ├─ Characters -> the spelled text
//!         └─ Lexeme / RegexMatch -> None (building blocks only)
//! ```
//!
//! `Ok(None)` means the node is not surfaced (filtered out by `Options`, or
//! an internal building block). A resolver error (an impossible date, a
//! weekday out of range) is returned so the parser can drop the candidate
//! and every smaller match inside it.

use crate::api::dimension_name;
use crate::calendar::resolve_date;
use crate::error::Result;
use crate::{Context, Dimension, Node, Options, ResolvedToken, Token, TokenKind};
use log::debug;

pub(crate) fn resolve_node(context: &Context, options: &Options, node: Node) -> Result<Option<ResolvedToken>> {
    if !options.wants(node.token.dim) {
        return Ok(None);
    }
    let Some((value, latent)) = resolve(context, &node)? else {
        return Ok(None);
    };
    debug!(
        "[resolve] dim={} range={}..{} value=\"{}\" latent={}",
        dimension_name(node.token.dim),
        node.range.start,
        node.range.end,
        value,
        latent
    );
    Ok(Some(ResolvedToken { node, value, latent }))
}

fn resolve(context: &Context, node: &Node) -> Result<Option<(String, bool)>> {
    let token: &Token = &node.token;
    let value = match (&token.dim, &token.kind) {
        (Dimension::Numeral, TokenKind::Numeral(data)) => data.value.to_string(),
        (Dimension::Digits, TokenKind::Digits(digits)) if digits.0.len() >= 2 => digits.0.clone(),
        (Dimension::Date, TokenKind::Date(expr)) => {
            let date = resolve_date(expr, context.today).inspect_err(|err| {
                debug!("[resolve] rule=\"{}\" dropped: {err}", node.rule_name);
            })?;
            date.format("%Y-%m-%d").to_string()
        }
        (Dimension::Time, TokenKind::Time(t)) => t.0.format("%H:%M").to_string(),
        (Dimension::Characters, TokenKind::Characters(c)) => c.text.clone(),
        _ => return Ok(None),
    };
    Ok(Some((value, false)))
}
