//! # sqldelta-sqlite
//!
//! SQLite comparison quirks for the sqldelta schema diff engine.
//!
//! SQLite reports column defaults through `pragma table_info` exactly as
//! they appeared in the `CREATE TABLE` source: string literals keep their
//! quotes and integer literals come back as expression text. Folding those
//! spellings into plain values keeps declared-versus-introspected
//! comparisons quiet. SQLite has no per-column platform options that matter
//! for diffing.

use sqldelta_core::{Column, ComparatorPlatform, Value};

/// SQLite comparison behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlitePlatform;

impl ComparatorPlatform for SqlitePlatform {
    fn normalized_default(&self, column: &Column) -> Option<Value> {
        match column.default() {
            Some(Value::Expression(raw)) => normalize_expression(raw),
            other => other.cloned(),
        }
    }
}

fn normalize_expression(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("null") {
        return None;
    }

    if let Some(literal) = unquote(trimmed, '\'') {
        return Some(Value::Text(literal));
    }

    // SQLite tolerates double-quoted string literals in legacy schemas.
    if let Some(literal) = unquote(trimmed, '"') {
        return Some(Value::Text(literal));
    }

    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(Value::Integer(integer));
    }

    Some(Value::Expression(raw.to_owned()))
}

/// Strips one level of surrounding quotes and unescapes doubled quote
/// characters, returning `None` when the input is not quoted with `quote`.
fn unquote(expression: &str, quote: char) -> Option<String> {
    let inner = expression
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))?;
    let doubled: String = [quote, quote].iter().collect();
    Some(inner.replace(&doubled, &quote.to_string()))
}
