//! # sqldelta-mysql
//!
//! MySQL comparison quirks for the sqldelta schema diff engine.
//!
//! MySQL's `information_schema` reports column defaults spelled differently
//! from how they were declared: string literals come back wrapped in single
//! quotes, `CURRENT_TIMESTAMP` comes back in whatever casing (and, on
//! MariaDB, with a trailing `()`) the server prefers, and an absent default
//! is sometimes reported as the literal `NULL`. Comparing declared schemas
//! against introspected ones without folding these spellings produces noisy
//! false diffs.

use sqldelta_core::{Column, ComparatorPlatform, Value};

/// MySQL comparison behavior.
///
/// Character set and collation participate in column diffing; other platform
/// options are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlPlatform;

impl ComparatorPlatform for MySqlPlatform {
    fn normalized_default(&self, column: &Column) -> Option<Value> {
        match column.default() {
            Some(Value::Expression(raw)) => normalize_expression(raw),
            other => other.cloned(),
        }
    }

    fn relevant_column_options(&self) -> &[&str] {
        &["charset", "collation"]
    }
}

fn normalize_expression(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("null") {
        return None;
    }

    if is_current_timestamp(trimmed) {
        return Some(Value::Expression("CURRENT_TIMESTAMP".to_owned()));
    }

    if let Some(literal) = unquote_single(trimmed) {
        return Some(Value::Text(literal));
    }

    Some(Value::Expression(raw.to_owned()))
}

fn is_current_timestamp(expression: &str) -> bool {
    let base = expression
        .strip_suffix("()")
        .unwrap_or(expression)
        .trim_end();
    base.eq_ignore_ascii_case("current_timestamp") || base.eq_ignore_ascii_case("now")
}

/// Strips one level of surrounding single quotes and unescapes doubled
/// quotes, returning `None` when the input is not a quoted literal.
fn unquote_single(expression: &str) -> Option<String> {
    let inner = expression
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))?;
    Some(inner.replace("''", "'"))
}
