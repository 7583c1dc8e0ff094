//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed
//! entity structs. These helpers isolate integer-boolean decoding, nullable
//! text columns, and JSON-in-TEXT columns.

use tp_core::scope::AccessScope;

use crate::error::DatabaseError;

/// Decode an INTEGER column as a boolean (`0` is false, anything else true).
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_bool(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty
/// string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Parse a TEXT column as a JSON value, treating NULL/empty as `{}`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn get_json(row: &libsql::Row, idx: i32) -> Result<serde_json::Value, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if !s.is_empty() => serde_json::from_str(&s)
            .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}"))),
        _ => Ok(serde_json::Value::Object(serde_json::Map::new())),
    }
}

/// The two bound parameters backing every visibility clause:
/// an admin flag and the caller's organization id (`-1` when none, which
/// never matches a real `AUTOINCREMENT` id).
///
/// Use with a clause of the form
/// `(?a = 1 OR x.approved_version IS NOT NULL OR x.owner = ?b)`.
#[must_use]
pub const fn scope_params(scope: AccessScope) -> (i64, i64) {
    let admin = if scope.is_admin() { 1 } else { 0 };
    let org = match scope.org_id() {
        Some(id) => id,
        None => -1,
    };
    (admin, org)
}

/// Build an `IN (?, ?, ...)` placeholder list starting at parameter `start`.
#[must_use]
pub fn placeholders(count: usize, start: usize) -> String {
    let mut s = String::with_capacity(count * 4);
    for i in 0..count {
        if i > 0 {
            s.push_str(", ");
        }
        s.push('?');
        s.push_str(&(start + i).to_string());
    }
    s
}

/// Escape a raw search term for FTS5 MATCH by quoting each token.
///
/// FTS5 treats `-`, `.` and other punctuation as syntax; quoting the tokens
/// makes arbitrary user input safe to match.
#[must_use]
pub fn fts_quote(term: &str) -> String {
    term.split_whitespace()
        .map(|tok| format!("\"{}\"", tok.replace('"', "")))
        .collect::<Vec<_>>()
        .join(" ")
}
