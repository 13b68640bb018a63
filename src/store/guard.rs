//! Defense-in-depth read-only guard.
//!
//! Every statement is validated before execution, independent of the
//! database user's actual grants: no write/DDL keyword anywhere in the
//! text, and the first keyword must be from the read allow-list. Keyword
//! scanning is not a security boundary by itself; deployments should
//! pair it with genuinely read-only credentials.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE", "REPLACE", "MERGE",
    "CALL", "EXEC", "EXECUTE", "GRANT", "REVOKE", "COMMIT", "ROLLBACK", "SAVEPOINT",
];

const ALLOWED_FIRST_KEYWORDS: &[&str] = &["SELECT", "SHOW", "DESCRIBE", "DESC", "EXPLAIN", "USE"];

// Word boundaries keep identifiers like "DROPDOWN" from false-positives.
static FORBIDDEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", FORBIDDEN_KEYWORDS.join("|"))).unwrap()
});

static LINE_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)--.*$").unwrap());
static BLOCK_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// Validate that `sql` is a read-only statement.
///
/// Violations are hard errors: they indicate a bug in query construction,
/// not a data condition.
pub fn validate_read_only(sql: &str) -> Result<()> {
    let cleaned = clean_sql(sql);

    if let Some(found) = FORBIDDEN_RE.find(&cleaned) {
        return Err(Error::ReadOnlyViolation(format!(
            "forbidden keyword {} in statement",
            found.as_str().to_uppercase()
        )));
    }

    match first_keyword(&cleaned) {
        Some(keyword) if ALLOWED_FIRST_KEYWORDS.contains(&keyword.as_str()) => Ok(()),
        Some(keyword) => Err(Error::ReadOnlyViolation(format!(
            "statement must start with a read keyword, got {keyword}"
        ))),
        None => Err(Error::ReadOnlyViolation("empty statement".to_string())),
    }
}

/// Strip comments and collapse whitespace so keywords cannot hide in them.
fn clean_sql(sql: &str) -> String {
    let without_line = LINE_COMMENT_RE.replace_all(sql, "");
    let without_block = BLOCK_COMMENT_RE.replace_all(&without_line, " ");
    without_block.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_keyword(sql: &str) -> Option<String> {
    sql.split_whitespace().next().map(|w| w.to_uppercase())
}
