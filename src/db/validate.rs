// Read-only statement validation for the raw query escape hatch
//
// Keyword-based allow/deny filter, not a SQL parser. Best effort only:
// it rejects the obvious mutating verbs but is not a security boundary.
// The store-side RPC runs in a read-only role regardless.

use thiserror::Error;

/// Verbs that indicate a mutating statement.
const FORBIDDEN_KEYWORDS: [&str; 9] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "CREATE", "TRUNCATE", "GRANT", "REVOKE",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("only SELECT statements are allowed")]
    NotSelect,

    #[error("statement contains forbidden keyword '{0}'")]
    ForbiddenKeyword(&'static str),
}

/// Check that a raw statement is a plain read before it reaches the store.
///
/// The statement must start with SELECT (case-insensitive) and must not
/// contain any mutating verb as a substring anywhere, including after a
/// statement separator.
pub fn validate_read_only(sql: &str) -> Result<(), ValidationError> {
    let upper = sql.trim().to_uppercase();

    if !upper.starts_with("SELECT") {
        return Err(ValidationError::NotSelect);
    }

    for keyword in FORBIDDEN_KEYWORDS {
        if upper.contains(keyword) {
            return Err(ValidationError::ForbiddenKeyword(keyword));
        }
    }

    Ok(())
}
