//! Author id validation.
//!
//! Author ids name files on the node, so they must be a single plain path
//! component:
//! - Must be non-empty
//! - Must not contain `/`, `\` or NUL
//! - Must not be `.` or `..`

use crate::error::{FeedError, FeedResult};

const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Validate an author id, returning `Ok(())` if it can name a feed.
///
/// ```
/// use cipherlot_feed::validate_author;
///
/// assert!(validate_author("bob").is_ok());
/// assert!(validate_author("").is_err());
/// assert!(validate_author("../etc").is_err());
/// ```
pub fn validate_author(author: &str) -> FeedResult<()> {
    let reject = |reason: String| FeedError::InvalidAuthor {
        author: author.to_string(),
        reason,
    };

    if author.is_empty() {
        return Err(reject("author must not be empty".into()));
    }
    if let Some(ch) = author.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(reject(format!("contains forbidden character: {ch:?}")));
    }
    if author == "." || author == ".." {
        return Err(reject("must not be '.' or '..'".into()));
    }
    Ok(())
}
