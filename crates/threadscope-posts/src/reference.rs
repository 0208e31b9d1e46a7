use crate::error::{PostStoreError, Result};

const STATUS_HOSTS: [&str; 4] = ["twitter.com", "x.com", "mobile.twitter.com", "www.twitter.com"];

/// Resolve user input to a post id.
///
/// Accepts a bare numeric id or a status URL such as
/// `https://twitter.com/someone/status/1603765939723534337?s=20`.
pub fn parse_post_reference(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PostStoreError::InvalidReference("empty input".to_string()));
    }

    let candidate = if STATUS_HOSTS.iter().any(|host| trimmed.contains(host)) {
        let without_query = trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or(trimmed)
            .trim_end_matches('/');
        without_query.rsplit('/').next().unwrap_or_default()
    } else {
        trimmed
    };

    if !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_digit()) {
        Ok(candidate.to_string())
    } else {
        Err(PostStoreError::InvalidReference(input.to_string()))
    }
}
