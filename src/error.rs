use thiserror::Error;

/// Failure of a call whose result the caller cannot do without.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error talking to GitHub: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    #[error("User '{login}' not found")]
    UserNotFound { login: String },

    #[error("failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of a call whose failure is tolerated.
///
/// `degraded` carries the reason when `value` is the fallback rather than
/// the fetched value.
#[derive(Debug, Clone, PartialEq)]
pub struct BestEffort<T> {
    pub value: T,
    pub degraded: Option<String>,
}

impl<T> BestEffort<T> {
    pub fn fetched(value: T) -> Self {
        Self {
            value,
            degraded: None,
        }
    }

    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            degraded: Some(reason.into()),
        }
    }

    /// Uses `fallback` when `result` failed, logging what was lost.
    pub fn or_fallback(result: Result<T, FetchError>, fallback: T, what: &str) -> Self {
        match result {
            Ok(value) => Self::fetched(value),
            Err(e) => {
                tracing::warn!("{what} failed, using fallback: {e}");
                Self::fallback(fallback, e.to_string())
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_error_display_includes_message() {
        let e = FetchError::GraphQl {
            message: "Bad query".to_string(),
        };
        assert_eq!(e.to_string(), "GraphQL error: Bad query");
    }

    #[test]
    fn or_fallback_keeps_fetched_value() {
        let r = BestEffort::or_fallback(Ok(7u64), 3, "count");
        assert_eq!(r.value, 7);
        assert!(!r.is_degraded());
    }

    #[test]
    fn or_fallback_records_reason() {
        let err = FetchError::Status {
            status: 502,
            url: "https://api.github.com/search/issues".to_string(),
        };
        let r = BestEffort::or_fallback(Err(err), 3u64, "issue search");
        assert_eq!(r.value, 3);
        assert!(r.degraded.unwrap().contains("502"));
    }
}
