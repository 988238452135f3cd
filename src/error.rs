//! Error types for job market API operations.

use thiserror::Error;

/// Errors that can occur while talking to the job and country APIs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The search parameters were rejected before any request was made.
    #[error("Invalid search parameters: {0}")]
    InvalidParameters(String),

    /// Too many requests for this endpoint in the current minute.
    #[error("Rate limit exceeded. Please wait a moment before searching again.")]
    RateLimited {
        /// Endpoint whose budget was exhausted.
        endpoint: String,
    },

    /// The server answered with a non-success status.
    #[error("Failed to fetch jobs: API Error: {status} - {reason}")]
    UnexpectedStatus {
        /// HTTP status code received.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("Failed to fetch jobs: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected shape.
    #[error("Failed to fetch jobs: failed to parse response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message() {
        let err = ApiError::RateLimited {
            endpoint: "jobs".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded. Please wait a moment before searching again."
        );
    }

    #[test]
    fn test_unexpected_status_message() {
        let err = ApiError::UnexpectedStatus {
            status: 401,
            reason: "Unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch jobs: API Error: 401 - Unauthorized"
        );
    }
}
