//! Error types for upstream provider calls.

use thiserror::Error;

/// Failure of a single upstream request.
///
/// Every variant is recoverable: callers log the cause and degrade the
/// affected part of the response instead of propagating a panic or
/// crashing the process.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure, including connect errors, timeouts, and
    /// malformed response bodies.
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status (city not found is a 404
    /// from OpenWeatherMap).
    #[error("upstream returned status {status}")]
    Status { status: reqwest::StatusCode },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_code() {
        let err = ProviderError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(err.to_string().contains("404"));
    }
}
