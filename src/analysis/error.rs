use std::fmt;

/// Why an upload to the analysis service failed.
#[derive(Debug)]
pub enum AnalysisError {
    /// 401/403: missing or rejected API key
    Unauthorized,
    /// 429
    RateLimited,
    /// Any other non-success HTTP status
    Service(u16),
    /// Connection, TLS or timeout failure
    Network(String),
    /// The service answered 2xx but the body wasn't JSON
    InvalidResponse(String),
}

impl AnalysisError {
    /// Worth retrying: rate limits, server errors and network hiccups.
    pub fn is_transient(&self) -> bool {
        match self {
            AnalysisError::RateLimited | AnalysisError::Network(_) => true,
            AnalysisError::Service(status) => *status >= 500,
            AnalysisError::Unauthorized | AnalysisError::InvalidResponse(_) => false,
        }
    }

    /// Map an HTTP status to an error, `None` for success codes.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 | 403 => Some(AnalysisError::Unauthorized),
            429 => Some(AnalysisError::RateLimited),
            other => Some(AnalysisError::Service(other)),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Unauthorized => write!(
                f,
                "Analysis service rejected the request. Check TALKSCORE_API_KEY."
            ),
            AnalysisError::RateLimited => write!(
                f,
                "Analysis service rate limit exceeded. Wait a few minutes and try again."
            ),
            AnalysisError::Service(status) => {
                write!(f, "Analysis service returned HTTP {}", status)
            }
            AnalysisError::Network(msg) => write!(f, "Network error: {}", msg),
            AnalysisError::InvalidResponse(msg) => {
                write!(f, "Analysis service returned invalid JSON: {}", msg)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
