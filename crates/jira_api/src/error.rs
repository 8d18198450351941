//! Error model used by Jira API client operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JiraError>;

/// Transport-level failures while talking to Jira. HTTP error statuses are not
/// represented here: any response the server sends back is handed to the
/// caller as-is.
#[derive(Debug, Error)]
pub enum JiraError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for JiraError {
    /// Converts reqwest errors into semantic JiraError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            JiraError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() {
            JiraError::Network(err.to_string())
        } else if err.is_decode() || err.is_body() {
            JiraError::Serialization(err.to_string())
        } else {
            JiraError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for JiraError {
    fn from(err: serde_json::Error) -> Self {
        JiraError::Serialization(err.to_string())
    }
}
