use thiserror::Error;

use crate::dates::DateParseError;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Query parameters must be a string-keyed JSON object.
    #[error("query parameters must be a JSON object, got {0}")]
    InvalidParams(&'static str),

    #[error("invalid request url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API returned status {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected state {state:?} in {endpoint} record")]
    UnexpectedState { endpoint: String, state: String },

    #[error("{endpoint} record is missing string field {field:?}")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },

    #[error(transparent)]
    Date(#[from] DateParseError),

    #[error("cannot extract owner and repository from url {0:?}")]
    UrlParse(String),
}
