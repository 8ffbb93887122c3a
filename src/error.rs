//! Error types shared by every operation of the crate.
//!
//! Validation and limit errors are returned before any request is sent.
//! Transport and mapping errors come from the call that triggered them and are never retried.

use thiserror::Error;

/// The hard ceiling the remote service puts on the page size of a post search.
pub const POSTS_HARD_LIMIT: u32 = 1000;

/// A specialized [`Result`](std::result::Result) for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type of every public operation.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or contradictory caller-supplied parameters.
    #[error("invalid arguments: {0}")]
    Validation(String),
    /// The requested page size exceeds [`POSTS_HARD_LIMIT`].
    #[error("Gelbooru can only return {POSTS_HARD_LIMIT} items in a single request, {limit} requested")]
    LimitExceeded {
        /// The rejected page size.
        limit: u32,
    },
    /// The request could not be completed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The response did not match any known schema.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// Writing a downloaded file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[inline]
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// Failures of the HTTP collaborator.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request or the response body timed out.
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),
    /// Connection, TLS, redirect or body decoding failure.
    #[error(transparent)]
    Request(reqwest::Error),
}

impl TransportError {
    /// Returns `true` if the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(err);
        }
        match err.status() {
            Some(status) if err.is_status() => Self::Status(status),
            _ => Self::Request(err),
        }
    }
}

/// The response could not be normalized into records.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum MappingError {
    /// The body was not valid JSON, or a record did not fit its schema.
    #[error("malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),
    /// The body was not valid XML.
    #[error("malformed XML response: {0}")]
    Xml(#[from] roxmltree::Error),
    /// A required field is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// A field is present but its value cannot be interpreted.
    #[error("invalid value for field `{field}`: {value:?}")]
    InvalidField {
        /// The field name.
        field: &'static str,
        /// The offending value, as received.
        value: String,
    },
    /// The document is not shaped like any known response.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}
