//! Failure taxonomy for a single fetch

use std::time::Duration;
use thiserror::Error;

use crate::helpers::FormatError;

/// Why a fetch ended without a record
///
/// A missing post is not an error; it is reported as
/// [`FetchState::NotFound`](super::FetchState::NotFound).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("server responded with HTTP {status}")]
    Http { status: u16 },

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("malformed date in response: {0}")]
    Date(#[from] FormatError),

    #[error("request task ended without a result")]
    Aborted,

    #[error("fetch was cancelled by its owner")]
    Cancelled,
}

/// Coarse grouping of [`FetchError`] for callers that only branch on kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request never produced a response
    Network,
    /// The server answered with a non-2xx status other than 404
    Http,
    /// The response arrived but could not be turned into a record
    Decode,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::Aborted | Self::Cancelled => {
                FetchErrorKind::Network
            }
            Self::Http { .. } => FetchErrorKind::Http,
            Self::Decode(_) | Self::Date(_) => FetchErrorKind::Decode,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}
