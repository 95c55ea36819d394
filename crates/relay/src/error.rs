//! Error taxonomy for the relay boundary.

use thiserror::Error;

/// Failures a relay operation can produce.
///
/// Element processors recover from `FetchFailure` and `EncodingFailure` by
/// leaving the element unchanged; only the primary document load treats them
/// as fatal. `InvalidInput` is always fatal to the triggering operation.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The input could not be parsed as an absolute URL.
    #[error("invalid URL: {0}")]
    InvalidInput(String),

    /// Network-level failure or a response with no usable body.
    #[error("fetch failed for {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    /// The binary-to-text conversion for a data URI failed.
    #[error("encoding failed for {url}: {reason}")]
    EncodingFailure { url: String, reason: String },
}

impl RelayError {
    pub(crate) fn fetch(url: &url::Url, reason: impl ToString) -> Self {
        Self::FetchFailure {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encoding(url: &url::Url, reason: impl ToString) -> Self {
        Self::EncodingFailure {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
