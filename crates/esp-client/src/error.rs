//! Error types for ESP API calls

/// Errors from a single remote call.
///
/// `Remote` means the service answered and declined; the other variants mean
/// no usable response was obtained.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ESP rejected request ({status}): {body}")]
    Remote { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid endpoint URL: {0}")]
    Url(String),
}

impl Error {
    /// True when the service produced a structured rejection.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote { .. })
    }
}

/// Result alias for ESP client operations.
pub type Result<T> = std::result::Result<T, Error>;
