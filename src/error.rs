//! Error types for catalog-walker
//!
//! Upstream data failures (bad statuses, malformed bodies, missing response
//! shapes) are never surfaced here — the fetch layer absorbs them into "no
//! data for this branch" after its retry budget. The variants below cover the
//! conditions that legitimately abort a run before or during traversal.

use thiserror::Error;

/// Result type alias for catalog-walker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for catalog-walker
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "endpoints.tree_url")
        key: Option<String>,
    },

    /// A fetch was attempted while the transport session was not connected.
    ///
    /// This signals a lifecycle-ordering bug in the caller and is the only
    /// fatal condition in the core: it propagates instead of degrading into
    /// an empty contribution.
    #[error("transport not connected: connect() must be called before fetching")]
    TransportNotConnected,

    /// HTTP client construction failed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
