use thiserror::Error;

/// Top-level error type for the `apisix-admin` crate.
///
/// Covers every failure mode: credential handling, transport, the Admin
/// API's status-code contract, envelope decoding, and the pre-flight
/// validation errors that fire before any network call.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// API key cannot be used as an HTTP header value.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS material or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Admin API ───────────────────────────────────────────────────
    /// HTTP status >= 400. The body is attached verbatim; the Admin API's
    /// error schema is not interpreted here.
    #[error("Admin API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// DELETE returned a non-error status but the payload did not confirm
    /// the deletion (`deleted` missing or not `"1"`).
    #[error("delete not confirmed by API: {body}")]
    DeleteFailed { body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },

    // ── Pre-flight validation ───────────────────────────────────────
    /// Unknown secret manager tag; no request was made.
    #[error("unsupported secret manager: {0}")]
    UnsupportedSecretManager(String),

    /// Caller-supplied plugin metadata contains a reserved key; no request
    /// was made.
    #[error("reserved key in plugin metadata fields: {0}")]
    ReservedMetadataKey(String),
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient transport error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// The HTTP status the Admin API answered with, if any.
    pub fn api_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
