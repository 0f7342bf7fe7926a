use thiserror::Error;

/// Top-level error type for the `nios-api` crate.
///
/// Covers every failure mode of the WAPI surface: authentication,
/// transport, appliance-reported errors, and response decoding.
/// `nios-core` maps these into provider diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Basic auth rejected by the appliance (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── WAPI ────────────────────────────────────────────────────────
    /// The referenced object does not exist (HTTP 404).
    #[error("Object not found: {reference}: {message}")]
    NotFound { reference: String, message: String },

    /// Any other non-success response, parsed from the
    /// `{ "Error": ..., "code": ..., "text": ... }` body when present.
    #[error("WAPI error (HTTP {status}): {message}")]
    Wapi {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    ///
    /// This is the only error the resource layer recovers from.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Wapi { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status code, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Wapi { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Extract the appliance error code (e.g. `Client.Ibap.Data.NotFound`).
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Wapi { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
