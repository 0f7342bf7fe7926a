// ── Core error types ──
//
// Errors from nios-core. Transport-level failures from nios-api are
// translated by the `From<nios_api::Error>` impl; the resource layer only
// ever branches on `NotFound`, everything else is surfaced verbatim.

use thiserror::Error;

use crate::diagnostics::Diagnostics;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to appliance at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Object not found: {identifier}")]
    NotFound { identifier: String },

    #[error("No reference recorded in state for {object_type}")]
    MissingReference { object_type: &'static str },

    #[error("{count} {object_type} objects carry internal ID {internal_id}")]
    AmbiguousInternalId {
        object_type: &'static str,
        internal_id: String,
        count: usize,
    },

    #[error("Unknown resource type: {type_name}")]
    UnknownResourceType { type_name: String },

    /// Plan validation or schema-conformance failures, collected before
    /// (or instead of) a remote call.
    #[error("{0}")]
    Invalid(Diagnostics),

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The appliance error code (e.g. "Client.Ibap.Data.Conflict").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation cancelled")]
    Cancelled,

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        let mut diags = Diagnostics::new();
        diags.error("Malformed resource data", err.to_string());
        Self::Invalid(diags)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nios_api::Error> for CoreError {
    fn from(err: nios_api::Error) -> Self {
        match err {
            nios_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            nios_api::Error::NotFound { reference, .. } => CoreError::NotFound {
                identifier: reference,
            },
            nios_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        identifier: e.url().map(|u| u.path().to_owned()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            nios_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            nios_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            nios_api::Error::Wapi {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            nios_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wapi_not_found_maps_to_not_found() {
        let err: CoreError = nios_api::Error::NotFound {
            reference: "bfdtemplate/abc:t1".into(),
            message: "gone".into(),
        }
        .into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Object not found: bfdtemplate/abc:t1");
    }

    #[test]
    fn wapi_errors_keep_message_verbatim() {
        let err: CoreError = nios_api::Error::Wapi {
            message: "Duplicate object 't1'".into(),
            code: Some("Client.Ibap.Data.Conflict".into()),
            status: 400,
        }
        .into();
        match err {
            CoreError::Api {
                message,
                code,
                status,
            } => {
                assert_eq!(message, "Duplicate object 't1'");
                assert_eq!(code.as_deref(), Some("Client.Ibap.Data.Conflict"));
                assert_eq!(status, Some(400));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
