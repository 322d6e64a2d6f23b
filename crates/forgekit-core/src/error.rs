// ── Core error types ──
//
// Diagnostics surfaced by the reconciliation layer. The
// `From<forgekit_api::Error>` impl folds transport failures into these
// variants while keeping the HTTP status and raw body reachable, so callers
// can still tell a 404 from a 500 without parsing messages.

use thiserror::Error;

use forgekit_api::InvalidId;

use crate::wait::WaitPhase;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to Forge at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to Forge timed out")]
    RequestTimeout,

    // ── Remote API errors ────────────────────────────────────────────
    /// Non-2xx response. `message` keeps the `status: N, body: ...` shape.
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },

    /// A DELETE answered with a body; the body is the diagnostic.
    #[error("{body}")]
    Rejected { body: String },

    /// A 2xx response whose body could not be decoded.
    #[error("Malformed response from Forge: {message}")]
    Decode { message: String, body: String },

    // ── Reconciliation errors ────────────────────────────────────────
    /// A readiness poll hit its attempt ceiling.
    #[error("{}", phase.timeout_message())]
    WaitTimeout { phase: WaitPhase, attempts: u32 },

    /// The entity vanished between creation and the follow-up read.
    #[error("{kind} {id} disappeared right after it was created")]
    Vanished { kind: String, id: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid attribute '{field}': {reason}")]
    Attribute { field: String, reason: String },

    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn attribute(field: &str, reason: impl Into<String>) -> Self {
        Self::Attribute {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }

    /// HTTP status of the failed request, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<forgekit_api::Error> for CoreError {
    fn from(err: forgekit_api::Error) -> Self {
        match err {
            forgekit_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::RequestTimeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                        body: None,
                    }
                }
            }
            forgekit_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            forgekit_api::Error::InvalidToken { message } => CoreError::Config { message },
            forgekit_api::Error::Api { status, body, .. } => CoreError::Api {
                message: format!("status: {status}, body: {body}"),
                status: Some(status),
                body: Some(body),
            },
            forgekit_api::Error::UnexpectedBody { body } => CoreError::Rejected { body },
            forgekit_api::Error::Deserialization { message, body } => {
                CoreError::Decode { message, body }
            }
            forgekit_api::Error::Serialization(e) => CoreError::Decode {
                message: format!("could not encode request: {e}"),
                body: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_status_and_body() {
        let err: CoreError = forgekit_api::Error::api(500, "boom".into()).into();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "status: 500, body: boom");
    }

    #[test]
    fn delete_body_becomes_the_message() {
        let err: CoreError = forgekit_api::Error::UnexpectedBody {
            body: "nope".into(),
        }
        .into();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn timeout_message_names_the_phase() {
        let err = CoreError::WaitTimeout {
            phase: WaitPhase::ServerProvisioning,
            attempts: 11,
        };
        assert_eq!(err.to_string(), "Unable to create server. Too many attempts.");
    }
}
