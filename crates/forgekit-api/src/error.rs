use std::collections::BTreeMap;

use thiserror::Error;

/// Validation message Forge returns when a key (or other named entity)
/// collides with an existing one.
pub const NAME_TAKEN_MESSAGE: &str = "The name has already been taken.";

/// Top-level error type for the `forgekit-api` crate.
///
/// `forgekit-core` maps these into reconciliation diagnostics. API failures
/// keep the status code and the raw body verbatim so callers can still
/// pattern-match on content they do not model.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API token cannot be sent as a header value.
    #[error("Invalid API token: {message}")]
    InvalidToken { message: String },

    // ── API ─────────────────────────────────────────────────────────
    /// Any non-2xx response other than 429.
    ///
    /// Display keeps the historical `status: N, body: ...` shape.
    #[error("status: {status}, body: {body}")]
    Api {
        status: u16,
        body: String,
        /// Per-field validation messages, when the body carried them.
        validation: Option<BTreeMap<String, Vec<String>>>,
    },

    /// A DELETE that should answer with an empty body returned content.
    #[error("{body}")]
    UnexpectedBody { body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Laravel answers 422 either with a bare field map or wrapped in `errors`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ValidationBody {
    Wrapped {
        #[allow(dead_code)]
        message: Option<String>,
        errors: BTreeMap<String, Vec<String>>,
    },
    Flat(BTreeMap<String, Vec<String>>),
}

impl Error {
    /// Build an `Api` error from a status and raw body, parsing validation
    /// field errors when present.
    pub fn api(status: u16, body: String) -> Self {
        let validation = match serde_json::from_str::<ValidationBody>(&body) {
            Ok(ValidationBody::Wrapped { errors, .. } | ValidationBody::Flat(errors)) => {
                Some(errors)
            }
            Err(_) => None,
        };
        Self::Api {
            status,
            body,
            validation,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the remote answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Validation messages reported for `field`, empty when none.
    pub fn field_errors(&self, field: &str) -> &[String] {
        match self {
            Self::Api {
                validation: Some(fields),
                ..
            } => fields.get(field).map_or(&[][..], Vec::as_slice),
            _ => &[],
        }
    }

    /// Returns `true` for the 422 "name has already been taken" rejection.
    ///
    /// Only that exact validation message qualifies; any other 422 on the
    /// `name` field stays a plain API error.
    pub fn is_name_taken(&self) -> bool {
        self.status() == Some(422)
            && self
                .field_errors("name")
                .iter()
                .any(|msg| msg == NAME_TAKEN_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_status_and_body() {
        let err = Error::api(500, "boom".into());
        assert_eq!(err.to_string(), "status: 500, body: boom");
    }

    #[test]
    fn flat_validation_body_detects_name_taken() {
        let err = Error::api(
            422,
            r#"{"name":["The name has already been taken."]}"#.into(),
        );
        assert!(err.is_name_taken());
        assert_eq!(err.field_errors("name").len(), 1);
    }

    #[test]
    fn wrapped_validation_body_detects_name_taken() {
        let err = Error::api(
            422,
            r#"{"message":"The given data was invalid.","errors":{"name":["The name has already been taken."]}}"#
                .into(),
        );
        assert!(err.is_name_taken());
    }

    #[test]
    fn other_name_message_is_not_a_collision() {
        let err = Error::api(422, r#"{"name":["The name field is required."]}"#.into());
        assert!(!err.is_name_taken());
        assert_eq!(err.field_errors("name"), ["The name field is required.".to_owned()]);
    }

    #[test]
    fn name_taken_requires_422() {
        let err = Error::api(400, r#"{"name":["The name has already been taken."]}"#.into());
        assert!(!err.is_name_taken());
    }

    #[test]
    fn non_json_body_has_no_validation() {
        let err = Error::api(404, "Not Found".into());
        assert!(err.is_not_found());
        assert!(err.field_errors("name").is_empty());
    }
}
