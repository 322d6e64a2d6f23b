// ── Typed remote identifiers ──
//
// Forge assigns every entity a positive integer id, scoped under its parent
// chain (a site lives under a server, a certificate under a site). Each kind
// gets its own newtype so a `SiteId` can never be spliced into a server path.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected identifier text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} id '{value}': expected a positive integer")]
pub struct InvalidId {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! forge_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Wrap a raw id. Returns `None` for zero.
            pub fn new(raw: u64) -> Option<Self> {
                NonZeroU64::new(raw).map(Self)
            }

            pub fn get(self) -> u64 {
                self.0.get()
            }

            /// Human-readable entity kind, used in diagnostics.
            pub const KIND: &'static str = $kind;
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .ok()
                    .and_then(Self::new)
                    .ok_or_else(|| InvalidId {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }

        impl TryFrom<u64> for $name {
            type Error = InvalidId;

            fn try_from(raw: u64) -> Result<Self, Self::Error> {
                Self::new(raw).ok_or_else(|| InvalidId {
                    kind: $kind,
                    value: raw.to_string(),
                })
            }
        }

        impl TryFrom<i64> for $name {
            type Error = InvalidId;

            fn try_from(raw: i64) -> Result<Self, Self::Error> {
                u64::try_from(raw)
                    .ok()
                    .and_then(Self::new)
                    .ok_or_else(|| InvalidId {
                        kind: $kind,
                        value: raw.to_string(),
                    })
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.get()
            }
        }
    };
}

forge_id!(
    /// Server id, the root of every scope chain.
    ServerId,
    "server"
);
forge_id!(
    /// Site id, scoped under a server.
    SiteId,
    "site"
);
forge_id!(
    /// SSH key id, scoped under a server.
    KeyId,
    "key"
);
forge_id!(
    /// Scheduled job id, scoped under a server.
    JobId,
    "scheduled job"
);
forge_id!(
    /// Supervisor daemon id, scoped under a server.
    DaemonId,
    "daemon"
);
forge_id!(
    /// SSL certificate id, scoped under server + site.
    CertificateId,
    "certificate"
);
forge_id!(
    /// Redirect rule id, scoped under server + site.
    RedirectRuleId,
    "redirect rule"
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_integers() {
        let id: ServerId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id: SiteId = " 7 ".parse().unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn rejects_zero_negative_and_text() {
        assert!("0".parse::<KeyId>().is_err());
        assert!("-3".parse::<KeyId>().is_err());
        assert!("abc".parse::<KeyId>().is_err());
        assert!(JobId::try_from(-1_i64).is_err());
        assert!(JobId::try_from(0_u64).is_err());
    }

    #[test]
    fn error_names_the_kind() {
        let err = "x".parse::<RedirectRuleId>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid redirect rule id 'x': expected a positive integer"
        );
    }

    #[test]
    fn serde_is_a_bare_integer() {
        let id: CertificateId = serde_json::from_str("9").unwrap();
        assert_eq!(id.get(), 9);
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");
        assert!(serde_json::from_str::<DaemonId>("0").is_err());
    }
}
