// ── Readiness polling ──
//
// Forge provisions servers, cron entries, supervisor programs and
// certificates after the creating request has already returned. Each of
// those phases is awaited with the same fixed-interval, fixed-ceiling loop.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::CoreError;

/// Which provisioning transition is being awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitPhase {
    /// `is_ready: false → true`
    ServerProvisioning,
    /// `status: installing → installed`
    JobInstall,
    /// `status: installing → installed`
    DaemonInstall,
    /// `status: installing → installed`
    CertificateInstall,
    /// `active: false → true`
    CertificateActivation,
}

impl WaitPhase {
    /// Operator-facing message when the phase exceeds its ceiling.
    pub fn timeout_message(self) -> &'static str {
        match self {
            Self::ServerProvisioning => "Unable to create server. Too many attempts.",
            Self::JobInstall => "Unable to add scheduled job. Timeout.",
            Self::DaemonInstall => "Unable to add daemon. Timeout.",
            Self::CertificateInstall => "Unable to install SSL certificate. Timeout.",
            Self::CertificateActivation => "Unable to activate SSL certificate. Timeout.",
        }
    }

    /// Production interval and ceiling for this phase.
    pub fn default_policy(self) -> WaitPolicy {
        match self {
            Self::ServerProvisioning => WaitPolicy::new(Duration::from_secs(30), 10),
            Self::JobInstall => WaitPolicy::new(Duration::from_secs(10), 60),
            Self::DaemonInstall => WaitPolicy::new(Duration::from_secs(5), 60),
            Self::CertificateInstall | Self::CertificateActivation => {
                WaitPolicy::new(Duration::from_secs(10), 50)
            }
        }
    }
}

impl fmt::Display for WaitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ServerProvisioning => "server provisioning",
            Self::JobInstall => "scheduled job install",
            Self::DaemonInstall => "daemon install",
            Self::CertificateInstall => "certificate install",
            Self::CertificateActivation => "certificate activation",
        };
        f.write_str(name)
    }
}

/// Fixed sleep between checks and the number of re-checks allowed.
///
/// A ceiling of `N` allows `N + 1` checks in total; the last failing check
/// raises [`CoreError::WaitTimeout`] without sleeping again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub max_retries: u32,
}

impl WaitPolicy {
    pub const fn new(interval: Duration, max_retries: u32) -> Self {
        Self {
            interval,
            max_retries,
        }
    }

    /// Same ceiling, no sleeping. Intended for tests.
    pub const fn immediate(max_retries: u32) -> Self {
        Self::new(Duration::ZERO, max_retries)
    }
}

/// Every wait the reconciler performs, plus the SSH-key settle interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitSettings {
    pub server: WaitPolicy,
    pub job: WaitPolicy,
    pub daemon: WaitPolicy,
    pub certificate_install: WaitPolicy,
    pub certificate_activation: WaitPolicy,
    /// Pause after deleting a colliding SSH key before re-creating it.
    pub key_settle: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            server: WaitPhase::ServerProvisioning.default_policy(),
            job: WaitPhase::JobInstall.default_policy(),
            daemon: WaitPhase::DaemonInstall.default_policy(),
            certificate_install: WaitPhase::CertificateInstall.default_policy(),
            certificate_activation: WaitPhase::CertificateActivation.default_policy(),
            key_settle: Duration::from_secs(10),
        }
    }
}

impl WaitSettings {
    /// Default ceilings with every sleep removed.
    pub fn without_delays() -> Self {
        let defaults = Self::default();
        Self {
            server: WaitPolicy::immediate(defaults.server.max_retries),
            job: WaitPolicy::immediate(defaults.job.max_retries),
            daemon: WaitPolicy::immediate(defaults.daemon.max_retries),
            certificate_install: WaitPolicy::immediate(defaults.certificate_install.max_retries),
            certificate_activation: WaitPolicy::immediate(
                defaults.certificate_activation.max_retries,
            ),
            key_settle: Duration::ZERO,
        }
    }
}

/// Re-fetch until `ready` holds or the policy's ceiling is exceeded.
///
/// A fetch error aborts the wait immediately; only the transport's own
/// rate-limit handling sits underneath.
pub async fn wait_until<T, F, Fut, P>(
    policy: WaitPolicy,
    phase: WaitPhase,
    mut fetch: F,
    ready: P,
) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, forgekit_api::Error>>,
    P: Fn(&T) -> bool,
{
    let mut attempts: u32 = 0;
    loop {
        let current = fetch().await?;
        if ready(&current) {
            debug!(%phase, checks = attempts + 1, "ready");
            return Ok(current);
        }

        if attempts >= policy.max_retries {
            return Err(CoreError::WaitTimeout {
                phase,
                attempts: attempts + 1,
            });
        }

        debug!(
            %phase,
            attempt = attempts + 1,
            interval_secs = policy.interval.as_secs(),
            "not ready yet, waiting"
        );
        tokio::time::sleep(policy.interval).await;
        attempts += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[tokio::test]
    async fn returns_as_soon_as_ready() {
        let calls = Cell::new(0_u32);
        let got = wait_until(
            WaitPolicy::immediate(10),
            WaitPhase::JobInstall,
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Ok::<_, forgekit_api::Error>(n) }
            },
            |n| *n == 3,
        )
        .await
        .unwrap();
        assert_eq!(got, 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn ceiling_of_ten_fails_on_the_eleventh_check() {
        let calls = Cell::new(0_u32);
        let err = wait_until(
            WaitPolicy::immediate(10),
            WaitPhase::ServerProvisioning,
            || {
                calls.set(calls.get() + 1);
                async { Ok::<_, forgekit_api::Error>(false) }
            },
            |ready| *ready,
        )
        .await
        .unwrap_err();

        assert_eq!(calls.get(), 11);
        match err {
            CoreError::WaitTimeout { phase, attempts } => {
                assert_eq!(phase, WaitPhase::ServerProvisioning);
                assert_eq!(attempts, 11);
            }
            other => panic!("expected WaitTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_error_aborts_without_retrying() {
        let calls = Cell::new(0_u32);
        let err = wait_until(
            WaitPolicy::immediate(50),
            WaitPhase::CertificateInstall,
            || {
                calls.set(calls.get() + 1);
                async { Err::<bool, _>(forgekit_api::Error::api(500, "down".into())) }
            },
            |ready| *ready,
        )
        .await
        .unwrap_err();

        assert_eq!(calls.get(), 1);
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_the_configured_interval_between_checks() {
        let start = tokio::time::Instant::now();
        let calls = Cell::new(0_u32);
        wait_until(
            WaitPolicy::new(Duration::from_secs(5), 60),
            WaitPhase::DaemonInstall,
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Ok::<_, forgekit_api::Error>(n) }
            },
            |n| *n == 4,
        )
        .await
        .unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(15));
    }

    #[test]
    fn defaults_match_production_cadence() {
        let w = WaitSettings::default();
        assert_eq!(w.server, WaitPolicy::new(Duration::from_secs(30), 10));
        assert_eq!(w.job, WaitPolicy::new(Duration::from_secs(10), 60));
        assert_eq!(w.daemon, WaitPolicy::new(Duration::from_secs(5), 60));
        assert_eq!(w.certificate_install.max_retries, 50);
        assert_eq!(w.key_settle, Duration::from_secs(10));
    }
}
