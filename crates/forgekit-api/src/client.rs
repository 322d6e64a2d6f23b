// Forge API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, the rate-limit retry loop,
// and status classification. Endpoint families (servers, sites, keys, …)
// are implemented as inherent methods in their own files so this module
// stays focused on transport mechanics.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Default Forge API root, version prefix included.
pub const DEFAULT_BASE_URL: &str = "https://forge.laravel.com/api/v1";

/// A successful (2xx) response, body not yet decoded.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// Decode the body as JSON.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| {
            let preview: String = self.body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: self.body.clone(),
            }
        })
    }
}

/// Async client for the Forge REST API.
///
/// Credential and base URL are fixed at construction. The handle is cheap
/// to clone and carries no mutable state.
#[derive(Debug, Clone)]
pub struct ForgeClient {
    http: reqwest::Client,
    base_url: Url,
    rate_limit_backoff: Duration,
}

impl ForgeClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API token and transport config.
    pub fn new(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client(token)?;
        Self::from_reqwest(base_url, http, transport.rate_limit_backoff)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        rate_limit_backoff: Duration,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            rate_limit_backoff,
        })
    }

    /// Ensure the base path ends with `/` so relative joins keep the
    /// version prefix (`…/api/v1/` + `servers/1`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The API root every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Core request loop ────────────────────────────────────────────

    /// Send a request and classify the response.
    ///
    /// HTTP 429 sleeps for the configured backoff and re-sends the identical
    /// request, with no retry ceiling. Any other non-2xx status becomes
    /// [`Error::Api`] carrying the status and the body verbatim.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<RawResponse, Error> {
        let url = self.url(path)?;
        let payload = body.map(serde_json::to_string).transpose()?;

        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            debug!(%method, %url, attempt, "sending request");

            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(ref payload) = payload {
                request = request.body(payload.clone());
            }
            let resp = request.send().await?;
            let status = resp.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(
                    %method,
                    %url,
                    attempt,
                    backoff_secs = self.rate_limit_backoff.as_secs(),
                    "rate limited, backing off before retrying"
                );
                tokio::time::sleep(self.rate_limit_backoff).await;
                continue;
            }

            let text = resp.text().await?;
            if !status.is_success() {
                debug!(%method, %url, status = status.as_u16(), "request failed");
                return Err(Error::api(status.as_u16(), text));
            }

            return Ok(RawResponse { status, body: text });
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.execute::<()>(Method::GET, path, None).await?.decode()
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.execute(Method::POST, path, Some(body)).await?.decode()
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.execute(Method::PUT, path, Some(body)).await?.decode()
    }

    /// Body-less POST: any 2xx is success, whatever the payload.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), Error> {
        self.execute::<()>(Method::POST, path, None).await?;
        Ok(())
    }

    /// Body-less PUT: any 2xx is success, whatever the payload.
    pub(crate) async fn put_empty<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        self.execute(Method::PUT, path, Some(body)).await?;
        Ok(())
    }

    /// Body-less DELETE: any 2xx is success, whatever the payload.
    pub(crate) async fn delete_empty(&self, path: &str) -> Result<(), Error> {
        self.execute::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Entity DELETE: success only when the response body is empty.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let resp = self.execute::<()>(Method::DELETE, path, None).await?;
        if resp.body.is_empty() {
            Ok(())
        } else {
            Err(Error::UnexpectedBody { body: resp.body })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ForgeClient {
        ForgeClient::from_reqwest(base, reqwest::Client::new(), Duration::ZERO).unwrap()
    }

    #[test]
    fn base_url_keeps_version_prefix() {
        let c = client("https://forge.laravel.com/api/v1");
        assert_eq!(
            c.url("servers/1").unwrap().as_str(),
            "https://forge.laravel.com/api/v1/servers/1"
        );
    }

    #[test]
    fn trailing_and_leading_slashes_are_normalized() {
        let c = client("https://forge.laravel.com/api/v1/");
        assert_eq!(
            c.url("/servers/1/sites/2").unwrap().as_str(),
            "https://forge.laravel.com/api/v1/servers/1/sites/2"
        );
    }

    #[test]
    fn bare_host_joins_at_root() {
        let c = client("http://127.0.0.1:8080");
        assert_eq!(c.url("servers").unwrap().path(), "/servers");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ForgeClient::from_reqwest("not a url", reqwest::Client::new(), Duration::ZERO);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
