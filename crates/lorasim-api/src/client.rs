// Async HTTP client for the LoRaWAN simulator backend.
//
// Base path: the backend root (default http://localhost:2208)
// Auth: none
//
// Endpoint methods live in `servers.rs`, `gateways.rs` and `devices.rs`
// as inherent impls; this module owns URL building and response handling.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, GENERIC_FAILURE};
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the simulator backend.
///
/// Every path segment (server names, EUIs) is percent-encoded, so names
/// with spaces or slashes address the right resource.
#[derive(Debug, Clone)]
pub struct FleetClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FleetClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let url = Url::parse(raw.trim())?;
        if url.cannot_be_a_base() {
            return Err(Error::UnusableBaseUrl(raw.to_owned()));
        }
        Ok(url)
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append percent-encoded segments to the base URL.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are checked in the constructor, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    /// GET a JSON array. A `204` or empty body is an empty list.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Vec<T>, Error> {
        let url = self.url(segments);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Ok(self.handle_response(resp).await?.unwrap_or_default())
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, Error> {
        let url = self.url(segments);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Option<T>, Error> {
        let url = self.url(segments);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    /// POST with no body, ignoring any response payload.
    pub(crate) async fn post_action(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments);
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments);
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// `204 No Content` and empty bodies map to `None`.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body).map(Some).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    /// Extract `{message}` from an error body, best-effort.
    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_owned());

        Error::Http {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> FleetClient {
        FleetClient::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn url_appends_to_root() {
        let c = client("http://localhost:2208");
        assert_eq!(
            c.url(&["network-servers"]).as_str(),
            "http://localhost:2208/network-servers"
        );
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let c = client("http://host/api/");
        assert_eq!(
            c.url(&["network-servers", "s1", "sync"]).as_str(),
            "http://host/api/network-servers/s1/sync"
        );
    }

    #[test]
    fn url_percent_encodes_segments() {
        let c = client("http://host");
        assert_eq!(
            c.url(&["network-servers", "lab a/b"]).as_str(),
            "http://host/network-servers/lab%20a%2Fb"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        let err = FleetClient::from_reqwest("mailto:ops@example.com", reqwest::Client::new());
        assert!(matches!(err, Err(Error::UnusableBaseUrl(_))));
    }
}
