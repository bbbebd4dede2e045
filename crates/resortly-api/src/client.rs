// REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, bearer authentication,
// envelope unwrapping, and retry of idempotent reads. Endpoint-specific
// helpers (auth, payments, profile, orders) live in sibling modules as
// inherent methods to keep this module focused on transport mechanics.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, trace, warn};
use url::Url;

use crate::envelope::Envelope;
use crate::error::Error;
use crate::transport::{RetryPolicy, TransportConfig};

/// Async client for the resort customer API.
///
/// All paths are relative to `{base}/api/`. Methods taking a `token`
/// attach `Authorization: Bearer <token>` when one is given; public
/// catalog endpoints are called with `None`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client from a base URL and transport config.
    ///
    /// `base_url` is the server root (`https://api.example.com`); a
    /// trailing `/api` is accepted and not doubled.
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url: Self::normalize_base_url(base_url),
            retry: transport.retry.clone(),
            timeout: transport.timeout,
        })
    }

    /// Wrap a pre-built `reqwest::Client`. Retries are disabled.
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            http,
            base_url: Self::normalize_base_url(base_url),
            retry: RetryPolicy::none(),
            timeout: TransportConfig::default().timeout,
        }
    }

    /// Override the retry policy (used by tests to keep them fast).
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The normalized API root, always ending in `/api/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn normalize_base_url(raw: &Url) -> Url {
        let mut url = raw.clone();
        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }
        url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"room-bookings/42/cancel"`) onto the API root.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn authorize(
        builder: reqwest::RequestBuilder,
        token: Option<&SecretString>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })
    }

    /// Run an idempotent request, retrying transient failures per the
    /// configured [`RetryPolicy`].
    async fn retrying<T, F, Fut>(&self, url: &Url, mut op: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Err(err) if err.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        %url,
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Read the body and translate HTTP-level failures.
    ///
    /// Non-2xx answers still carry an envelope with a `message` most of
    /// the time; it is surfaced in the error when present.
    async fn read_body(resp: reqwest::Response) -> Result<(u16, String), Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(status = status.as_u16(), bytes = body.len(), "response received");

        if status == StatusCode::UNAUTHORIZED {
            let message = parse_message(&body)
                .unwrap_or_else(|| "token missing, expired, or revoked".into());
            return Err(Error::Authentication { message });
        }

        if !status.is_success() {
            return Err(Error::Rejected {
                status: status.as_u16(),
                message: parse_message(&body),
            });
        }

        Ok((status.as_u16(), body))
    }

    async fn read_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<(u16, Envelope<T>), Error> {
        let (status, body) = Self::read_body(resp).await?;
        let envelope = decode(&body)?;
        Ok((status, envelope))
    }

    // ── HTTP verbs (enveloped) ───────────────────────────────────────

    /// GET and unwrap `data`. Retried on transient failures.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");
        self.retrying(&url, || {
            let request = Self::authorize(self.http.get(url.clone()), token);
            async move {
                let resp = self.send(request).await?;
                let (status, envelope) = Self::read_envelope(resp).await?;
                envelope.into_data(status)
            }
        })
        .await
    }

    /// GET with query parameters and unwrap `data`. Retried on transient failures.
    pub async fn get_query<T, Q>(
        &self,
        path: &str,
        query: &Q,
        token: Option<&SecretString>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        debug!("GET {url} (with query)");
        self.retrying(&url, || {
            let request = Self::authorize(self.http.get(url.clone()).query(query), token);
            async move {
                let resp = self.send(request).await?;
                let (status, envelope) = Self::read_envelope(resp).await?;
                envelope.into_data(status)
            }
        })
        .await
    }

    /// GET and return the raw envelope without judging its `status`.
    ///
    /// For endpoints where `status: false` is an answer, not a failure.
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url} (raw envelope)");
        self.retrying(&url, || {
            let request = Self::authorize(self.http.get(url.clone()), token);
            async move {
                let resp = self.send(request).await?;
                Self::read_envelope(resp).await.map(|(_, envelope)| envelope)
            }
        })
        .await
    }

    /// POST a JSON body and unwrap `data`. Never retried.
    pub async fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        debug!("POST {url}");
        let resp = self
            .send(Self::authorize(self.http.post(url).json(body), token))
            .await?;
        let (status, envelope) = Self::read_envelope(resp).await?;
        envelope.into_data(status)
    }

    /// POST a JSON body, checking only the envelope status.
    pub async fn post_unit<B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<(), Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        debug!("POST {url}");
        let resp = self
            .send(Self::authorize(self.http.post(url).json(body), token))
            .await?;
        let (status, envelope) = Self::read_envelope::<IgnoredAny>(resp).await?;
        envelope.ensure_success(status).map(|_| ())
    }

    /// PUT a JSON body and unwrap `data`.
    pub async fn put<T, B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        debug!("PUT {url}");
        let resp = self
            .send(Self::authorize(self.http.put(url).json(body), token))
            .await?;
        let (status, envelope) = Self::read_envelope(resp).await?;
        envelope.into_data(status)
    }

    /// PUT a JSON body, checking only the envelope status.
    pub async fn put_unit<B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<(), Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        debug!("PUT {url}");
        let resp = self
            .send(Self::authorize(self.http.put(url).json(body), token))
            .await?;
        let (status, envelope) = Self::read_envelope::<IgnoredAny>(resp).await?;
        envelope.ensure_success(status).map(|_| ())
    }

    /// DELETE, checking only the envelope status.
    pub async fn delete_unit(&self, path: &str, token: Option<&SecretString>) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");
        let resp = self
            .send(Self::authorize(self.http.delete(url), token))
            .await?;
        let (status, envelope) = Self::read_envelope::<IgnoredAny>(resp).await?;
        envelope.ensure_success(status).map(|_| ())
    }

    // ── HTTP verbs (bare JSON) ───────────────────────────────────────

    /// GET a response that is not wrapped in the standard envelope.
    pub(crate) async fn get_bare<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} (bare)");
        self.retrying(&url, || {
            let request = Self::authorize(self.http.get(url.clone()), token);
            async move {
                let resp = self.send(request).await?;
                let (_, body) = Self::read_body(resp).await?;
                decode(&body)
            }
        })
        .await
    }

    /// POST a JSON body whose response is not wrapped in the envelope.
    pub(crate) async fn post_bare<T, B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        debug!("POST {url} (bare)");
        let resp = self
            .send(Self::authorize(self.http.post(url).json(body), token))
            .await?;
        let (_, body) = Self::read_body(resp).await?;
        decode(&body)
    }

    /// POST a multipart form and unwrap `data`.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (multipart)");
        let resp = self
            .send(Self::authorize(self.http.post(url).multipart(form), token))
            .await?;
        let (status, envelope) = Self::read_envelope(resp).await?;
        envelope.into_data(status)
    }
}

// ── Body helpers ─────────────────────────────────────────────────────

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// Pull a human-readable message out of an error body, if it is an envelope.
fn parse_message(body: &str) -> Option<String> {
    serde_json::from_str::<Envelope<IgnoredAny>>(body)
        .ok()
        .and_then(|envelope| envelope.best_message())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), &Url::parse(base).unwrap())
    }

    #[test]
    fn base_url_gains_api_segment() {
        let c = client("https://resort.example.com");
        assert_eq!(c.base_url().as_str(), "https://resort.example.com/api/");
    }

    #[test]
    fn base_url_with_api_suffix_is_not_doubled() {
        let c = client("https://resort.example.com/api/");
        assert_eq!(c.base_url().as_str(), "https://resort.example.com/api/");
    }

    #[test]
    fn url_joins_relative_paths() {
        let c = client("https://resort.example.com/backend");
        let url = c.url("/room-bookings/42/cancel").unwrap();
        assert_eq!(
            url.as_str(),
            "https://resort.example.com/backend/api/room-bookings/42/cancel"
        );
    }

    #[test]
    fn parse_message_reads_envelope_errors() {
        let body = r#"{"status":false,"message":"Stok tidak cukup"}"#;
        assert_eq!(parse_message(body).as_deref(), Some("Stok tidak cukup"));
        assert_eq!(parse_message("<html>oops</html>"), None);
    }
}
