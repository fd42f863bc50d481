//! Request building and response handling for the configuration service.

use std::time::Duration;

use url::Url;

use crate::sign::Signer;
use crate::transport::{HttpClient, HttpRequest, HttpResponse};

use super::{ApiError, ConfigResponse, Notification};

/// Outcome of a long-poll request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The server held the request until its timeout; nothing changed.
    NotModified,
    /// These namespaces changed, with their new notification ids.
    Changed(Vec<Notification>),
}

/// Endpoint wrapper for one application on one cluster.
///
/// Builds request URLs relative to the configured base URL, signs them,
/// sends them with the right timeout and decodes the answers. It keeps no
/// state between calls.
#[derive(Debug)]
pub struct ConfigApi<H> {
    http: H,
    base: Url,
    app_id: String,
    cluster: String,
    ip: String,
    signer: Signer,
    fetch_timeout: Duration,
    long_poll_timeout: Duration,
}

impl<H> ConfigApi<H> {
    /// Default timeout of plain configuration fetches.
    pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(3);

    /// Default timeout of long-poll requests.
    ///
    /// Must exceed the server's hold time (60 s for Apollo).
    pub const DEFAULT_LONG_POLL_TIMEOUT: Duration = Duration::from_secs(75);

    /// Creates an unsigned endpoint wrapper.
    #[must_use]
    pub fn new(
        http: H,
        base: Url,
        app_id: impl Into<String>,
        cluster: impl Into<String>,
        ip: impl Into<String>,
    ) -> Self {
        let app_id = app_id.into();
        Self {
            http,
            base,
            signer: Signer::new(app_id.clone(), None),
            app_id,
            cluster: cluster.into(),
            ip: ip.into(),
            fetch_timeout: Self::DEFAULT_FETCH_TIMEOUT,
            long_poll_timeout: Self::DEFAULT_LONG_POLL_TIMEOUT,
        }
    }

    /// Sets the request signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Signer) -> Self {
        self.signer = signer;
        self
    }

    /// Sets the fetch and long-poll timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, fetch: Duration, long_poll: Duration) -> Self {
        self.fetch_timeout = fetch;
        self.long_poll_timeout = long_poll;
        self
    }

    /// Returns the application id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Builds `{base}/{segments...}?{query}`.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    /// Returns the part of `url` after the base URL, which is what gets signed.
    fn relative<'a>(&self, url: &'a Url) -> &'a str {
        let base = self.base.as_str().trim_end_matches('/');
        url.as_str()
            .strip_prefix(base)
            .unwrap_or_else(|| &url[url::Position::BeforePath..])
    }

    /// URL of the namespace's configuration.
    ///
    /// Plain fetches send an empty `releaseKey` so the server always answers
    /// with the full configuration; heartbeats omit the parameter.
    fn config_url(&self, namespace: &str, with_release_key: bool) -> Result<Url, ApiError> {
        let segments = ["configs", self.app_id.as_str(), self.cluster.as_str(), namespace];
        if with_release_key {
            self.endpoint(&segments, &[("releaseKey", ""), ("ip", self.ip.as_str())])
        } else {
            self.endpoint(&segments, &[("ip", self.ip.as_str())])
        }
    }

    /// URL of the long-poll endpoint for `notifications`.
    fn notifications_url(&self, notifications: &[Notification]) -> Result<Url, ApiError> {
        let encoded = serde_json::to_string(notifications)?;
        self.endpoint(
            &["notifications", "v2"],
            &[
                ("appId", self.app_id.as_str()),
                ("cluster", self.cluster.as_str()),
                ("notifications", encoded.as_str()),
            ],
        )
    }
}

impl<H: HttpClient> ConfigApi<H> {
    async fn send(&self, url: Url, timeout: Duration) -> Result<HttpResponse, ApiError> {
        let headers = self.signer.sign(self.relative(&url));
        let request = HttpRequest::get(url)
            .with_timeout(timeout)
            .with_headers(headers);
        Ok(self.http.request(request).await?)
    }

    async fn get_config(
        &self,
        namespace: &str,
        with_release_key: bool,
    ) -> Result<ConfigResponse, ApiError> {
        let url = self.config_url(namespace, with_release_key)?;
        let response = self.send(url, self.fetch_timeout).await?;

        if response.status != http::StatusCode::OK {
            return Err(ApiError::from_status(response.status, response.body_text()));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Fetches the full current configuration of `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, any status other than
    /// 200, or a body that is not a configuration document.
    pub async fn fetch_config(&self, namespace: &str) -> Result<ConfigResponse, ApiError> {
        self.get_config(namespace, true).await
    }

    /// Fetches `namespace` for the heartbeat, including its release key.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigApi::fetch_config`].
    pub async fn fetch_release(&self, namespace: &str) -> Result<ConfigResponse, ApiError> {
        self.get_config(namespace, false).await
    }

    /// Waits for any of `notifications` to be superseded on the server.
    ///
    /// Blocks for up to the long-poll timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, statuses other than
    /// 200/304, or a malformed notification list.
    pub async fn poll_notifications(
        &self,
        notifications: &[Notification],
    ) -> Result<PollOutcome, ApiError> {
        let url = self.notifications_url(notifications)?;
        let response = self.send(url, self.long_poll_timeout).await?;

        match response.status {
            http::StatusCode::NOT_MODIFIED => Ok(PollOutcome::NotModified),
            http::StatusCode::OK => Ok(PollOutcome::Changed(serde_json::from_slice(
                &response.body,
            )?)),
            status => Err(ApiError::from_status(status, response.body_text())),
        }
    }
}
