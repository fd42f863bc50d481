//! Request signing for servers that require access keys.
//!
//! Signed requests carry two headers:
//!
//! ```text
//! Authorization: Apollo {app_id}:{signature}
//! Timestamp: {millis since epoch}
//! ```
//!
//! where `signature` is the base64-encoded HMAC-SHA1 of
//! `"{timestamp}\n{path_and_query}"` keyed by the shared secret. The server
//! owns replay rejection; the client just stamps each request with the
//! current time.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use http::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use sha1::Sha1;

use crate::time::{Clock, SystemClock};

/// Authorization scheme used in the `Authorization` header.
pub const AUTHORIZATION_SCHEME: &str = "Apollo";

/// Name of the timestamp header.
pub const TIMESTAMP_HEADER: HeaderName = HeaderName::from_static("timestamp");

type HmacSha1 = Hmac<Sha1>;

/// Computes the request signature for a timestamp, path and secret.
///
/// Pure and deterministic: the same inputs always produce the same digest.
#[must_use]
pub fn signature(timestamp: &str, path_and_query: &str, secret: &str) -> String {
    // HMAC accepts keys of any length, including empty
    let Ok(mut mac) = HmacSha1::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(timestamp.as_bytes());
    mac.update(b"\n");
    mac.update(path_and_query.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Produces authentication headers for outgoing requests.
///
/// A signer without a secret (or with an empty one) produces no headers,
/// which is how unsigned servers are talked to.
pub struct Signer {
    app_id: String,
    secret: Option<String>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("app_id", &self.app_id)
            .field("signed", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

impl Signer {
    /// Creates a signer using the system clock.
    #[must_use]
    pub fn new(app_id: impl Into<String>, secret: Option<String>) -> Self {
        Self::with_clock(app_id, secret, SystemClock)
    }

    /// Creates a signer with a custom clock.
    #[must_use]
    pub fn with_clock(
        app_id: impl Into<String>,
        secret: Option<String>,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            secret: secret.filter(|s| !s.is_empty()),
            clock: Box::new(clock),
        }
    }

    /// Returns true if requests will be signed.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Builds the authentication headers for a request.
    ///
    /// `path_and_query` is the request URL with the server base URL
    /// stripped, e.g. `/configs/app/default/application?ip=10.0.0.1`.
    #[must_use]
    pub fn sign(&self, path_and_query: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Some(secret) = &self.secret else {
            return headers;
        };

        let timestamp = self.clock.millis_since_epoch().to_string();
        let digest = signature(&timestamp, path_and_query, secret);
        let authorization = format!("{AUTHORIZATION_SCHEME} {}:{digest}", self.app_id);

        match HeaderValue::from_str(&authorization) {
            Ok(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            Err(e) => {
                tracing::warn!("App id cannot be sent in a header, request goes unsigned: {e}");
                return headers;
            }
        }
        if let Ok(value) = HeaderValue::from_str(&timestamp) {
            headers.insert(TIMESTAMP_HEADER, value);
        }
        headers
    }
}
