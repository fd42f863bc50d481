//! Tests for HTTP request/response types.

use std::time::Duration;

use super::{HttpRequest, HttpResponse};

mod http_request {
    use super::*;

    #[test]
    fn new_creates_request_with_method_and_url() {
        let url = url::Url::parse("http://config.local/configs/a/default/application").unwrap();
        let req = HttpRequest::new(http::Method::HEAD, url.clone());

        assert_eq!(req.method, http::Method::HEAD);
        assert_eq!(req.url, url);
        assert!(req.headers.is_empty());
        assert!(req.timeout.is_none());
    }

    #[test]
    fn get_creates_get_request() {
        let url = url::Url::parse("http://config.local/").unwrap();
        let req = HttpRequest::get(url);

        assert_eq!(req.method, http::Method::GET);
    }

    #[test]
    fn with_timeout_sets_timeout() {
        let url = url::Url::parse("http://config.local/").unwrap();
        let req = HttpRequest::get(url).with_timeout(Duration::from_secs(75));

        assert_eq!(req.timeout, Some(Duration::from_secs(75)));
    }

    #[test]
    fn with_header_appends_multiple_values_for_same_name() {
        let url = url::Url::parse("http://config.local/").unwrap();
        let req = HttpRequest::get(url)
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/plain"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(req.headers.get_all(http::header::ACCEPT).iter().count(), 2);
    }

    #[test]
    fn with_headers_merges_map() {
        let url = url::Url::parse("http://config.local/").unwrap();
        let mut extra = http::HeaderMap::new();
        extra.insert(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_static("Apollo app:sig"),
        );
        extra.insert("timestamp", http::HeaderValue::from_static("1"));

        let req = HttpRequest::get(url).with_headers(extra);

        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.headers.get("Timestamp").unwrap(), "1");
    }
}

mod http_response {
    use super::*;

    #[test]
    fn is_success_for_2xx() {
        let ok = HttpResponse::with_status(http::StatusCode::OK, Vec::new());
        let not_modified = HttpResponse::with_status(http::StatusCode::NOT_MODIFIED, Vec::new());

        assert!(ok.is_success());
        assert!(!not_modified.is_success());
    }

    #[test]
    fn body_text_returns_utf8() {
        let resp = HttpResponse::with_status(http::StatusCode::OK, "{}");
        assert_eq!(resp.body_text(), Some("{}"));
    }

    #[test]
    fn body_text_returns_none_for_invalid_utf8() {
        let resp = HttpResponse::with_status(http::StatusCode::OK, vec![0xff, 0xfe]);
        assert!(resp.body_text().is_none());
    }
}
