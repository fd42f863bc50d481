//! Tests for `ReqwestClient`.
//!
//! Only construction is covered here; exercising real requests needs a
//! live server.

use super::*;

mod reqwest_client {
    use super::*;

    #[test]
    fn default_creates_same_as_new() {
        let client1 = ReqwestClient::new();
        let client2 = ReqwestClient::default();

        let _ = format!("{client1:?}");
        let _ = format!("{client2:?}");
    }

    #[test]
    fn from_client_accepts_custom_client() {
        let custom = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(1))
            .build()
            .unwrap();
        let client = ReqwestClient::from_client(custom);

        assert!(format!("{client:?}").contains("ReqwestClient"));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestClient>();
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = ReqwestClient::new();
        let url = url::Url::parse("http://127.0.0.1:1/configs").unwrap();
        let request = HttpRequest::get(url).with_timeout(std::time::Duration::from_secs(2));

        let result = client.request(request).await;

        assert!(matches!(
            result,
            Err(HttpError::Connection(_) | HttpError::Timeout)
        ));
    }
}
