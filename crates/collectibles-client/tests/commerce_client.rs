//! Integration tests for `CommerceClient` using wiremock HTTP mocks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use collectibles_client::{
    CancelToken, ClientOptions, CommerceClient, FetchError, FetchErrorKind, RecordingSleeper,
    RetryPolicy,
};
use collectibles_core::ItemType;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATEGORIES_PATH: &str = "/collectibles-categories/v2";

fn test_client(base_url: &str) -> CommerceClient {
    let options = ClientOptions {
        base_url: base_url.to_owned(),
        timeout_secs: 5,
        retry: RetryPolicy {
            max_rate_limit_retries: 3,
            max_transient_retries: 2,
            transient_delay: Duration::from_millis(10),
            rate_limit_fallback: Duration::from_millis(10),
        },
        ..ClientOptions::default()
    };
    CommerceClient::new("test-token", &options).expect("client construction should not fail")
}

fn categories_body(product_name: &str) -> serde_json::Value {
    serde_json::json!({
        "categories": [{
            "sku_id": "cat-1",
            "name": "Lofi Vibes",
            "products": [{
                "sku_id": "prod-1",
                "name": product_name,
                "prices": {
                    "0": { "country_prices": { "country_code": "US", "prices": [
                        { "amount": 599, "currency": "usd", "exponent": 2 }
                    ]}},
                    "4": { "country_prices": { "country_code": "US", "prices": [
                        { "amount": 449, "currency": "usd", "exponent": 2 }
                    ]}}
                },
                "items": [{
                    "sku_id": "item-1",
                    "type": 0,
                    "asset": "a_deadbeef"
                }]
            }]
        }]
    })
}

#[tokio::test]
async fn fetch_categories_sends_headers_and_parses_tree() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CATEGORIES_PATH))
        .and(query_param("include_bundles", "true"))
        .and(query_param("variants_return_style", "2"))
        .and(query_param("skip_num_categories", "0"))
        .and(header("authorization", "test-token"))
        .and(header("x-discord-locale", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body("Cozy Headphones")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let tree = client
        .fetch_categories("en-US")
        .await
        .expect("should parse categories");

    assert_eq!(tree.locale, "en-US");
    let items: Vec<_> = tree.entries().collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].sku_id, "item-1");
    assert_eq!(items[0].item_type, ItemType::AvatarDecoration);
    assert_eq!(items[0].name.as_deref(), Some("Cozy Headphones"));
    assert_eq!(items[0].category.as_deref(), Some("Lofi Vibes"));
    assert_eq!(items[0].price.amount.map(|d| d.to_string()).as_deref(), Some("5.99"));
    assert_eq!(
        items[0].preview.static_url.as_deref(),
        Some("https://cdn.discordapp.com/avatar-decoration-presets/a_deadbeef.png")
    );
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CATEGORIES_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "401: Unauthorized", "code": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::new();
    let client = test_client(&server.uri()).with_sleeper(Arc::new(sleeper.clone()));
    let err = client.fetch_categories("en-US").await.unwrap_err();

    assert!(
        matches!(err, FetchError::Unauthorized { status: 401, .. }),
        "expected Unauthorized, got: {err:?}"
    );
    assert_eq!(err.kind(), FetchErrorKind::Unauthorized);
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn forbidden_maps_to_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_categories("ru")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Unauthorized { status: 403, .. }));
}

#[tokio::test]
async fn persistent_rate_limit_waits_server_delay_then_gives_up() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CATEGORIES_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "1")
                .set_body_json(serde_json::json!({
                    "message": "You are being rate limited.",
                    "retry_after": 1.0,
                    "global": false
                })),
        )
        .expect(4)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::new();
    let client = test_client(&server.uri()).with_sleeper(Arc::new(sleeper.clone()));
    let err = client.fetch_categories("en-US").await.unwrap_err();

    assert!(
        matches!(err, FetchError::RateLimitExhausted { retries: 3, .. }),
        "expected RateLimitExhausted, got: {err:?}"
    );
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(1); 3]);
}

#[tokio::test]
async fn rate_limit_body_delay_is_used_without_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "retry_after": 2.5
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body("X")))
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::new();
    let client = test_client(&server.uri()).with_sleeper(Arc::new(sleeper.clone()));
    client.fetch_categories("en-US").await.expect("should recover");

    assert_eq!(sleeper.delays(), vec![Duration::from_millis(2500)]);
}

#[tokio::test]
async fn rate_limit_then_success_waits_real_delay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0.5"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories_body("Cozy Headphones")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let started = Instant::now();
    let tree = client
        .fetch_categories("en-US")
        .await
        .expect("should succeed after one retry");
    let elapsed = started.elapsed();

    assert_eq!(tree.entries().count(), 1);
    assert!(
        elapsed >= Duration::from_millis(500),
        "retried too early: {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(3),
        "waited far longer than requested: {elapsed:?}"
    );
}

#[tokio::test]
async fn server_errors_retry_then_report_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::new();
    let client = test_client(&server.uri()).with_sleeper(Arc::new(sleeper.clone()));
    let err = client.fetch_categories("en-US").await.unwrap_err();

    assert!(
        matches!(err, FetchError::Unavailable { retries: 2, .. }),
        "expected Unavailable, got: {err:?}"
    );
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(10); 2]);
}

#[tokio::test]
async fn connection_failures_retry_then_report_unavailable() {
    // Reserve a local port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let sleeper = RecordingSleeper::new();
    let client = test_client(&format!("http://{addr}")).with_sleeper(Arc::new(sleeper.clone()));
    let err = client.fetch_categories("en-US").await.unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::Unavailable, "got: {err:?}");
    assert!(matches!(err, FetchError::Unavailable { retries: 2, .. }));
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(10); 2]);
}

#[tokio::test]
async fn other_client_errors_are_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_categories("en-US")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::UnexpectedStatus { status: 404, .. }));
}

#[tokio::test]
async fn missing_categories_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "products": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_categories("en-US")
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::MalformedResponse { .. }),
        "expected MalformedResponse, got: {err:?}"
    );
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_categories("en-US")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
}

#[tokio::test]
async fn cancel_aborts_in_flight_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(categories_body("Slow"))
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&server)
        .await;

    let (handle, token) = CancelToken::pair();
    let client = test_client(&server.uri()).with_cancel_token(token);
    let started = Instant::now();

    let (result, ()) = tokio::join!(client.fetch_categories("en-US"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    assert!(matches!(result, Err(FetchError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn cancel_aborts_rate_limit_wait() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    let (handle, token) = CancelToken::pair();
    let client = test_client(&server.uri()).with_cancel_token(token);
    let started = Instant::now();

    let (result, ()) = tokio::join!(client.fetch_categories("en-US"), async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.cancel();
    });

    assert!(matches!(result, Err(FetchError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn fetch_asset_omits_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/previews/item-1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let bytes = client
        .fetch_asset(&format!("{}/previews/item-1.png", server.uri()))
        .await
        .expect("asset should download");
    assert_eq!(bytes, b"\x89PNG");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}
