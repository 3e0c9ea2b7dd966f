//! Reqwest transport against a local mock server.

use payline_client::{ApiRequest, ReqwestTransport, Transport, basic_auth, user_agent};
use payline_rate_limit::ApiConfig;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        secret_key: Some("sk_test_abc".to_string()),
        api_version: Some("2024-11-11".to_string()),
        for_user_id: Some("sub_77".to_string()),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_sends_client_wide_headers_and_query() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers"))
        .and(query_param("limit", "5"))
        .and(query_param("after_id", "cust_9"))
        .and(header("authorization", basic_auth("sk_test_abc").as_str()))
        .and(header("user-agent", user_agent().as_str()))
        .and(header("api-version", "2024-11-11"))
        .and(header("for-user-id", "sub_77"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-RateLimit-Remaining", "41")
                .set_body_json(json!({"data": [], "has_more": false})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&api_config(&server.uri()))?;
    let request = ApiRequest::get("/customers").with_query(vec![
        ("limit".to_string(), "5".to_string()),
        ("after_id".to_string(), "cust_9".to_string()),
    ]);
    let response = transport.send(&request).await?;

    assert_eq!(response.status, 200);
    assert_eq!(response.header("x-ratelimit-remaining"), Some("41"));
    assert_eq!(response.headers.get("x-ratelimit-remaining").map(String::as_str), Some("41"));
    Ok(())
}

#[tokio::test]
async fn test_posts_json_body_with_idempotency_key() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoices"))
        .and(header("idempotency-key", "order-1"))
        .and(body_json(json!({"external_id": "order-1", "amount": 1000.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "inv_1"})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&api_config(&server.uri()))?;
    let request = ApiRequest::post("/invoices")
        .with_idempotency_key("order-1")
        .with_json(&json!({"external_id": "order-1", "amount": 1000.0}))?;
    let response = transport.send(&request).await?;

    let body: serde_json::Value = response.json()?;
    assert_eq!(body["id"], "inv_1");
    Ok(())
}

#[tokio::test]
async fn test_error_statuses_are_responses_not_transport_errors() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/nope"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error_code": "DATA_NOT_FOUND", "message": "nope"})),
        )
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&api_config(&server.uri()))?;
    let response = transport.send(&ApiRequest::get("/customers/nope")).await?;

    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() -> anyhow::Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let uri = format!("http://{}", listener.local_addr()?);
    drop(listener);

    let transport = ReqwestTransport::new(&api_config(&uri))?;
    let err = transport
        .send(&ApiRequest::get("/customers"))
        .await
        .unwrap_err();
    assert!(err.message.contains("/customers"));
    Ok(())
}

#[test]
fn test_missing_secret_key_is_config_error() {
    let mut config = api_config("http://localhost");
    config.secret_key = None;
    let err = ReqwestTransport::new(&config).unwrap_err();
    assert!(err.to_string().contains("no secret key configured"));
}

#[test]
fn test_debug_output_hides_credentials() -> anyhow::Result<()> {
    let transport = ReqwestTransport::new(&api_config("https://api.example.test/"))?;
    let debug = format!("{:?}", transport);
    assert!(!debug.contains("sk_test_abc"));
    assert!(!debug.contains(&basic_auth("sk_test_abc")));
    assert_eq!(transport.base_url(), "https://api.example.test");
    Ok(())
}
