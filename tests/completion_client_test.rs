//! OpenRouter client integration tests
//!
//! Runs `OpenRouterClient` against a `wiremock` server and checks the request
//! it sends and how each kind of response becomes a reply.

mod common;

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hanyu_tutor::prompts::{generate_tutor_prompt, EMPTY_REPLY_FALLBACK, NETWORK_FALLBACK_REPLY};
use hanyu_tutor::providers::{CompletionClient, OpenRouterClient};

use common::provider_config;

const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

fn client_for(server: &MockServer) -> OpenRouterClient {
    OpenRouterClient::new(provider_config(&server.uri())).expect("client should build")
}

fn reply_body(content: &str) -> Value {
    json!({
        "id": "gen-1",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
}

#[tokio::test]
async fn test_successful_reply_is_returned() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("Authorization", "Bearer sk-or-test"))
        .and(header("HTTP-Referer", "http://localhost"))
        .and(header("X-Title", "Chinese Tutor Bot"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("你好！📝 ni hao")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).try_complete("你好吗").await.unwrap();
    assert_eq!(reply, "你好！📝 ni hao");
}

#[tokio::test]
async fn test_request_body_has_persona_and_latest_message_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_partial_json(json!({
            "model": "tngtech/deepseek-r1t2-chimera:free",
            "max_tokens": 800
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("ok")))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.try_complete("first question").await.unwrap();
    client.try_complete("second question").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let body: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let temperature = body["temperature"].as_f64().unwrap();
    assert!((temperature - 0.7).abs() < 1e-6);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2, "earlier turns must not be sent");
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], generate_tutor_prompt());
    assert_eq!(messages[1], json!({"role": "user", "content": "second question"}));
}

#[tokio::test]
async fn test_server_error_becomes_network_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.try_complete("hi").await.unwrap_err();
    assert!(err.to_string().contains("500"));
    assert_eq!(client.complete("hi").await, NETWORK_FALLBACK_REPLY);
}

#[tokio::test]
async fn test_rate_limit_becomes_network_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"error": "slow down"})))
        .mount(&server)
        .await;

    assert_eq!(client_for(&server).complete("hi").await, NETWORK_FALLBACK_REPLY);
}

#[tokio::test]
async fn test_empty_choices_becomes_empty_reply_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let reply = client_for(&server).try_complete("hi").await.unwrap();
    assert_eq!(reply, EMPTY_REPLY_FALLBACK);
}

#[tokio::test]
async fn test_null_content_becomes_empty_reply_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        })))
        .mount(&server)
        .await;

    assert_eq!(
        client_for(&server).complete("hi").await,
        EMPTY_REPLY_FALLBACK
    );
}

#[tokio::test]
async fn test_null_first_choice_becomes_empty_reply_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": [null]})))
        .mount(&server)
        .await;

    let reply = client_for(&server).try_complete("hi").await.unwrap();
    assert_eq!(reply, EMPTY_REPLY_FALLBACK);
}

#[tokio::test]
async fn test_invalid_json_becomes_network_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"<html>oops</html>".to_vec(), "text/html"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.try_complete("hi").await.is_err());
    assert_eq!(client.complete("hi").await, NETWORK_FALLBACK_REPLY);
}

#[tokio::test]
async fn test_unreachable_server_becomes_network_fallback() {
    let client = OpenRouterClient::new(provider_config("http://127.0.0.1:9")).unwrap();

    assert_eq!(client.complete("hi").await, NETWORK_FALLBACK_REPLY);
}
