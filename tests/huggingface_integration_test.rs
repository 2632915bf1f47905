//! Wiremock integration tests for HuggingFaceClient.
//!
//! These tests verify correct HTTP interaction and error handling using mocked responses.

use huginn::{HuggingFaceClient, HuginnError, Sentiment, SentimentProvider, interpret};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const MODEL: &str = "siebert/sentiment-roberta-large-english";

fn client(token: Option<&str>, server: &MockServer) -> HuggingFaceClient {
    HuggingFaceClient::with_base_url(token.map(str::to_string), MODEL, server.uri())
        .expect("client should build")
}

/// Nested-list response with a bearer token.
#[tokio::test]
async fn test_classify_nested_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}")))
        .and(header("Authorization", "Bearer test_key"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({ "inputs": "Five stars, works perfectly." })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([[
            { "label": "POSITIVE", "score": 0.9987 },
            { "label": "NEGATIVE", "score": 0.0013 }
        ]])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(Some("test_key"), &mock_server);
    let payload = client
        .classify("Five stars, works perfectly.")
        .await
        .expect("classify should succeed");

    let result = interpret(&payload);
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.score, Some(0.9987));
}

/// Flat-list response through the provider trait.
#[tokio::test]
async fn test_classify_flat_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "label": "NEGATIVE", "score": 0.93 }])),
        )
        .mount(&mock_server)
        .await;

    let provider: &dyn SentimentProvider = &client(Some("test_key"), &mock_server);
    assert_eq!(provider.name(), "huggingface");
    let payload = provider.infer("Arrived late").await.unwrap();

    assert_eq!(interpret(&payload).sentiment, Sentiment::Negative);
}

/// The token is trimmed before it is sent.
#[tokio::test]
async fn test_token_is_trimmed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer hf_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(Some("  hf_abc \n"), &mock_server);
    client.classify("hello").await.unwrap();
}

/// No token, or a blank one, sends no Authorization header.
#[tokio::test]
async fn test_anonymous_request_has_no_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    for token in [None, Some("   ")] {
        let client = client(token, &mock_server);
        assert!(client.classify("hello").await.is_ok());
    }

    let requests: Vec<Request> = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(
        requests
            .iter()
            .all(|r| !r.headers.contains_key("authorization"))
    );
}

/// Non-JSON success bodies come back as strings and interpret as neutral.
#[tokio::test]
async fn test_text_body_is_returned_as_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("ok")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let payload = client(None, &mock_server).classify("hello").await.unwrap();
    assert_eq!(payload, serde_json::Value::String("ok".into()));

    let result = interpret(&payload);
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert!(result.score.is_none());
}

/// 503 with a loading message maps to ModelLoading.
#[tokio::test]
async fn test_error_503_model_loading() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "error": "Model siebert/sentiment-roberta-large-english is currently loading",
            "estimated_time": 20.0
        })))
        .mount(&mock_server)
        .await;

    let result = client(None, &mock_server).classify("hello").await;

    match result {
        Err(err @ HuginnError::ModelLoading { .. }) => {
            assert!(err.is_warming_up());
            assert!(err.to_string().contains("warming up"));
        }
        other => panic!("expected ModelLoading, got {:?}", other),
    }
}

/// Structured error detail is carried into the message.
#[tokio::test]
async fn test_error_with_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error": "Authorization header is invalid" })),
        )
        .mount(&mock_server)
        .await;

    let err = client(Some("bad"), &mock_server)
        .classify("hello")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "API error 400: Authorization header is invalid");
    assert!(!err.is_warming_up());
}

/// Plain-text error bodies produce a bare status message.
#[tokio::test]
async fn test_error_without_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let err = client(None, &mock_server).classify("hello").await.unwrap_err();
    match err {
        HuginnError::Api { status, detail } => {
            assert_eq!(status, 500);
            assert!(detail.is_none());
        }
        other => panic!("expected Api {{ status: 500 }}, got {:?}", other),
    }
}

/// Unreachable servers are transport errors.
#[tokio::test]
async fn test_connection_refused_is_http_error() {
    let client = HuggingFaceClient::with_base_url(None, MODEL, "http://127.0.0.1:1").unwrap();
    let err = client.classify("hello").await.unwrap_err();
    assert!(matches!(err, HuginnError::Http(_)), "got {err:?}");
}
