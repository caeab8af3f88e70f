use serde_json::json;
use tweetsheet_llm::gemini::DEFAULT_GEMINI_MODEL;
use tweetsheet_llm::{GeminiClient, LlmClient};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_client(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key".to_string(), DEFAULT_GEMINI_MODEL.to_string())
        .expect("client builds")
        .with_base_url(&server.uri())
        .expect("base url parses")
}

fn candidate_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "totalTokenCount": 42 }
    })
}

#[tokio::test]
async fn generate_returns_first_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/models/{}:generateContent",
            DEFAULT_GEMINI_MODEL
        )))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("A fine tweet")))
        .expect(1)
        .mount(&server)
        .await;

    let client = make_client(&server);
    let response = client.generate("prompt", None, None, None).await.unwrap();

    assert_eq!(response.text, "A fine tweet");
    assert_eq!(response.tokens_used, Some(42));
}

#[tokio::test]
async fn compose_tweet_sends_row_prompt_and_trims() {
    let server = MockServer::start().await;

    let expected_prompt =
        "Generate a tweet from this text: 'Big news today' and this hashtag: '#tech'";
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": expected_prompt }] }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_body("  Big news! #tech \n")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = make_client(&server);
    let text = client
        .compose_tweet("Big news today", "#tech")
        .await
        .unwrap();

    assert_eq!(text, "Big news! #tech");
}

#[tokio::test]
async fn api_error_maps_to_generation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": { "message": "API key not valid" } })),
        )
        .mount(&server)
        .await;

    let client = make_client(&server);
    let err = client
        .generate("prompt", None, None, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Gemini API error"));
}

#[tokio::test]
async fn unauthorized_maps_to_invalid_key_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "Request had invalid credentials" } })),
        )
        .mount(&server)
        .await;

    let client = make_client(&server);
    let err = client
        .generate("prompt", None, None, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn empty_candidates_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = make_client(&server);
    let err = client
        .generate("prompt", None, None, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("No candidates"));
}

#[tokio::test]
async fn safety_block_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [] },
                "finishReason": "SAFETY"
            }]
        })))
        .mount(&server)
        .await;

    let client = make_client(&server);
    let err = client
        .generate("prompt", None, None, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("safety"));
}
