use serde_json::json;
use tweetsheet_social::{TwitterApi, TwitterCredentials};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn creds() -> TwitterCredentials {
    TwitterCredentials {
        consumer_key: "ck".to_string(),
        consumer_secret: "cs".to_string(),
        access_token: "at".to_string(),
        access_token_secret: "ats".to_string(),
    }
}

#[tokio::test]
async fn posts_text_and_parses_created_tweet() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(body_json(json!({ "text": "Big news! #tech" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "1849000000000000001", "text": "Big news! #tech" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = TwitterApi::with_base_url(creds(), &server.uri()).unwrap();
    let posted = api.create_tweet("Big news! #tech").await.unwrap();

    assert_eq!(posted.id, "1849000000000000001");
    assert_eq!(posted.text, "Big news! #tech");

    // The request must carry an OAuth 1.0a user-context header.
    let requests = server.received_requests().await.unwrap();
    let auth = requests[0]
        .headers
        .get("authorization")
        .expect("authorization header present")
        .to_str()
        .unwrap();
    assert!(auth.starts_with("OAuth "));
    assert!(auth.contains("oauth_consumer_key=\"ck\""));
    assert!(auth.contains("oauth_token=\"at\""));
    assert!(auth.contains("oauth_signature="));
}

#[tokio::test]
async fn api_rejection_surfaces_as_publish_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "message": "Could not authenticate you" }]
        })))
        .mount(&server)
        .await;

    let api = TwitterApi::with_base_url(creds(), &server.uri()).unwrap();
    let err = api.create_tweet("hello").await.unwrap_err();

    assert!(err.to_string().contains("Publish error"));
    assert!(err.to_string().contains("Could not authenticate you"));
}

#[tokio::test]
async fn credentials_debug_is_redacted() {
    let printed = format!("{:?}", creds());
    assert!(printed.contains("<redacted>"));
    assert!(!printed.contains("cs"));
    assert!(!printed.contains("ats"));
}
