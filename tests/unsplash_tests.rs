use chrono::{DateTime, Utc};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use splashbot::error::BotError;
use splashbot::unsplash::UnsplashClient;

fn client_for(server: &MockServer) -> UnsplashClient {
    UnsplashClient::with_endpoints(
        "test-access-key".to_string(),
        "test-secret".to_string(),
        server.uri(),
        server.uri(),
    )
    .unwrap()
}

fn search_body() -> serde_json::Value {
    json!({
        "total": 2,
        "total_pages": 1,
        "results": [
            {
                "id": "p1",
                "created_at": "2016-05-03T11:00:28-04:00",
                "width": 5245,
                "height": 3497,
                "color": "#60544D",
                "likes": 12,
                "liked_by_user": false,
                "description": "A man drinking a coffee.",
                "user": {
                    "name": "Jeff Sheldon",
                    "username": "ugmonk",
                    "links": { "html": "https://unsplash.com/@ugmonk" }
                },
                "urls": {
                    "raw": "https://images.unsplash.com/1?raw",
                    "full": "https://images.unsplash.com/1?full",
                    "regular": "https://images.unsplash.com/1?regular",
                    "small": "https://images.unsplash.com/1?small",
                    "thumb": "https://images.unsplash.com/1?thumb"
                },
                "links": {
                    "html": "https://unsplash.com/photos/p1",
                    "download": "https://unsplash.com/photos/p1/download"
                }
            },
            {
                "id": "p2",
                "created_at": "2020-01-10T08:00:00Z",
                "width": 4000,
                "height": 6000,
                "color": null,
                "likes": 301,
                "liked_by_user": true,
                "description": null,
                "user": {
                    "name": "Ada Example",
                    "username": "ada",
                    "links": { "html": "https://unsplash.com/@ada" }
                },
                "urls": {
                    "raw": "https://images.unsplash.com/2?raw",
                    "full": "https://images.unsplash.com/2?full",
                    "regular": "https://images.unsplash.com/2?regular",
                    "small": "https://images.unsplash.com/2?small",
                    "thumb": "https://images.unsplash.com/2?thumb"
                }
            }
        ]
    })
}

#[tokio::test]
async fn search_returns_parsed_photos() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .and(query_param("query", "coffee"))
        .and(query_param("client_id", "test-access-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.search_photos("coffee").await.unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.total_pages, 1);
    assert_eq!(result.results.len(), 2);

    let first = &result.results[0];
    assert_eq!(first.id, "p1");
    assert!(!first.liked_by_user);
    assert_eq!(first.likes, 12);
    assert_eq!(first.description.as_deref(), Some("A man drinking a coffee."));
    assert_eq!(first.user.name, "Jeff Sheldon");
    assert_eq!(first.user.links.html, "https://unsplash.com/@ugmonk");
    let expected: DateTime<Utc> = "2016-05-03T15:00:28Z".parse().unwrap();
    assert_eq!(first.created_at, expected);

    // Second photo: no description, no links object, already liked
    let second = &result.results[1];
    assert!(second.liked_by_user);
    assert_eq!(second.description, None);
    assert_eq!(second.color, None);
    assert_eq!(second.links.download, "");
}

#[tokio::test]
async fn search_surfaces_service_error_without_retrying() {
    let server = MockServer::start().await;

    // HTTP errors are final: only transport failures are worth a retry
    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "errors": ["Internal Server Error"] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search_photos("coffee").await.unwrap_err();

    match err {
        BotError::RemoteApi { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("Expected RemoteApi, got {:?}", other),
    }
}

#[tokio::test]
async fn search_with_unparsable_body_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search_photos("coffee").await.unwrap_err();

    assert!(matches!(err, BotError::Transport(_)));
}

#[tokio::test]
async fn like_photo_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/photos/p123/like"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.like_photo("p123", "user-token").await.unwrap();
}

#[tokio::test]
async fn unlike_photo_uses_delete() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/photos/p123/like"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.unlike_photo("p123", "user-token").await.unwrap();
}

#[tokio::test]
async fn like_photo_surfaces_missing_scope_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/photos/p123/like"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({ "errors": ["This action requires the write_likes scope"] })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.like_photo("p123", "user-token").await.unwrap_err();

    match err {
        BotError::RemoteApi { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "This action requires the write_likes scope");
        }
        other => panic!("Expected RemoteApi, got {:?}", other),
    }
}

#[tokio::test]
async fn exchange_code_sends_expected_parameters_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(query_param("client_id", "test-access-key"))
        .and(query_param("client_secret", "test-secret"))
        .and(query_param("redirect_uri", "urn:ietf:wg:oauth:2.0:oob"))
        .and(query_param("code", "abc123"))
        .and(query_param("grant_type", "authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token-xyz",
            "token_type": "Bearer",
            "scope": "public write_likes write_followers",
            "created_at": 1469554926
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = client.exchange_code("abc123").await.unwrap();

    assert_eq!(token.access_token, "user-token-xyz");
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.scope, "public write_likes write_followers");
}

#[tokio::test]
async fn exchange_code_failure_is_reported_not_retried() {
    let server = MockServer::start().await;

    // Codes are single-use: exactly one attempt, the error carries the
    // service's description
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "The provided authorization grant is invalid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.exchange_code("bad-code").await.unwrap_err();

    match err {
        BotError::RemoteApi { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "The provided authorization grant is invalid");
        }
        other => panic!("Expected RemoteApi, got {:?}", other),
    }
}
