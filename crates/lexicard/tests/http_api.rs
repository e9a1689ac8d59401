//! HTTP contract tests for the card API.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use lexicard::{build_router, AppState, SqliteCardRepository, DEFAULT_OWNER};

fn app() -> Router {
    let repo = SqliteCardRepository::in_memory().expect("in-memory repository");
    build_router(AppState::new(repo))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

async fn create(app: &Router, cards: Value) -> Vec<Value> {
    let (status, body) = send(app, Method::POST, "/cards", Some(json!({ "cards": cards }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].as_array().expect("data array").clone()
}

#[tokio::test]
async fn test_import_mark_known_scenario() {
    let app = app();

    let created = create(&app, json!([{"word": "casa", "translation": "house"}])).await;
    assert_eq!(created.len(), 1);
    let id = created[0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/cards", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let cards = body["data"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["word"], "casa");
    assert_eq!(cards[0]["isKnown"], false);
    assert_eq!(cards[0]["ownerId"], DEFAULT_OWNER);
    assert!(cards[0].get("lastReviewed").is_none());

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/cards/{id}"),
        Some(json!({"isKnown": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isKnown"], true);

    let (_, body) = send(&app, Method::GET, "/cards", None).await;
    let card = &body["data"][0];
    assert_eq!(card["isKnown"], true);
    assert!(card["lastReviewed"].is_string());
    assert_eq!(card["word"], "casa");
}

#[tokio::test]
async fn test_list_is_scoped_by_user_and_newest_first() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/cards",
        Some(json!({"cards": [{"word": "uno", "translation": "one"}], "userId": "maria"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        Method::POST,
        "/cards",
        Some(json!({"cards": [{"word": "dos", "translation": "two"}], "userId": "maria"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    create(&app, json!([{"word": "gato", "translation": "cat"}])).await;

    let (_, body) = send(&app, Method::GET, "/cards?userId=maria", None).await;
    let words: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["word"].as_str().unwrap())
        .collect();
    assert_eq!(words, vec!["dos", "uno"]);

    let (_, body) = send(&app, Method::GET, "/cards?userId=", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["word"], "gato");
}

#[tokio::test]
async fn test_create_keeps_examples() {
    let app = app();
    let created = create(
        &app,
        json!([{
            "word": "perro",
            "translation": "dog",
            "examples": [{"text": "El perro ladra", "translation": "The dog barks"}]
        }]),
    )
    .await;

    let examples = created[0]["examples"].as_array().unwrap();
    assert_eq!(examples.len(), 1);
    assert!(examples[0]["id"].is_string());
    assert_eq!(examples[0]["text"], "El perro ladra");
}

#[tokio::test]
async fn test_create_missing_word_rejects_whole_batch() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/cards",
        Some(json!({"cards": [
            {"word": "casa", "translation": "house"},
            {"translation": "dog"}
        ]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "card 1: word is required");

    let (_, body) = send(&app, Method::GET, "/cards", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_requires_cards_array() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/cards", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "cards must be an array");

    let (status, _) = send(&app, Method::POST, "/cards", Some(json!({"cards": "casa"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/cards", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_create_rejects_malformed_entry() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/cards",
        Some(json!({"cards": [{"word": "casa", "translation": "house", "isKnown": "yes"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("card 0:"));
}

#[tokio::test]
async fn test_empty_update_refreshes_last_reviewed_only() {
    let app = app();
    let created = create(&app, json!([{"word": "sol", "translation": "sun"}])).await;
    let id = created[0]["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::PUT, &format!("/cards/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["word"], "sol");
    assert_eq!(body["data"]["translation"], "sun");
    assert!(body["data"]["lastReviewed"].is_string());
    assert_eq!(body["data"]["createdAt"], created[0]["createdAt"]);
}

#[tokio::test]
async fn test_update_keeps_explicit_last_reviewed() {
    let app = app();
    let created = create(&app, json!([{"word": "sol", "translation": "sun"}])).await;
    let id = created[0]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/cards/{id}"),
        Some(json!({"lastReviewed": "2024-03-01T10:00:00Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["lastReviewed"], "2024-03-01T10:00:00Z");

    let (status, body) = send(&app, Method::GET, "/cards", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["lastReviewed"], "2024-03-01T10:00:00Z");
}

#[tokio::test]
async fn test_update_rejects_last_reviewed_past_year_9999() {
    let app = app();
    let created = create(&app, json!([{"word": "sol", "translation": "sun"}])).await;
    let id = created[0]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/cards/{id}"),
        Some(json!({"lastReviewed": "+10000-01-01T00:00:00Z", "isKnown": true})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "lastReviewed is out of range"})
    );

    let (status, body) = send(&app, Method::GET, "/cards", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let card = &body["data"][0];
    assert_eq!(card["isKnown"], false);
    assert!(card.get("lastReviewed").is_none());
}

#[tokio::test]
async fn test_update_rejects_blank_word() {
    let app = app();
    let created = create(&app, json!([{"word": "sol", "translation": "sun"}])).await;
    let id = created[0]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/cards/{id}"),
        Some(json!({"word": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "word is required");
}

#[tokio::test]
async fn test_update_unknown_id_is_404() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/cards/does-not-exist",
        Some(json!({"isKnown": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Card not found"}));
}

#[tokio::test]
async fn test_delete_twice_is_404() {
    let app = app();
    let created = create(&app, json!([{"word": "luna", "translation": "moon"}])).await;
    let uri = format!("/cards/{}", created[0]["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_healthz() {
    let (status, body) = send(&app(), Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": {"status": "ok"}}));
}

#[tokio::test]
async fn test_settings_reports_configured_debounce() {
    let (status, body) = send(&app(), Method::GET, "/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "data": {"debounceMs": 300, "defaultOwner": DEFAULT_OWNER}})
    );

    let repo = SqliteCardRepository::in_memory().expect("in-memory repository");
    let custom = build_router(
        AppState::new(repo)
            .with_default_owner("guest")
            .with_debounce(Duration::from_millis(750)),
    );
    let (_, body) = send(&custom, Method::GET, "/settings", None).await;
    assert_eq!(body["data"]["debounceMs"], 750);
    assert_eq!(body["data"]["defaultOwner"], "guest");
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/cards")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_serves_on_real_listener() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(SqliteCardRepository::in_memory().unwrap());
    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(lexicard::server::run(listener, state, async {
        let _ = stopped.await;
    }));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains(r#""status":"ok""#));

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
