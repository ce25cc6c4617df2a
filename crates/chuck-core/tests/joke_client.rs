//! Joke client against a local HTTP server

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chuck_core::{JokeApi, JokeApiError, JokeClient};
use serde_json::{json, Value};
use tokio::net::TcpListener;

fn joke_json(id: &str, categories: &[&str]) -> Value {
    json!({
        "categories": categories,
        "created_at": "2020-01-05 13:42:19.324003",
        "icon_url": "https://api.chucknorris.io/img/avatar/chuck-norris.png",
        "id": id,
        "updated_at": "2020-01-05 13:42:19.324003",
        "url": format!("https://api.chucknorris.io/jokes/{id}"),
        "value": format!("Chuck Norris joke {id}"),
    })
}

async fn random(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    match params.get("category") {
        Some(category) => Json(joke_json(&format!("from-{category}"), &[category.as_str()])),
        None => Json(joke_json("abc123", &[])),
    }
}

async fn categories() -> Json<Value> {
    Json(json!(["animal", "career", "dev"]))
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("query").cloned().unwrap_or_default();
    if query == "nothing" {
        return Json(json!({ "total": 0, "result": [] }));
    }
    Json(json!({
        "total": 2,
        "result": [joke_json(&format!("{query}-1"), &[]), joke_json(&format!("{query}-2"), &["dev"])],
    }))
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn healthy_client() -> JokeClient {
    let router = Router::new()
        .route("/jokes/random", get(random))
        .route("/jokes/categories", get(categories))
        .route("/jokes/search", get(search));
    let addr = serve(router).await;
    JokeClient::with_base_url(&format!("http://{addr}")).unwrap()
}

#[tokio::test]
async fn test_random_joke() {
    let client = healthy_client().await;
    let joke = client.get_random_joke().await.unwrap();

    assert_eq!(joke.id, "abc123");
    assert_eq!(joke.value, "Chuck Norris joke abc123");
    assert!(joke.categories.is_empty());
    assert_eq!(joke.url, "https://api.chucknorris.io/jokes/abc123");
}

#[tokio::test]
async fn test_categories_keep_order() {
    let client = healthy_client().await;
    assert_eq!(
        client.get_categories().await.unwrap(),
        vec!["animal".to_string(), "career".to_string(), "dev".to_string()]
    );
}

#[tokio::test]
async fn test_category_is_sent_as_query_parameter() {
    let client = healthy_client().await;
    let joke = client.get_random_joke_by_category("dev").await.unwrap();

    assert_eq!(joke.id, "from-dev");
    assert_eq!(joke.categories, vec!["dev".to_string()]);
}

#[tokio::test]
async fn test_search_returns_matches_and_total() {
    let client = healthy_client().await;
    let results = client.search_jokes("kick").await.unwrap();

    assert_eq!(results.total, 2);
    let ids: Vec<_> = results.matches.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["kick-1", "kick-2"]);

    let empty = client.search_jokes("nothing").await.unwrap();
    assert_eq!(empty.total, 0);
    assert!(empty.matches.is_empty());
}

#[tokio::test]
async fn test_reserved_characters_reach_server_intact() {
    let client = healthy_client().await;

    let joke = client.get_random_joke_by_category("a&b c=d").await.unwrap();
    assert_eq!(joke.id, "from-a&b c=d");

    let results = client.search_jokes("a&b c?#").await.unwrap();
    assert_eq!(results.matches[0].id, "a&b c?#-1");
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let router = Router::new().route(
        "/jokes/random",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = serve(router).await;
    let client = JokeClient::with_base_url(&format!("http://{addr}/")).unwrap();

    let err = client.get_random_joke().await.unwrap_err();
    assert!(matches!(err, JokeApiError::Transport(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_malformed_body_is_transport_failure() {
    let router = Router::new().route("/jokes/categories", get(|| async { "not json" }));
    let addr = serve(router).await;
    let client = JokeClient::with_base_url(&format!("http://{addr}/")).unwrap();

    assert!(matches!(
        client.get_categories().await,
        Err(JokeApiError::Transport(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = JokeClient::with_base_url(&format!("http://{addr}/")).unwrap();
    assert!(matches!(
        client.get_random_joke().await,
        Err(JokeApiError::Transport(_))
    ));
}
