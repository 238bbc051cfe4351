mod common;

use axum::http::StatusCode;
use linkvault::domain::repositories::UrlRepository;
use serde_json::{Value, json};

#[tokio::test]
async fn test_history_newest_first_and_scoped() {
    let app = common::spawn_app().await;
    for code in ["h1", "h2", "h3"] {
        common::create_test_url(&app.repository, code, "https://example.com", "alice", None).await;
    }
    common::create_test_url(&app.repository, "bob1", "https://bob.com", "bob", None).await;

    let response = app
        .server
        .get("/api/history")
        .authorization_bearer(common::ALICE_TOKEN)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 20);
    assert_eq!(body["total"], 3);

    let codes: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, ["h3", "h2", "h1"]);
}

#[tokio::test]
async fn test_history_pagination() {
    let app = common::spawn_app().await;
    for i in 0..5 {
        common::create_test_url(
            &app.repository,
            &format!("page{i}"),
            "https://example.com",
            "alice",
            None,
        )
        .await;
    }

    let response = app
        .server
        .get("/api/history?page=2&page_size=2")
        .authorization_bearer(common::ALICE_TOKEN)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 5);
    assert_eq!(body["items"][0]["code"], "page2");
    assert_eq!(body["items"][1]["code"], "page1");
}

#[tokio::test]
async fn test_history_invalid_page() {
    let app = common::spawn_app().await;

    for query in ["page=0", "page_size=0", "page_size=101"] {
        app.server
            .get(&format!("/api/history?{query}"))
            .authorization_bearer(common::ALICE_TOKEN)
            .await
            .assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_history_requires_token() {
    let app = common::spawn_app().await;

    app.server
        .get("/api/history")
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_delete_url() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "del001", "https://example.com", "alice", None).await;

    let response = app
        .server
        .delete("/api/delete/del001")
        .authorization_bearer(common::ALICE_TOKEN)
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(app.repository.find_by_code("del001").await.unwrap().is_none());

    app.server
        .delete("/api/delete/del001")
        .authorization_bearer(common::ALICE_TOKEN)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_other_owners_url() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "alice01", "https://example.com", "alice", None).await;

    let response = app
        .server
        .delete("/api/delete/alice01")
        .authorization_bearer(common::BOB_TOKEN)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "forbidden");
    assert!(app.repository.find_by_code("alice01").await.unwrap().is_some());
}

#[tokio::test]
async fn test_deleted_code_can_be_reused() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "reuse01", "https://old.com", "alice", None).await;
    app.repository.increment_visit("reuse01").await.unwrap();

    app.server
        .delete("/api/delete/reuse01")
        .authorization_bearer(common::ALICE_TOKEN)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = app
        .server
        .post("/api/url")
        .authorization_bearer(common::BOB_TOKEN)
        .json(&json!({ "url": "https://new.com", "custom_code": "reuse01" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["visit_count"], 0);
    assert_eq!(
        app.server.get("/reuse01").await.header("location"),
        "https://new.com"
    );
}

#[tokio::test]
async fn test_deleted_code_stops_redirecting_with_cache() {
    let (app, cache) = common::spawn_cached_app().await;
    common::create_test_url(&app.repository, "cache01", "https://old.com", "alice", None).await;

    app.server
        .get("/cache01")
        .await
        .assert_status(StatusCode::FOUND);
    assert_eq!(cache.cached("cache01").as_deref(), Some("https://old.com"));

    app.server
        .delete("/api/delete/cache01")
        .authorization_bearer(common::ALICE_TOKEN)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(cache.cached("cache01").is_none());
    app.server.get("/cache01").await.assert_status_not_found();
}

#[tokio::test]
async fn test_deleted_code_can_be_reused_with_cache() {
    let (app, cache) = common::spawn_cached_app().await;
    common::create_test_url(&app.repository, "reuse02", "https://old.com", "alice", None).await;

    assert_eq!(
        app.server.get("/reuse02").await.header("location"),
        "https://old.com"
    );

    app.server
        .delete("/api/delete/reuse02")
        .authorization_bearer(common::ALICE_TOKEN)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .post("/api/url")
        .authorization_bearer(common::BOB_TOKEN)
        .json(&json!({ "url": "https://new.com", "custom_code": "reuse02" }))
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(
        app.server.get("/reuse02").await.header("location"),
        "https://new.com"
    );
    assert_eq!(cache.cached("reuse02").as_deref(), Some("https://new.com"));
}

#[tokio::test]
async fn test_forbidden_delete_keeps_cache_entry() {
    let (app, cache) = common::spawn_cached_app().await;
    common::create_test_url(&app.repository, "keep001", "https://kept.com", "alice", None).await;
    app.server
        .get("/keep001")
        .await
        .assert_status(StatusCode::FOUND);

    app.server
        .delete("/api/delete/keep001")
        .authorization_bearer(common::BOB_TOKEN)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    assert_eq!(cache.cached("keep001").as_deref(), Some("https://kept.com"));
}

#[tokio::test]
async fn test_filter_by_category() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "t1", "https://a.com", "alice", Some("travel")).await;
    common::create_test_url(&app.repository, "w1", "https://b.com", "alice", Some("work")).await;
    common::create_test_url(&app.repository, "t2", "https://c.com", "alice", Some("travel")).await;
    common::create_test_url(&app.repository, "t3", "https://d.com", "bob", Some("travel")).await;

    let response = app
        .server
        .get("/api/url/filter/travel")
        .authorization_bearer(common::ALICE_TOKEN)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["category"], "travel");
    assert_eq!(body["count"], 2);
    assert_eq!(body["items"][0]["code"], "t1");
    assert_eq!(body["items"][1]["code"], "t2");
}

#[tokio::test]
async fn test_filter_by_category_is_case_sensitive() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "t1", "https://a.com", "alice", Some("travel")).await;

    let response = app
        .server
        .get("/api/url/filter/Travel")
        .authorization_bearer(common::ALICE_TOKEN)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["count"], 0);
}

#[tokio::test]
async fn test_update_category() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "cat001", "https://a.com", "alice", None).await;

    let response = app
        .server
        .put("/api/url/filter")
        .authorization_bearer(common::ALICE_TOKEN)
        .json(&json!({ "code": "cat001", "category": "reading" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["category"], "reading");

    // Same request again is harmless.
    app.server
        .put("/api/url/filter")
        .authorization_bearer(common::ALICE_TOKEN)
        .json(&json!({ "code": "cat001", "category": "reading" }))
        .await
        .assert_status_ok();

    let listed = app
        .server
        .get("/api/url/filter/reading")
        .authorization_bearer(common::ALICE_TOKEN)
        .await
        .json::<Value>();
    assert_eq!(listed["count"], 1);
}

#[tokio::test]
async fn test_update_category_clear() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "cat002", "https://a.com", "alice", Some("old")).await;

    let response = app
        .server
        .put("/api/url/filter")
        .authorization_bearer(common::ALICE_TOKEN)
        .json(&json!({ "code": "cat002", "category": null }))
        .await;

    response.assert_status_ok();
    assert!(response.json::<Value>()["category"].is_null());

    let record = app.repository.find_by_code("cat002").await.unwrap().unwrap();
    assert!(record.category.is_none());
}

#[tokio::test]
async fn test_update_category_errors() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "bob0001", "https://a.com", "bob", Some("x")).await;

    app.server
        .put("/api/url/filter")
        .authorization_bearer(common::ALICE_TOKEN)
        .json(&json!({ "code": "bob0001", "category": "mine" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .put("/api/url/filter")
        .authorization_bearer(common::ALICE_TOKEN)
        .json(&json!({ "code": "missing", "category": "mine" }))
        .await
        .assert_status_not_found();

    let record = app.repository.find_by_code("bob0001").await.unwrap().unwrap();
    assert_eq!(record.category.as_deref(), Some("x"));
}

#[tokio::test]
async fn test_export_csv() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "e1", "https://a.com", "alice", Some("travel")).await;
    common::create_test_url(&app.repository, "e2", "https://b.com", "alice", None).await;
    common::create_test_url(&app.repository, "b1", "https://bob.com", "bob", None).await;

    let response = app
        .server
        .get("/api/export")
        .authorization_bearer(common::ALICE_TOKEN)
        .await;

    response.assert_status_ok();
    assert!(
        response
            .header("content-type")
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        response
            .header("content-disposition")
            .to_str()
            .unwrap()
            .contains("links.csv")
    );

    let text = response.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("code,"));
    assert!(lines[1].starts_with("e1,"));
    assert!(lines[2].starts_with("e2,"));
    assert!(!text.contains("bob.com"));
}

#[tokio::test]
async fn test_export_json() {
    let app = common::spawn_app().await;
    common::create_test_url(&app.repository, "e1", "https://a.com", "alice", None).await;

    let response = app
        .server
        .get("/api/export?format=json")
        .authorization_bearer(common::ALICE_TOKEN)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["code"], "e1");
    assert_eq!(items[0]["short_url"], format!("{}/e1", common::BASE_URL));
}

#[tokio::test]
async fn test_export_empty() {
    let app = common::spawn_app().await;

    let response = app
        .server
        .get("/api/export?format=json")
        .authorization_bearer(common::BOB_TOKEN)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}
