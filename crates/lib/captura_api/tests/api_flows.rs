//! End-to-end API flows against a real PostgreSQL instance.
//!
//! Run with `cargo test -- --ignored` after pointing `DATABASE_URL` at a
//! scratch database; migrations are applied on startup.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use tower::ServiceExt;

use captura_api::config::ApiConfig;
use captura_api::{AppState, router};
use captura_core::ocr::{OcrEngine, OcrError};

struct UnusedEngine;

#[async_trait]
impl OcrEngine for UnusedEngine {
    async fn recognize(&self, _path: &Path, _lang: &str) -> Result<String, OcrError> {
        Err(OcrError::Engine("not under test".into()))
    }
}

fn database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost:5432/captura_test".into())
}

async fn test_app() -> (Router, sqlx::PgPool) {
    let pool = sqlx::PgPool::connect(&database_url())
        .await
        .expect("connect to PostgreSQL");
    captura_api::migrate(&pool).await.expect("migrate");

    let state = AppState {
        pool: pool.clone(),
        config: ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            database_url: database_url(),
            access_token_secret: "flow-access-secret".into(),
            refresh_token_secret: "flow-refresh-secret".into(),
            ocr_lang: "por".into(),
            ocr_command: "tesseract".into(),
            ocr_timeout_secs: 5,
        },
        ocr: Arc::new(UnusedEngine),
    };

    (router(state), pool)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    (status, json)
}

fn fresh_email(tag: &str) -> String {
    format!("{tag}-{}@example.com", uuid::Uuid::new_v4())
}

async fn register(app: &Router, email: &str) -> (String, String) {
    let (status, json) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(serde_json::json!({
            "name": "Ana Silva",
            "email": email,
            "password": "segredo-forte",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        json["accessToken"].as_str().expect("accessToken").to_string(),
        json["refreshToken"].as_str().expect("refreshToken").to_string(),
    )
}

async fn create_record(app: &Router, token: &str, title: &str, content: &str) -> String {
    let (status, json) = send(
        app,
        Method::POST,
        "/records",
        Some(token),
        Some(serde_json::json!({"title": title, "content": content})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().expect("id").to_string()
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (set DATABASE_URL)"]
async fn register_login_and_identity() {
    let (app, _pool) = test_app().await;
    let email = fresh_email("identity");

    let (access, _refresh) = register(&app, &email).await;

    let (status, me) = send(&app, Method::GET, "/auth/me", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], email.as_str());
    assert_eq!(me["name"], "Ana Silva");
    assert!(me["id"].is_string());

    // Fresh login issues a second, independent session.
    let (status, json) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(serde_json::json!({"email": email, "password": "segredo-forte"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["accessToken"].is_string());
    assert!(json["refreshToken"].is_string());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (set DATABASE_URL)"]
async fn login_failure_is_uniform() {
    let (app, _pool) = test_app().await;
    let email = fresh_email("uniform");
    register(&app, &email).await;

    let (status_unknown, json_unknown) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(serde_json::json!({"email": fresh_email("ghost"), "password": "segredo-forte"})),
    )
    .await;
    let (status_wrong, json_wrong) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(serde_json::json!({"email": email, "password": "senha-errada"})),
    )
    .await;

    // Unknown email and wrong password are indistinguishable.
    assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(status_wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(json_unknown["message"], json_wrong["message"]);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (set DATABASE_URL)"]
async fn duplicate_email_conflicts_without_side_effects() {
    let (app, pool) = test_app().await;
    let email = fresh_email("duplicate");
    register(&app, &email).await;

    let (status, json) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(serde_json::json!({
            "name": "Outra Ana",
            "email": email,
            "password": "segredo-forte",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "conflict");
    assert!(json.get("accessToken").is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (set DATABASE_URL)"]
async fn create_then_get_roundtrips() {
    let (app, _pool) = test_app().await;
    let (access, _) = register(&app, &fresh_email("roundtrip")).await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/records",
        Some(&access),
        Some(serde_json::json!({
            "title": "Receita da avó",
            "content": "{\"ops\":[{\"insert\":\"farinha e ovos\\n\"}]}",
            "comment": "página 12",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("id");

    let (status, record) =
        send(&app, Method::GET, &format!("/records/{id}"), Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["id"], id);
    assert_eq!(record["title"], "Receita da avó");
    assert_eq!(
        record["content"],
        "{\"ops\":[{\"insert\":\"farinha e ovos\\n\"}]}"
    );
    assert_eq!(record["comment"], "página 12");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (set DATABASE_URL)"]
async fn records_are_invisible_across_owners() {
    let (app, _pool) = test_app().await;
    let (owner, _) = register(&app, &fresh_email("owner")).await;
    let (intruder, _) = register(&app, &fresh_email("intruder")).await;

    let id = create_record(&app, &owner, "particular", "conteúdo privado").await;

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/records/{id}"),
        Some(&intruder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("content").is_none(), "no data may leak");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/records/{id}"),
        Some(&intruder),
        Some(serde_json::json!({"title": "tomado", "content": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/records/{id}"),
        Some(&intruder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still intact for its owner.
    let (status, record) =
        send(&app, Method::GET, &format!("/records/{id}"), Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["title"], "particular");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (set DATABASE_URL)"]
async fn pagination_covers_the_set_without_gaps_or_duplicates() {
    let (app, _pool) = test_app().await;
    let (access, _) = register(&app, &fresh_email("pages")).await;

    let mut created = Vec::new();
    for i in 0..5 {
        created.push(create_record(&app, &access, &format!("nota {i}"), "texto").await);
    }

    let mut collected = Vec::new();
    for page in 1..=3 {
        let (status, json) = send(
            &app,
            Method::GET,
            &format!("/records?page={page}&limit=2"),
            Some(&access),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 5);
        assert_eq!(json["page"], page);
        for record in json["records"].as_array().expect("records") {
            collected.push(record["id"].as_str().expect("id").to_string());
        }
    }

    assert_eq!(collected.len(), 5);
    // Newest first: creation order reversed.
    let mut expected = created.clone();
    expected.reverse();
    assert_eq!(collected, expected);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (set DATABASE_URL)"]
async fn search_matches_title_or_content_case_insensitively() {
    let (app, _pool) = test_app().await;
    let (access, _) = register(&app, &fresh_email("search")).await;

    create_record(&app, &access, "Lista de Compras", "pão e leite").await;
    create_record(&app, &access, "aula de história", "Revolução de 1820 e COMPRAS").await;
    create_record(&app, &access, "diário", "nada relevante").await;

    let (status, json) = send(
        &app,
        Method::GET,
        "/records?search=compras",
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);

    // An all-whitespace term is no filter at all.
    let (status, json) = send(
        &app,
        Method::GET,
        "/records?search=%20%20",
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (set DATABASE_URL)"]
async fn refresh_works_until_logout_revokes_the_token() {
    let (app, _pool) = test_app().await;
    let (_, refresh) = register(&app, &fresh_email("sessions")).await;

    // Redeem for a fresh access token and prove it opens the gate.
    let (status, json) = send(
        &app,
        Method::POST,
        "/auth/refresh",
        None,
        Some(serde_json::json!({"refreshToken": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_access = json["accessToken"].as_str().expect("accessToken");

    let (status, _) = send(&app, Method::GET, "/auth/me", Some(new_access), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        &app,
        Method::POST,
        "/auth/logout",
        None,
        Some(serde_json::json!({"refreshToken": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    // The signature still verifies, but the persisted row is gone.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/refresh",
        None,
        Some(serde_json::json!({"refreshToken": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logout is not idempotent: the second attempt reports not-found.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/logout",
        None,
        Some(serde_json::json!({"refreshToken": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance (set DATABASE_URL)"]
async fn profile_update_and_account_deletion_cascade() {
    let (app, pool) = test_app().await;
    let email = fresh_email("profile");
    let (access, refresh) = register(&app, &email).await;
    create_record(&app, &access, "será apagada", "junto com a conta").await;

    // Wrong current password is rejected before anything changes.
    let (status, _) = send(
        &app,
        Method::PUT,
        "/auth/profile",
        Some(&access),
        Some(serde_json::json!({
            "currentPassword": "senha-errada",
            "newPassword": "outra-senha-forte",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/auth/profile",
        Some(&access),
        Some(serde_json::json!({"name": "Ana Souza"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, profile) = send(&app, Method::GET, "/auth/profile", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Ana Souza");

    let (status, _) = send(&app, Method::DELETE, "/auth/profile", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);

    // Sessions and records are gone with the user row.
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(users, 0);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/refresh",
        None,
        Some(serde_json::json!({"refreshToken": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
