//! Integration tests for the HTTP surface
//!
//! Drives the full router (readiness gate, auth gate, handlers) with an
//! in-memory session store, an in-memory record collection and a fake
//! identity provider standing in for GitHub.

use std::sync::Arc;

use api::auth::{AuthError, AuthorizationRequest, IdentityProvider, ProviderProfile};
use api::AppState;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use store::{Collection, MemoryCollection, NewRecord, RecordId};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

const AUTHORIZE_URL: &str = "https://github.test/login/oauth/authorize?state=fixed-state";
const GOOD_CODE: &str = "good-code";

struct FakeGitHub;

#[async_trait]
impl IdentityProvider for FakeGitHub {
    fn authorization_request(&self) -> AuthorizationRequest {
        AuthorizationRequest {
            url: AUTHORIZE_URL.to_string(),
            csrf_state: "fixed-state".to_string(),
            pkce_verifier: "verifier".to_string(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<ProviderProfile, AuthError> {
        if code == GOOD_CODE && pkce_verifier == "verifier" {
            Ok(ProviderProfile {
                id: "42".to_string(),
                username: "octocat".to_string(),
                display_name: Some("Mona Lisa".to_string()),
            })
        } else {
            Err(AuthError::TokenExchange("bad_verification_code".to_string()))
        }
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    collection: MemoryCollection,
}

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    cookie: Option<String>,
    body: Option<Value>,
}

impl TestApp {
    fn new(ready: bool) -> Self {
        let state = AppState::new(Arc::new(FakeGitHub));
        let collection = MemoryCollection::new();
        if ready {
            assert!(state.mark_ready(Arc::new(collection.clone())));
        }

        let router = api::router(state.clone())
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false));

        Self {
            router,
            state,
            collection,
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        cookie: Option<&str>,
        body: Option<String>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|value| value.to_str().unwrap().split(';').next().unwrap().to_string());

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).unwrap())
        };

        TestResponse {
            status,
            location,
            cookie,
            body,
        }
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, cookie, None).await
    }

    async fn post(&self, path: &str, cookie: Option<&str>, body: Option<Value>) -> TestResponse {
        self.send(Method::POST, path, cookie, body.map(|body| body.to_string()))
            .await
    }

    /// POST a JSON-typed body that may not be valid JSON.
    async fn post_raw(&self, path: &str, cookie: Option<&str>, body: &str) -> TestResponse {
        self.send(Method::POST, path, cookie, Some(body.to_string())).await
    }

    /// Run the OAuth handshake against the fake provider; returns the session cookie.
    async fn login(&self) -> String {
        let start = self.get("/auth/github", None).await;
        assert_eq!(start.status, StatusCode::FOUND);
        assert_eq!(start.location.as_deref(), Some(AUTHORIZE_URL));
        let pending_cookie = start.cookie.expect("login should start a session");

        let callback = self
            .get(
                &format!("/auth/github/callback?code={GOOD_CODE}&state=fixed-state"),
                Some(&pending_cookie),
            )
            .await;
        assert_eq!(callback.status, StatusCode::FOUND);
        assert_eq!(callback.location.as_deref(), Some("/"));
        callback.cookie.expect("login should set a fresh session cookie")
    }
}

#[tokio::test]
async fn test_routes_unavailable_until_ready() {
    let app = TestApp::new(false);

    for path in ["/results", "/user", "/auth/github"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE, "{path}");
        assert!(response.body.is_none(), "{path}");
    }

    let response = app.post("/submit", None, Some(json!({ "watched": 1, "episodes": 2 }))).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(app.collection.is_empty());

    assert!(app.state.mark_ready(Arc::new(app.collection.clone())));
    let response = app.get("/user", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_mark_ready_only_once() {
    let app = TestApp::new(true);
    assert!(app.state.is_ready());
    assert!(!app.state.mark_ready(Arc::new(MemoryCollection::new())));
}

#[tokio::test]
async fn test_user_without_session() {
    let app = TestApp::new(true);

    let response = app.get("/user", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "authenticated": false })));
}

#[tokio::test]
async fn test_login_sets_session_user() {
    let app = TestApp::new(true);
    let cookie = app.login().await;

    let response = app.get("/user", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        Some(json!({
            "authenticated": true,
            "user": { "id": "42", "username": "octocat", "displayName": "Mona Lisa" },
        }))
    );
}

#[tokio::test]
async fn test_callback_failures_redirect_home() {
    let app = TestApp::new(true);

    let start = app.get("/auth/github", None).await;
    let cookie = start.cookie.unwrap();

    let cases = [
        "/auth/github/callback?code=good-code&state=forged".to_string(),
        "/auth/github/callback?code=bad-code&state=fixed-state".to_string(),
        "/auth/github/callback?error=access_denied".to_string(),
        "/auth/github/callback".to_string(),
    ];
    for path in cases {
        let response = app.get(&path, Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::FOUND, "{path}");
        assert_eq!(response.location.as_deref(), Some("/"), "{path}");
    }

    let response = app.get("/user", Some(&cookie)).await;
    assert_eq!(response.body, Some(json!({ "authenticated": false })));
}

#[tokio::test]
async fn test_callback_without_pending_login() {
    let app = TestApp::new(true);

    let response = app
        .get("/auth/github/callback?code=good-code&state=fixed-state", None)
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/"));

    let response = app.get("/user", response.cookie.as_deref()).await;
    assert_eq!(response.body, Some(json!({ "authenticated": false })));
}

#[tokio::test]
async fn test_protected_routes_redirect_anonymous_requests() {
    let app = TestApp::new(true);

    let response = app.post("/submit", None, Some(json!({ "watched": 3, "episodes": 12 }))).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/auth/github"));
    assert!(app.collection.is_empty());

    let response = app.get("/results", None).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/auth/github"));

    for path in ["/delete", "/update", "/logout"] {
        let response = app.post(path, None, None).await;
        assert_eq!(response.status, StatusCode::FOUND, "{path}");
        assert_eq!(response.location.as_deref(), Some("/auth/github"), "{path}");
    }
}

#[tokio::test]
async fn test_submit_computes_progress() {
    let app = TestApp::new(true);
    let cookie = app.login().await;

    let response = app
        .post(
            "/submit",
            Some(&cookie),
            Some(json!({ "title": "Frieren", "watched": 3, "episodes": 12, "progress": "90%" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.body.unwrap();
    assert_eq!(body["acknowledged"], json!(true));

    let records = app.collection.find_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(body["insertedId"], json!(records[0].id.to_string()));
    assert_eq!(records[0].progress(), Some("25%"));
    assert_eq!(records[0].get("title"), Some(&json!("Frieren")));
}

#[tokio::test]
async fn test_submit_accepts_form_strings() {
    let app = TestApp::new(true);
    let cookie = app.login().await;

    let response = app
        .post("/submit", Some(&cookie), Some(json!({ "watched": "12", "episodes": "10" })))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let records = app.collection.find_all().await.unwrap();
    assert_eq!(records[0].progress(), Some("100%"));
    assert_eq!(records[0].get("watched"), Some(&json!(12)));
}

#[tokio::test]
async fn test_submit_rejects_malformed_body() {
    let app = TestApp::new(true);
    let cookie = app.login().await;

    let response = app
        .post("/submit", Some(&cookie), Some(json!({ "watched": "many", "episodes": 10 })))
        .await;
    assert!(response.status.is_client_error());
    assert!(response.body.is_none());
    assert!(app.collection.is_empty());
}

#[tokio::test]
async fn test_results_lists_records() {
    let app = TestApp::new(true);
    let cookie = app.login().await;

    app.collection
        .insert_one(NewRecord::new(1, 4).with_field("title", "Mushishi"))
        .await
        .unwrap();
    app.collection.insert_one(NewRecord::new(0, 0)).await.unwrap();

    let response = app.get("/results", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.body.unwrap();
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|record| record["_id"].is_string()));

    let mut progress: Vec<&str> = records
        .iter()
        .map(|record| record["progress"].as_str().unwrap())
        .collect();
    progress.sort();
    assert_eq!(progress, ["0%", "25%"]);
}

#[tokio::test]
async fn test_delete() {
    let app = TestApp::new(true);
    let cookie = app.login().await;

    let response = app.post("/delete", Some(&cookie), Some(json!({}))).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body.is_none());

    let response = app.post("/delete", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .post("/delete", Some(&cookie), Some(json!({ "_id": "not-an-id" })))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.post_raw("/delete", Some(&cookie), r#"{"_id": "#).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.is_none());

    let inserted = app.collection.insert_one(NewRecord::new(1, 2)).await.unwrap();

    let response = app
        .post("/delete", Some(&cookie), Some(json!({ "_id": RecordId::new().to_string() })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "acknowledged": true, "deletedCount": 0 })));
    assert_eq!(app.collection.len(), 1);

    let response = app
        .post(
            "/delete",
            Some(&cookie),
            Some(json!({ "_id": inserted.inserted_id.to_string() })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "acknowledged": true, "deletedCount": 1 })));
    assert!(app.collection.is_empty());
}

#[tokio::test]
async fn test_update() {
    let app = TestApp::new(true);
    let cookie = app.login().await;

    let inserted = app
        .collection
        .insert_one(NewRecord::new(2, 10).with_field("title", "Monster").with_field("rating", 9))
        .await
        .unwrap();

    let response = app
        .post(
            "/update",
            Some(&cookie),
            Some(json!({ "field": "title", "newInfo": "Pluto", "watched": 5, "episodes": 10 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body.is_none());

    let response = app
        .post(
            "/update",
            Some(&cookie),
            Some(json!({
                "_id": inserted.inserted_id.to_string(),
                "field": "title",
                "newInfo": "Pluto",
                "watched": 5,
                "episodes": "8",
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        Some(json!({
            "acknowledged": true,
            "matchedCount": 1,
            "modifiedCount": 1,
            "upsertedCount": 0,
            "upsertedId": null,
        }))
    );

    let records = app.collection.find_all().await.unwrap();
    let record = &records[0];
    assert_eq!(record.get("title"), Some(&json!("Pluto")));
    assert_eq!(record.get("rating"), Some(&json!(9)));
    assert_eq!(record.get("episodes"), Some(&json!(8)));
    assert_eq!(record.progress(), Some("62%"));
}

#[tokio::test]
async fn test_update_unknown_record_and_bad_body() {
    let app = TestApp::new(true);
    let cookie = app.login().await;

    let response = app
        .post(
            "/update",
            Some(&cookie),
            Some(json!({
                "_id": RecordId::new().to_string(),
                "field": "title",
                "newInfo": "Pluto",
                "watched": 1,
                "episodes": 2,
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.unwrap()["matchedCount"], json!(0));

    let response = app
        .post(
            "/update",
            Some(&cookie),
            Some(json!({ "_id": RecordId::new().to_string(), "field": "title" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.is_none());

    let response = app.post_raw("/update", Some(&cookie), "{not json").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.is_none());
}

#[tokio::test]
async fn test_logout() {
    let app = TestApp::new(true);
    let cookie = app.login().await;

    let response = app.post("/logout", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/"));

    let response = app.get("/user", Some(&cookie)).await;
    assert_eq!(response.body, Some(json!({ "authenticated": false })));

    let response = app.get("/results", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/auth/github"));
}
