#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{Value, json};
use tokio::sync::Notify;

use werise::config::{Config, StoreConfig};
use werise::models::{ArtSubmission, ArtSubmissionInput};
use werise::store::{ArtStore, StoreError};

// ── Fake hosted store ───────────────────────────────────────────

/// One request as seen by the fake store.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
    pub prefer: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct FakeStoreState {
    rows: Mutex<Vec<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
    failure: Mutex<Option<(StatusCode, Value)>>,
    ignore_order: Mutex<bool>,
    clock: Mutex<Option<DateTime<Utc>>>,
    select_delays: Mutex<VecDeque<Duration>>,
}

impl FakeStoreState {
    fn record(&self, method: &str, uri: &Uri, headers: &HeaderMap, body: &[u8]) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(|q| q.to_string()),
            apikey: header("apikey"),
            authorization: header("authorization"),
            prefer: header("prefer"),
            body: serde_json::from_slice(body).ok(),
        });
    }

    fn failure(&self) -> Option<(StatusCode, Value)> {
        self.failure.lock().unwrap().clone()
    }

    /// Strictly increasing insert timestamps, one second apart.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let mut clock = self.clock.lock().unwrap();
        let next = clock
            .map(|t| t + chrono::Duration::seconds(1))
            .unwrap_or_else(Utc::now);
        *clock = Some(next);
        next
    }
}

/// An in-memory PostgREST look-alike serving `art_submissions`.
pub struct FakeStore {
    pub addr: SocketAddr,
    state: Arc<FakeStoreState>,
}

impl FakeStore {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Add a row as if inserted at `created_at`.
    pub fn seed(&self, title: &str, created_at: &str) -> String {
        let id = uuid::Uuid::now_v7().to_string();
        self.state.rows.lock().unwrap().push(json!({
            "id": id,
            "title": title,
            "creator_name": "Seeded Artist",
            "email": "seed@example.com",
            "description": null,
            "artwork_url": format!("https://img.example.com/{title}.jpg"),
            "created_at": created_at,
        }));
        id
    }

    /// Every following request fails with `status` and `body` until [`recover`](Self::recover).
    pub fn fail_with(&self, status: StatusCode, body: Value) {
        *self.state.failure.lock().unwrap() = Some((status, body));
    }

    pub fn recover(&self) {
        *self.state.failure.lock().unwrap() = None;
    }

    /// Serve rows in insertion order even when asked to sort.
    pub fn ignore_order(&self) {
        *self.state.ignore_order.lock().unwrap() = true;
    }

    /// Hold the next selects open, one delay per request in arrival order.
    pub fn delay_selects(&self, delays: &[Duration]) {
        self.state.select_delays.lock().unwrap().extend(delays.iter().copied());
    }

    pub fn rows(&self) -> Vec<Value> {
        self.state.rows.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }
}

async fn insert_rows(
    State(fake): State<Arc<FakeStoreState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    fake.record("POST", &uri, &headers, &body);
    if let Some((status, body)) = fake.failure() {
        return (status, Json(body)).into_response();
    }

    let rows: Vec<Value> = match serde_json::from_slice(&body) {
        Ok(rows) => rows,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": format!("Invalid JSON: {e}") })),
            )
                .into_response();
        }
    };

    for mut row in rows {
        row["id"] = json!(uuid::Uuid::now_v7().to_string());
        row["created_at"] = json!(fake.next_timestamp().to_rfc3339());
        fake.rows.lock().unwrap().push(row);
    }

    StatusCode::CREATED.into_response()
}

async fn select_rows(
    State(fake): State<Arc<FakeStoreState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    fake.record("GET", &uri, &headers, &[]);
    let delay = fake.select_delays.lock().unwrap().pop_front();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some((status, body)) = fake.failure() {
        return (status, Json(body)).into_response();
    }

    let mut rows = fake.rows.lock().unwrap().clone();
    let wants_desc = uri
        .query()
        .is_some_and(|q| q.contains("order=created_at.desc"));
    if wants_desc && !*fake.ignore_order.lock().unwrap() {
        rows.sort_by_key(|row| {
            std::cmp::Reverse(
                row["created_at"]
                    .as_str()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok()),
            )
        });
    }

    Json(rows).into_response()
}

pub async fn spawn_fake_store() -> FakeStore {
    let state = Arc::new(FakeStoreState::default());

    let router = Router::new()
        .route(
            "/rest/v1/art_submissions",
            post(insert_rows).get(select_rows),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake store");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake store failed");
    });

    FakeStore { addr, state }
}

// ── In-process store double ─────────────────────────────────────

/// Scriptable [`ArtStore`] for driving the workflows without a network.
#[derive(Default)]
pub struct MockStore {
    pub rows: Mutex<Vec<ArtSubmission>>,
    pub inserted: Mutex<Vec<ArtSubmissionInput>>,
    pub insert_error: Mutex<Option<StoreError>>,
    pub select_error: Mutex<Option<StoreError>>,
    pub insert_calls: AtomicUsize,
    pub select_calls: AtomicUsize,
    /// When set, inserts wait here until notified.
    pub insert_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockStore {
    pub fn with_rows(rows: Vec<ArtSubmission>) -> Self {
        let store = Self::default();
        *store.rows.lock().unwrap() = rows;
        store
    }

    pub fn fail_inserts(&self, err: StoreError) {
        *self.insert_error.lock().unwrap() = Some(err);
    }

    pub fn fail_selects(&self, err: StoreError) {
        *self.select_error.lock().unwrap() = Some(err);
    }

    pub fn heal(&self) {
        *self.insert_error.lock().unwrap() = None;
        *self.select_error.lock().unwrap() = None;
    }

    pub fn gate_inserts(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.insert_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn inserts(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn selects(&self) -> usize {
        self.select_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtStore for MockStore {
    async fn insert(&self, record: &ArtSubmissionInput) -> Result<(), StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.insert_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(err) = self.insert_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.inserted.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<ArtSubmission>, StoreError> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.select_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.rows.lock().unwrap().clone())
    }
}

pub fn artwork(id: &str, title: &str, created_at: &str) -> ArtSubmission {
    ArtSubmission {
        id: id.to_string(),
        title: title.to_string(),
        creator_name: "Ana".to_string(),
        email: "ana@x.com".to_string(),
        description: None,
        artwork_url: format!("https://x.com/{id}.jpg"),
        created_at: created_at.parse().expect("valid RFC 3339 timestamp"),
    }
}

// ── Running site ────────────────────────────────────────────────

pub fn test_config(store_url: &str) -> Config {
    Config {
        store: StoreConfig::new(store_url, "test-anon-key", Some(Duration::from_secs(5)))
            .expect("valid store config"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        session_ttl: Duration::from_secs(3600),
        session_sweep: Duration::from_secs(60),
        log_level: "warn".to_string(),
    }
}

/// A running site wired to a fake store, with a cookie-carrying client.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: FakeStore,
    session_cookie: Mutex<Option<String>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn session_cookie(&self) -> Option<String> {
        self.session_cookie.lock().unwrap().clone()
    }

    /// GET a page, returning (status, body).
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let req = self.with_cookie(self.client.get(self.url(path)));
        let resp = req.send().await.expect("get request failed");
        self.finish(resp).await
    }

    /// POST a form-urlencoded body, returning (status, body).
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> (StatusCode, String) {
        let req = self
            .with_cookie(self.client.post(self.url(path)))
            .form(fields);
        let resp = req.send().await.expect("post request failed");
        self.finish(resp).await
    }

    /// POST with an empty body, returning the raw response.
    pub async fn post_empty(&self, path: &str) -> reqwest::Response {
        let resp = self
            .with_cookie(self.client.post(self.url(path)))
            .send()
            .await
            .expect("post request failed");
        self.remember_cookie(&resp);
        resp
    }

    pub async fn submit(&self, fields: &[(&str, &str)]) -> (StatusCode, String) {
        self.post_form("/submit", fields).await
    }

    fn with_cookie(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session_cookie() {
            Some(cookie) => req.header("cookie", cookie),
            None => req,
        }
    }

    fn remember_cookie(&self, resp: &reqwest::Response) {
        let cookie = resp
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("werise_session="))
            .and_then(|v| v.split(';').next())
            .map(|v| v.to_string());
        if let Some(cookie) = cookie {
            *self.session_cookie.lock().unwrap() = Some(cookie);
        }
    }

    async fn finish(&self, resp: reqwest::Response) -> (StatusCode, String) {
        self.remember_cookie(&resp);
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (status, body)
    }
}

/// Spawn the site against a fresh fake store on random ports.
pub async fn spawn_app() -> TestApp {
    let store = spawn_fake_store().await;
    let config = test_config(&store.url());

    let app = werise::build_app_from_config(config).expect("Failed to build app");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        store,
        session_cookie: Mutex::new(None),
    }
}
