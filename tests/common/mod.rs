#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use axum_extra::extract::cookie::Key;
use cadastro_pessoas::client::{PessoaForm, TableRow, View};
use cadastro_pessoas::config::Config;
use cadastro_pessoas::db::{PessoaStorage, SqlitePool, connect};
use cadastro_pessoas::service::{FixedCredentials, MemorySessionStore, PessoaService};
use cadastro_pessoas::{CadastroState, cadastro_router};
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

pub const LOGIN: &str = "admin";
pub const SENHA: &str = "segredo";

pub struct TestApp {
    pub app: Router,
    pub sessions: Arc<MemorySessionStore>,
    /// Same database the router uses, for breaking it underneath the app.
    pub pool: SqlitePool,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = fs::remove_file(format!("{}{suffix}", self.db_path.display()));
        }
    }
}

fn temp_db_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "cadastro-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    path
}

pub async fn spawn_app(tag: &str) -> TestApp {
    let db_path = temp_db_path(tag);
    let database_url = format!("sqlite:{}", db_path.display());
    let pool = connect(&database_url, 1)
        .await
        .expect("failed to open test database");
    let storage = PessoaStorage::new(pool.clone());
    storage.init_schema().await.expect("schema init failed");

    let sessions = Arc::new(MemorySessionStore::new());
    let state = CadastroState::new(
        PessoaService::new(storage),
        sessions.clone(),
        Arc::new(FixedCredentials::new(LOGIN, SENHA)),
        Key::generate(),
        Config::default().basic.secure_cookie,
    );
    TestApp {
        app: cadastro_router(state),
        sessions,
        pool,
        db_path,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body was not JSON")
    }

    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("response body was not utf-8")
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> TestResponse {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn login_request(login: &str, senha: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!("login={login}&senha={senha}")))
        .expect("failed to build request")
}

/// Log in and return the `name=value` pair to send back as `Cookie`.
pub async fn login_cookie(app: &Router) -> String {
    let resp = send(app, login_request(LOGIN, SENHA)).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/"));
    resp.headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("cadastro_sessao="))
        .expect("login did not set the session cookie")
        .to_string()
}

pub fn api_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request")
}

/// View double that records what the controller asked it to show.
#[derive(Default)]
pub struct RecordingView {
    pub rows: Vec<TableRow>,
    pub renders: usize,
    pub alerts: Vec<String>,
    pub confirm_answer: bool,
    pub confirms: usize,
    pub form: PessoaForm,
    pub cancel_visible: bool,
}

impl RecordingView {
    pub fn confirming(answer: bool) -> Self {
        Self {
            confirm_answer: answer,
            ..Default::default()
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.nome.as_str()).collect()
    }
}

impl View for RecordingView {
    fn render_table(&mut self, rows: &[TableRow]) {
        self.rows = rows.to_vec();
        self.renders += 1;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, _message: &str) -> bool {
        self.confirms += 1;
        self.confirm_answer
    }

    fn fill_form(&mut self, form: &PessoaForm) {
        self.form = form.clone();
    }

    fn reset_form(&mut self) {
        self.form = PessoaForm::default();
    }

    fn set_cancel_visible(&mut self, visible: bool) {
        self.cancel_visible = visible;
    }
}
